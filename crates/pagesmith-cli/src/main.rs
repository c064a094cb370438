//! Pagesmith CLI - Turn page text into structured page designs.

use clap::Parser;
use pagesmith_cli::commands;
use pagesmith_cli::{Cli, Command, Config, Formatter};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> pagesmith_cli::Result<()> {
    // Pick up PAGESMITH_* variables from a local .env before clap reads the environment
    dotenv::dotenv().ok();

    // Parse CLI arguments
    let cli = Cli::parse();

    init_logging(cli.verbose);

    // Load config, then let flags and env vars override it
    let mut config = Config::load(cli.config.as_deref())?;
    config.apply_overrides(&cli.overrides)?;

    // Determine output format
    let format = cli
        .format
        .map(Into::into)
        .unwrap_or(config.settings.format);

    // Determine color setting
    let color_enabled = !cli.no_color && config.settings.color;

    // Create formatter
    let formatter = Formatter::new(format, color_enabled);

    // Handle commands
    match cli.command {
        Command::Config(args) => {
            commands::execute_config(args, &config, cli.config.as_deref(), &formatter)?;
        }
        Command::Design(args) => {
            let designer = commands::build_designer(&config)?;
            commands::execute_design(args, &designer, &formatter).await?;
        }
        Command::Batch(args) => {
            let designer = commands::build_designer(&config)?;
            commands::execute_batch(args, &designer, &formatter).await?;
        }
    }

    Ok(())
}

/// Log to stderr; `RUST_LOG` wins over `-v`.
fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .with_target(false)
        .init();
}
