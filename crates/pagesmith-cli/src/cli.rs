//! CLI command definitions and argument parsing.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Pagesmith CLI - Turn page text into structured page designs.
#[derive(Debug, Parser)]
#[command(name = "pagesmith")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(flatten)]
    pub overrides: Overrides,

    #[command(subcommand)]
    pub command: Command,
}

/// Settings that override the configuration file.
#[derive(Debug, Default, clap::Args)]
pub struct Overrides {
    /// API key for the completion endpoint (offline fallback mode without one)
    #[arg(long, env = "PAGESMITH_API_KEY", hide_env_values = true, global = true)]
    pub api_key: Option<String>,

    /// Base URL of the OpenAI-compatible endpoint
    #[arg(long, env = "PAGESMITH_BASE_URL", global = true)]
    pub base_url: Option<String>,

    /// Model identifier
    #[arg(long, env = "PAGESMITH_MODEL", global = true)]
    pub model: Option<String>,

    /// Sizing preset, applied before the individual overrides below
    #[arg(long, value_enum, env = "PAGESMITH_PRESET", global = true)]
    pub preset: Option<CliPreset>,

    /// Minimum number of blocks per page
    #[arg(long, env = "PAGESMITH_MIN_BLOCKS", global = true)]
    pub min_blocks: Option<usize>,

    /// Maximum number of blocks per page
    #[arg(long, env = "PAGESMITH_MAX_BLOCKS", global = true)]
    pub max_blocks: Option<usize>,

    /// Maximum block content length (characters)
    #[arg(long, env = "PAGESMITH_MAX_CONTENT_LEN", global = true)]
    pub max_content_len: Option<usize>,

    /// Default layout hint
    #[arg(long, env = "PAGESMITH_LAYOUT_HINT", global = true)]
    pub default_layout: Option<String>,
}

/// Output format options.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
    /// Quiet format (output paths only)
    Quiet,
}

/// Sizing presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum CliPreset {
    /// 3-4 blocks with short titles
    Concise,
    /// Up to 150-character content
    Detailed,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Design one page from a key-value input file
    Design(DesignArgs),

    /// Design many pages concurrently
    Batch(BatchArgs),

    /// Show or initialize the configuration
    Config(ConfigArgs),
}

/// Arguments for the design command.
#[derive(Debug, Parser)]
pub struct DesignArgs {
    /// Input file with `document_title:` and `page_data:` lines
    pub input: PathBuf,

    /// Output file (defaults to `<input>.design.json`)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Layout hint forced for this page
    #[arg(short, long)]
    pub layout_hint: Option<String>,
}

/// Arguments for the batch command.
#[derive(Debug, Parser)]
pub struct BatchArgs {
    /// Input files
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,

    /// Directory receiving one `<stem>.design.json` per input
    #[arg(short, long)]
    pub out_dir: PathBuf,

    /// Maximum pages designed at once
    #[arg(short = 'j', long, default_value = "4")]
    pub concurrency: usize,

    /// Layout hint forced for every page
    #[arg(short, long)]
    pub layout_hint: Option<String>,
}

/// Arguments for configuration management.
#[derive(Debug, Parser)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Configuration actions.
#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Print the effective configuration
    Show,

    /// Print the configuration file location
    Path,

    /// Write a default configuration file
    Init {
        /// Replace an existing file
        #[arg(long)]
        force: bool,
    },
}

impl From<CliFormat> for crate::config::OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Table => crate::config::OutputFormat::Table,
            CliFormat::Json => crate::config::OutputFormat::Json,
            CliFormat::Quiet => crate::config::OutputFormat::Quiet,
        }
    }
}

impl From<CliPreset> for pagesmith_designer::Preset {
    fn from(preset: CliPreset) -> Self {
        match preset {
            CliPreset::Concise => pagesmith_designer::Preset::Concise,
            CliPreset::Detailed => pagesmith_designer::Preset::Detailed,
        }
    }
}
