//! Design command implementation.

use crate::cli::DesignArgs;
use crate::commands::default_output_path;
use crate::error::Result;
use crate::output::Formatter;
use crate::provider::Provider;
use pagesmith_designer::{PageDesigner, RunSummary};

/// Execute the design command.
pub async fn execute_design(
    args: DesignArgs,
    designer: &PageDesigner<Provider>,
    formatter: &Formatter,
) -> Result<()> {
    let output = args
        .output
        .unwrap_or_else(|| default_output_path(&args.input, None));

    let summary = designer
        .run_file(&args.input, &output, args.layout_hint.as_deref())
        .await?;

    println!("{}", formatter.format_summary(&summary)?);
    if let Some(line) = fallback_notice(&summary, formatter) {
        eprintln!("{}", line);
    }

    Ok(())
}

/// Notice shown when the model's reply was not used.
fn fallback_notice(summary: &RunSummary, formatter: &Formatter) -> Option<String> {
    let reason = summary.fallback_reason?;
    Some(formatter.info(&format!("Blocks derived from the input text ({})", reason)))
}
