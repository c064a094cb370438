//! Batch command implementation.

use crate::cli::BatchArgs;
use crate::commands::{default_output_path, numbered_output_path};
use crate::error::{CliError, Result};
use crate::output::Formatter;
use crate::provider::Provider;
use pagesmith_designer::{BatchOutcome, DesignJob, PageDesigner};
use std::collections::HashSet;

/// Execute the batch command.
pub async fn execute_batch(
    args: BatchArgs,
    designer: &PageDesigner<Provider>,
    formatter: &Formatter,
) -> Result<()> {
    if args.concurrency == 0 {
        return Err(CliError::InvalidInput(
            "--concurrency must be at least 1".to_string(),
        ));
    }

    let jobs = build_jobs(&args);
    let total = jobs.len();
    let outcomes = designer.design_batch(jobs, args.concurrency).await;

    println!("{}", formatter.format_batch(&outcomes)?);
    for line in failure_lines(&outcomes, formatter) {
        eprintln!("{}", line);
    }

    let failed = outcomes.iter().filter(|o| o.result.is_err()).count();
    if failed > 0 {
        return Err(CliError::BatchFailed { failed, total });
    }
    Ok(())
}

/// One job per input, all writing into the output directory
///
/// Inputs that share a file stem get numbered names (`one.design.json`,
/// `one-2.design.json`, ...) so no two jobs write the same artifact.
fn build_jobs(args: &BatchArgs) -> Vec<DesignJob> {
    let mut taken = HashSet::new();
    args.inputs
        .iter()
        .map(|input| {
            let output_path = (1..)
                .map(|n| numbered_output_path(input, Some(&args.out_dir), n))
                .find(|path| !taken.contains(path))
                .unwrap_or_else(|| default_output_path(input, Some(&args.out_dir)));
            taken.insert(output_path.clone());
            DesignJob {
                input_path: input.clone(),
                output_path,
                layout_hint: args.layout_hint.clone(),
            }
        })
        .collect()
}

/// One error line per failed job.
fn failure_lines(outcomes: &[BatchOutcome], formatter: &Formatter) -> Vec<String> {
    outcomes
        .iter()
        .filter_map(|o| {
            let e = o.result.as_ref().err()?;
            Some(formatter.error(&format!("{}: {}", o.job.input_path.display(), e)))
        })
        .collect()
}
