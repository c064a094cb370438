//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::Result;
use colored::*;
use pagesmith_designer::{BatchOutcome, GenerationMode, RunSummary};
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Format the summary of one run.
    pub fn format_summary(&self, summary: &RunSummary) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(summary)?),
            OutputFormat::Quiet => Ok(summary.output_path.display().to_string()),
            OutputFormat::Table => Ok(self.summary_table(summary)),
        }
    }

    /// Format the outcomes of a batch.
    pub fn format_batch(&self, outcomes: &[BatchOutcome]) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                let entries: Vec<serde_json::Value> = outcomes
                    .iter()
                    .map(|o| match &o.result {
                        Ok(summary) => serde_json::json!({
                            "input": o.job.input_path,
                            "ok": true,
                            "summary": summary,
                        }),
                        Err(e) => serde_json::json!({
                            "input": o.job.input_path,
                            "ok": false,
                            "error": e.to_string(),
                        }),
                    })
                    .collect();
                Ok(serde_json::to_string_pretty(&entries)?)
            }
            OutputFormat::Quiet => Ok(outcomes
                .iter()
                .filter_map(|o| o.result.as_ref().ok())
                .map(|s| s.output_path.display().to_string())
                .collect::<Vec<_>>()
                .join("\n")),
            OutputFormat::Table => Ok(self.batch_table(outcomes)),
        }
    }

    fn summary_table(&self, summary: &RunSummary) -> String {
        let mut builder = Builder::default();
        builder.push_record(["Field", "Value"]);

        let reason = summary
            .fallback_reason
            .map(|r| r.to_string())
            .unwrap_or_else(|| "-".to_string());
        let rows = [
            ("Mode", self.mode_label(summary.mode)),
            ("Fallback reason", reason),
            ("Model", summary.model.clone()),
            ("Attempts", summary.attempts.to_string()),
            ("JSON repaired", summary.repaired.to_string()),
            ("Blocks", summary.blocks.to_string()),
            ("Layout", summary.layout_hint.clone()),
            ("Style rules", summary.style_rules.to_string()),
            ("Glossary terms", summary.glossary_terms.to_string()),
            ("Elapsed", format!("{}ms", summary.elapsed_ms)),
            ("Output", summary.output_path.display().to_string()),
        ];
        for (field, value) in rows {
            builder.push_record([field.to_string(), value]);
        }

        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));

        table.to_string()
    }

    fn batch_table(&self, outcomes: &[BatchOutcome]) -> String {
        if outcomes.is_empty() {
            return self.colorize("No pages processed.", "yellow");
        }

        let mut builder = Builder::default();
        builder.push_record(["Input", "Status", "Mode", "Blocks", "Output"]);

        for outcome in outcomes {
            let input = outcome.job.input_path.display().to_string();
            match &outcome.result {
                Ok(summary) => builder.push_record([
                    input,
                    self.colorize("ok", "green"),
                    self.mode_label(summary.mode),
                    summary.blocks.to_string(),
                    summary.output_path.display().to_string(),
                ]),
                Err(e) => builder.push_record([
                    input,
                    self.colorize("failed", "red"),
                    "-".to_string(),
                    "-".to_string(),
                    e.to_string(),
                ]),
            }
        }

        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));

        table.to_string()
    }

    fn mode_label(&self, mode: GenerationMode) -> String {
        match mode {
            GenerationMode::Generated => self.colorize("generated", "green"),
            GenerationMode::Fallback => self.colorize("fallback", "yellow"),
        }
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            _ => text.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pagesmith_designer::{DesignJob, DesignerError, FallbackReason};
    use std::path::PathBuf;

    fn summary() -> RunSummary {
        RunSummary {
            version: "0.2.0".to_string(),
            model: "none".to_string(),
            mode: GenerationMode::Fallback,
            fallback_reason: Some(FallbackReason::CompletionDisabled),
            attempts: 0,
            repaired: false,
            style_rules: 8,
            glossary_terms: 8,
            layout_hint: "grid-2-2".to_string(),
            blocks: 4,
            output_path: PathBuf::from("out/page.design.json"),
            elapsed_ms: 3,
        }
    }

    fn outcomes() -> Vec<BatchOutcome> {
        vec![
            BatchOutcome {
                job: DesignJob {
                    input_path: PathBuf::from("a.txt"),
                    output_path: PathBuf::from("out/a.design.json"),
                    layout_hint: None,
                },
                result: Ok(summary()),
            },
            BatchOutcome {
                job: DesignJob {
                    input_path: PathBuf::from("b.txt"),
                    output_path: PathBuf::from("out/b.design.json"),
                    layout_hint: None,
                },
                result: Err(DesignerError::MissingField("document_title".to_string())),
            },
        ]
    }

    #[test]
    fn test_json_summary() {
        let formatter = Formatter::new(OutputFormat::Json, false);
        let output = formatter.format_summary(&summary()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["mode"], "fallback");
        assert_eq!(value["fallback_reason"], "completion_disabled");
        assert_eq!(value["blocks"], 4);
    }

    #[test]
    fn test_table_summary() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let output = formatter.format_summary(&summary()).unwrap();
        assert!(output.contains("Mode"));
        assert!(output.contains("fallback"));
        assert!(output.contains("completion disabled"));
    }

    #[test]
    fn test_quiet_summary() {
        let formatter = Formatter::new(OutputFormat::Quiet, false);
        let output = formatter.format_summary(&summary()).unwrap();
        assert_eq!(output, PathBuf::from("out/page.design.json").display().to_string());
    }

    #[test]
    fn test_batch_table() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let output = formatter.format_batch(&outcomes()).unwrap();
        assert!(output.contains("a.txt"));
        assert!(output.contains("failed"));
        assert!(output.contains("Missing required field"));
    }

    #[test]
    fn test_batch_json() {
        let formatter = Formatter::new(OutputFormat::Json, false);
        let output = formatter.format_batch(&outcomes()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value[0]["ok"], true);
        assert_eq!(value[1]["ok"], false);
    }

    #[test]
    fn test_batch_quiet_lists_successes() {
        let formatter = Formatter::new(OutputFormat::Quiet, false);
        let output = formatter.format_batch(&outcomes()).unwrap();
        assert_eq!(output.lines().count(), 1);
    }

    #[test]
    fn test_no_color() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        assert_eq!(formatter.success("done"), "✓ done");
        assert_eq!(formatter.error("failed"), "✗ failed");
        assert_eq!(formatter.info("note"), "ℹ note");
    }
}
