//! Core page designer implementation

use crate::artifact::DesignArtifact;
use crate::config::DesignerConfig;
use crate::decode::decode_draft;
use crate::error::DesignerError;
use crate::extract::extract_candidate;
use crate::fallback::FallbackGenerator;
use crate::input::PageInput;
use crate::prompt::PromptBuilder;
use crate::repair::{parse_object, RepairError};
use futures::stream::{self, StreamExt};
use pagesmith_domain::{CompletionProvider, CompletionRequest, Draft, Record};
use pagesmith_gatekeeper::{NormalizeContext, SchemaValidator};
use pagesmith_llm::{LlmError, RetryingClient};
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Where a record's blocks came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GenerationMode {
    /// Decoded from the model's reply
    Generated,
    /// Cut from the input text
    Fallback,
}

impl fmt::Display for GenerationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenerationMode::Generated => write!(f, "generated"),
            GenerationMode::Fallback => write!(f, "fallback"),
        }
    }
}

/// Why the fallback path was taken
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackReason {
    /// No credential configured
    CompletionDisabled,
    /// Every attempt failed
    CompletionUnavailable,
    /// Reply held no parsable JSON
    Unparsable,
    /// Reply parsed, but not to an object
    NotAnObject,
}

impl fmt::Display for FallbackReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            FallbackReason::CompletionDisabled => "completion disabled",
            FallbackReason::CompletionUnavailable => "completion unavailable",
            FallbackReason::Unparsable => "unparsable reply",
            FallbackReason::NotAnObject => "reply is not an object",
        };
        f.write_str(text)
    }
}

/// Pipeline position of a design run
enum Stage {
    Prompting,
    Calling(CompletionRequest),
    Extracting(String),
    FallbackDraft(FallbackReason),
    Validating(Draft),
}

impl Stage {
    fn name(&self) -> &'static str {
        match self {
            Stage::Prompting => "prompting",
            Stage::Calling(_) => "calling",
            Stage::Extracting(_) => "extracting",
            Stage::FallbackDraft(_) => "fallback_draft",
            Stage::Validating(_) => "validating",
        }
    }
}

/// A validated record plus how it was obtained
#[derive(Debug, Clone, PartialEq)]
pub struct Design {
    /// The record
    pub record: Record,
    /// Generated or fallback
    pub mode: GenerationMode,
    /// Set when `mode` is fallback
    pub fallback_reason: Option<FallbackReason>,
    /// Completion attempts made
    pub attempts: u32,
    /// Whether JSON repair was needed
    pub repaired: bool,
}

/// Observability record of one run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSummary {
    /// Crate version
    pub version: String,
    /// Model identifier
    pub model: String,
    /// Generated or fallback
    pub mode: GenerationMode,
    /// Set when `mode` is fallback
    pub fallback_reason: Option<FallbackReason>,
    /// Completion attempts made
    pub attempts: u32,
    /// Whether JSON repair was needed
    pub repaired: bool,
    /// Style rules injected into the prompt
    pub style_rules: usize,
    /// Glossary terms injected into the prompt
    pub glossary_terms: usize,
    /// Final layout hint
    pub layout_hint: String,
    /// Final block count
    pub blocks: usize,
    /// Artifact location
    pub output_path: PathBuf,
    /// Wall time of the run
    pub elapsed_ms: u64,
}

/// One unit of batch work
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DesignJob {
    /// Key-value input file
    pub input_path: PathBuf,
    /// Artifact destination
    pub output_path: PathBuf,
    /// Layout hint forced for this job
    pub layout_hint: Option<String>,
}

/// Result of one batch job
#[derive(Debug)]
pub struct BatchOutcome {
    /// The job
    pub job: DesignJob,
    /// Its summary or error
    pub result: Result<RunSummary, DesignerError>,
}

/// The page designer turns page input into persisted design records
///
/// Completion failures and unusable replies never reach the caller: they
/// route to the heuristic fallback, and every record passes the schema
/// validator before it is written.
pub struct PageDesigner<P> {
    client: RetryingClient<P>,
    validator: SchemaValidator,
    fallback: FallbackGenerator,
    config: DesignerConfig,
}

impl<P> PageDesigner<P>
where
    P: CompletionProvider<Error = LlmError> + Send + Sync,
{
    /// Create a new page designer
    pub fn new(provider: P, config: DesignerConfig) -> Result<Self, DesignerError> {
        config.validate().map_err(DesignerError::Config)?;
        let validator = SchemaValidator::new(config.validation.clone())?;
        let fallback = FallbackGenerator::new(
            config.fallback.title_max_len,
            config.fallback.max_segments,
            config.validation.max_content_len,
        );
        let client = RetryingClient::new(provider, config.retry.clone());

        Ok(Self {
            client,
            validator,
            fallback,
            config,
        })
    }

    /// Get the active configuration
    pub fn config(&self) -> &DesignerConfig {
        &self.config
    }

    /// Model identifier of the completion provider
    pub fn model_name(&self) -> &str {
        self.client.model_name()
    }

    /// Produce a validated record for `input` without persisting it
    pub async fn design(
        &self,
        input: &PageInput,
        layout_hint: Option<&str>,
    ) -> Result<Design, DesignerError> {
        let preferred_layout = layout_hint.unwrap_or(&self.config.layout_hint_default);
        let mut attempts = 0;
        let mut repaired = false;
        let mut fallback_reason = None;

        let mut stage = Stage::Prompting;
        let draft = loop {
            debug!("Design stage: {}", stage.name());
            stage = match stage {
                Stage::Prompting => {
                    let builder = PromptBuilder::new(
                        &self.config.style,
                        self.validator.constraints(),
                        self.config.validation.title_max_len,
                    );
                    let request =
                        builder.build(input, preferred_layout, self.config.endpoint.temperature);
                    debug!(
                        "Prompt lengths: system {} chars, user {} chars",
                        request.system_prompt.chars().count(),
                        request.user_prompt.chars().count()
                    );
                    Stage::Calling(request)
                }
                Stage::Calling(request) => match self.client.complete(&request).await {
                    Ok(completion) => {
                        attempts = completion.attempts;
                        debug!("Reply length: {} chars", completion.text.chars().count());
                        Stage::Extracting(completion.text)
                    }
                    Err(LlmError::Unavailable { attempts: 0, reason }) => {
                        debug!("Skipping completion: {}", reason);
                        Stage::FallbackDraft(FallbackReason::CompletionDisabled)
                    }
                    Err(e) => {
                        if let LlmError::Unavailable { attempts: made, .. } = &e {
                            attempts = *made;
                        }
                        warn!("Completion failed, using fallback: {}", e);
                        Stage::FallbackDraft(FallbackReason::CompletionUnavailable)
                    }
                },
                Stage::Extracting(text) => {
                    let candidate = extract_candidate(&text, self.config.scan_mode);
                    match parse_object(candidate) {
                        Ok(parsed) => {
                            repaired = parsed.repaired;
                            Stage::Validating(decode_draft(&parsed.object))
                        }
                        Err(e) => {
                            warn!("Unusable reply, using fallback: {}", e);
                            Stage::FallbackDraft(match e {
                                RepairError::Unparsable(_) => FallbackReason::Unparsable,
                                RepairError::NotAnObject(_) => FallbackReason::NotAnObject,
                            })
                        }
                    }
                }
                Stage::FallbackDraft(reason) => {
                    fallback_reason = Some(reason);
                    Stage::Validating(self.fallback.draft(
                        &input.document_title,
                        &input.page_data,
                        &self.config.layout_hint_default,
                    ))
                }
                Stage::Validating(draft) => break draft,
            };
        };

        let context = NormalizeContext::new(&input.document_title, &self.config.layout_hint_default)
            .with_layout_override(layout_hint);
        let record = self.validator.normalize(draft, &context)?;

        let violations = self.validator.check(&record);
        if !violations.is_empty() {
            warn!("Normalized record breaks {} rule(s): {:?}", violations.len(), violations);
        }

        let mode = if fallback_reason.is_some() {
            GenerationMode::Fallback
        } else {
            GenerationMode::Generated
        };

        Ok(Design {
            record,
            mode,
            fallback_reason,
            attempts,
            repaired,
        })
    }

    /// Design `input` and write the artifact to `output_path`
    pub async fn run(
        &self,
        input: &PageInput,
        output_path: &Path,
        layout_hint: Option<&str>,
    ) -> Result<RunSummary, DesignerError> {
        let start = Instant::now();

        info!(
            "Starting design for '{}' ({} chars of page data)",
            input.document_title,
            input.page_data.chars().count()
        );

        let design = self.design(input, layout_hint).await?;

        DesignArtifact::new(&design.record, self.validator.constraints())
            .write(output_path)
            .await?;

        let summary = RunSummary {
            version: env!("CARGO_PKG_VERSION").to_string(),
            model: self.model_name().to_string(),
            mode: design.mode,
            fallback_reason: design.fallback_reason,
            attempts: design.attempts,
            repaired: design.repaired,
            style_rules: self.config.style.rule_count(),
            glossary_terms: self.config.style.glossary_count(),
            layout_hint: design.record.layout_hint.clone(),
            blocks: design.record.len(),
            output_path: output_path.to_path_buf(),
            elapsed_ms: start.elapsed().as_millis() as u64,
        };

        info!(
            "Design complete: mode={}, blocks={}, attempts={}, repaired={}, {}ms -> {}",
            summary.mode,
            summary.blocks,
            summary.attempts,
            summary.repaired,
            summary.elapsed_ms,
            summary.output_path.display()
        );

        Ok(summary)
    }

    /// Load a key-value input file, design it and write the artifact
    pub async fn run_file(
        &self,
        input_path: &Path,
        output_path: &Path,
        layout_hint: Option<&str>,
    ) -> Result<RunSummary, DesignerError> {
        let input = PageInput::load(input_path).await?;
        self.run(&input, output_path, layout_hint).await
    }

    /// Run many jobs with at most `max_concurrent` in flight
    ///
    /// Outcomes arrive in completion order, each paired with its job. A job
    /// whose output path was already taken by an earlier job fails with
    /// [`DesignerError::DuplicateOutput`] without running.
    pub async fn design_batch(&self, jobs: Vec<DesignJob>, max_concurrent: usize) -> Vec<BatchOutcome> {
        let start = Instant::now();
        let total = jobs.len();
        let max_concurrent = max_concurrent.max(1);

        info!("Starting batch of {} jobs (concurrency: {})", total, max_concurrent);

        let (runnable, rejected) = claim_outputs(jobs);

        let mut outcomes: Vec<BatchOutcome> = stream::iter(runnable)
            .map(|job| async move {
                let result = self
                    .run_file(&job.input_path, &job.output_path, job.layout_hint.as_deref())
                    .await;
                if let Err(e) = &result {
                    warn!("Job {} failed: {}", job.input_path.display(), e);
                }
                BatchOutcome { job, result }
            })
            .buffer_unordered(max_concurrent)
            .collect()
            .await;
        outcomes.extend(rejected);

        let failed = outcomes.iter().filter(|o| o.result.is_err()).count();
        info!(
            "Batch completed: {}/{} successful, {} failed, {}ms total",
            total - failed,
            total,
            failed,
            start.elapsed().as_millis()
        );

        outcomes
    }
}

/// Split jobs into those that own their output path and those that collide
/// with an earlier job
fn claim_outputs(jobs: Vec<DesignJob>) -> (Vec<DesignJob>, Vec<BatchOutcome>) {
    let mut claimed: HashMap<PathBuf, PathBuf> = HashMap::new();
    let mut runnable = Vec::with_capacity(jobs.len());
    let mut rejected = Vec::new();

    for job in jobs {
        match claimed.get(&job.output_path) {
            Some(owner) => {
                warn!(
                    "Job {} skipped: {} is already written by {}",
                    job.input_path.display(),
                    job.output_path.display(),
                    owner.display()
                );
                let error = DesignerError::DuplicateOutput {
                    path: job.output_path.clone(),
                    claimed_by: owner.clone(),
                };
                rejected.push(BatchOutcome {
                    job,
                    result: Err(error),
                });
            }
            None => {
                claimed.insert(job.output_path.clone(), job.input_path.clone());
                runnable.push(job);
            }
        }
    }

    (runnable, rejected)
}
