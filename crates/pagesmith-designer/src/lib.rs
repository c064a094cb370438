//! Pagesmith Designer
//!
//! Turns one page of free text into a schema-valid page design by asking a
//! language model for a JSON draft and coercing whatever comes back.
//!
//! # Overview
//!
//! A run always produces a record. When the completion service is disabled,
//! unavailable, or answers with something that is not a JSON object, the
//! designer cuts blocks straight from the input text instead. Either way the
//! draft passes through the Gatekeeper before it is written.
//!
//! # Architecture
//!
//! ```text
//! PageInput → Prompt → RetryingClient → extract → repair → decode ─┐
//!                            │ unavailable        │ unusable        ├→ Gatekeeper → artifact
//!                            └──────────→ FallbackGenerator ────────┘
//! ```
//!
//! # Example Usage
//!
//! ```no_run
//! use pagesmith_designer::{DesignerConfig, PageDesigner, PageInput};
//! use pagesmith_llm::DisabledProvider;
//! use std::path::Path;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let designer = PageDesigner::new(DisabledProvider, DesignerConfig::default())?;
//! let input = PageInput::new("区块测试", "A。B。C。D。E。")?;
//!
//! let summary = designer.run(&input, Path::new("out/design.json"), None).await?;
//! println!("{} blocks via {}", summary.blocks, summary.mode);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod artifact;
mod config;
mod decode;
mod designer;
mod error;
mod extract;
mod fallback;
mod input;
mod prompt;
mod repair;
mod style;


pub use artifact::{ArtifactBlock, ArtifactConstraints, DesignArtifact};
pub use config::{DesignerConfig, EndpointConfig, FallbackConfig, Preset, ScanMode};
pub use decode::decode_draft;
pub use designer::{
    BatchOutcome, Design, DesignJob, FallbackReason, GenerationMode, PageDesigner, RunSummary,
};
pub use error::DesignerError;
pub use extract::extract_candidate;
pub use fallback::{split_segments, FallbackGenerator};
pub use input::PageInput;
pub use prompt::PromptBuilder;
pub use repair::{parse_object, repair, ParsedOutput, RepairError};
pub use style::{GlossaryTerm, StyleGuide};
