//! Pagesmith Gatekeeper
//!
//! Turns an unvalidated [`Draft`](pagesmith_domain::Draft) into a
//! [`Record`](pagesmith_domain::Record) that satisfies every structural
//! rule of a page design.
//!
//! The Gatekeeper provides:
//! - Per-field length caps with punctuation-aware truncation
//! - Removal of blank and duplicate blocks
//! - Block-count bounds (trimming the shortest, padding from a title pool)
//! - Required-field defaults (document title, page title, layout hint)
//!
//! Normalization is pure and idempotent: feeding a produced record back in
//! yields the same record.
//!
//! # Examples
//!
//! ```
//! use pagesmith_domain::{Draft, DraftBlock};
//! use pagesmith_gatekeeper::{NormalizeContext, SchemaValidator, ValidationConfig};
//!
//! let validator = SchemaValidator::new(ValidationConfig::default()).unwrap();
//! let draft = Draft::with_blocks(vec![DraftBlock::new("Why", "Slides take too long to build")]);
//!
//! let record = validator
//!     .normalize(draft, &NormalizeContext::new("Quarterly review", "grid-2-2"))
//!     .unwrap();
//!
//! assert_eq!(record.items.len(), 3);
//! assert_eq!(record.page_title, "Quarterly review");
//! assert!(validator.check(&record).is_empty());
//! ```

#![warn(missing_docs)]

mod config;
mod error;
mod validator;

pub use config::ValidationConfig;
pub use error::GatekeeperError;
pub use validator::{NormalizeContext, SchemaValidator, Violation};
