//! Pagesmith Domain Layer
//!
//! This crate contains the core domain model for Pagesmith. It has ZERO
//! external dependencies and defines the value objects, pure text functions
//! and trait interfaces that every other layer depends upon.
//!
//! ## Key Concepts
//!
//! - **Draft**: an unvalidated candidate page, either generated by a language
//!   model or derived heuristically from the raw input
//! - **Record**: the final, schema-validated page design
//! - **Block**: one title/content pair inside a record
//! - **Constraints**: the bounds a record was validated against, echoed into
//!   the persisted artifact
//!
//! ## Architecture
//!
//! - No external crate dependencies
//! - Pure logic only (no I/O)
//! - Infrastructure implementations (HTTP clients, file writers) live in
//!   other crates and plug in through [`traits`]

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod block;
pub mod draft;
pub mod record;
pub mod text;
pub mod traits;

// Re-exports for convenience
pub use block::Block;
pub use draft::{Draft, DraftBlock};
pub use record::{Constraints, Record};
pub use traits::{CompletionProvider, CompletionRequest};
