//! df-core: shared error types, engine configuration, and the
//! request/outcome records passed between the docforge crates.
//!
//! This crate is the foundational dependency for all other df-* crates.

pub mod config;
pub mod error;
pub mod outcome;

// Re-export the most commonly used items at the crate root.
pub use config::{EngineConfig, EngineSettings};
pub use error::{ConversionError, Error, Result};
pub use outcome::{ConversionOutcome, ConversionRequest, FailureKind, TargetFormats};
