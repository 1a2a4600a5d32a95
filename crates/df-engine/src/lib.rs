//! # df-engine
//!
//! Concurrent orchestration of document conversions.
//!
//! This crate provides:
//!
//! - **[`JobRunner`]** trait -- one conversion, blocking or async;
//!   implemented by [`df_office::Converter`].
//! - **[`ConcurrencyLimiter`]** -- counting permit pool bounding how many
//!   conversions run at once in the async model.
//! - **[`ParallelScheduler`]** -- fans a batch out over a fixed-size worker
//!   pool and yields outcomes as they complete ([`CompletionIter`]).
//! - **[`AsyncScheduler`]** -- spawns one task per request, gates each on the
//!   limiter, and streams outcomes in completion order
//!   ([`CompletionStream`]).
//! - **[`Engine`]** -- the public facade: validated configuration, tool
//!   discovery and provisioning, single and batch conversion in both models,
//!   and format capability queries.

pub mod concurrent;
pub mod engine;
pub mod limiter;
pub mod parallel;
pub mod runner;

// Re-export key types at the crate root.
pub use concurrent::{AsyncScheduler, CompletionStream};
pub use engine::Engine;
pub use limiter::{ConcurrencyLimiter, LimiterPermit};
pub use parallel::{CompletionIter, ParallelScheduler};
pub use runner::JobRunner;

pub use df_core::{
    ConversionOutcome, ConversionRequest, EngineConfig, EngineSettings, Error, FailureKind,
    Result, TargetFormats,
};
pub use df_formats::{DocumentCategory, FormatInfo, FormatRegistry};
