//! The [`JobRunner`] trait: how the schedulers perform one conversion.

use std::path::Path;

use async_trait::async_trait;
use df_core::{ConversionError, ConversionOutcome};
use df_office::Converter;

use crate::limiter::ConcurrencyLimiter;

/// Performs a single conversion.
///
/// Implementations must fold every failure into the returned
/// [`ConversionOutcome`]; the schedulers rely on getting exactly one outcome
/// per call.
#[async_trait]
pub trait JobRunner: Send + Sync + 'static {
    /// Convert `source` to `target` cooperatively.
    async fn run(&self, source: &Path, target: &str) -> ConversionOutcome;

    /// Convert `source` to `target`, blocking the calling thread.
    fn run_blocking(&self, source: &Path, target: &str) -> ConversionOutcome;

    /// [`run`](Self::run) under one permit of `limiter`.
    ///
    /// The default holds the permit for the whole job. Runners that can tell
    /// a job is doomed without doing any work should fail it before taking a
    /// permit.
    async fn run_limited(
        &self,
        source: &Path,
        target: &str,
        limiter: &ConcurrencyLimiter,
    ) -> ConversionOutcome {
        match limiter.acquire().await {
            Ok(_permit) => self.run(source, target).await,
            Err(e) => ConversionOutcome::failure(source, &permit_error(e)),
        }
    }
}

fn permit_error(e: df_core::Error) -> ConversionError {
    ConversionError::WorkerCrashed(e.to_string())
}

#[async_trait]
impl JobRunner for Converter {
    async fn run(&self, source: &Path, target: &str) -> ConversionOutcome {
        self.convert(source, target).await
    }

    fn run_blocking(&self, source: &Path, target: &str) -> ConversionOutcome {
        self.convert_blocking(source, target)
    }

    // Missing sources and a missing tool fail before the permit is taken.
    async fn run_limited(
        &self,
        source: &Path,
        target: &str,
        limiter: &ConcurrencyLimiter,
    ) -> ConversionOutcome {
        let gate = async { limiter.acquire().await.map_err(permit_error) };
        self.convert_gated(source, target, gate).await
    }
}
