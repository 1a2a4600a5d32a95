//! Bounded-concurrency batch conversion on the tokio runtime.
//!
//! Every request is spawned as its own task right away. Tasks queue on the
//! shared [`ConcurrencyLimiter`] before starting the tool, so no more than
//! `max_concurrency` office processes run at once no matter how many
//! batches are in flight. Outcomes are streamed in completion order through
//! [`CompletionStream`].

use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use df_core::{ConversionError, ConversionOutcome, Error, Result, TargetFormats};
use futures::future::BoxFuture;
use futures::stream::{FuturesUnordered, Stream, StreamExt};
use futures::FutureExt;
use tokio::task::{AbortHandle, JoinError};

use crate::limiter::ConcurrencyLimiter;
use crate::parallel::panic_message;
use crate::runner::JobRunner;

/// Spawns one task per request, gated by a shared limiter.
#[derive(Clone)]
pub struct AsyncScheduler {
    runner: Arc<dyn JobRunner>,
    limiter: Arc<ConcurrencyLimiter>,
}

impl AsyncScheduler {
    pub fn new(runner: Arc<dyn JobRunner>, limiter: Arc<ConcurrencyLimiter>) -> Self {
        Self { runner, limiter }
    }

    pub fn limiter(&self) -> &Arc<ConcurrencyLimiter> {
        &self.limiter
    }

    /// Spawn one task per path and stream the outcomes as they complete.
    ///
    /// Must be called from within a tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Scheduling`] if `targets` is a per-file list whose
    /// length differs from `paths`; nothing is spawned in that case.
    /// Returns [`Error::Internal`] when no runtime is available.
    pub fn run<P: AsRef<Path>>(
        &self,
        paths: &[P],
        targets: &TargetFormats,
    ) -> Result<CompletionStream> {
        let requests = targets.pair_with(paths)?;
        let handle = tokio::runtime::Handle::try_current()
            .map_err(|e| Error::Internal(format!("async conversion needs a tokio runtime: {e}")))?;

        tracing::info!(
            "spawning {} conversion(s), max {} concurrent",
            requests.len(),
            self.limiter.max_permits()
        );

        let mut stream = CompletionStream {
            tasks: FuturesUnordered::new(),
            aborts: Vec::with_capacity(requests.len()),
        };

        for request in requests {
            let runner = Arc::clone(&self.runner);
            let limiter = Arc::clone(&self.limiter);
            let source = request.source.clone();

            let task = handle.spawn(async move {
                runner
                    .run_limited(&request.source, &request.target, &limiter)
                    .await
            });

            stream.aborts.push(task.abort_handle());
            stream.tasks.push(
                async move {
                    match task.await {
                        Ok(outcome) => outcome,
                        Err(e) => join_failure(source, e),
                    }
                }
                .boxed(),
            );
        }

        Ok(stream)
    }
}

fn join_failure(source: PathBuf, err: JoinError) -> ConversionOutcome {
    let message = if err.is_panic() {
        format!("worker panicked: {}", panic_message(err.into_panic().as_ref()))
    } else {
        "conversion task was cancelled".to_string()
    };
    tracing::error!("conversion task for {} failed: {message}", source.display());
    ConversionOutcome::failure(source, &ConversionError::WorkerCrashed(message))
}

/// Outcomes of an async batch, yielded in completion order.
///
/// Yields exactly one outcome per submitted request. Dropping the stream
/// aborts every task that has not finished; an aborted conversion kills its
/// child process and removes its scratch profile.
pub struct CompletionStream {
    tasks: FuturesUnordered<BoxFuture<'static, ConversionOutcome>>,
    aborts: Vec<AbortHandle>,
}

impl std::fmt::Debug for CompletionStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompletionStream")
            .field("remaining", &self.tasks.len())
            .finish_non_exhaustive()
    }
}

impl CompletionStream {
    /// Number of outcomes not yet yielded.
    pub fn remaining(&self) -> usize {
        self.tasks.len()
    }
}

impl Stream for CompletionStream {
    type Item = ConversionOutcome;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.tasks.poll_next_unpin(cx)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.tasks.len(), Some(self.tasks.len()))
    }
}

impl Drop for CompletionStream {
    fn drop(&mut self) {
        for abort in &self.aborts {
            abort.abort();
        }
    }
}
