//! Blocking batch conversion on a fixed-size worker pool.
//!
//! Every request becomes one job on a dedicated rayon pool. A job runs the
//! converter in blocking mode, which spawns the office suite as its own OS
//! process, so jobs never share interpreter or tool state. Outcomes are sent
//! back over a channel as each job finishes and surface through
//! [`CompletionIter`] in completion order.

use std::any::Any;
use std::collections::HashMap;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::sync::Arc;

use df_core::{ConversionError, ConversionOutcome, Error, Result, TargetFormats};

use crate::runner::JobRunner;

/// Runs batches on a worker pool of fixed size.
#[derive(Clone)]
pub struct ParallelScheduler {
    runner: Arc<dyn JobRunner>,
    workers: usize,
}

impl ParallelScheduler {
    /// A scheduler running at most `workers` jobs at once (at least one).
    pub fn new(runner: Arc<dyn JobRunner>, workers: usize) -> Self {
        Self {
            runner,
            workers: workers.max(1),
        }
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Submit one job per path and return the outcomes as they complete.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Scheduling`] if `targets` is a per-file list whose
    /// length differs from `paths`; nothing is submitted in that case.
    /// Returns [`Error::Internal`] if the worker pool cannot be started.
    pub fn run<P: AsRef<Path>>(&self, paths: &[P], targets: &TargetFormats) -> Result<CompletionIter> {
        let requests = targets.pair_with(paths)?;
        if requests.is_empty() {
            return Ok(CompletionIter::empty());
        }

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.workers.min(requests.len()))
            .thread_name(|i| format!("docforge-worker-{i}"))
            .build()
            .map_err(|e| Error::Internal(format!("failed to start worker pool: {e}")))?;

        tracing::info!(
            "dispatching {} conversion(s) across {} worker(s)",
            requests.len(),
            pool.current_num_threads()
        );

        let (tx, rx) = mpsc::channel();
        let mut pending = HashMap::with_capacity(requests.len());

        for (id, request) in requests.into_iter().enumerate() {
            pending.insert(id, request.source.clone());

            let runner = Arc::clone(&self.runner);
            let tx = tx.clone();
            pool.spawn(move || {
                let outcome = catch_unwind(AssertUnwindSafe(|| {
                    runner.run_blocking(&request.source, &request.target)
                }))
                .unwrap_or_else(|payload| {
                    let message = panic_message(payload.as_ref());
                    tracing::error!(
                        "worker panicked converting {}: {message}",
                        request.source.display()
                    );
                    ConversionOutcome::failure(
                        &request.source,
                        &ConversionError::WorkerCrashed(format!("worker panicked: {message}")),
                    )
                });
                // The receiver is gone only if the caller dropped the iterator.
                let _ = tx.send((id, outcome));
            });
        }

        Ok(CompletionIter {
            receiver: Some(rx),
            pending,
            _pool: Some(pool),
        })
    }
}

/// Outcomes of a parallel batch, yielded in completion order.
///
/// Yields exactly one outcome per submitted request. Dropping the iterator
/// early lets queued jobs run to completion in the background; their results
/// are discarded.
pub struct CompletionIter {
    receiver: Option<mpsc::Receiver<(usize, ConversionOutcome)>>,
    pending: HashMap<usize, PathBuf>,
    _pool: Option<rayon::ThreadPool>,
}

impl std::fmt::Debug for CompletionIter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompletionIter")
            .field("remaining", &self.pending.len())
            .finish_non_exhaustive()
    }
}

impl CompletionIter {
    fn empty() -> Self {
        Self {
            receiver: None,
            pending: HashMap::new(),
            _pool: None,
        }
    }

    /// Synthesize a failure for a job whose worker disappeared without
    /// reporting.
    fn orphan(&mut self) -> Option<ConversionOutcome> {
        let id = self.pending.keys().min().copied()?;
        let source = self.pending.remove(&id)?;
        tracing::error!("worker exited without a result for {}", source.display());
        Some(ConversionOutcome::failure(
            source,
            &ConversionError::WorkerCrashed("worker exited before reporting a result".into()),
        ))
    }
}

impl Iterator for CompletionIter {
    type Item = ConversionOutcome;

    fn next(&mut self) -> Option<ConversionOutcome> {
        while !self.pending.is_empty() {
            let Some(receiver) = self.receiver.as_ref() else {
                return self.orphan();
            };
            match receiver.recv() {
                Ok((id, outcome)) => {
                    if self.pending.remove(&id).is_some() {
                        return Some(outcome);
                    }
                }
                Err(_) => {
                    // Every sender is gone: the remaining jobs will never report.
                    self.receiver = None;
                    return self.orphan();
                }
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.pending.len(), Some(self.pending.len()))
    }
}

impl ExactSizeIterator for CompletionIter {}

/// Best-effort text of a panic payload.
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
