//! Bounded concurrency for the async model.
//!
//! A [`ConcurrencyLimiter`] wraps a tokio semaphore sized to the engine's
//! `max_concurrency`. One limiter is shared by every async conversion an
//! engine performs, whether submitted singly or as a batch, so the bound
//! holds across calls.
//!
//! ```ignore
//! let limiter = Arc::new(ConcurrencyLimiter::new(4));
//! let _permit = limiter.acquire().await?;
//! // at most 4 tasks reach this point at once
//! ```

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use df_core::{Error, Result};
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

/// Counting permit pool with in-flight and peak tracking.
#[derive(Debug)]
pub struct ConcurrencyLimiter {
    semaphore: Arc<Semaphore>,
    max_permits: usize,
    in_flight: Arc<AtomicUsize>,
    peak_in_flight: AtomicUsize,
}

impl ConcurrencyLimiter {
    /// A limiter admitting `max_permits` holders at once (at least one).
    pub fn new(max_permits: usize) -> Self {
        let max_permits = max_permits.max(1);
        Self {
            semaphore: Arc::new(Semaphore::new(max_permits)),
            max_permits,
            in_flight: Arc::new(AtomicUsize::new(0)),
            peak_in_flight: AtomicUsize::new(0),
        }
    }

    /// Wait for a permit.
    ///
    /// The permit is returned to the pool when the guard is dropped,
    /// including when the holding task is aborted or panics.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Internal`] if the semaphore was closed, which the
    /// limiter itself never does.
    pub async fn acquire(&self) -> Result<LimiterPermit> {
        let permit = Arc::clone(&self.semaphore)
            .acquire_owned()
            .await
            .map_err(|e| Error::Internal(format!("concurrency limiter closed: {e}")))?;

        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.update_peak(current);

        Ok(LimiterPermit {
            _permit: permit,
            in_flight: Arc::clone(&self.in_flight),
        })
    }

    fn update_peak(&self, current: usize) {
        let mut peak = self.peak_in_flight.load(Ordering::SeqCst);
        while current > peak {
            match self.peak_in_flight.compare_exchange_weak(
                peak,
                current,
                Ordering::SeqCst,
                Ordering::SeqCst,
            ) {
                Ok(_) => break,
                Err(p) => peak = p,
            }
        }
    }

    pub fn max_permits(&self) -> usize {
        self.max_permits
    }

    /// Permits currently free.
    pub fn available(&self) -> usize {
        self.semaphore.available_permits()
    }

    /// Permits currently held.
    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Highest number of simultaneously held permits observed.
    pub fn peak(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }
}

/// RAII guard for one limiter slot.
#[derive(Debug)]
pub struct LimiterPermit {
    _permit: OwnedSemaphorePermit,
    in_flight: Arc<AtomicUsize>,
}

impl Drop for LimiterPermit {
    fn drop(&mut self) {
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn zero_is_clamped_to_one() {
        let limiter = ConcurrencyLimiter::new(0);
        assert_eq!(limiter.max_permits(), 1);
        assert_eq!(limiter.available(), 1);
    }

    #[tokio::test]
    async fn permits_are_counted_and_released() {
        let limiter = ConcurrencyLimiter::new(3);

        let a = limiter.acquire().await.unwrap();
        let b = limiter.acquire().await.unwrap();
        assert_eq!(limiter.in_flight(), 2);
        assert_eq!(limiter.available(), 1);

        drop(a);
        assert_eq!(limiter.in_flight(), 1);
        assert_eq!(limiter.available(), 2);

        drop(b);
        assert_eq!(limiter.in_flight(), 0);
        assert_eq!(limiter.peak(), 2);
    }

    #[tokio::test]
    async fn waits_when_exhausted() {
        let limiter = Arc::new(ConcurrencyLimiter::new(1));
        let held = limiter.acquire().await.unwrap();

        let waiter = {
            let limiter = Arc::clone(&limiter);
            tokio::spawn(async move {
                let _p = limiter.acquire().await.unwrap();
            })
        };

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(!waiter.is_finished());

        drop(held);
        tokio::time::timeout(Duration::from_secs(2), waiter)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(limiter.peak(), 1);
    }

    #[tokio::test]
    async fn aborted_holder_returns_its_permit() {
        let limiter = Arc::new(ConcurrencyLimiter::new(1));
        let task = {
            let limiter = Arc::clone(&limiter);
            tokio::spawn(async move {
                let _p = limiter.acquire().await.unwrap();
                tokio::time::sleep(Duration::from_secs(60)).await;
            })
        };

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(limiter.available(), 0);

        task.abort();
        let _ = task.await;
        assert_eq!(limiter.available(), 1);
        assert_eq!(limiter.in_flight(), 0);
    }
}
