//! Bounded LIFO with `async` pop (feature `async`).
//!
//! Same storage and bound policy as [`BoundedLifo`](crate::stack::BoundedLifo);
//! the availability signal is a `tokio::sync::Semaphore` whose permits are
//! forgotten on acquire and added back by growing pushes. Pop takes a ready
//! permit first, and otherwise races the semaphore against a caller future
//! inside one `tokio::select!`.
//!
//! ```text
//!   push ──► lock items ── evict? ── push top ──► unlock ──► grew? add_permits(1)
//!
//!   pop_until(cancelled)
//!     try_acquire ──► forget ──► lock items, take top
//!     else select! (biased)
//!       semaphore.acquire ──► forget ──► lock items, take top
//!       cancelled         ──► Err(output)          nothing removed
//! ```
//!
//! ## Example Usage
//!
//! ```
//! # tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap().block_on(async {
//! use tokio_util::sync::CancellationToken;
//! use lifokit::stack::AsyncBoundedLifo;
//!
//! let stack = AsyncBoundedLifo::new(2);
//! stack.push(1);
//! stack.push(2);
//! stack.push(3); // sheds 1
//!
//! let token = CancellationToken::new();
//! assert_eq!(stack.pop(&token).await, Ok(3));
//! assert_eq!(stack.pop(&token).await, Ok(2));
//! # });
//! ```

use std::fmt;
use std::future::Future;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::Semaphore;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

use crate::ds::RecencyStack;
use crate::error::{CancelError, InvariantError};
#[cfg(feature = "metrics")]
use crate::metrics::metrics_impl::LifoMetrics;
#[cfg(feature = "metrics")]
use crate::metrics::snapshot::LifoMetricsSnapshot;
#[cfg(feature = "metrics")]
use crate::metrics::traits::{LifoMetricsRecorder, MetricsReset, MetricsSnapshotProvider};
use crate::stack::{EvictionHook, clamp_capacity};
use crate::traits::ReadOnlyStack;

/// Bounded LIFO stack whose pop is a future.
///
/// The items lock is a synchronous `parking_lot` mutex held only for O(1)
/// bookkeeping and never across an `.await`.
pub struct AsyncBoundedLifo<T> {
    items: Mutex<RecencyStack<T>>,
    permits: Semaphore,
    capacity: usize,
    on_evict: Option<EvictionHook<T>>,
    #[cfg(feature = "metrics")]
    metrics: LifoMetrics,
}

impl<T> AsyncBoundedLifo<T> {
    /// Creates an empty stack. Capacities below 1 are coerced to 1.
    pub fn new(capacity: isize) -> Self {
        Self::from_parts(clamp_capacity(capacity), None)
    }

    /// Creates an empty stack from an unsigned capacity (0 is coerced to 1).
    pub fn with_capacity(capacity: usize) -> Self {
        Self::from_parts(capacity, None)
    }

    pub(crate) fn from_parts(capacity: usize, on_evict: Option<EvictionHook<T>>) -> Self {
        let capacity = capacity.max(1);
        Self {
            items: Mutex::new(RecencyStack::new(capacity)),
            permits: Semaphore::new(0),
            capacity,
            on_evict,
            #[cfg(feature = "metrics")]
            metrics: LifoMetrics::default(),
        }
    }

    /// Pushes `item` as the new top. Never blocks or awaits.
    pub fn push(&self, item: T) {
        #[cfg(feature = "metrics")]
        self.metrics.record_push();

        let evicted = self.items.lock().push(item);

        match evicted {
            None => {
                if self.permits.available_permits() < self.capacity {
                    self.permits.add_permits(1);
                }
            },
            Some(old) => {
                #[cfg(feature = "metrics")]
                self.metrics.record_eviction();
                trace!(capacity = self.capacity, "evicted oldest element");
                if let Some(hook) = &self.on_evict {
                    hook(old);
                }
            },
        }
    }

    /// Waits for the newest element, or for `cancelled` to complete.
    ///
    /// Whatever `cancelled` resolves to is returned verbatim as the error.
    /// A resident element wins over a future that is already ready.
    pub async fn pop_until<F>(&self, cancelled: F) -> Result<T, F::Output>
    where
        F: Future,
    {
        #[cfg(feature = "metrics")]
        self.metrics.record_pop_call();

        match self.permits.try_acquire() {
            Ok(permit) => permit.forget(),
            Err(_) => {
                tokio::select! {
                    biased;
                    permit = self.permits.acquire() => match permit {
                        Ok(permit) => permit.forget(),
                        Err(_) => unreachable!("lifokit: permit semaphore is never closed"),
                    },
                    reason = cancelled => return Err(reason),
                }
            },
        }

        #[cfg(feature = "metrics")]
        self.metrics.record_pop_hit();
        Ok(self.take_claimed())
    }

    /// Waits for the newest element until `token` is cancelled.
    pub async fn pop(&self, token: &CancellationToken) -> Result<T, CancelError> {
        let result = self
            .pop_until(async {
                token.cancelled().await;
                CancelError::Cancelled
            })
            .await;
        self.note_cancel(result)
    }

    /// Waits for the newest element for at most `timeout`.
    pub async fn pop_timeout(&self, timeout: Duration) -> Result<T, CancelError> {
        let result = self
            .pop_until(async move {
                tokio::time::sleep(timeout).await;
                CancelError::DeadlineExceeded
            })
            .await;
        self.note_cancel(result)
    }

    fn note_cancel(&self, result: Result<T, CancelError>) -> Result<T, CancelError> {
        if let Err(reason) = &result {
            #[cfg(feature = "metrics")]
            self.metrics.record_pop_cancelled(*reason);
            debug!(%reason, "async pop cancelled");
        }
        result
    }

    /// Removes and returns the newest element if one is immediately available.
    pub fn try_pop(&self) -> Option<T> {
        match self.permits.try_acquire() {
            Ok(permit) => {
                permit.forget();
                Some(self.take_claimed())
            },
            Err(_) => {
                #[cfg(feature = "metrics")]
                self.metrics.record_try_pop_miss();
                None
            },
        }
    }

    fn take_claimed(&self) -> T {
        let top = self.items.lock().pop();
        match top {
            Some(item) => item,
            None => panic!(
                "lifokit: pop acquired a permit but the stack is empty (capacity {})",
                self.capacity
            ),
        }
    }

    /// Drops every element not already claimed by an in-flight pop.
    pub fn clear(&self) -> usize {
        let dropped = {
            let mut items = self.items.lock();
            let mut claimable = 0;
            while let Ok(permit) = self.permits.try_acquire() {
                permit.forget();
                claimable += 1;
            }
            items.drain_oldest(claimable)
        };

        #[cfg(feature = "metrics")]
        self.metrics.record_clear();
        dropped.len()
    }

    /// Returns the number of resident elements.
    pub fn len(&self) -> usize {
        self.items.lock().len()
    }

    /// Returns `true` if nothing is resident.
    pub fn is_empty(&self) -> bool {
        self.items.lock().is_empty()
    }

    /// Returns the fixed capacity (always ≥ 1).
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns how many pops could succeed right now without waiting.
    pub fn available_permits(&self) -> usize {
        self.permits.available_permits()
    }

    /// Verifies `permits ≤ len ≤ capacity`.
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        let items = self.items.lock();
        let len = items.len();
        let permits = self.permits.available_permits();

        if len > self.capacity {
            return Err(InvariantError::new(format!(
                "len {} exceeds capacity {}",
                len, self.capacity
            )));
        }
        if permits > len {
            return Err(InvariantError::new(format!(
                "available permits {} exceed len {}",
                permits, len
            )));
        }
        Ok(())
    }

    /// Returns a point-in-time copy of the counters and gauges.
    #[cfg(feature = "metrics")]
    pub fn metrics_snapshot(&self) -> LifoMetricsSnapshot {
        self.metrics.snapshot(self.len(), self.available_permits(), self.capacity)
    }
}

impl<T> fmt::Debug for AsyncBoundedLifo<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AsyncBoundedLifo")
            .field("capacity", &self.capacity)
            .field("len", &self.len())
            .field("available_permits", &self.available_permits())
            .finish_non_exhaustive()
    }
}

impl<T> ReadOnlyStack for AsyncBoundedLifo<T> {
    #[inline]
    fn len(&self) -> usize {
        AsyncBoundedLifo::len(self)
    }

    #[inline]
    fn capacity(&self) -> usize {
        self.capacity
    }
}

#[cfg(feature = "metrics")]
impl<T> MetricsSnapshotProvider<LifoMetricsSnapshot> for AsyncBoundedLifo<T> {
    fn snapshot(&self) -> LifoMetricsSnapshot {
        self.metrics_snapshot()
    }
}

#[cfg(feature = "metrics")]
impl<T> MetricsReset for AsyncBoundedLifo<T> {
    fn reset_metrics(&self) {
        self.metrics.reset_metrics();
    }
}
