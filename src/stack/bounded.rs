//! Bounded, thread-blocking LIFO with oldest-first shedding.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        BoundedLifo<T> Layout                            │
//! │                                                                         │
//! │   items: Mutex<RecencyStack<T>>          gate: Arc<PermitGate>          │
//! │                                                                         │
//! │   top                      bottom        permits ≤ len ≤ capacity       │
//! │   ┌─────┬─────┬─────┬─────┐                                             │
//! │   │ 100 │ 99  │ ... │ 51  │              one permit per poppable item   │
//! │   └─────┴─────┴─────┴─────┘                                             │
//! │     ▲ pop           ▲ evicted by the next push when full                │
//! └─────────────────────────────────────────────────────────────────────────┘
//!
//! Push (never blocks)
//! ───────────────────
//!   lock items
//!     full?  evict bottom (no permit change: its permit now covers the new top)
//!     push new top
//!   unlock
//!   grew?  gate.release()  (bounded at capacity, wakes one popper)
//!   evicted? hand it to the eviction hook, or drop it
//!
//! Pop (blocks until a permit or the token fires)
//! ──────────────────────────────────────────────
//!   gate.acquire(token)  ── Err(reason) ──► return the token's reason
//!        │ Ok
//!   lock items, take top (must exist: a permit was held)
//! ```
//!
//! Lock order is always `items` then `gate`; neither lock is held while
//! waiting, and push only ever takes each lock for O(1) work.
//!
//! ## Example Usage
//!
//! ```
//! use std::time::Duration;
//! use lifokit::cancel::CancelToken;
//! use lifokit::stack::BoundedLifo;
//!
//! let stack = BoundedLifo::new(2);
//! stack.push("a");
//! stack.push("b");
//! stack.push("c"); // sheds "a"
//!
//! let token = CancelToken::with_timeout(Duration::from_secs(5));
//! assert_eq!(stack.pop(&token), Ok("c"));
//! assert_eq!(stack.pop(&token), Ok("b"));
//! assert!(stack.is_empty());
//! ```
//!
//! ## Thread Safety
//!
//! `BoundedLifo<T>` is `Sync` when `T: Send`; share it with `Arc`.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tracing::{debug, trace};

use crate::cancel::CancelToken;
use crate::ds::{PermitGate, RecencyStack};
use crate::error::{CancelError, InvariantError};
#[cfg(feature = "metrics")]
use crate::metrics::metrics_impl::LifoMetrics;
#[cfg(feature = "metrics")]
use crate::metrics::snapshot::LifoMetricsSnapshot;
#[cfg(feature = "metrics")]
use crate::metrics::traits::{LifoMetricsRecorder, MetricsReset, MetricsSnapshotProvider};
use crate::stack::{EvictionHook, clamp_capacity};
use crate::traits::{BlockingStack, ReadOnlyStack};

/// Bounded LIFO stack with blocking, cancellable pop.
///
/// - `push` never blocks; on overflow the oldest resident element is evicted.
/// - `pop` blocks until an element is available or the [`CancelToken`] fires.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use std::thread;
/// use std::time::Duration;
/// use lifokit::cancel::CancelToken;
/// use lifokit::stack::BoundedLifo;
///
/// let stack = Arc::new(BoundedLifo::new(8));
/// let consumer = {
///     let stack = Arc::clone(&stack);
///     thread::spawn(move || stack.pop(&CancelToken::with_timeout(Duration::from_secs(5))))
/// };
///
/// stack.push(42);
/// assert_eq!(consumer.join().unwrap(), Ok(42));
/// ```
pub struct BoundedLifo<T> {
    items: Mutex<RecencyStack<T>>,
    gate: Arc<PermitGate>,
    capacity: usize,
    on_evict: Option<EvictionHook<T>>,
    #[cfg(feature = "metrics")]
    metrics: LifoMetrics,
}

impl<T> BoundedLifo<T> {
    /// Creates an empty stack. Capacities below 1 are coerced to 1.
    ///
    /// # Example
    ///
    /// ```
    /// use lifokit::stack::BoundedLifo;
    ///
    /// assert_eq!(BoundedLifo::<u8>::new(-1).capacity(), 1);
    /// assert_eq!(BoundedLifo::<u8>::new(0).capacity(), 1);
    /// assert_eq!(BoundedLifo::<u8>::new(50).capacity(), 50);
    /// ```
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
            gate: Arc::new(PermitGate::new(capacity)),
            capacity,
            on_evict,
            #[cfg(feature = "metrics")]
            metrics: LifoMetrics::default(),
        }
    }

    /// Pushes `item` as the new top. Never blocks.
    ///
    /// If the stack is full, the oldest resident element is evicted and
    /// handed to the eviction hook (or dropped). The evicted element's
    /// producer is not notified.
    pub fn push(&self, item: T) {
        #[cfg(feature = "metrics")]
        self.metrics.record_push();

        let evicted = self.items.lock().push(item);

        match evicted {
            None => {
                self.gate.release();
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

    /// Removes and returns the newest element, blocking until one exists.
    ///
    /// A resident element is returned even if `token` has already fired.
    /// Otherwise the token's own error is returned if it fires before an
    /// element arrives; nothing is removed in that case.
    ///
    /// # Panics
    ///
    /// Panics if a permit was acquired but the stack was empty, which means
    /// the internal bookkeeping is broken.
    pub fn pop(&self, token: &CancelToken) -> Result<T, CancelError> {
        #[cfg(feature = "metrics")]
        self.metrics.record_pop_call();

        if let Err(reason) = self.gate.acquire(token) {
            #[cfg(feature = "metrics")]
            self.metrics.record_pop_cancelled(reason);
            debug!(%reason, len = self.len(), "pop cancelled");
            return Err(reason);
        }

        #[cfg(feature = "metrics")]
        self.metrics.record_pop_hit();
        Ok(self.take_claimed())
    }

    /// Like [`pop`](Self::pop) with a private deadline `timeout` from now.
    pub fn pop_timeout(&self, timeout: Duration) -> Result<T, CancelError> {
        self.pop(&CancelToken::with_timeout(timeout))
    }

    /// Removes and returns the newest element if one is immediately available.
    pub fn try_pop(&self) -> Option<T> {
        if self.gate.try_acquire() {
            Some(self.take_claimed())
        } else {
            #[cfg(feature = "metrics")]
            self.metrics.record_try_pop_miss();
            None
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
    ///
    /// Returns the number of elements dropped. Elements removed here are not
    /// passed to the eviction hook.
    pub fn clear(&self) -> usize {
        let dropped = {
            let mut items = self.items.lock();
            let claimable = self.gate.drain();
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
        self.gate.available()
    }

    /// Verifies `permits ≤ len ≤ capacity`.
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        let items = self.items.lock();
        let len = items.len();
        let permits = self.gate.available();

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
        if self.gate.max_permits() != self.capacity {
            return Err(InvariantError::new("permit bound differs from capacity"));
        }
        Ok(())
    }

    /// Returns a point-in-time copy of the counters and gauges.
    #[cfg(feature = "metrics")]
    pub fn metrics_snapshot(&self) -> LifoMetricsSnapshot {
        self.metrics.snapshot(self.len(), self.available_permits(), self.capacity)
    }
}

impl<T> fmt::Debug for BoundedLifo<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundedLifo")
            .field("capacity", &self.capacity)
            .field("len", &self.len())
            .field("available_permits", &self.available_permits())
            .field("has_eviction_hook", &self.on_evict.is_some())
            .finish_non_exhaustive()
    }
}

impl<T> ReadOnlyStack for BoundedLifo<T> {
    #[inline]
    fn len(&self) -> usize {
        BoundedLifo::len(self)
    }

    #[inline]
    fn capacity(&self) -> usize {
        self.capacity
    }
}

impl<T> BlockingStack<T> for BoundedLifo<T> {
    #[inline]
    fn push(&self, item: T) {
        BoundedLifo::push(self, item);
    }

    #[inline]
    fn pop(&self, token: &CancelToken) -> Result<T, CancelError> {
        BoundedLifo::pop(self, token)
    }

    #[inline]
    fn try_pop(&self) -> Option<T> {
        BoundedLifo::try_pop(self)
    }
}

#[cfg(feature = "metrics")]
impl<T> MetricsSnapshotProvider<LifoMetricsSnapshot> for BoundedLifo<T> {
    fn snapshot(&self) -> LifoMetricsSnapshot {
        self.metrics_snapshot()
    }
}

#[cfg(feature = "metrics")]
impl<T> MetricsReset for BoundedLifo<T> {
    fn reset_metrics(&self) {
        self.metrics.reset_metrics();
    }
}
