//! Cancellation tokens with optional deadlines.
//!
//! A [`CancelToken`] is the caller-supplied signal that aborts a blocked
//! [`BoundedLifo::pop`](crate::stack::BoundedLifo::pop). It answers three
//! questions for the stack:
//!
//! - has it already fired? ([`CancelToken::err`])
//! - when will it fire on its own? ([`CancelToken::deadline`])
//! - who must be woken when it is fired explicitly? (crate-internal listeners)
//!
//! ## Architecture
//!
//! ```text
//!   root ── child ── grandchild
//!    │        │          │
//!    │        │          └─ deadline = min(own, child's)
//!    │        └─ listener registered on root (Weak back-pointer)
//!    └─ cancel(): latch reason, take listeners, fire each outside the lock
//! ```
//!
//! Deadlines are evaluated lazily: no timer thread exists. A waiter that
//! wants to observe a deadline waits with a timeout of [`CancelToken::deadline`]
//! and re-checks [`CancelToken::err`] when it wakes.
//!
//! The first cause wins. Once a token reports an error it reports the same
//! error forever.
//!
//! ## Example Usage
//!
//! ```
//! use std::time::Duration;
//! use lifokit::cancel::CancelToken;
//! use lifokit::error::CancelError;
//!
//! let root = CancelToken::new();
//! let child = root.child_with_timeout(Duration::from_secs(60));
//! assert!(!child.is_cancelled());
//!
//! root.cancel();
//! assert_eq!(child.err(), Some(CancelError::Cancelled));
//! ```

use std::fmt;
use std::sync::{Arc, Weak};
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use rustc_hash::FxHashMap;

use crate::error::CancelError;

type Listener = Arc<dyn Fn(CancelError) + Send + Sync>;

#[derive(Default)]
struct State {
    err: Option<CancelError>,
    listeners: FxHashMap<u64, Listener>,
    next_key: u64,
}

struct Inner {
    /// Effective deadline: the earlier of our own and the parent's.
    deadline: Option<Instant>,
    parent: Option<Arc<Inner>>,
    /// Our listener key in `parent`, removed on drop.
    parent_key: Option<u64>,
    state: Mutex<State>,
}

impl Inner {
    fn err(&self) -> Option<CancelError> {
        if let Some(err) = self.state.lock().err {
            return Some(err);
        }
        // A parent that fired while we were being constructed could not reach
        // our listener, so ancestors are consulted directly.
        let err = self
            .parent
            .as_ref()
            .and_then(|parent| parent.err())
            .or_else(|| {
                self.deadline_passed()
                    .then_some(CancelError::DeadlineExceeded)
            })?;
        Some(*self.state.lock().err.get_or_insert(err))
    }

    #[inline]
    fn deadline_passed(&self) -> bool {
        self.deadline.is_some_and(|d| Instant::now() >= d)
    }

    fn fire(&self, reason: CancelError) {
        let reason = if self.deadline_passed() {
            CancelError::DeadlineExceeded
        } else {
            reason
        };

        let listeners = {
            let mut state = self.state.lock();
            if state.err.is_some() {
                return;
            }
            state.err = Some(reason);
            std::mem::take(&mut state.listeners)
        };

        for listener in listeners.into_values() {
            listener(reason);
        }
    }

    /// Registers `listener`; returns `None` if already fired.
    fn register(&self, listener: Listener) -> Option<u64> {
        let mut state = self.state.lock();
        if state.err.is_some() {
            return None;
        }
        let key = state.next_key;
        state.next_key += 1;
        state.listeners.insert(key, listener);
        Some(key)
    }

    fn deregister(&self, key: u64) {
        self.state.lock().listeners.remove(&key);
    }
}

impl Drop for Inner {
    fn drop(&mut self) {
        if let (Some(parent), Some(key)) = (&self.parent, self.parent_key) {
            parent.deregister(key);
        }
    }
}

/// Cooperative cancellation signal with an optional deadline.
///
/// Cloning is cheap and every clone observes the same state. Derived tokens
/// (see [`child`](Self::child)) fire when their parent fires, copying the
/// parent's reason verbatim.
#[derive(Clone)]
pub struct CancelToken {
    inner: Arc<Inner>,
}

impl CancelToken {
    /// Creates a token that only fires when [`cancel`](Self::cancel) is called.
    pub fn new() -> Self {
        Self::root(None)
    }

    /// Creates a token that fires with [`CancelError::DeadlineExceeded`] at `deadline`.
    pub fn with_deadline(deadline: Instant) -> Self {
        Self::root(Some(deadline))
    }

    /// Creates a token that fires with [`CancelError::DeadlineExceeded`] after `timeout`.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self::with_deadline(deadline_after(timeout))
    }

    fn root(deadline: Option<Instant>) -> Self {
        Self {
            inner: Arc::new(Inner {
                deadline,
                parent: None,
                parent_key: None,
                state: Mutex::new(State::default()),
            }),
        }
    }

    /// Derives a token that fires whenever this one does.
    pub fn child(&self) -> Self {
        self.derive(None)
    }

    /// Derives a token that also fires at `deadline`.
    pub fn child_with_deadline(&self, deadline: Instant) -> Self {
        self.derive(Some(deadline))
    }

    /// Derives a token that also fires after `timeout`.
    pub fn child_with_timeout(&self, timeout: Duration) -> Self {
        self.derive(Some(deadline_after(timeout)))
    }

    fn derive(&self, deadline: Option<Instant>) -> Self {
        let parent = Arc::clone(&self.inner);
        let deadline = match (parent.deadline, deadline) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        };

        let inner = Arc::new_cyclic(|weak: &Weak<Inner>| {
            let weak = weak.clone();
            let listener: Listener = Arc::new(move |reason| {
                if let Some(child) = weak.upgrade() {
                    child.fire(reason);
                }
            });
            let parent_key = parent.register(listener);
            Inner {
                deadline,
                parent: Some(Arc::clone(&parent)),
                parent_key,
                state: Mutex::new(State::default()),
            }
        });

        Self { inner }
    }

    /// Fires the token with [`CancelError::Cancelled`].
    ///
    /// Idempotent. If the deadline has already passed the token reports
    /// [`CancelError::DeadlineExceeded`] instead, since that happened first.
    pub fn cancel(&self) {
        self.inner.fire(CancelError::Cancelled);
    }

    /// Returns the reason this token fired, or `None` if it has not.
    #[inline]
    pub fn err(&self) -> Option<CancelError> {
        self.inner.err()
    }

    /// Returns `true` once the token has fired.
    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.err().is_some()
    }

    /// Returns the effective deadline, if any.
    #[inline]
    pub fn deadline(&self) -> Option<Instant> {
        self.inner.deadline
    }

    /// Registers `f` to run once when the token is fired explicitly.
    ///
    /// Returns `None` if the token has already fired. The listener is removed
    /// when the returned guard drops. Deadline expiry does not run listeners.
    pub(crate) fn on_cancel<F>(&self, f: F) -> Option<Registration>
    where
        F: Fn(CancelError) + Send + Sync + 'static,
    {
        let key = self.inner.register(Arc::new(f))?;
        Some(Registration {
            inner: Arc::clone(&self.inner),
            key,
        })
    }

    #[cfg(test)]
    fn listener_count(&self) -> usize {
        self.inner.state.lock().listeners.len()
    }
}

impl Default for CancelToken {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for CancelToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CancelToken")
            .field("deadline", &self.inner.deadline)
            .field("err", &self.err())
            .field("has_parent", &self.inner.parent.is_some())
            .finish()
    }
}

/// Guard for a listener registered with [`CancelToken::on_cancel`].
pub(crate) struct Registration {
    inner: Arc<Inner>,
    key: u64,
}

impl Drop for Registration {
    fn drop(&mut self) {
        self.inner.deregister(self.key);
    }
}

fn deadline_after(timeout: Duration) -> Instant {
    let now = Instant::now();
    // Far-future timeouts saturate instead of overflowing.
    now.checked_add(timeout)
        .unwrap_or_else(|| now + Duration::from_secs(60 * 60 * 24 * 365 * 30))
}
