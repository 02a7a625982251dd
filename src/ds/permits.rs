//! Counting permit gate: the stack's availability signal.
//!
//! A permit stands for "one resident element can be popped right now". The
//! gate is a small semaphore built from a `parking_lot` mutex and condvar,
//! with one extra capability a plain semaphore lacks: a blocked
//! [`acquire`](PermitGate::acquire) races permit arrival against a
//! [`CancelToken`] inside the same wait, so there is no polling loop and no
//! helper thread.
//!
//! ## Architecture
//!
//! ```text
//!   release() ──► permits += 1 (≤ max) ──► notify_one ──┐
//!                                                      ▼
//!   acquire(token) ── lock ── loop {
//!                                permits > 0  ? take
//!                                token fired  ? Err
//!                                             : wait_until(deadline)
//!                              }
//!                                                      ▲
//!   token.cancel() ── listener ── lock ── notify_all ──┘
//! ```
//!
//! The cancel listener takes the gate lock before notifying. A waiter checks
//! the token while holding that lock and only releases it by parking, so an
//! explicit cancel can never slip between the check and the park.
//!
//! ## Example Usage
//!
//! ```
//! use std::sync::Arc;
//! use lifokit::cancel::CancelToken;
//! use lifokit::ds::PermitGate;
//!
//! let gate = Arc::new(PermitGate::new(2));
//! assert!(gate.release());
//! assert!(gate.release());
//! assert!(!gate.release()); // bounded at max
//!
//! assert!(gate.acquire(&CancelToken::new()).is_ok());
//! assert!(gate.try_acquire());
//! assert!(!gate.try_acquire());
//! ```

use std::sync::Arc;

use parking_lot::{Condvar, Mutex};

use crate::cancel::CancelToken;
use crate::error::CancelError;

/// Bounded counting semaphore with cancellable acquire.
#[derive(Debug)]
pub struct PermitGate {
    permits: Mutex<usize>,
    available: Condvar,
    max: usize,
}

impl PermitGate {
    /// Creates a gate with zero permits and an upper bound of `max`.
    pub fn new(max: usize) -> Self {
        Self {
            permits: Mutex::new(0),
            available: Condvar::new(),
            max,
        }
    }

    /// Returns the upper bound on outstanding permits.
    #[inline]
    pub fn max_permits(&self) -> usize {
        self.max
    }

    /// Returns the number of permits that could be acquired right now.
    pub fn available(&self) -> usize {
        *self.permits.lock()
    }

    /// Adds one permit unless `max` are already outstanding.
    ///
    /// Wakes at most one waiter. Returns `true` if a permit was added.
    pub fn release(&self) -> bool {
        let mut permits = self.permits.lock();
        if *permits >= self.max {
            return false;
        }
        *permits += 1;
        drop(permits);
        self.available.notify_one();
        true
    }

    /// Takes a permit if one is immediately available.
    pub fn try_acquire(&self) -> bool {
        let mut permits = self.permits.lock();
        if *permits == 0 {
            return false;
        }
        *permits -= 1;
        true
    }

    /// Removes every outstanding permit, returning how many were taken.
    pub fn drain(&self) -> usize {
        std::mem::take(&mut *self.permits.lock())
    }

    /// Blocks until a permit is taken or `token` fires.
    ///
    /// An available permit is always taken, even if `token` has already
    /// fired; the token only decides the outcome when the gate is empty.
    /// Once waiting, an available permit still wins over a concurrent
    /// cancellation so a wakeup meant for some waiter is never lost.
    pub fn acquire(self: &Arc<Self>, token: &CancelToken) -> Result<(), CancelError> {
        if self.try_acquire() {
            return Ok(());
        }
        if let Some(err) = token.err() {
            return Err(err);
        }

        let gate = Arc::downgrade(self);
        let _registration = token.on_cancel(move |_| {
            if let Some(gate) = gate.upgrade() {
                gate.wake_all();
            }
        });
        let deadline = token.deadline();

        let mut permits = self.permits.lock();
        loop {
            if *permits > 0 {
                *permits -= 1;
                return Ok(());
            }
            if let Some(err) = token.err() {
                return Err(err);
            }
            match deadline {
                Some(deadline) => {
                    self.available.wait_until(&mut permits, deadline);
                },
                None => self.available.wait(&mut permits),
            }
        }
    }

    fn wake_all(&self) {
        let _permits = self.permits.lock();
        self.available.notify_all();
    }
}
