//! Concurrency-safe bounded LIFO stacks.
//!
//! - [`BoundedLifo`]: thread-blocking pop, cancelled through a
//!   [`CancelToken`](crate::cancel::CancelToken).
//! - [`AsyncBoundedLifo`]: `async` pop over a tokio semaphore (feature `async`).
//!
//! Both share the same storage and bound policy
//! ([`RecencyStack`](crate::ds::RecencyStack)): push never blocks and sheds the
//! oldest resident element when full; pop returns the newest.

use std::sync::Arc;

#[cfg(feature = "async")]
pub mod async_bounded;
pub mod bounded;

#[cfg(feature = "async")]
pub use async_bounded::AsyncBoundedLifo;
pub use bounded::BoundedLifo;

/// Observer that receives ownership of each element evicted by an overflowing push.
///
/// Runs on the pushing thread after the stack's lock is released.
pub type EvictionHook<T> = Arc<dyn Fn(T) + Send + Sync>;

/// Coerces a requested capacity to the effective minimum of 1.
#[inline]
pub(crate) fn clamp_capacity(requested: isize) -> usize {
    requested.max(1) as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_floors_at_one() {
        assert_eq!(clamp_capacity(-1), 1);
        assert_eq!(clamp_capacity(0), 1);
        assert_eq!(clamp_capacity(1), 1);
        assert_eq!(clamp_capacity(50), 50);
        assert_eq!(clamp_capacity(isize::MIN), 1);
    }
}
