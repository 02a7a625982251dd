//! # Stack Trait Hierarchy
//!
//! Shared interface for the bounded LIFO stacks so callers can be generic
//! over the concrete container.
//!
//! ```text
//!        ┌──────────────────────────────┐
//!        │        ReadOnlyStack         │
//!        │  len(&) · is_empty(&)        │
//!        │  capacity(&)                 │
//!        └──────────────┬───────────────┘
//!                       │
//!        ┌──────────────┴───────────────┐
//!        │       BlockingStack<T>       │
//!        │  push(&, T)      never waits │
//!        │  pop(&, &CancelToken)  waits │
//!        │  try_pop(&)      never waits │
//!        └──────────────────────────────┘
//! ```
//!
//! Every method takes `&self`: the stacks synchronize internally and are
//! shared between producers and consumers through `Arc`.
//!
//! ## Trait Summary
//!
//! | Trait              | Extends         | Purpose                            |
//! |--------------------|-----------------|------------------------------------|
//! | `ReadOnlyStack`    | -               | Size and capacity inspection       |
//! | `BlockingStack<T>` | `ReadOnlyStack` | Thread-blocking push/pop surface   |
//! | `ConcurrentStack`  | `Send + Sync`   | Marker for shareable stacks        |
//!
//! ## Example Usage
//!
//! ```
//! use std::time::Duration;
//! use lifokit::cancel::CancelToken;
//! use lifokit::stack::BoundedLifo;
//! use lifokit::traits::BlockingStack;
//!
//! fn newest_or_none<S: BlockingStack<u32>>(stack: &S) -> Option<u32> {
//!     stack.pop(&CancelToken::with_timeout(Duration::from_millis(1))).ok()
//! }
//!
//! let stack = BoundedLifo::new(4);
//! stack.push(1);
//! stack.push(2);
//! assert_eq!(newest_or_none(&stack), Some(2));
//! ```

use crate::cancel::CancelToken;
use crate::error::CancelError;

/// Read-only inspection shared by every stack.
pub trait ReadOnlyStack {
    /// Returns the number of resident elements.
    fn len(&self) -> usize;

    /// Returns `true` if nothing is resident.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the maximum number of resident elements.
    fn capacity(&self) -> usize;
}

/// Push/pop surface of a thread-blocking bounded LIFO.
pub trait BlockingStack<T>: ReadOnlyStack {
    /// Inserts `item` as the newest element without blocking.
    fn push(&self, item: T);

    /// Removes the newest element, blocking until one exists or `token` fires.
    fn pop(&self, token: &CancelToken) -> Result<T, CancelError>;

    /// Removes the newest element only if one is immediately available.
    fn try_pop(&self) -> Option<T>;
}

/// Marker trait for stacks that can be shared across threads.
pub trait ConcurrentStack: Send + Sync {}

impl<S: Send + Sync> ConcurrentStack for S {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stack::BoundedLifo;

    fn assert_concurrent<S: ConcurrentStack>() {}

    #[test]
    fn bounded_lifo_is_concurrent_for_send_items() {
        assert_concurrent::<BoundedLifo<String>>();
        assert_concurrent::<BoundedLifo<Vec<u8>>>();
    }

    #[test]
    fn usable_through_trait_object() {
        let stack = BoundedLifo::new(2);
        let dyn_stack: &dyn BlockingStack<u8> = &stack;
        dyn_stack.push(1);
        dyn_stack.push(2);
        dyn_stack.push(3);
        assert_eq!(dyn_stack.len(), 2);
        assert!(!dyn_stack.is_empty());
        assert_eq!(dyn_stack.capacity(), 2);
        assert_eq!(dyn_stack.try_pop(), Some(3));
    }
}
