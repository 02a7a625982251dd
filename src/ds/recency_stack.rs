//! Bounded recency stack that sheds its oldest element on overflow.
//!
//! The single-threaded storage behind [`BoundedLifo`](crate::stack::BoundedLifo)
//! and its async sibling. Holds at most `capacity` elements; pushing onto a
//! full stack drops the bottom (oldest) element and hands it back to the
//! caller.
//!
//! ## Architecture
//!
//! ```text
//!   items: VecDeque<T>
//!
//!   front (top)                        back (bottom)
//!   ┌──────┬──────┬──────┬──────┐
//!   │ "d"  │ "c"  │ "b"  │ "a"  │      capacity = 4
//!   └──────┴──────┴──────┴──────┘
//!     ▲ pop                  ▲
//!     │                      └─ evicted by push("e")
//!     └─ push("e") lands here
//! ```
//!
//! ## Operations
//!
//! | Operation        | Time | Notes                                   |
//! |------------------|------|-----------------------------------------|
//! | `push`           | O(1) | returns the evicted bottom, if any      |
//! | `pop`            | O(1) | most recently pushed resident element   |
//! | `peek`           | O(1) |                                         |
//! | `drain_oldest`   | O(k) | removes up to `k` from the bottom       |
//!
//! ## Example Usage
//!
//! ```
//! use lifokit::ds::RecencyStack;
//!
//! let mut stack = RecencyStack::new(2);
//! assert_eq!(stack.push("a"), None);
//! assert_eq!(stack.push("b"), None);
//! assert_eq!(stack.push("c"), Some("a"));
//!
//! assert_eq!(stack.pop(), Some("c"));
//! assert_eq!(stack.pop(), Some("b"));
//! assert_eq!(stack.pop(), None);
//! ```

use std::collections::VecDeque;

/// Fixed-capacity LIFO that evicts from the bottom.
///
/// Capacity is clamped to at least 1.
#[derive(Debug, Clone)]
pub struct RecencyStack<T> {
    items: VecDeque<T>,
    capacity: usize,
}

impl<T> RecencyStack<T> {
    /// Creates an empty stack holding at most `capacity` elements (min 1).
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            items: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Returns the maximum number of resident elements.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the number of resident elements.
    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if nothing is resident.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns `true` if the next push will evict.
    #[inline]
    pub fn is_full(&self) -> bool {
        self.items.len() >= self.capacity
    }

    /// Pushes `item` on top, returning the evicted oldest element if full.
    pub fn push(&mut self, item: T) -> Option<T> {
        let evicted = if self.is_full() {
            self.items.pop_back()
        } else {
            None
        };
        self.items.push_front(item);
        evicted
    }

    /// Removes and returns the most recently pushed element.
    #[inline]
    pub fn pop(&mut self) -> Option<T> {
        self.items.pop_front()
    }

    /// Returns the element the next `pop` would return.
    #[inline]
    pub fn peek(&self) -> Option<&T> {
        self.items.front()
    }

    /// Removes up to `count` elements from the bottom, oldest first.
    pub fn drain_oldest(&mut self, count: usize) -> Vec<T> {
        let count = count.min(self.items.len());
        let mut drained = Vec::with_capacity(count);
        for _ in 0..count {
            if let Some(item) = self.items.pop_back() {
                drained.push(item);
            }
        }
        drained
    }

    /// Drops every resident element.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Iterates from top (next to pop) to bottom (next to evict).
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.items.iter()
    }

    #[cfg(any(test, debug_assertions))]
    pub fn debug_validate_invariants(&self) {
        assert!(self.capacity >= 1);
        assert!(self.items.len() <= self.capacity);
    }
}


#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: len() never exceeds capacity
        #[cfg_attr(miri, ignore)]
        #[test]
        fn prop_len_within_capacity(
            capacity in 1usize..64,
            pushes in prop::collection::vec(any::<u32>(), 0..200)
        ) {
            let mut stack = RecencyStack::new(capacity);
            for item in pushes {
                stack.push(item);
                prop_assert!(stack.len() <= capacity);
            }
        }

        /// Property: draining yields the last `capacity` pushes, newest first
        #[cfg_attr(miri, ignore)]
        #[test]
        fn prop_drain_yields_newest_suffix(
            capacity in 1usize..32,
            pushes in prop::collection::vec(any::<u32>(), 0..100)
        ) {
            let mut stack = RecencyStack::new(capacity);
            for &item in &pushes {
                stack.push(item);
            }

            let expected: Vec<u32> = pushes.iter().rev().take(capacity).copied().collect();
            let popped: Vec<u32> = std::iter::from_fn(|| stack.pop()).collect();
            prop_assert_eq!(popped, expected);
        }

        /// Property: evicted elements come out in push order
        #[cfg_attr(miri, ignore)]
        #[test]
        fn prop_evictions_are_oldest_first(
            capacity in 1usize..16,
            count in 0usize..64
        ) {
            let mut stack = RecencyStack::new(capacity);
            let evicted: Vec<usize> = (0..count).filter_map(|i| stack.push(i)).collect();
            let expected: Vec<usize> = (0..count.saturating_sub(capacity)).collect();
            prop_assert_eq!(evicted, expected);
            stack.debug_validate_invariants();
        }
    }
}
