//! Configuration builder for bounded LIFO stacks.
//!
//! The plain constructors ([`BoundedLifo::new`]) never fail: they clamp
//! capacity to at least 1. The builder adds the optional eviction observer
//! and a strict [`try_build`](LifoBuilder::try_build) for callers that would
//! rather reject a zero capacity than have it silently raised.
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use lifokit::builder::LifoBuilder;
//!
//! let shed = Arc::new(AtomicUsize::new(0));
//! let counter = Arc::clone(&shed);
//!
//! let stack = LifoBuilder::new(2)
//!     .on_evict(move |_job: u32| {
//!         counter.fetch_add(1, Ordering::Relaxed);
//!     })
//!     .build();
//!
//! stack.push(1);
//! stack.push(2);
//! stack.push(3);
//! assert_eq!(shed.load(Ordering::Relaxed), 1);
//! ```

use std::fmt;
use std::sync::Arc;

use crate::error::ConfigError;
#[cfg(feature = "async")]
use crate::stack::AsyncBoundedLifo;
use crate::stack::{BoundedLifo, EvictionHook, clamp_capacity};

/// Builder for [`BoundedLifo`] (and [`AsyncBoundedLifo`] with feature `async`).
pub struct LifoBuilder<T> {
    capacity: isize,
    on_evict: Option<EvictionHook<T>>,
}

impl<T> LifoBuilder<T> {
    /// Starts a builder for a stack holding at most `capacity` elements.
    pub fn new(capacity: isize) -> Self {
        Self {
            capacity,
            on_evict: None,
        }
    }

    /// Sets the observer that receives each element shed by an overflowing push.
    pub fn on_evict<F>(mut self, hook: F) -> Self
    where
        F: Fn(T) + Send + Sync + 'static,
    {
        self.on_evict = Some(Arc::new(hook));
        self
    }

    /// Builds the stack, coercing capacities below 1 to 1.
    pub fn build(self) -> BoundedLifo<T> {
        BoundedLifo::from_parts(clamp_capacity(self.capacity), self.on_evict)
    }

    /// Builds the stack, rejecting capacities below 1.
    pub fn try_build(self) -> Result<BoundedLifo<T>, ConfigError> {
        self.validate()?;
        Ok(self.build())
    }

    /// Builds the async stack, coercing capacities below 1 to 1.
    #[cfg(feature = "async")]
    pub fn build_async(self) -> AsyncBoundedLifo<T> {
        AsyncBoundedLifo::from_parts(clamp_capacity(self.capacity), self.on_evict)
    }

    /// Builds the async stack, rejecting capacities below 1.
    #[cfg(feature = "async")]
    pub fn try_build_async(self) -> Result<AsyncBoundedLifo<T>, ConfigError> {
        self.validate()?;
        Ok(self.build_async())
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.capacity < 1 {
            return Err(ConfigError::new(format!(
                "capacity must be >= 1, got {}",
                self.capacity
            )));
        }
        Ok(())
    }
}

impl<T> fmt::Debug for LifoBuilder<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LifoBuilder")
            .field("capacity", &self.capacity)
            .field("has_eviction_hook", &self.on_evict.is_some())
            .finish()
    }
}
