pub use crate::builder::LifoBuilder;
pub use crate::cancel::CancelToken;
pub use crate::error::{CancelError, ConfigError, InvariantError};
#[cfg(feature = "async")]
pub use crate::stack::AsyncBoundedLifo;
pub use crate::stack::{BoundedLifo, EvictionHook};
pub use crate::traits::{BlockingStack, ConcurrentStack, ReadOnlyStack};
