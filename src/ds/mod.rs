pub mod permits;
pub mod recency_stack;

pub use permits::PermitGate;
pub use recency_stack::RecencyStack;
