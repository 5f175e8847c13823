/// Career graph domain layer
///
/// Pure layout and culling logic for career tree visualizations. Nothing in this
/// layer performs I/O; the worker session and the recalculation adapters build on it.
pub mod domain;
pub mod policies;
pub mod services;
