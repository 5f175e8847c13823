/// Shared kernel - error types, result alias and hashing helpers used by every layer
pub mod error;
pub mod hashing;
mod result;

pub use result::Result;
