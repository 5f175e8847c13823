/// Result alias used at the application and CLI edges.
/// Typed failures (`CareerTreeError`, `RecalculationError`) convert into it with `?`.
pub type Result<T> = std::result::Result<T, anyhow::Error>;
