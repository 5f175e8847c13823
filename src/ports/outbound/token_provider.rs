/// TokenProvider port supplying the bearer token for API calls
///
/// Returning `None` sends the request without an `Authorization` header.
pub trait TokenProvider: Send + Sync {
    fn bearer_token(&self) -> Option<String>;
}
