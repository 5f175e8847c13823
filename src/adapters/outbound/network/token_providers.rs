use crate::ports::outbound::TokenProvider;

/// Reads the bearer token from an environment variable on every call
///
/// An unset or blank variable means "no token".
#[derive(Debug, Clone)]
pub struct EnvTokenProvider {
    variable: String,
}

impl EnvTokenProvider {
    pub fn new(variable: impl Into<String>) -> Self {
        Self {
            variable: variable.into(),
        }
    }

    pub fn variable(&self) -> &str {
        &self.variable
    }
}

impl TokenProvider for EnvTokenProvider {
    fn bearer_token(&self) -> Option<String> {
        std::env::var(&self.variable)
            .ok()
            .map(|token| token.trim().to_string())
            .filter(|token| !token.is_empty())
    }
}

/// Fixed token, for tests and embedding callers that manage tokens themselves
#[derive(Debug, Clone)]
pub struct StaticTokenProvider(Option<String>);

impl StaticTokenProvider {
    pub fn new(token: impl Into<String>) -> Self {
        Self(Some(token.into()))
    }

    pub fn none() -> Self {
        Self(None)
    }
}

impl TokenProvider for StaticTokenProvider {
    fn bearer_token(&self) -> Option<String> {
        self.0.clone()
    }
}
