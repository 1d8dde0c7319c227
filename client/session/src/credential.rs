use base64::engine::general_purpose::STANDARD;
use base64::Engine;

/// Encoded Basic-Auth token derived from a username and password. The raw
/// password never leaves `basic`; the encoded token is what gets persisted
/// and replayed on authenticated requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn basic(username: &str, password: &str) -> Self {
        Self(STANDARD.encode(format!("{username}:{password}")))
    }

    /// Wrap a token previously produced by [`Credential::basic`].
    pub fn from_token(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn token(&self) -> &str {
        &self.0
    }

    pub fn header_value(&self) -> String {
        format!("Basic {}", self.0)
    }
}
