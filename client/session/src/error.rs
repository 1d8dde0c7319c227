use thiserror::Error;

pub type SessionResult<T> = Result<T, SessionError>;

#[derive(Debug, Error)]
pub enum SessionError {
    /// No credential is present in storage.
    #[error("not authenticated")]
    NotAuthenticated,
    /// The backend answered with a non-success status. The message is the
    /// normalized body, so `to_string()` is what the views display.
    #[error("{message}")]
    Http { status: u16, message: String },
    /// The request never produced a response.
    #[error("network error: {0}")]
    Network(String),
    /// A success response carried a body we could not decode.
    #[error("failed to decode response body: {0}")]
    Decode(String),
    /// The storage backend rejected a read or write.
    #[error("storage error: {0}")]
    Storage(String),
}

impl SessionError {
    /// True when the failure means the session credential is missing or no
    /// longer accepted by the backend. Authorization failures (403) are a
    /// valid session talking to a forbidden resource and do not count.
    pub fn is_auth_failure(&self) -> bool {
        matches!(
            self,
            SessionError::NotAuthenticated | SessionError::Http { status: 401, .. }
        )
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            SessionError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}
