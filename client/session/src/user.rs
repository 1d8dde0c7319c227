use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{SessionError, SessionResult};
use crate::roles::Role;

/// Profile record for a user as the backend returns it. Fields beyond the
/// identity triple are kept untyped so the persisted cache round-trips
/// whatever the backend adds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub role: Role,
    #[serde(flatten)]
    pub profile: serde_json::Map<String, Value>,
}

/// Parsed body of a successful registration. The backend may embed the
/// created user; the raw body is retained for callers that need more than
/// the typed view.
#[derive(Debug, Clone, PartialEq)]
pub struct RegistrationResponse {
    pub user: Option<User>,
    pub raw: Value,
}

impl TryFrom<Value> for RegistrationResponse {
    type Error = SessionError;

    fn try_from(value: Value) -> SessionResult<Self> {
        let user = match value.get("user") {
            None | Some(Value::Null) => None,
            Some(embedded) => Some(
                serde_json::from_value(embedded.clone())
                    .map_err(|err| SessionError::Decode(err.to_string()))?,
            ),
        };
        Ok(Self { user, raw: value })
    }
}
