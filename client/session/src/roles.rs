use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Role codes as the backend serializes them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Role {
    Admin = 0,
    Personnel = 1,
    Provider = 2,
    Customer = 3,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("unknown role value {0}")]
pub struct UnknownRole(pub u8);

impl Role {
    pub const ALL: [Role; 4] = [Role::Admin, Role::Personnel, Role::Provider, Role::Customer];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Personnel => "personnel",
            Role::Provider => "provider",
            Role::Customer => "customer",
        }
    }
}

impl From<Role> for u8 {
    fn from(role: Role) -> Self {
        role as u8
    }
}

impl TryFrom<u8> for Role {
    type Error = UnknownRole;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Role::Admin),
            1 => Ok(Role::Personnel),
            2 => Ok(Role::Provider),
            3 => Ok(Role::Customer),
            other => Err(UnknownRole(other)),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
