use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The closed set of roles a user can hold.
///
/// Role checks are set-membership tests over this enum; arbitrary strings
/// are rejected at the credential store boundary via [`Role::parse`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Member,
    Admin,
}

#[derive(Debug, Error, PartialEq)]
pub enum RoleError {
    #[error("Unknown role: {0}")]
    Unknown(String),
}

impl Role {
    pub fn parse(raw: &str) -> Result<Self, RoleError> {
        match raw {
            "member" => Ok(Role::Member),
            "admin" => Ok(Role::Admin),
            other => Err(RoleError::Unknown(other.to_string())),
        }
    }

    pub fn is_one_of(self, allowed: &[Role]) -> bool {
        allowed.contains(&self)
    }
}
