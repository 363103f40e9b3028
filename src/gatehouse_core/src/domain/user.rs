use std::fmt;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use super::{email::Email, password::Password, reset_secret::ResetSecretHash, role::Role};

/// Opaque user identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(Uuid);

impl UserId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn parse(raw: &str) -> Result<Self, uuid::Error> {
        Uuid::parse_str(raw).map(Self)
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// The reset-secret bookkeeping on a user record.
///
/// Hash and expiry travel together: both fields are set or both absent,
/// enforced by this type's existence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutstandingReset {
    hash: ResetSecretHash,
    expires_at: DateTime<Utc>,
}

impl OutstandingReset {
    pub fn hash(&self) -> &ResetSecretHash {
        &self.hash
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    /// Whether this secret is still consumable at `now`.
    pub fn is_live(&self, now: DateTime<Utc>) -> bool {
        self.expires_at > now
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum UserError {
    #[error("Please provide a name")]
    EmptyName,
    #[error("Password change timestamp lies in the future")]
    PasswordChangeInFuture,
}

/// A user as seen by the authentication core.
///
/// The password hash is deliberately absent: it is owned by the credential
/// store and never leaves it.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    id: UserId,
    name: String,
    email: Email,
    role: Role,
    password_changed_at: Option<DateTime<Utc>>,
    reset_secret: Option<OutstandingReset>,
}

impl User {
    pub fn new(name: String, email: Email, role: Role) -> Self {
        Self {
            id: UserId::new(),
            name,
            email,
            role,
            password_changed_at: None,
            reset_secret: None,
        }
    }

    pub fn id(&self) -> UserId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &Email {
        &self.email
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn password_changed_at(&self) -> Option<DateTime<Utc>> {
        self.password_changed_at
    }

    pub fn outstanding_reset(&self) -> Option<&OutstandingReset> {
        self.reset_secret.as_ref()
    }

    /// Whether the password was changed after a token issued at `issued_at`.
    ///
    /// This is the stateless replacement for a revocation list: any token
    /// minted before the most recent password change is rejected.
    pub fn changed_password_after(&self, issued_at: DateTime<Utc>) -> bool {
        self.password_changed_at
            .is_some_and(|changed_at| changed_at > issued_at)
    }

    /// Record a password change at `at`.
    ///
    /// The timestamp is backdated by one second: token issued-at stamps have
    /// second precision, so a session minted in the same instant as the
    /// change must not be invalidated by it. Any outstanding reset secret is
    /// consumed by the change.
    pub fn record_password_change(&mut self, at: DateTime<Utc>) {
        self.password_changed_at = Some(at - Duration::seconds(1));
        self.reset_secret = None;
    }

    pub fn set_reset_secret(&mut self, hash: ResetSecretHash, expires_at: DateTime<Utc>) {
        self.reset_secret = Some(OutstandingReset { hash, expires_at });
    }

    pub fn clear_reset_secret(&mut self) {
        self.reset_secret = None;
    }

    /// Record-level invariants, re-checked on validated saves.
    pub fn check_invariants(&self) -> Result<(), UserError> {
        if self.name.trim().is_empty() {
            return Err(UserError::EmptyName);
        }
        if self
            .password_changed_at
            .is_some_and(|changed_at| changed_at >= Utc::now())
        {
            return Err(UserError::PasswordChangeInFuture);
        }
        Ok(())
    }
}

/// Registration data for the credential store.
///
/// New users always start as [`Role::Member`]; elevated roles are assigned
/// out-of-band, never through signup.
pub struct NewUser {
    pub name: String,
    pub email: Email,
    pub password: Password,
}

impl NewUser {
    pub fn new(name: String, email: Email, password: Password) -> Self {
        Self {
            name,
            email,
            password,
        }
    }
}
