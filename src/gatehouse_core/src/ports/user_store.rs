use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::domain::{
    email::Email,
    password::Password,
    reset_secret::ResetSecretHash,
    user::{NewUser, User, UserError, UserId},
};

// UserStore port trait and errors
#[derive(Debug, Error)]
pub enum UserStoreError {
    #[error("Email already in use")]
    EmailTaken,
    #[error("User not found")]
    UserNotFound,
    #[error("{0}")]
    InvalidRecord(#[from] UserError),
    #[error("Unexpected error {0}")]
    Unexpected(String),
}

impl PartialEq for UserStoreError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::EmailTaken, Self::EmailTaken) => true,
            (Self::UserNotFound, Self::UserNotFound) => true,
            (Self::InvalidRecord(a), Self::InvalidRecord(b)) => a == b,
            (Self::Unexpected(_), Self::Unexpected(_)) => true,
            _ => false,
        }
    }
}

/// Controls whether a save re-checks record invariants.
///
/// The reset-request flow persists partial bookkeeping state and must not be
/// blocked by unrelated validation, so it saves [`SaveMode::Unvalidated`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveMode {
    Validated,
    Unvalidated,
}

/// Credential store port.
///
/// Owns user identity, the one-way password hash (which never crosses this
/// boundary in either direction), and reset-secret bookkeeping. Each method
/// is an atomic per-record operation; concurrent writers race here with
/// last-write-wins semantics.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Register a new user. Checks record invariants, hashes the password,
    /// and assigns the member role.
    async fn insert_user(&self, new_user: NewUser) -> Result<User, UserStoreError>;

    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, UserStoreError>;

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserStoreError>;

    /// Single lookup by reset-secret hash with the expiry filter applied:
    /// a record only matches when its secret is unexpired at `now`. A wrong
    /// secret and an expired one are indistinguishable to the caller.
    async fn find_by_reset_hash(
        &self,
        hash: &ResetSecretHash,
        now: DateTime<Utc>,
    ) -> Result<Option<User>, UserStoreError>;

    /// Check a candidate password against the stored hash.
    async fn verify_password(
        &self,
        id: UserId,
        candidate: &Password,
    ) -> Result<bool, UserStoreError>;

    /// Replace the password hash, stamp the password-change time, and clear
    /// any outstanding reset secret, as one update. Returns the updated user.
    async fn set_password(&self, id: UserId, new_password: Password)
    -> Result<User, UserStoreError>;

    /// Persist the user's non-credential fields.
    async fn save(&self, user: &User, mode: SaveMode) -> Result<(), UserStoreError>;
}
