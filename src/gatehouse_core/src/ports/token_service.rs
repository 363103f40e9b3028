use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::domain::user::UserId;

/// The verified contents of an identity token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenClaims {
    pub subject: UserId,
    pub issued_at: DateTime<Utc>,
}

#[derive(Debug, Error, PartialEq)]
pub enum TokenError {
    #[error("Invalid token")]
    Invalid,
    #[error("Token expired")]
    Expired,
    #[error("Unexpected error {0}")]
    Unexpected(String),
}

/// Identity token service.
///
/// Issuance and verification are pure computations over a process-wide
/// signing secret; neither touches the credential store. Whether the subject
/// still exists, or has rotated its password since issuance, is the
/// authorization gate's concern.
pub trait TokenService: Send + Sync {
    /// Produce a signed token for `subject`, issued now, expiring after the
    /// configured lifetime.
    fn issue(&self, subject: UserId) -> Result<String, TokenError>;

    /// Check signature, shape, and expiry. No store lookup.
    fn verify(&self, token: &str) -> Result<TokenClaims, TokenError>;
}
