use async_trait::async_trait;
use thiserror::Error;

use crate::domain::user::User;

#[derive(Debug, Error)]
pub enum NotifierError {
    #[error("Failed to send notification: {0}")]
    SendFailed(String),
}

/// Outbound notification port.
///
/// Failure policy is the caller's: signup treats a failed welcome as
/// best-effort, while the reset flow must roll back the stored secret when
/// delivery fails.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send_welcome(&self, user: &User, context_url: &str) -> Result<(), NotifierError>;

    async fn send_password_reset(&self, user: &User, reset_url: &str)
    -> Result<(), NotifierError>;
}
