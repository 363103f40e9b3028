use chrono::Utc;
use gatehouse_core::{Password, ResetSecretHash, User, UserStore, UserStoreError};

/// Error types specific to the reset-password use case
#[derive(Debug, thiserror::Error)]
pub enum ResetPasswordError {
    /// A wrong secret and an expired one produce the same error, so a caller
    /// probing secrets learns nothing about which ones once existed.
    #[error("Token is invalid or has expired")]
    InvalidOrExpired,
    #[error("User store error: {0}")]
    UserStore(#[from] UserStoreError),
}

/// Reset-password use case - consumes an outstanding reset secret.
///
/// The store lookup matches on the secret's hash and an unexpired window in
/// one query. Setting the new password clears the bookkeeping fields, which
/// is what makes the secret single-use.
pub struct ResetPasswordUseCase<'a, U>
where
    U: UserStore + ?Sized,
{
    users: &'a U,
}

impl<'a, U> ResetPasswordUseCase<'a, U>
where
    U: UserStore + ?Sized,
{
    pub fn new(users: &'a U) -> Self {
        Self { users }
    }

    #[tracing::instrument(name = "ResetPasswordUseCase::execute", skip_all)]
    pub async fn execute(
        &self,
        presented_secret: &str,
        new_password: Password,
    ) -> Result<User, ResetPasswordError> {
        let hash = ResetSecretHash::of(presented_secret);

        let Some(user) = self.users.find_by_reset_hash(&hash, Utc::now()).await? else {
            return Err(ResetPasswordError::InvalidOrExpired);
        };

        let user = self.users.set_password(user.id(), new_password).await?;
        Ok(user)
    }
}
