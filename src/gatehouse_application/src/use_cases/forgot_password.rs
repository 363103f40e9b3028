use chrono::{Duration, Utc};
use gatehouse_core::{Email, Notifier, ResetSecret, SaveMode, UserStore, UserStoreError};

/// Error types specific to the forgot-password use case
#[derive(Debug, thiserror::Error)]
pub enum ForgotPasswordError {
    /// Surfaced as-is to the caller, which leaks account existence to an
    /// unauthenticated party. Deliberate: this mirrors the observed product
    /// behavior rather than guessing at hardening.
    #[error("There is no user with this email address")]
    UnknownEmail,
    #[error("There was an error sending the email, try again later")]
    DeliveryFailed,
    #[error("User store error: {0}")]
    UserStore(#[from] UserStoreError),
}

/// Forgot-password use case - begins the reset-secret lifecycle.
///
/// Generates a one-time secret, persists only its hash with an expiry, and
/// mails the plaintext. Issuing a new secret overwrites any outstanding one.
/// If delivery fails the stored hash is cleared again: a secret the user
/// never received must not remain consumable.
pub struct ForgotPasswordUseCase<'a, U, N>
where
    U: UserStore + ?Sized,
    N: Notifier + ?Sized,
{
    users: &'a U,
    notifier: &'a N,
    reset_window: Duration,
}

impl<'a, U, N> ForgotPasswordUseCase<'a, U, N>
where
    U: UserStore + ?Sized,
    N: Notifier + ?Sized,
{
    pub fn new(users: &'a U, notifier: &'a N, reset_window: Duration) -> Self {
        Self {
            users,
            notifier,
            reset_window,
        }
    }

    #[tracing::instrument(name = "ForgotPasswordUseCase::execute", skip(self, reset_url_base))]
    pub async fn execute(
        &self,
        email: Email,
        reset_url_base: &str,
    ) -> Result<(), ForgotPasswordError> {
        let Some(mut user) = self.users.find_by_email(&email).await? else {
            return Err(ForgotPasswordError::UnknownEmail);
        };

        let secret = ResetSecret::generate();
        user.set_reset_secret(secret.digest(), Utc::now() + self.reset_window);
        // Partial bookkeeping write; must not trip unrelated validation.
        self.users.save(&user, SaveMode::Unvalidated).await?;

        let reset_url = format!(
            "{}/{}",
            reset_url_base.trim_end_matches('/'),
            secret.expose()
        );

        if let Err(error) = self.notifier.send_password_reset(&user, &reset_url).await {
            tracing::warn!(%error, user_id = %user.id(), "reset delivery failed, rolling back secret");
            user.clear_reset_secret();
            self.users.save(&user, SaveMode::Unvalidated).await?;
            return Err(ForgotPasswordError::DeliveryFailed);
        }

        Ok(())
    }
}
