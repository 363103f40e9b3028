use gatehouse_core::{NewUser, Notifier, User, UserStore, UserStoreError};

/// Error types specific to the signup use case
#[derive(Debug, thiserror::Error)]
pub enum SignupError {
    #[error("User store error: {0}")]
    UserStore(#[from] UserStoreError),
}

/// Signup use case - registers a user and triggers the welcome notification.
///
/// The welcome send is best-effort: identity creation is never blocked by a
/// notification failure.
pub struct SignupUseCase<'a, U, N>
where
    U: UserStore + ?Sized,
    N: Notifier + ?Sized,
{
    users: &'a U,
    notifier: &'a N,
}

impl<'a, U, N> SignupUseCase<'a, U, N>
where
    U: UserStore + ?Sized,
    N: Notifier + ?Sized,
{
    pub fn new(users: &'a U, notifier: &'a N) -> Self {
        Self { users, notifier }
    }

    #[tracing::instrument(name = "SignupUseCase::execute", skip(self, new_user, context_url))]
    pub async fn execute(
        &self,
        new_user: NewUser,
        context_url: &str,
    ) -> Result<User, SignupError> {
        let user = self.users.insert_user(new_user).await?;

        if let Err(error) = self.notifier.send_welcome(&user, context_url).await {
            tracing::warn!(%error, user_id = %user.id(), "welcome notification failed");
        }

        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use gatehouse_core::{Email, NotifierError, Password, Role, User};
    use secrecy::Secret;
    use tokio::sync::RwLock;

    use super::*;
    use crate::use_cases::support::FakeUserStore;

    #[derive(Clone, Default)]
    struct CountingNotifier {
        welcomes: Arc<AtomicUsize>,
        fail: bool,
        last_context_url: Arc<RwLock<Option<String>>>,
    }

    #[async_trait::async_trait]
    impl Notifier for CountingNotifier {
        async fn send_welcome(&self, _user: &User, context_url: &str) -> Result<(), NotifierError> {
            if self.fail {
                return Err(NotifierError::SendFailed("smtp down".to_string()));
            }
            self.welcomes.fetch_add(1, Ordering::SeqCst);
            *self.last_context_url.write().await = Some(context_url.to_string());
            Ok(())
        }

        async fn send_password_reset(
            &self,
            _user: &User,
            _reset_url: &str,
        ) -> Result<(), NotifierError> {
            unimplemented!()
        }
    }

    fn new_user(email: &str) -> NewUser {
        NewUser::new(
            "A".to_string(),
            Email::parse(email).unwrap(),
            Password::try_from(Secret::from("secret123".to_string())).unwrap(),
        )
    }

    #[tokio::test]
    async fn signup_creates_member_and_sends_welcome_once() {
        let users = FakeUserStore::default();
        let notifier = CountingNotifier::default();
        let use_case = SignupUseCase::new(&users, &notifier);

        let user = use_case
            .execute(new_user("a@x.com"), "http://localhost/me")
            .await
            .unwrap();

        assert_eq!(user.email().as_str(), "a@x.com");
        assert_eq!(user.role(), Role::Member);
        assert_eq!(notifier.welcomes.load(Ordering::SeqCst), 1);
        assert_eq!(
            notifier.last_context_url.read().await.as_deref(),
            Some("http://localhost/me")
        );
    }

    #[tokio::test]
    async fn signup_rejects_duplicate_email() {
        let users = FakeUserStore::default();
        let notifier = CountingNotifier::default();
        let use_case = SignupUseCase::new(&users, &notifier);

        use_case
            .execute(new_user("a@x.com"), "http://localhost/me")
            .await
            .unwrap();
        let result = use_case
            .execute(new_user("a@x.com"), "http://localhost/me")
            .await;

        assert!(matches!(
            result,
            Err(SignupError::UserStore(UserStoreError::EmailTaken))
        ));
        assert_eq!(notifier.welcomes.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn signup_survives_notification_failure() {
        let users = FakeUserStore::default();
        let notifier = CountingNotifier {
            fail: true,
            ..Default::default()
        };
        let use_case = SignupUseCase::new(&users, &notifier);

        let result = use_case
            .execute(new_user("a@x.com"), "http://localhost/me")
            .await;

        assert!(result.is_ok());
        assert!(
            users
                .find_by_email(&Email::parse("a@x.com").unwrap())
                .await
                .unwrap()
                .is_some()
        );
    }
}
