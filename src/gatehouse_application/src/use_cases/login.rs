use gatehouse_core::{Email, Password, User, UserStore, UserStoreError};

/// Error types specific to the login use case
#[derive(Debug, thiserror::Error)]
pub enum LoginError {
    /// Unknown email and wrong password collapse into one error so a caller
    /// cannot probe which of the two was at fault.
    #[error("Incorrect email or password")]
    IncorrectCredentials,
    #[error("User store error: {0}")]
    UserStore(#[from] UserStoreError),
}

/// Login use case - verifies email/password credentials.
pub struct LoginUseCase<'a, U>
where
    U: UserStore + ?Sized,
{
    users: &'a U,
}

impl<'a, U> LoginUseCase<'a, U>
where
    U: UserStore + ?Sized,
{
    pub fn new(users: &'a U) -> Self {
        Self { users }
    }

    #[tracing::instrument(name = "LoginUseCase::execute", skip(self, password))]
    pub async fn execute(&self, email: Email, password: Password) -> Result<User, LoginError> {
        let Some(user) = self.users.find_by_email(&email).await? else {
            return Err(LoginError::IncorrectCredentials);
        };

        if !self.users.verify_password(user.id(), &password).await? {
            return Err(LoginError::IncorrectCredentials);
        }

        Ok(user)
    }
}
