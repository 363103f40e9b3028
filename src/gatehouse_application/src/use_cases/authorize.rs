use gatehouse_core::{TokenService, User, UserStore, UserStoreError};

/// Error types specific to the authorization gate
#[derive(Debug, thiserror::Error)]
pub enum AuthorizeError {
    #[error("You are not logged in, please log in to get access")]
    NotAuthenticated,
    #[error("The user belonging to this token no longer exists")]
    StaleIdentity,
    #[error("Password was changed recently, please log in again")]
    CredentialsRotated,
    #[error("User store error: {0}")]
    UserStore(#[from] UserStoreError),
}

/// Authorization gate - resolves the actor behind a presented credential.
///
/// Token verification is stateless; the store lookup afterwards re-checks
/// that the subject still exists and has not rotated its password since the
/// token was issued. Why a token fails is deliberately not surfaced beyond
/// the error variant: callers map all three failures to the same 401 class.
pub struct AuthorizeUseCase<'a, U, T>
where
    U: UserStore + ?Sized,
    T: TokenService + ?Sized,
{
    users: &'a U,
    tokens: &'a T,
}

impl<'a, U, T> AuthorizeUseCase<'a, U, T>
where
    U: UserStore + ?Sized,
    T: TokenService + ?Sized,
{
    pub fn new(users: &'a U, tokens: &'a T) -> Self {
        Self { users, tokens }
    }

    #[tracing::instrument(name = "AuthorizeUseCase::execute", skip_all)]
    pub async fn execute(&self, credential: Option<&str>) -> Result<User, AuthorizeError> {
        let token = credential.ok_or(AuthorizeError::NotAuthenticated)?;

        let claims = self
            .tokens
            .verify(token)
            .map_err(|_| AuthorizeError::NotAuthenticated)?;

        let user = self
            .users
            .find_by_id(claims.subject)
            .await?
            .ok_or(AuthorizeError::StaleIdentity)?;

        if user.changed_password_after(claims.issued_at) {
            return Err(AuthorizeError::CredentialsRotated);
        }

        Ok(user)
    }
}
