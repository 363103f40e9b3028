use gatehouse_core::{Password, User, UserStore, UserStoreError};

/// Error types specific to the update-password use case
#[derive(Debug, thiserror::Error)]
pub enum UpdatePasswordError {
    #[error("Your current password is incorrect")]
    WrongCurrentPassword,
    #[error("User store error: {0}")]
    UserStore(#[from] UserStoreError),
}

/// Update-password use case - password change for an authenticated actor.
///
/// Re-verifies the current password even though the actor already passed the
/// gate: possession of a session is weaker proof than knowledge of the
/// password. The change stamps `password_changed_at`, which invalidates all
/// previously issued tokens at the gate.
pub struct UpdatePasswordUseCase<'a, U>
where
    U: UserStore + ?Sized,
{
    users: &'a U,
}

impl<'a, U> UpdatePasswordUseCase<'a, U>
where
    U: UserStore + ?Sized,
{
    pub fn new(users: &'a U) -> Self {
        Self { users }
    }

    #[tracing::instrument(
        name = "UpdatePasswordUseCase::execute",
        skip(self, actor, current_password, new_password),
        fields(user_id = %actor.id())
    )]
    pub async fn execute(
        &self,
        actor: &User,
        current_password: Password,
        new_password: Password,
    ) -> Result<User, UpdatePasswordError> {
        if !self
            .users
            .verify_password(actor.id(), &current_password)
            .await?
        {
            return Err(UpdatePasswordError::WrongCurrentPassword);
        }

        let user = self.users.set_password(actor.id(), new_password).await?;
        Ok(user)
    }
}
