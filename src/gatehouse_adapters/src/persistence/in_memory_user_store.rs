use std::collections::HashMap;
use std::sync::Arc;

use argon2::{
    Algorithm, Argon2, Params, PasswordHash, PasswordVerifier, Version,
    password_hash::{PasswordHasher, SaltString, rand_core},
};
use chrono::{DateTime, Utc};
use gatehouse_core::{
    Email, NewUser, Password, ResetSecretHash, Role, SaveMode, User, UserId, UserStore,
    UserStoreError,
};
use secrecy::{ExposeSecret, Secret};
use tokio::sync::RwLock;

struct UserRecord {
    user: User,
    password_hash: Secret<String>,
}

/// Credential store backed by process memory.
///
/// Owns the argon2 password hashes; plaintext passwords cross this boundary
/// inward only and hashes never leave it. Clones share the same map, so the
/// store can be handed to several components.
#[derive(Default, Clone)]
pub struct InMemoryUserStore {
    records: Arc<RwLock<HashMap<UserId, UserRecord>>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a user with an explicit role. Role assignment beyond member is
    /// an operator action, not part of signup.
    pub async fn insert_user_with_role(
        &self,
        new_user: NewUser,
        role: Role,
    ) -> Result<User, UserStoreError> {
        let user = User::new(new_user.name, new_user.email, role);
        user.check_invariants()?;

        let password_hash = compute_password_hash(new_user.password).await?;

        let mut records = self.records.write().await;
        if records
            .values()
            .any(|record| record.user.email() == user.email())
        {
            return Err(UserStoreError::EmailTaken);
        }

        records.insert(
            user.id(),
            UserRecord {
                user: user.clone(),
                password_hash,
            },
        );
        Ok(user)
    }
}

#[async_trait::async_trait]
impl UserStore for InMemoryUserStore {
    #[tracing::instrument(name = "Adding user to in-memory store", skip_all)]
    async fn insert_user(&self, new_user: NewUser) -> Result<User, UserStoreError> {
        self.insert_user_with_role(new_user, Role::Member).await
    }

    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, UserStoreError> {
        let records = self.records.read().await;
        Ok(records
            .values()
            .find(|record| record.user.email() == email)
            .map(|record| record.user.clone()))
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserStoreError> {
        let records = self.records.read().await;
        Ok(records.get(&id).map(|record| record.user.clone()))
    }

    async fn find_by_reset_hash(
        &self,
        hash: &ResetSecretHash,
        now: DateTime<Utc>,
    ) -> Result<Option<User>, UserStoreError> {
        let records = self.records.read().await;
        Ok(records
            .values()
            .find(|record| {
                record
                    .user
                    .outstanding_reset()
                    .is_some_and(|reset| reset.hash() == hash && reset.is_live(now))
            })
            .map(|record| record.user.clone()))
    }

    #[tracing::instrument(name = "Verifying password against stored hash", skip_all)]
    async fn verify_password(
        &self,
        id: UserId,
        candidate: &Password,
    ) -> Result<bool, UserStoreError> {
        let expected = {
            let records = self.records.read().await;
            let record = records.get(&id).ok_or(UserStoreError::UserNotFound)?;
            record.password_hash.clone()
        };

        verify_password_hash(expected, candidate.clone()).await
    }

    #[tracing::instrument(name = "Setting new password", skip_all)]
    async fn set_password(
        &self,
        id: UserId,
        new_password: Password,
    ) -> Result<User, UserStoreError> {
        let password_hash = compute_password_hash(new_password).await?;

        let mut records = self.records.write().await;
        let record = records.get_mut(&id).ok_or(UserStoreError::UserNotFound)?;
        record.password_hash = password_hash;
        record.user.record_password_change(Utc::now());
        Ok(record.user.clone())
    }

    async fn save(&self, user: &User, mode: SaveMode) -> Result<(), UserStoreError> {
        if mode == SaveMode::Validated {
            user.check_invariants()?;
        }
        let mut records = self.records.write().await;
        let record = records
            .get_mut(&user.id())
            .ok_or(UserStoreError::UserNotFound)?;
        record.user = user.clone();
        Ok(())
    }
}

async fn compute_password_hash(password: Password) -> Result<Secret<String>, UserStoreError> {
    tokio::task::spawn_blocking(move || {
        let salt = SaltString::generate(&mut rand_core::OsRng);
        let hasher = Argon2::new(
            Algorithm::Argon2id,
            Version::V0x13,
            Params::new(15000, 2, 1, None)
                .map_err(|e| UserStoreError::Unexpected(e.to_string()))?,
        );
        let hash = hasher
            .hash_password(password.expose().as_bytes(), &salt)
            .map_err(|e| UserStoreError::Unexpected(e.to_string()))?
            .to_string();
        Ok(Secret::from(hash))
    })
    .await
    .map_err(|e| UserStoreError::Unexpected(e.to_string()))?
}

async fn verify_password_hash(
    expected: Secret<String>,
    candidate: Password,
) -> Result<bool, UserStoreError> {
    tokio::task::spawn_blocking(move || {
        let parsed = PasswordHash::new(expected.expose_secret())
            .map_err(|e| UserStoreError::Unexpected(e.to_string()))?;
        match Argon2::default().verify_password(candidate.expose().as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(UserStoreError::Unexpected(e.to_string())),
        }
    })
    .await
    .map_err(|e| UserStoreError::Unexpected(e.to_string()))?
}
