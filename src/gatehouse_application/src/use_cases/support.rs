//! Shared in-memory fakes for use-case tests.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use gatehouse_core::{
    Email, NewUser, Password, ResetSecretHash, Role, SaveMode, User, UserId, UserStore,
    UserStoreError,
};
use tokio::sync::RwLock;

struct Record {
    user: User,
    // Plaintext stand-in for the one-way hash; hashing is an adapter concern.
    password: String,
}

/// Credential-store fake with the full port semantics: unique emails,
/// expiry-filtered reset lookup, and password changes that stamp
/// `password_changed_at` and consume the reset secret.
#[derive(Clone, Default)]
pub(crate) struct FakeUserStore {
    records: Arc<RwLock<HashMap<UserId, Record>>>,
}

#[async_trait]
impl UserStore for FakeUserStore {
    async fn insert_user(&self, new_user: NewUser) -> Result<User, UserStoreError> {
        let user = User::new(new_user.name, new_user.email, Role::Member);
        user.check_invariants()?;
        let mut records = self.records.write().await;
        if records
            .values()
            .any(|record| record.user.email() == user.email())
        {
            return Err(UserStoreError::EmailTaken);
        }
        records.insert(
            user.id(),
            Record {
                user: user.clone(),
                password: new_user.password.expose().to_string(),
            },
        );
        Ok(user)
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

    async fn verify_password(
        &self,
        id: UserId,
        candidate: &Password,
    ) -> Result<bool, UserStoreError> {
        let records = self.records.read().await;
        let record = records.get(&id).ok_or(UserStoreError::UserNotFound)?;
        Ok(record.password == candidate.expose())
    }

    async fn set_password(
        &self,
        id: UserId,
        new_password: Password,
    ) -> Result<User, UserStoreError> {
        let mut records = self.records.write().await;
        let record = records.get_mut(&id).ok_or(UserStoreError::UserNotFound)?;
        record.password = new_password.expose().to_string();
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

impl FakeUserStore {
    /// Seed a user with an explicit role, bypassing signup.
    pub(crate) async fn seed(&self, name: &str, email: &str, password: &str, role: Role) -> User {
        let user = User::new(name.to_string(), Email::parse(email).unwrap(), role);
        self.records.write().await.insert(
            user.id(),
            Record {
                user: user.clone(),
                password: password.to_string(),
            },
        );
        user
    }
}
