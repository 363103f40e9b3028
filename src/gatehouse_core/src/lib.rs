pub mod domain;
pub mod ports;

// Re-export commonly used types for convenience
pub use domain::{
    email::{Email, EmailError},
    password::{Password, PasswordError},
    reset_secret::{ResetSecret, ResetSecretHash},
    role::{Role, RoleError},
    user::{NewUser, OutstandingReset, User, UserError, UserId},
};

pub use ports::{
    notifier::{Notifier, NotifierError},
    token_service::{TokenClaims, TokenError, TokenService},
    user_store::{SaveMode, UserStore, UserStoreError},
};
