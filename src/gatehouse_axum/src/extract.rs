use axum::{extract::FromRequestParts, http::request::Parts};
use gatehouse_core::User;

use crate::error::ApiError;

/// The actor resolved by `require_auth`, available to downstream handlers.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts.extensions.get::<CurrentUser>().cloned().ok_or_else(|| {
            ApiError::NotAuthenticated(
                "You are not logged in, please log in to get access".to_string(),
            )
        })
    }
}

/// The possibly-absent actor resolved by `optional_auth`.
///
/// For handlers that render differently for anonymous and authenticated
/// callers. Never use this where authorization is required.
#[derive(Debug, Clone, Default)]
pub struct MaybeUser(pub Option<User>);

impl<S> FromRequestParts<S> for MaybeUser
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(parts
            .extensions
            .get::<MaybeUser>()
            .cloned()
            .unwrap_or_default())
    }
}
