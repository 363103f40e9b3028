use axum::{
    Json,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::Response,
};
use gatehouse_application::LoginUseCase;
use gatehouse_core::Password;
use secrecy::Secret;
use serde::Deserialize;

use crate::{error::ApiError, session::issue_session, state::AppState};

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: Secret<String>,
}

/// Exchanges email/password credentials for a session.
#[tracing::instrument(name = "Login", skip(state, headers, request))]
pub async fn login(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<LoginRequest>,
) -> Result<Response, ApiError> {
    let email = super::parse_email(&request.email)?;
    let password = Password::try_from(request.password)
        .map_err(|error| ApiError::BadRequest(error.to_string()))?;

    let user = LoginUseCase::new(state.users.as_ref())
        .execute(email, password)
        .await?;

    issue_session(&state, &user, StatusCode::OK, &headers)
}
