use axum::{
    Json,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::Response,
};
use gatehouse_application::ResetPasswordUseCase;
use secrecy::Secret;
use serde::Deserialize;

use crate::{error::ApiError, session::issue_session, state::AppState};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    pub password: Secret<String>,
    pub password_confirm: Secret<String>,
}

/// Consumes a mailed reset secret and sets a new password.
///
/// A successful reset logs the caller in immediately; the password change it
/// records invalidates every session issued before it.
#[tracing::instrument(name = "ResetPassword", skip_all)]
pub async fn reset_password(
    State(state): State<AppState>,
    Path(secret): Path<String>,
    headers: HeaderMap,
    Json(request): Json<ResetPasswordRequest>,
) -> Result<Response, ApiError> {
    let password = super::confirmed_password(request.password, &request.password_confirm)?;

    let user = ResetPasswordUseCase::new(state.users.as_ref())
        .execute(&secret, password)
        .await?;

    issue_session(&state, &user, StatusCode::OK, &headers)
}
