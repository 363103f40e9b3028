use axum::{
    Json,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::Response,
};
use gatehouse_application::UpdatePasswordUseCase;
use secrecy::Secret;
use serde::Deserialize;

use crate::{
    error::ApiError, extract::CurrentUser, session::issue_session, state::AppState,
};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePasswordRequest {
    pub password_current: Secret<String>,
    pub password: Secret<String>,
    pub password_confirm: Secret<String>,
}

/// Password change for a logged-in caller.
///
/// The change rotates the credential, so the response carries a fresh
/// session; older tokens stop passing the gate.
#[tracing::instrument(name = "UpdatePassword", skip(state, actor, headers, request), fields(user_id = %actor.0.id()))]
pub async fn update_password(
    State(state): State<AppState>,
    actor: CurrentUser,
    headers: HeaderMap,
    Json(request): Json<UpdatePasswordRequest>,
) -> Result<Response, ApiError> {
    let current_password = secret_password(request.password_current)?;
    let new_password = super::confirmed_password(request.password, &request.password_confirm)?;

    let user = UpdatePasswordUseCase::new(state.users.as_ref())
        .execute(&actor.0, current_password, new_password)
        .await?;

    issue_session(&state, &user, StatusCode::OK, &headers)
}

fn secret_password(raw: Secret<String>) -> Result<gatehouse_core::Password, ApiError> {
    gatehouse_core::Password::try_from(raw).map_err(|error| ApiError::BadRequest(error.to_string()))
}
