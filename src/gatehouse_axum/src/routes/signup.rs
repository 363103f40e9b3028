use axum::{
    Json,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::Response,
};
use gatehouse_application::SignupUseCase;
use gatehouse_core::NewUser;
use secrecy::Secret;
use serde::Deserialize;

use crate::{error::ApiError, session::issue_session, state::AppState};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    pub name: String,
    pub email: String,
    pub password: Secret<String>,
    pub password_confirm: Secret<String>,
}

/// Registers a new account and logs it straight in.
///
/// The request body carries no role field; whatever a caller sends beyond
/// these fields is dropped by deserialization, so privilege cannot be
/// requested at signup.
#[tracing::instrument(name = "Signup", skip(state, headers, request))]
pub async fn signup(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<SignupRequest>,
) -> Result<Response, ApiError> {
    let email = super::parse_email(&request.email)?;
    let password = super::confirmed_password(request.password, &request.password_confirm)?;
    let new_user = NewUser::new(request.name, email, password);

    let welcome_url = format!("{}/me", state.settings.app.public_url);
    let user = SignupUseCase::new(state.users.as_ref(), state.notifier.as_ref())
        .execute(new_user, &welcome_url)
        .await?;

    issue_session(&state, &user, StatusCode::CREATED, &headers)
}
