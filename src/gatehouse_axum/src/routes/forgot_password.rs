use axum::{Json, extract::State, response::IntoResponse};
use chrono::Duration;
use gatehouse_application::ForgotPasswordUseCase;
use serde::Deserialize;
use serde_json::json;

use crate::{error::ApiError, state::AppState};

#[derive(Deserialize)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

/// Starts the password-reset flow by mailing a one-time secret.
///
/// The plaintext secret travels only in the email; the response body never
/// contains it.
#[tracing::instrument(name = "ForgotPassword", skip(state, request))]
pub async fn forgot_password(
    State(state): State<AppState>,
    Json(request): Json<ForgotPasswordRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let email = super::parse_email(&request.email)?;

    let reset_url_base = format!(
        "{}/api/v1/users/reset-password",
        state.settings.app.public_url
    );

    ForgotPasswordUseCase::new(
        state.users.as_ref(),
        state.notifier.as_ref(),
        Duration::minutes(state.settings.auth.reset_window_minutes),
    )
    .execute(email, &reset_url_base)
    .await?;

    Ok(Json(json!({
        "status": "success",
        "message": "Token sent to email",
    })))
}
