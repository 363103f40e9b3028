use axum::{
    Json,
    extract::State,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::{
    error::ApiError,
    session::{append_cookie, removal_cookie},
    state::AppState,
};

/// Clears the session cookie. Stateless by design: the token itself stays
/// valid until its expiry, this only tells browsers to forget it.
#[tracing::instrument(name = "Logout", skip_all)]
pub async fn logout(State(state): State<AppState>) -> Result<Response, ApiError> {
    let mut response = Json(json!({ "status": "success" })).into_response();
    append_cookie(
        &mut response,
        &removal_cookie(state.tokens.config().cookie_name.clone()),
    )?;
    Ok(response)
}
