use axum::{Json, response::IntoResponse};
use serde_json::json;

use crate::{error::ApiError, extract::CurrentUser, session::UserBody};

/// Returns the profile of the authenticated caller.
#[tracing::instrument(name = "Me", skip_all)]
pub async fn me(actor: CurrentUser) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(json!({
        "status": "success",
        "data": { "user": UserBody::from(&actor.0) },
    })))
}
