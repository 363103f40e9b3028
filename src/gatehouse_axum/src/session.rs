use axum::{
    Json,
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::{Cookie, SameSite};
use gatehouse_core::{Role, TokenService, User, UserId};
use serde::{Deserialize, Serialize};

use crate::{error::ApiError, state::AppState};

/// The outward representation of a user. Deliberately owns only the public
/// fields so nothing credential-shaped can leak into a response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserBody {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub role: Role,
}

impl From<&User> for UserBody {
    fn from(user: &User) -> Self {
        Self {
            id: user.id(),
            name: user.name().to_string(),
            email: user.email().as_str().to_string(),
            role: user.role(),
        }
    }
}

#[derive(Serialize, Deserialize)]
pub struct SessionBody {
    pub status: String,
    pub token: String,
    pub data: SessionData,
}

#[derive(Serialize, Deserialize)]
pub struct SessionData {
    pub user: UserBody,
}

/// Mints a token for `user` and returns it twice: in the JSON body for API
/// clients and as a cookie for browsers. Both carry the same credential, so
/// either transport alone is enough to authenticate later requests.
pub fn issue_session(
    state: &AppState,
    user: &User,
    status: StatusCode,
    request_headers: &HeaderMap,
) -> Result<Response, ApiError> {
    let token = state.tokens.issue(user.id())?;

    let cookie = session_cookie(
        state.tokens.config().cookie_name.clone(),
        token.clone(),
        state.tokens.config().ttl_seconds,
        request_is_secure(request_headers),
    );

    let body = Json(SessionBody {
        status: "success".to_string(),
        token,
        data: SessionData {
            user: UserBody::from(user),
        },
    });

    let mut response = (status, body).into_response();
    append_cookie(&mut response, &cookie)?;
    Ok(response)
}

pub(crate) fn session_cookie(
    name: String,
    token: String,
    ttl_seconds: i64,
    secure: bool,
) -> Cookie<'static> {
    Cookie::build((name, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .max_age(time::Duration::seconds(ttl_seconds))
        .build()
}

/// An expired cookie with the session name, instructing the browser to drop
/// whatever it holds. Logout stays stateless; the token itself remains valid
/// until its expiry.
pub(crate) fn removal_cookie(name: String) -> Cookie<'static> {
    let mut cookie = Cookie::build((name, ""))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build();
    cookie.make_removal();
    cookie
}

pub(crate) fn append_cookie(response: &mut Response, cookie: &Cookie<'_>) -> Result<(), ApiError> {
    let value = cookie
        .to_string()
        .parse()
        .map_err(|_| ApiError::Unexpected("could not encode session cookie".to_string()))?;
    response.headers_mut().append(header::SET_COOKIE, value);
    Ok(())
}

/// Secure cookies only when the request arrived over TLS. Behind a proxy the
/// connection to us is plain HTTP, so trust the forwarded-proto header.
pub(crate) fn request_is_secure(headers: &HeaderMap) -> bool {
    headers
        .get("x-forwarded-proto")
        .and_then(|value| value.to_str().ok())
        .is_some_and(|proto| proto.eq_ignore_ascii_case("https"))
}
