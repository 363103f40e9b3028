//! Request-gating middleware.
//!
//! `require_auth` resolves the actor behind the presented credential and
//! refuses the request when it cannot. `require_role` layers on top of it
//! and enforces role membership. `optional_auth` never refuses; it only
//! annotates the request with whoever could be identified.

use std::{future::Future, pin::Pin};

use axum::{
    extract::{Request, State},
    http::{HeaderMap, header},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::CookieJar;
use gatehouse_application::{AuthorizeUseCase, restrict_to};
use gatehouse_core::Role;

use crate::{
    error::ApiError,
    extract::{CurrentUser, MaybeUser},
    state::AppState,
};

/// Rejects the request unless a verifiable credential identifies a live
/// user. On success the resolved [`CurrentUser`] is attached to the request
/// for downstream extractors.
#[tracing::instrument(name = "require_auth", skip_all)]
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let credential = extract_credential(request.headers(), &state.tokens.config().cookie_name);

    let user = AuthorizeUseCase::new(state.users.as_ref(), state.tokens.as_ref())
        .execute(credential.as_deref())
        .await?;

    request.extensions_mut().insert(CurrentUser(user));
    Ok(next.run(request).await)
}

/// Annotates the request with [`MaybeUser`] and always lets it through.
/// Failures to authorize are indistinguishable from anonymity here.
#[tracing::instrument(name = "optional_auth", skip_all)]
pub async fn optional_auth(State(state): State<AppState>, mut request: Request, next: Next) -> Response {
    let credential = extract_credential(request.headers(), &state.tokens.config().cookie_name);

    let user = AuthorizeUseCase::new(state.users.as_ref(), state.tokens.as_ref())
        .execute(credential.as_deref())
        .await
        .ok();

    request.extensions_mut().insert(MaybeUser(user));
    next.run(request).await
}

/// Builds a middleware that admits only actors whose role is in `allowed`.
///
/// Must sit behind [`require_auth`] on the same route; a request that
/// reaches it without a resolved actor is treated as unauthenticated.
pub fn require_role(
    allowed: &'static [Role],
) -> impl Fn(Request, Next) -> Pin<Box<dyn Future<Output = Result<Response, ApiError>> + Send>> + Clone
{
    move |request: Request, next: Next| {
        Box::pin(async move {
            let current = request.extensions().get::<CurrentUser>().ok_or_else(|| {
                ApiError::NotAuthenticated(
                    "You are not logged in, please log in to get access".to_string(),
                )
            })?;

            restrict_to(allowed, &current.0)?;
            Ok(next.run(request).await)
        })
    }
}

/// Pulls the session credential out of a request: the `Authorization` bearer
/// header wins, the session cookie is the fallback for browser clients.
pub(crate) fn extract_credential(headers: &HeaderMap, cookie_name: &str) -> Option<String> {
    if let Some(token) = bearer_token(headers) {
        return Some(token);
    }

    CookieJar::from_headers(headers)
        .get(cookie_name)
        .map(|cookie| cookie.value().to_string())
}

fn bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(|token| token.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers_with(entries: &[(&str, &str)]) -> HeaderMap {
        let mut headers = HeaderMap::new();
        for (name, value) in entries {
            headers.insert(
                header::HeaderName::try_from(*name).unwrap(),
                value.parse().unwrap(),
            );
        }
        headers
    }

    #[test]
    fn bearer_header_is_preferred_over_cookie() {
        let headers = headers_with(&[
            ("authorization", "Bearer header-token"),
            ("cookie", "gatehouse_session=cookie-token"),
        ]);

        assert_eq!(
            extract_credential(&headers, "gatehouse_session"),
            Some("header-token".to_string())
        );
    }

    #[test]
    fn cookie_is_the_fallback() {
        let headers = headers_with(&[("cookie", "gatehouse_session=cookie-token")]);

        assert_eq!(
            extract_credential(&headers, "gatehouse_session"),
            Some("cookie-token".to_string())
        );
    }

    #[test]
    fn non_bearer_authorization_is_ignored() {
        let headers = headers_with(&[("authorization", "Basic dXNlcjpwYXNz")]);
        assert_eq!(extract_credential(&headers, "gatehouse_session"), None);
    }

    #[test]
    fn other_cookies_do_not_leak_in() {
        let headers = headers_with(&[("cookie", "tracking=abc; theme=dark")]);
        assert_eq!(extract_credential(&headers, "gatehouse_session"), None);
    }
}
