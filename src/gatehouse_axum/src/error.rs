use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use gatehouse_application::{
    AuthorizeError, ForbiddenError, ForgotPasswordError, LoginError, ResetPasswordError,
    SignupError, UpdatePasswordError,
};
use gatehouse_core::{TokenError, UserStoreError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// The single boundary translator: every failure class the core produces,
/// mapped to a stable HTTP status. Handlers convert their use-case errors
/// into this type and never touch status codes themselves.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotAuthenticated(String),

    #[error("The user belonging to this token no longer exists")]
    StaleIdentity,

    #[error("Password was changed recently, please log in again")]
    CredentialsRotated,

    #[error("You do not have permission to perform this action")]
    Forbidden,

    #[error("{0}")]
    NotFound(String),

    #[error("Token is invalid or has expired")]
    InvalidOrExpired,

    #[error("Your current password is incorrect")]
    WrongCurrentPassword,

    #[error("There was an error sending the email, try again later")]
    DeliveryFailed,

    #[error("Email already in use")]
    EmailTaken,

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status_code = match self {
            ApiError::BadRequest(_) | ApiError::InvalidOrExpired => StatusCode::BAD_REQUEST,

            ApiError::NotAuthenticated(_)
            | ApiError::StaleIdentity
            | ApiError::CredentialsRotated
            | ApiError::WrongCurrentPassword => StatusCode::UNAUTHORIZED,

            ApiError::Forbidden => StatusCode::FORBIDDEN,

            ApiError::NotFound(_) => StatusCode::NOT_FOUND,

            ApiError::EmailTaken => StatusCode::CONFLICT,

            ApiError::DeliveryFailed | ApiError::Unexpected(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = Json(ErrorResponse {
            error: self.to_string(),
        });

        (status_code, body).into_response()
    }
}

impl From<UserStoreError> for ApiError {
    fn from(error: UserStoreError) -> Self {
        match error {
            UserStoreError::EmailTaken => ApiError::EmailTaken,
            UserStoreError::UserNotFound => ApiError::NotFound(error.to_string()),
            UserStoreError::InvalidRecord(e) => ApiError::BadRequest(e.to_string()),
            UserStoreError::Unexpected(e) => ApiError::Unexpected(e),
        }
    }
}

impl From<TokenError> for ApiError {
    fn from(error: TokenError) -> Self {
        match error {
            TokenError::Invalid | TokenError::Expired => {
                ApiError::NotAuthenticated("Invalid or expired token".to_string())
            }
            TokenError::Unexpected(e) => ApiError::Unexpected(e),
        }
    }
}

impl From<SignupError> for ApiError {
    fn from(error: SignupError) -> Self {
        match error {
            SignupError::UserStore(e) => e.into(),
        }
    }
}

impl From<LoginError> for ApiError {
    fn from(error: LoginError) -> Self {
        match error {
            LoginError::IncorrectCredentials => ApiError::NotAuthenticated(error.to_string()),
            LoginError::UserStore(e) => e.into(),
        }
    }
}

impl From<AuthorizeError> for ApiError {
    fn from(error: AuthorizeError) -> Self {
        match error {
            AuthorizeError::NotAuthenticated => ApiError::NotAuthenticated(error.to_string()),
            AuthorizeError::StaleIdentity => ApiError::StaleIdentity,
            AuthorizeError::CredentialsRotated => ApiError::CredentialsRotated,
            AuthorizeError::UserStore(e) => e.into(),
        }
    }
}

impl From<ForbiddenError> for ApiError {
    fn from(_: ForbiddenError) -> Self {
        ApiError::Forbidden
    }
}

impl From<ForgotPasswordError> for ApiError {
    fn from(error: ForgotPasswordError) -> Self {
        match error {
            ForgotPasswordError::UnknownEmail => ApiError::NotFound(error.to_string()),
            ForgotPasswordError::DeliveryFailed => ApiError::DeliveryFailed,
            ForgotPasswordError::UserStore(e) => e.into(),
        }
    }
}

impl From<ResetPasswordError> for ApiError {
    fn from(error: ResetPasswordError) -> Self {
        match error {
            ResetPasswordError::InvalidOrExpired => ApiError::InvalidOrExpired,
            ResetPasswordError::UserStore(e) => e.into(),
        }
    }
}

impl From<UpdatePasswordError> for ApiError {
    fn from(error: UpdatePasswordError) -> Self {
        match error {
            UpdatePasswordError::WrongCurrentPassword => ApiError::WrongCurrentPassword,
            UpdatePasswordError::UserStore(e) => e.into(),
        }
    }
}
