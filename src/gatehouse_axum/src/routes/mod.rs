//! Route handlers for the authentication surface.
//!
//! Each handler deserializes its request body, delegates to the matching use
//! case, and shapes the response. Validation beyond basic shape (email
//! format, password length, confirmation match) happens here at the edge.

pub mod forgot_password;
pub mod login;
pub mod logout;
pub mod me;
pub mod reset_password;
pub mod signup;
pub mod update_password;

pub use forgot_password::forgot_password;
pub use login::login;
pub use logout::logout;
pub use me::me;
pub use reset_password::reset_password;
pub use signup::signup;
pub use update_password::update_password;

use gatehouse_core::{Email, Password};
use secrecy::{ExposeSecret, Secret};

use crate::error::ApiError;

pub(crate) fn parse_email(raw: &str) -> Result<Email, ApiError> {
    Email::parse(raw).map_err(|error| ApiError::BadRequest(error.to_string()))
}

/// Checks the confirmation copy before the password ever becomes a domain
/// value. The comparison stays inside this function so neither copy escapes.
pub(crate) fn confirmed_password(
    password: Secret<String>,
    confirmation: &Secret<String>,
) -> Result<Password, ApiError> {
    if password.expose_secret() != confirmation.expose_secret() {
        return Err(ApiError::BadRequest("Passwords do not match".to_string()));
    }

    Password::try_from(password).map_err(|error| ApiError::BadRequest(error.to_string()))
}
