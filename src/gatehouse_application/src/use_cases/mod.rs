pub mod authorize;
pub mod forgot_password;
pub mod login;
pub mod reset_password;
pub mod restrict;
pub mod signup;
pub mod update_password;

#[cfg(test)]
pub(crate) mod support;
