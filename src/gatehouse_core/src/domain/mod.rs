pub mod email;
pub mod password;
pub mod reset_secret;
pub mod role;
pub mod user;
