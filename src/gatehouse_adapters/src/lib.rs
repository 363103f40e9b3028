pub mod auth;
pub mod config;
pub mod email;
pub mod persistence;

pub use auth::{JwtConfig, JwtTokenService};
pub use config::{AllowedOrigins, Settings};
pub use email::{MockNotifier, PostmarkNotifier};
pub use persistence::InMemoryUserStore;
