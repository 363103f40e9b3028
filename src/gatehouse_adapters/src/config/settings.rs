use config::{Config, ConfigError, Environment};
use secrecy::Secret;
use serde::Deserialize;

use crate::auth::JwtConfig;

/// Process-wide configuration, built once at startup and passed by
/// reference into the components that need it. Nothing reads the
/// environment after this point.
///
/// Environment overrides use the `GATEHOUSE__` prefix with `__` as the
/// section separator, e.g. `GATEHOUSE__AUTH__JWT__SECRET`. Required keys:
/// the JWT secret, the email sender, and the Postmark token.
#[derive(Clone, Deserialize)]
pub struct Settings {
    pub app: AppSettings,
    pub auth: AuthSettings,
    pub email: EmailSettings,
}

#[derive(Clone, Deserialize)]
pub struct AppSettings {
    pub address: String,
    /// Externally reachable base URL, used to build links in outbound mail.
    pub public_url: String,
    #[serde(default)]
    pub allowed_origins: AllowedOrigins,
}

#[derive(Clone, Deserialize)]
pub struct AuthSettings {
    pub jwt: JwtConfig,
    pub reset_window_minutes: i64,
}

#[derive(Clone, Deserialize)]
pub struct EmailSettings {
    pub base_url: String,
    pub sender: String,
    pub auth_token: Secret<String>,
    pub timeout_millis: u64,
}

/// CORS allow-list. Empty means CORS is not configured.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct AllowedOrigins(Vec<String>);

impl AllowedOrigins {
    pub fn new(origins: Vec<String>) -> Self {
        Self(origins)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, origin: &http::HeaderValue) -> bool {
        origin
            .to_str()
            .is_ok_and(|raw| self.0.iter().any(|allowed| allowed == raw))
    }
}

impl Settings {
    pub fn load() -> Result<Self, ConfigError> {
        let config = Config::builder()
            .set_default("app.address", "0.0.0.0:3000")?
            .set_default("app.public_url", "http://localhost:3000")?
            .set_default("auth.jwt.cookie_name", "gatehouse_session")?
            .set_default("auth.jwt.ttl_seconds", 86_400)?
            .set_default("auth.reset_window_minutes", 10)?
            .set_default("email.base_url", "https://api.postmarkapp.com/")?
            .set_default("email.timeout_millis", 10_000)?
            .add_source(Environment::with_prefix("GATEHOUSE").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}
