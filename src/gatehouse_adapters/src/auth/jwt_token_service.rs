use chrono::{DateTime, Utc};
use gatehouse_core::{TokenClaims, TokenError, TokenService, UserId};
use jsonwebtoken::{DecodingKey, EncodingKey, Validation, decode, encode, errors::ErrorKind};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};

/// Immutable token/cookie configuration, constructed once at startup and
/// injected wherever tokens are minted or checked.
#[derive(Clone, Deserialize)]
pub struct JwtConfig {
    pub cookie_name: String,
    pub secret: Secret<String>,
    pub ttl_seconds: i64,
}

/// HS256 identity tokens carrying `{sub, iat, exp}`.
///
/// Claims are signed, not encrypted: nothing confidential goes in them.
#[derive(Clone)]
pub struct JwtTokenService {
    config: JwtConfig,
}

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    iat: i64,
    exp: i64,
}

impl JwtTokenService {
    pub fn new(config: JwtConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &JwtConfig {
        &self.config
    }

    /// Mint a token with an explicit issued-at stamp. `issue` delegates here
    /// with the current time; tests use it to fabricate token age.
    pub fn issue_at(
        &self,
        subject: UserId,
        issued_at: DateTime<Utc>,
    ) -> Result<String, TokenError> {
        let claims = Claims {
            sub: subject.to_string(),
            iat: issued_at.timestamp(),
            exp: issued_at.timestamp() + self.config.ttl_seconds,
        };

        encode(
            &jsonwebtoken::Header::default(),
            &claims,
            &EncodingKey::from_secret(self.config.secret.expose_secret().as_bytes()),
        )
        .map_err(|e| TokenError::Unexpected(e.to_string()))
    }
}

impl TokenService for JwtTokenService {
    fn issue(&self, subject: UserId) -> Result<String, TokenError> {
        self.issue_at(subject, Utc::now())
    }

    fn verify(&self, token: &str) -> Result<TokenClaims, TokenError> {
        let mut validation = Validation::default();
        // The configured lifetime is the whole policy; no grace period.
        validation.leeway = 0;

        let claims = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.config.secret.expose_secret().as_bytes()),
            &validation,
        )
        .map(|data| data.claims)
        .map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => TokenError::Expired,
            _ => TokenError::Invalid,
        })?;

        let subject = UserId::parse(&claims.sub).map_err(|_| TokenError::Invalid)?;
        let issued_at =
            DateTime::from_timestamp(claims.iat, 0).ok_or(TokenError::Invalid)?;

        Ok(TokenClaims { subject, issued_at })
    }
}
