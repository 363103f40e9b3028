use rand::RngCore;
use secrecy::{ExposeSecret, Secret};
use sha2::{Digest, Sha256};

const SECRET_BYTES: usize = 32;

/// A one-time password-reset secret.
///
/// The plaintext exists only in memory for the duration of the reset
/// request; it is delivered to the user out-of-band and only its SHA-256
/// digest is ever persisted.
pub struct ResetSecret(Secret<String>);

impl ResetSecret {
    /// Generate a fresh high-entropy secret (32 random bytes, hex-encoded).
    pub fn generate() -> Self {
        let mut bytes = [0u8; SECRET_BYTES];
        rand::rng().fill_bytes(&mut bytes);
        Self(Secret::from(hex::encode(bytes)))
    }

    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }

    /// The storage form of this secret.
    pub fn digest(&self) -> ResetSecretHash {
        ResetSecretHash::of(self.expose())
    }
}

/// One-way hash of a reset secret, safe to persist on the user record.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResetSecretHash(String);

impl ResetSecretHash {
    pub fn of(plaintext: &str) -> Self {
        Self(hex::encode(Sha256::digest(plaintext.as_bytes())))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}
