//! API Key generation
//!
//! Generates random bearer secrets of the form `sk_` + 32 lowercase hex characters.

use std::fmt::Debug;

use rand::RngCore;
use sha2::{Digest, Sha256};

/// Default prefix for generated secrets
pub const DEFAULT_PREFIX: &str = "sk_";

/// Random bytes per secret; hex encoding doubles this into 32 characters
pub const DEFAULT_KEY_BYTES: usize = 16;

/// Source of new secrets
pub trait SecretGenerator: Send + Sync + Debug {
    /// Produce a new secret. Never fails.
    fn generate(&self) -> String;
}

/// Generator for random API key secrets
#[derive(Debug, Clone)]
pub struct ApiKeyGenerator {
    /// Prefix for all generated keys (e.g., "sk_")
    prefix: String,
    /// Number of random bytes to generate
    key_bytes: usize,
}

impl ApiKeyGenerator {
    /// Create a new API key generator
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            key_bytes: DEFAULT_KEY_BYTES,
        }
    }

    /// Set the number of random bytes
    pub fn with_key_bytes(mut self, bytes: usize) -> Self {
        self.key_bytes = bytes;
        self
    }

    /// Check that a secret has this generator's prefix and hex suffix length
    pub fn is_well_formed(&self, secret: &str) -> bool {
        match secret.strip_prefix(self.prefix.as_str()) {
            Some(suffix) => {
                suffix.len() == self.key_bytes * 2
                    && suffix
                        .chars()
                        .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c))
            }
            None => false,
        }
    }

    /// Short SHA-256 fingerprint of a secret, for correlating log lines
    pub fn fingerprint(secret: &str) -> String {
        let digest = Sha256::digest(secret.as_bytes());
        hex::encode(&digest[..6])
    }
}

impl SecretGenerator for ApiKeyGenerator {
    fn generate(&self) -> String {
        let mut random_bytes = vec![0u8; self.key_bytes];
        rand::thread_rng().fill_bytes(&mut random_bytes);

        format!("{}{}", self.prefix, hex::encode(random_bytes))
    }
}

impl Default for ApiKeyGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_PREFIX)
    }
}

/// Constant-time string comparison to prevent timing attacks
pub(crate) fn constant_time_compare(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let result = a
        .as_bytes()
        .iter()
        .zip(b.as_bytes())
        .fold(0u8, |acc, (x, y)| acc | (x ^ y));

    result == 0
}
