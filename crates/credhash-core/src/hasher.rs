//! Password hashing and verification.
//!
//! [`Argon2Hasher`] holds an immutable [`HashParameters`] value and a salt
//! source; nothing else. Every call allocates its own buffers, so one hasher
//! can be shared across threads. Each call allocates `memory_cost` KiB, so
//! callers that accept concurrent requests should bound how many run at once.

use std::sync::Arc;

use crate::codec::{self, decode};
use crate::ct::constant_time_eq;
use crate::error::Result;
use crate::kdf::derive_key;
use crate::params::HashParameters;
use crate::salt::{generate_salt, OsSaltSource, SaltSource};

/// Hash and verify passwords against stored records.
pub trait PasswordHasher: Send + Sync {
    /// Hash a password into a self-describing encoded record.
    fn hash(&self, password: &str) -> Result<String>;

    /// Check a candidate password against a stored record.
    ///
    /// Returns `Ok(false)` on a mismatch and an error for malformed records.
    /// Callers facing end users must treat both the same way.
    fn verify(&self, password: &str, encoded: &str) -> Result<bool>;

    /// Whether a stored record was produced with parameters other than the
    /// hasher's current ones.
    fn needs_rehash(&self, encoded: &str) -> Result<bool>;
}

/// Argon2-backed [`PasswordHasher`].
#[derive(Clone)]
pub struct Argon2Hasher {
    params: HashParameters,
    salt_source: Arc<dyn SaltSource>,
}

impl Argon2Hasher {
    /// Create a hasher that draws salts from the operating system.
    pub fn new(params: HashParameters) -> Self {
        Self::with_salt_source(params, Arc::new(OsSaltSource))
    }

    pub fn with_salt_source(params: HashParameters, salt_source: Arc<dyn SaltSource>) -> Self {
        Self {
            params,
            salt_source,
        }
    }

    /// Parameters new hashes are produced with.
    pub fn params(&self) -> &HashParameters {
        &self.params
    }
}

impl std::fmt::Debug for Argon2Hasher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Argon2Hasher")
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

impl PasswordHasher for Argon2Hasher {
    fn hash(&self, password: &str) -> Result<String> {
        tracing::debug!(
            variant = %self.params.variant(),
            memory_cost = self.params.memory_cost(),
            time_cost = self.params.time_cost(),
            parallelism = self.params.parallelism(),
            "hashing password"
        );

        let salt = generate_salt(self.salt_source.as_ref(), self.params.salt_length())?;
        let key = derive_key(password.as_bytes(), &salt, &self.params)?;

        Ok(codec::encode_key(&self.params, &salt, &key))
    }

    fn verify(&self, password: &str, encoded: &str) -> Result<bool> {
        let stored = decode(encoded)?;

        tracing::debug!(
            variant = %stored.params.variant(),
            memory_cost = stored.params.memory_cost(),
            time_cost = stored.params.time_cost(),
            parallelism = stored.params.parallelism(),
            "verifying password"
        );

        // Embedded parameters are authoritative, including the key length.
        let candidate = derive_key(password.as_bytes(), &stored.salt, &stored.params)?;

        Ok(constant_time_eq(candidate.as_bytes(), &stored.key))
    }

    fn needs_rehash(&self, encoded: &str) -> Result<bool> {
        let stored = decode(encoded)?;
        Ok(stored.params != self.params)
    }
}
