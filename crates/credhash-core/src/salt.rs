//! Salt generation.
//!
//! Salts come from a [`SaltSource`]. The production source reads the
//! operating system CSPRNG; a failure there is returned as
//! [`HashError::Randomness`] and is never replaced with a predictable value.

use crate::error::{HashError, Result};

/// A source of cryptographically secure random bytes.
pub trait SaltSource: Send + Sync {
    /// Fill `buf` entirely with random bytes.
    fn fill(&self, buf: &mut [u8]) -> Result<()>;
}

/// Operating system random number generator.
#[derive(Debug, Default, Clone, Copy)]
pub struct OsSaltSource;

impl SaltSource for OsSaltSource {
    fn fill(&self, buf: &mut [u8]) -> Result<()> {
        getrandom::getrandom(buf)
            .map_err(|e| HashError::Randomness(format!("Failed to generate salt: {}", e)))
    }
}

/// Draw a fresh salt of `len` bytes.
pub fn generate_salt(source: &dyn SaltSource, len: usize) -> Result<Vec<u8>> {
    let mut salt = vec![0u8; len];
    source.fill(&mut salt)?;
    Ok(salt)
}
