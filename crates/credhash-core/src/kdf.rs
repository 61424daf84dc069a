//! Key derivation using Argon2.
//!
//! This module derives keys from passwords using the variant, version and
//! cost settings of a [`HashParameters`] value. It never looks at global
//! defaults: verification passes in the parameters decoded from the stored
//! record.

use argon2::{Argon2, Block};
use zeroize::ZeroizeOnDrop;

use crate::error::{HashError, Result};
use crate::params::HashParameters;

/// A key derived from a password.
///
/// Key material is zeroized from memory when dropped.
#[derive(Clone, ZeroizeOnDrop)]
pub struct DerivedKey {
    key: Vec<u8>,
}

impl DerivedKey {
    pub(crate) fn from_bytes(bytes: Vec<u8>) -> Self {
        Self { key: bytes }
    }

    /// Get a reference to the raw key bytes.
    ///
    /// # Security
    ///
    /// Avoid storing or logging this value outside of the encoded hash.
    pub fn as_bytes(&self) -> &[u8] {
        &self.key
    }

    pub fn len(&self) -> usize {
        self.key.len()
    }

    pub fn is_empty(&self) -> bool {
        self.key.is_empty()
    }
}

impl std::fmt::Debug for DerivedKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DerivedKey")
            .field("key", &"[REDACTED]")
            .finish()
    }
}

fn argon2_version(version: u32) -> std::result::Result<argon2::Version, argon2::Error> {
    match version {
        0x10 => Ok(argon2::Version::V0x10),
        0x13 => Ok(argon2::Version::V0x13),
        _ => Err(argon2::Error::VersionInvalid),
    }
}

/// Build Argon2 cost parameters, letting the argon2 crate enforce its limits.
pub(crate) fn argon2_params(
    params: &HashParameters,
    output_len: usize,
) -> std::result::Result<argon2::Params, argon2::Error> {
    argon2_version(params.version())?;
    argon2::Params::new(
        params.memory_cost(),
        params.time_cost(),
        params.parallelism(),
        Some(output_len),
    )
}

/// Derive a key of `params.key_length()` bytes from a password and salt.
///
/// # Security
///
/// - Same password, salt and parameters always produce the same key
/// - Memory-hard: allocates `memory_cost` KiB for the duration of the call
/// - Argon2 rejecting its inputs (salt too short, memory below the per-lane
///   minimum) or working memory that cannot be allocated is reported as
///   [`HashError::Derivation`]
pub fn derive_key(password: &[u8], salt: &[u8], params: &HashParameters) -> Result<DerivedKey> {
    let argon_params = argon2_params(params, params.key_length())
        .map_err(|e| HashError::Derivation(format!("Invalid Argon2 parameters: {}", e)))?;
    let version = argon2_version(params.version())
        .map_err(|e| HashError::Derivation(format!("Invalid Argon2 version: {}", e)))?;

    let mut blocks = allocate_blocks(argon_params.block_count())?;
    let argon2 = Argon2::new(params.variant().algorithm(), version, argon_params);

    let mut key_bytes = vec![0u8; params.key_length()];
    argon2
        .hash_password_into_with_memory(password, salt, &mut key_bytes, &mut blocks)
        .map_err(|e| HashError::Derivation(format!("Key derivation failed: {}", e)))?;

    Ok(DerivedKey::from_bytes(key_bytes))
}

/// Working memory for one derivation. Failing to allocate it is a
/// [`HashError::Derivation`], not an abort.
fn allocate_blocks(count: usize) -> Result<Vec<Block>> {
    let mut blocks = Vec::new();
    blocks.try_reserve_exact(count).map_err(|e| {
        HashError::Derivation(format!("Cannot allocate {} KiB of Argon2 memory: {}", count, e))
    })?;
    blocks.resize(count, Block::default());
    Ok(blocks)
}
