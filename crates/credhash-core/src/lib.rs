//! # Credhash Core
//!
//! Password hashing and verification built on Argon2.
//!
//! Passwords are turned into a memory-hard derived key and stored as a
//! self-describing string that carries its own cost parameters:
//!
//! ```text
//! $argon2id$v=19$m=131072,t=4,p=8$<salt>$<key>
//! ```
//!
//! Verification always uses the parameters embedded in the record, so records
//! written under older settings stay verifiable after a parameter bump.
//!
//! ## Architecture
//!
//! - **params**: Validated, immutable hashing parameters and the raw config surface
//! - **codec**: Encoding and decoding of the textual hash format
//! - **hasher**: Hashing, verification and rehash checks
//! - **kdf**: Argon2 key derivation
//! - **salt**: Secure salt generation
//! - **ct**: Constant-time comparison
//!
//! ## Example
//!
//! ```no_run
//! use credhash_core::{Argon2Hasher, HashParameters, PasswordHasher};
//!
//! let hasher = Argon2Hasher::new(HashParameters::default());
//! let stored = hasher.hash("CorrectHorse1!").unwrap();
//! assert!(hasher.verify("CorrectHorse1!", &stored).unwrap());
//! ```

pub mod codec;
pub mod ct;
pub mod error;
pub mod hasher;
pub mod kdf;
pub mod params;
pub mod salt;

pub use codec::{decode, encode, DecodedHash};
pub use error::{HashError, Result};
pub use hasher::{Argon2Hasher, PasswordHasher};
pub use kdf::{derive_key, DerivedKey};
pub use params::{HashParameters, HasherConfig, Variant};
pub use salt::{OsSaltSource, SaltSource};

/// Core version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
