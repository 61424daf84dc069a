//! Hashing parameters.
//!
//! [`HashParameters`] is the validated, immutable value the hasher works
//! with. [`HasherConfig`] is the raw configuration surface as it appears in
//! a config file, where every option may be omitted and falls back to the
//! defaults below.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{HashError, Result};

/// Default salt length in bytes.
pub const DEFAULT_SALT_LENGTH: usize = 24;
/// Default derived key length in bytes.
pub const DEFAULT_KEY_LENGTH: usize = 32;
/// Default number of Argon2 passes.
pub const DEFAULT_TIME_COST: u32 = 4;
/// Default memory cost in KiB (128 MiB).
pub const DEFAULT_MEMORY_COST: u32 = 128 * 1024;
/// Default number of lanes.
pub const DEFAULT_PARALLELISM: u32 = 8;
/// Argon2 version 1.3, the current revision.
pub const DEFAULT_VERSION: u32 = 0x13;
/// Largest memory cost accepted from configuration, in KiB (4 GiB).
pub const MAX_MEMORY_COST: u32 = 4 * 1024 * 1024;

const SUPPORTED_VERSIONS: [u32; 2] = [0x10, 0x13];

/// Argon2 algorithm variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    #[default]
    Argon2id,
    Argon2i,
    Argon2d,
}

impl Variant {
    /// Tag used in the encoded hash format.
    pub fn as_str(&self) -> &'static str {
        match self {
            Variant::Argon2id => "argon2id",
            Variant::Argon2i => "argon2i",
            Variant::Argon2d => "argon2d",
        }
    }

    pub(crate) fn algorithm(&self) -> argon2::Algorithm {
        match self {
            Variant::Argon2id => argon2::Algorithm::Argon2id,
            Variant::Argon2i => argon2::Algorithm::Argon2i,
            Variant::Argon2d => argon2::Algorithm::Argon2d,
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Variant {
    type Err = HashError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "argon2id" => Ok(Variant::Argon2id),
            "argon2i" => Ok(Variant::Argon2i),
            "argon2d" => Ok(Variant::Argon2d),
            other => Err(HashError::Config(format!(
                "Unsupported variant \"{}\" (use argon2id, argon2i or argon2d)",
                other
            ))),
        }
    }
}

/// Validated Argon2 cost and output parameters.
///
/// Values of this type always satisfy: every numeric field is non-zero, the
/// version is one Argon2 defines, and the variant is supported.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HashParameters {
    variant: Variant,
    version: u32,
    memory_cost: u32,
    time_cost: u32,
    parallelism: u32,
    key_length: usize,
    salt_length: usize,
}

impl HashParameters {
    /// Build a parameter set, rejecting zero values and unsupported versions.
    pub fn new(
        variant: Variant,
        version: u32,
        memory_cost: u32,
        time_cost: u32,
        parallelism: u32,
        key_length: usize,
        salt_length: usize,
    ) -> Result<Self> {
        if !SUPPORTED_VERSIONS.contains(&version) {
            return Err(HashError::Config(format!(
                "Unsupported version {} (use 16 or 19)",
                version
            )));
        }
        ensure_non_zero("memory_cost", memory_cost as u64)?;
        ensure_non_zero("time_cost", time_cost as u64)?;
        ensure_non_zero("parallelism", parallelism as u64)?;
        ensure_non_zero("key_length", key_length as u64)?;
        ensure_non_zero("salt_length", salt_length as u64)?;

        Ok(Self {
            variant,
            version,
            memory_cost,
            time_cost,
            parallelism,
            key_length,
            salt_length,
        })
    }

    pub fn variant(&self) -> Variant {
        self.variant
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    /// Memory cost in KiB.
    pub fn memory_cost(&self) -> u32 {
        self.memory_cost
    }

    pub fn time_cost(&self) -> u32 {
        self.time_cost
    }

    pub fn parallelism(&self) -> u32 {
        self.parallelism
    }

    pub fn key_length(&self) -> usize {
        self.key_length
    }

    pub fn salt_length(&self) -> usize {
        self.salt_length
    }
}

impl Default for HashParameters {
    fn default() -> Self {
        Self {
            variant: Variant::Argon2id,
            version: DEFAULT_VERSION,
            memory_cost: DEFAULT_MEMORY_COST,
            time_cost: DEFAULT_TIME_COST,
            parallelism: DEFAULT_PARALLELISM,
            key_length: DEFAULT_KEY_LENGTH,
            salt_length: DEFAULT_SALT_LENGTH,
        }
    }
}

fn ensure_non_zero(name: &str, value: u64) -> Result<()> {
    if value == 0 {
        return Err(HashError::Config(format!("{} must be greater than zero", name)));
    }
    Ok(())
}

/// Raw hasher configuration as read from a config file.
///
/// Numbers are signed so that negative values are reported as configuration
/// errors rather than parse failures.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HasherConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variant: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memory_cost: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_cost: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parallelism: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key_length: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub salt_length: Option<i64>,
}

impl HasherConfig {
    /// Overlay every option set in `other` onto `self`.
    pub fn merge(mut self, other: HasherConfig) -> Self {
        self.variant = other.variant.or(self.variant);
        self.version = other.version.or(self.version);
        self.memory_cost = other.memory_cost.or(self.memory_cost);
        self.time_cost = other.time_cost.or(self.time_cost);
        self.parallelism = other.parallelism.or(self.parallelism);
        self.key_length = other.key_length.or(self.key_length);
        self.salt_length = other.salt_length.or(self.salt_length);
        self
    }

    /// Validate into [`HashParameters`].
    ///
    /// Also enforces Argon2's own limits (minimum salt length, memory per
    /// lane, output length) and caps `memory_cost` at [`MAX_MEMORY_COST`].
    pub fn to_parameters(&self) -> Result<HashParameters> {
        let variant = match self.variant.as_deref() {
            Some(tag) => tag.trim().parse::<Variant>()?,
            None => Variant::default(),
        };
        let version = to_u32("version", self.version, DEFAULT_VERSION)?;
        let memory_cost = to_u32("memory_cost", self.memory_cost, DEFAULT_MEMORY_COST)?;
        let time_cost = to_u32("time_cost", self.time_cost, DEFAULT_TIME_COST)?;
        let parallelism = to_u32("parallelism", self.parallelism, DEFAULT_PARALLELISM)?;
        let key_length = to_u32("key_length", self.key_length, DEFAULT_KEY_LENGTH as u32)? as usize;
        let salt_length =
            to_u32("salt_length", self.salt_length, DEFAULT_SALT_LENGTH as u32)? as usize;

        let params = HashParameters::new(
            variant,
            version,
            memory_cost,
            time_cost,
            parallelism,
            key_length,
            salt_length,
        )?;

        if memory_cost > MAX_MEMORY_COST {
            return Err(HashError::Config(format!(
                "memory_cost must be at most {} KiB (got {})",
                MAX_MEMORY_COST, memory_cost
            )));
        }
        if salt_length < argon2::MIN_SALT_LEN {
            return Err(HashError::Config(format!(
                "salt_length must be at least {} bytes (got {})",
                argon2::MIN_SALT_LEN,
                salt_length
            )));
        }
        crate::kdf::argon2_params(&params, key_length)
            .map_err(|e| HashError::Config(format!("Argon2 rejected parameters: {}", e)))?;

        Ok(params)
    }
}

impl From<&HashParameters> for HasherConfig {
    fn from(params: &HashParameters) -> Self {
        Self {
            variant: Some(params.variant.as_str().to_string()),
            version: Some(params.version as i64),
            memory_cost: Some(params.memory_cost as i64),
            time_cost: Some(params.time_cost as i64),
            parallelism: Some(params.parallelism as i64),
            key_length: Some(params.key_length as i64),
            salt_length: Some(params.salt_length as i64),
        }
    }
}

fn to_u32(name: &str, value: Option<i64>, default: u32) -> Result<u32> {
    let Some(value) = value else {
        return Ok(default);
    };
    if value <= 0 {
        return Err(HashError::Config(format!(
            "{} must be greater than zero (got {})",
            name, value
        )));
    }
    u32::try_from(value)
        .map_err(|_| HashError::Config(format!("{} is out of range (got {})", name, value)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_documented_values() {
        let params = HashParameters::default();
        assert_eq!(params.variant(), Variant::Argon2id);
        assert_eq!(params.version(), 19);
        assert_eq!(params.memory_cost(), 131072);
        assert_eq!(params.time_cost(), 4);
        assert_eq!(params.parallelism(), 8);
        assert_eq!(params.key_length(), 32);
        assert_eq!(params.salt_length(), 24);
    }

    #[test]
    fn test_empty_config_yields_defaults() {
        let params = HasherConfig::default().to_parameters().unwrap();
        assert_eq!(params, HashParameters::default());
    }

    #[test]
    fn test_zero_values_rejected() {
        for (field, result) in [
            ("memory_cost", HashParameters::new(Variant::Argon2id, 19, 0, 1, 1, 32, 16)),
            ("time_cost", HashParameters::new(Variant::Argon2id, 19, 64, 0, 1, 32, 16)),
            ("parallelism", HashParameters::new(Variant::Argon2id, 19, 64, 1, 0, 32, 16)),
            ("key_length", HashParameters::new(Variant::Argon2id, 19, 64, 1, 1, 0, 16)),
            ("salt_length", HashParameters::new(Variant::Argon2id, 19, 64, 1, 1, 32, 0)),
        ] {
            let err = result.unwrap_err();
            assert!(matches!(err, HashError::Config(_)));
            assert!(err.to_string().contains(field), "{}", err);
        }
    }

    #[test]
    fn test_unsupported_version_rejected() {
        let err = HashParameters::new(Variant::Argon2id, 20, 64, 1, 1, 32, 16).unwrap_err();
        assert!(matches!(err, HashError::Config(_)));
        assert!(HashParameters::new(Variant::Argon2id, 16, 64, 1, 1, 32, 16).is_ok());
    }

    #[test]
    fn test_negative_config_value_rejected() {
        let config = HasherConfig {
            time_cost: Some(-3),
            ..Default::default()
        };
        let err = config.to_parameters().unwrap_err();
        assert!(matches!(err, HashError::Config(_)));
        assert!(err.to_string().contains("time_cost"));
    }

    #[test]
    fn test_out_of_range_config_value_rejected() {
        let config = HasherConfig {
            memory_cost: Some(i64::from(u32::MAX) + 1),
            ..Default::default()
        };
        assert!(matches!(
            config.to_parameters(),
            Err(HashError::Config(_))
        ));
    }

    #[test]
    fn test_memory_cost_ceiling() {
        let config = HasherConfig {
            memory_cost: Some(i64::from(u32::MAX)),
            ..Default::default()
        };
        let err = config.to_parameters().unwrap_err();
        assert!(matches!(err, HashError::Config(_)));
        assert!(err.to_string().contains("memory_cost"));

        let config = HasherConfig {
            memory_cost: Some(i64::from(MAX_MEMORY_COST)),
            ..Default::default()
        };
        assert_eq!(config.to_parameters().unwrap().memory_cost(), MAX_MEMORY_COST);
    }

    #[test]
    fn test_unknown_variant_rejected() {
        let config = HasherConfig {
            variant: Some("scrypt".to_string()),
            ..Default::default()
        };
        let err = config.to_parameters().unwrap_err();
        assert!(err.to_string().contains("scrypt"));
    }

    #[test]
    fn test_argon2_limits_checked_at_config_time() {
        // Argon2 needs at least 8 KiB per lane.
        let config = HasherConfig {
            memory_cost: Some(8),
            parallelism: Some(4),
            ..Default::default()
        };
        assert!(matches!(
            config.to_parameters(),
            Err(HashError::Config(_))
        ));

        let config = HasherConfig {
            salt_length: Some(4),
            ..Default::default()
        };
        let err = config.to_parameters().unwrap_err();
        assert!(err.to_string().contains("salt_length"));
    }

    #[test]
    fn test_merge_prefers_overrides() {
        let base = HasherConfig {
            memory_cost: Some(1024),
            time_cost: Some(2),
            ..Default::default()
        };
        let overrides = HasherConfig {
            time_cost: Some(3),
            ..Default::default()
        };
        let merged = base.merge(overrides);
        assert_eq!(merged.memory_cost, Some(1024));
        assert_eq!(merged.time_cost, Some(3));
        assert_eq!(merged.parallelism, None);
    }

    #[test]
    fn test_config_parses_from_toml() {
        let config: HasherConfig = toml::from_str(
            "variant = \"argon2i\"\nmemory_cost = 65536\ntime_cost = 3\nparallelism = 2\n",
        )
        .unwrap();
        let params = config.to_parameters().unwrap();
        assert_eq!(params.variant(), Variant::Argon2i);
        assert_eq!(params.memory_cost(), 65536);
        assert_eq!(params.time_cost(), 3);
        assert_eq!(params.parallelism(), 2);
        assert_eq!(params.salt_length(), DEFAULT_SALT_LENGTH);
    }

    #[test]
    fn test_config_round_trips_through_parameters() {
        let params = HashParameters::new(Variant::Argon2d, 16, 4096, 2, 2, 16, 12).unwrap();
        let config = HasherConfig::from(&params);
        assert_eq!(config.to_parameters().unwrap(), params);
    }

    #[test]
    fn test_variant_tags() {
        for variant in [Variant::Argon2id, Variant::Argon2i, Variant::Argon2d] {
            assert_eq!(variant.as_str().parse::<Variant>().unwrap(), variant);
            assert_eq!(variant.to_string(), variant.as_str());
        }
        assert!("Argon2id".parse::<Variant>().is_err());
    }
}
