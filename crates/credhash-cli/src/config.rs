use std::path::{Path, PathBuf};

use credhash_core::{HashParameters, HasherConfig};
use serde::{Deserialize, Serialize};

use crate::errors::CliError;

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CredhashConfig {
    #[serde(default)]
    pub hasher: HasherConfig,
}

impl CredhashConfig {
    pub fn with_defaults() -> Self {
        Self {
            hasher: HasherConfig::from(&HashParameters::default()),
        }
    }
}

/// Where the effective configuration came from.
#[derive(Debug)]
pub enum ConfigSource {
    File(PathBuf),
    Defaults,
}

pub fn default_config_path() -> anyhow::Result<PathBuf> {
    Ok(xdg_config_dir()?.join("config.toml"))
}

pub fn read_config(path: &Path) -> anyhow::Result<CredhashConfig> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read config {}: {}", path.display(), e))?;
    toml::from_str(&contents)
        .map_err(|e| anyhow::anyhow!("Failed to parse config {}: {}", path.display(), e))
}

pub fn write_config(path: &Path, config: &CredhashConfig) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            anyhow::anyhow!(
                "Failed to create config directory {}: {}",
                parent.display(),
                e
            )
        })?;
    }
    let contents =
        toml::to_string_pretty(config).map_err(|e| anyhow::anyhow!("TOML error: {}", e))?;
    std::fs::write(path, contents)
        .map_err(|e| anyhow::anyhow!("Failed to write config {}: {}", path.display(), e))?;
    Ok(())
}

/// Read the config file, if any.
///
/// An explicit path must exist. The default path is optional and falls back
/// to built-in defaults when absent.
pub fn load_config(explicit: Option<&Path>) -> anyhow::Result<(CredhashConfig, ConfigSource)> {
    if let Some(path) = explicit {
        return Ok((read_config(path)?, ConfigSource::File(path.to_path_buf())));
    }
    let path = default_config_path()?;
    if path.exists() {
        return Ok((read_config(&path)?, ConfigSource::File(path)));
    }
    Ok((CredhashConfig::default(), ConfigSource::Defaults))
}

/// Apply overrides and validate. Invalid values are fatal to startup.
pub fn resolve_parameters(
    config: CredhashConfig,
    overrides: HasherConfig,
) -> Result<HashParameters, CliError> {
    config
        .hasher
        .merge(overrides)
        .to_parameters()
        .map_err(|e| CliError::invalid_input(e.to_string()))
}

pub fn xdg_config_dir() -> anyhow::Result<PathBuf> {
    if let Ok(value) = std::env::var("XDG_CONFIG_HOME") {
        if !value.trim().is_empty() {
            return Ok(PathBuf::from(value).join("credhash"));
        }
    }
    Ok(home_dir()?.join(".config").join("credhash"))
}

fn home_dir() -> anyhow::Result<PathBuf> {
    let home = std::env::var("HOME")
        .map_err(|_| anyhow::anyhow!("HOME is not set; cannot resolve default paths"))?;
    Ok(PathBuf::from(home))
}

#[cfg(test)]
mod tests {
    use super::*;
    use credhash_core::Variant;

    #[test]
    fn test_config_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        write_config(&path, &CredhashConfig::with_defaults()).unwrap();
        let loaded = read_config(&path).unwrap();

        let params = resolve_parameters(loaded, HasherConfig::default()).unwrap();
        assert_eq!(params, HashParameters::default());
    }

    #[test]
    fn test_missing_hasher_section_uses_defaults() {
        let config: CredhashConfig = toml::from_str("").unwrap();
        let params = resolve_parameters(config, HasherConfig::default()).unwrap();
        assert_eq!(params, HashParameters::default());
    }

    #[test]
    fn test_overrides_win_over_file() {
        let config: CredhashConfig =
            toml::from_str("[hasher]\nmemory_cost = 2048\ntime_cost = 2\n").unwrap();
        let overrides = HasherConfig {
            time_cost: Some(5),
            variant: Some("argon2d".to_string()),
            ..Default::default()
        };
        let params = resolve_parameters(config, overrides).unwrap();
        assert_eq!(params.memory_cost(), 2048);
        assert_eq!(params.time_cost(), 5);
        assert_eq!(params.variant(), Variant::Argon2d);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let config: CredhashConfig = toml::from_str("[hasher]\nparallelism = -1\n").unwrap();
        let err = resolve_parameters(config, HasherConfig::default()).unwrap_err();
        assert!(err.to_string().contains("parallelism"));
    }

    #[test]
    fn test_unknown_keys_rejected() {
        let result: Result<CredhashConfig, _> = toml::from_str("[hasher]\nthreads = 4\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_explicit_missing_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent.toml");
        assert!(load_config(Some(&missing)).is_err());
    }
}
