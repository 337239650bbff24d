// /////////////////////////////////////////////////////////////////////////////
// sealvault
// SPDX-License-Identifier: BSD-3-Clause
// /////////////////////////////////////////////////////////////////////////////

//! Application settings (§1 `[AMBIENT]`): default transform rounds,
//! default compression, lock-file behavior, and history retention,
//! loadable from an optional TOML file with `SEALVAULT__`-prefixed
//! environment overrides, analogous to the teacher's
//! `infrastructure/config.rs` settings layer.

use std::path::Path;

use config::{Config, Environment, File};
use serde::Deserialize;

use sealvault_domain::VaultError;

#[derive(Debug, Clone, Deserialize)]
pub struct VaultSettings {
    pub key_derivation: KeyDerivationSettings,
    pub compression: CompressionSettings,
    pub history: HistorySettings,
    pub lock_file: LockFileSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct KeyDerivationSettings {
    pub default_rounds: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CompressionSettings {
    pub default_gzip: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HistorySettings {
    pub max_items: u32,
    pub max_size_bytes: u64,
    pub maintenance_days: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LockFileSettings {
    pub enabled: bool,
}

impl Default for VaultSettings {
    fn default() -> Self {
        Self {
            key_derivation: KeyDerivationSettings { default_rounds: 60_000 },
            compression: CompressionSettings { default_gzip: true },
            history: HistorySettings {
                max_items: 10,
                max_size_bytes: 6 * 1024 * 1024,
                maintenance_days: 365,
            },
            lock_file: LockFileSettings { enabled: true },
        }
    }
}

impl VaultSettings {
    /// Loads settings, layering (lowest to highest precedence): built-in
    /// defaults, `config_path` if given, then `SEALVAULT__SECTION__FIELD`
    /// environment variables.
    pub fn load(config_path: Option<&Path>) -> Result<Self, VaultError> {
        let defaults = Self::default();
        let mut builder = Config::builder()
            .set_default("key_derivation.default_rounds", defaults.key_derivation.default_rounds)
            .map_err(config_err)?
            .set_default("compression.default_gzip", defaults.compression.default_gzip)
            .map_err(config_err)?
            .set_default("history.max_items", defaults.history.max_items)
            .map_err(config_err)?
            .set_default("history.max_size_bytes", defaults.history.max_size_bytes)
            .map_err(config_err)?
            .set_default("history.maintenance_days", defaults.history.maintenance_days)
            .map_err(config_err)?
            .set_default("lock_file.enabled", defaults.lock_file.enabled)
            .map_err(config_err)?;

        if let Some(path) = config_path {
            builder = builder.add_source(File::from(path.to_path_buf()).required(false));
        }
        builder = builder.add_source(Environment::with_prefix("SEALVAULT").separator("__"));

        builder.build().map_err(config_err)?.try_deserialize().map_err(config_err)
    }
}

fn config_err(err: config::ConfigError) -> VaultError {
    VaultError::malformed_body(format!("settings load failed: {err}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loading_with_no_file_or_env_yields_built_in_defaults() {
        let settings = VaultSettings::load(None).unwrap();
        assert_eq!(settings.key_derivation.default_rounds, 60_000);
        assert!(settings.compression.default_gzip);
        assert_eq!(settings.history.max_items, 10);
        assert!(settings.lock_file.enabled);
    }

    #[test]
    fn missing_config_file_falls_back_to_defaults_rather_than_erroring() {
        let settings = VaultSettings::load(Some(Path::new("/nonexistent/sealvault.toml"))).unwrap();
        assert_eq!(settings.key_derivation.default_rounds, 60_000);
    }
}
