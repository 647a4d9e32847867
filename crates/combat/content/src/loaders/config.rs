//! Combat configuration loader.

use std::path::Path;

use combat_core::CombatConfig;

use crate::loaders::{LoadResult, invalid, read_file};

/// Loader for combat configuration from TOML files.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load config data from a TOML file.
    ///
    /// Missing keys fall back to [`CombatConfig::default`]. The result is
    /// validated before it is returned.
    pub fn load(path: &Path) -> LoadResult<CombatConfig> {
        let content = read_file(path)?;
        let config = Self::parse(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config TOML {}: {}", path.display(), e))?;
        config.validate().map_err(|e| invalid(path, e))?;

        tracing::debug!(path = %path.display(), "combat config loaded");
        Ok(config)
    }

    /// Parses TOML text without validating it.
    pub fn parse(content: &str) -> Result<CombatConfig, toml::de::Error> {
        toml::from_str(content)
    }
}
