//! Hook configuration loader.

use std::path::Path;

use combat_core::HookConfig;

use crate::loaders::{LoadResult, read_file};

/// Loader for hook configuration from TOML files.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load config data from a TOML file. Missing keys take their defaults.
    pub fn load(path: &Path) -> LoadResult<HookConfig> {
        let content = read_file(path)?;
        let config: HookConfig = toml::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config TOML: {}", e))?;

        Ok(config)
    }
}
