//! Content factory for loading every catalog from a data directory.

use std::path::{Path, PathBuf};

use combat_core::HookConfig;

use crate::catalog::Catalog;
use crate::loaders::{CatalogLoader, ConfigLoader, LoadResult};

/// Content factory that loads all combat content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── hooks.toml
/// ├── skills.ron
/// └── items.ron
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Load hook tunables from `hooks.toml`, or defaults if the file is absent.
    pub fn load_config(&self) -> LoadResult<HookConfig> {
        let path = self.data_dir.join("hooks.toml");
        if !path.exists() {
            return Ok(HookConfig::default());
        }
        ConfigLoader::load(&path)
    }

    /// Load the skill catalog from `skills.ron`.
    pub fn load_skills(&self) -> LoadResult<Catalog> {
        CatalogLoader::load_skills(&self.data_dir.join("skills.ron"))
    }

    /// Load the item catalog from `items.ron`.
    pub fn load_items(&self) -> LoadResult<Catalog> {
        CatalogLoader::load_items(&self.data_dir.join("items.ron"))
    }
}
