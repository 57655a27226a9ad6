//! Skill and item catalog loader.

use std::path::Path;

use combat_core::EntityKind;
use serde::{Deserialize, Serialize};

use crate::catalog::{Catalog, EntitySpec};
use crate::loaders::{LoadResult, read_file};

/// Skill catalog structure for RON files.
///
/// ```ron
/// (
///     skills: [
///         (nid: "Sol", components: [(id: "build_charge_start_charged", value: Some(Int(3)))]),
///         (nid: "Poison", negative: true),
///     ],
/// )
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillCatalog {
    pub skills: Vec<EntitySpec>,
}

/// Item catalog structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemCatalog {
    pub items: Vec<EntitySpec>,
}

/// Loader for skill and item catalogs.
pub struct CatalogLoader;

impl CatalogLoader {
    /// Load a skill catalog from a RON file.
    pub fn load_skills(path: &Path) -> LoadResult<Catalog> {
        let content = read_file(path)?;
        let catalog: SkillCatalog = ron::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse skill catalog RON: {}", e))?;

        Ok(Catalog::new(EntityKind::Skill, catalog.skills))
    }

    /// Load an item catalog from a RON file.
    pub fn load_items(path: &Path) -> LoadResult<Catalog> {
        let content = read_file(path)?;
        let catalog: ItemCatalog = ron::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse item catalog RON: {}", e))?;

        Ok(Catalog::new(EntityKind::Item, catalog.items))
    }
}
