//! Component library and content loaders for `combat-core`.
//!
//! - [`skills`]: skill components (immunities, event triggers, charges, recoil, ...)
//! - [`items`]: item components (formula overrides, area effects)
//! - [`catalog`]: skill/item templates instantiated per unit
//! - `loaders`: RON catalogs and TOML tunables (feature `loaders`)
//!
//! Components only ever queue intent through the hook context; nothing here
//! touches host state.

pub mod catalog;
pub mod items;
pub mod skills;

#[cfg(feature = "loaders")]
pub mod loaders;

#[cfg(test)]
pub(crate) mod testkit;

pub use catalog::{Catalog, CatalogError, ComponentSpec, EntitySpec};
pub use items::{item_library, register_item_components};
pub use skills::{register_skill_components, skill_library};

#[cfg(feature = "loaders")]
pub use loaders::{CatalogLoader, ConfigLoader, ContentFactory, ItemCatalog, LoadResult, SkillCatalog};
