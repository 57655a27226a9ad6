//! Skill and item templates, instantiated per unit.

use std::collections::BTreeMap;

use combat_core::{
    ComponentLibrary, ComponentValue, ConfigError, Entity, EntityKind, EntityRef, ErrorSeverity,
    HookConfig, HookError, ItemUid, UnitId,
};

/// One component of a catalog entry.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ComponentSpec {
    pub id: String,
    /// `None` selects the component's default value.
    #[cfg_attr(feature = "serde", serde(default))]
    pub value: Option<ComponentValue>,
}

/// A skill or item template: its nid and ordered components.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EntitySpec {
    pub nid: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub negative: bool,
    #[cfg_attr(feature = "serde", serde(default))]
    pub components: Vec<ComponentSpec>,
}

#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum CatalogError {
    #[error("no {kind} named '{nid}' in the catalog")]
    UnknownEntry { kind: EntityKind, nid: String },

    #[error("{kind} '{nid}': {source}")]
    Component {
        kind: EntityKind,
        nid: String,
        #[source]
        source: ConfigError,
    },
}

impl HookError for CatalogError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownEntry { .. } => "CATALOG_UNKNOWN_ENTRY",
            Self::Component { .. } => "CATALOG_COMPONENT",
        }
    }
}

/// Templates of one entity kind, keyed by nid.
#[derive(Clone, Debug)]
pub struct Catalog {
    kind: EntityKind,
    specs: BTreeMap<String, EntitySpec>,
}

impl Catalog {
    pub fn new(kind: EntityKind, specs: impl IntoIterator<Item = EntitySpec>) -> Self {
        Self {
            kind,
            specs: specs
                .into_iter()
                .map(|spec| (spec.nid.clone(), spec))
                .collect(),
        }
    }

    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    pub fn get(&self, nid: &str) -> Option<&EntitySpec> {
        self.specs.get(nid)
    }

    pub fn contains(&self, nid: &str) -> bool {
        self.specs.contains_key(nid)
    }

    pub fn nids(&self) -> impl Iterator<Item = &str> {
        self.specs.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    /// Builds a fresh entity from template `nid` for `unit`.
    ///
    /// Components are attached in template order. With `strict_attach` off,
    /// components unknown to `library` are skipped with a warning; any other
    /// attach failure rejects the whole entity.
    pub fn instantiate(
        &self,
        library: &ComponentLibrary,
        config: &HookConfig,
        nid: &str,
        unit: UnitId,
    ) -> Result<Entity, CatalogError> {
        self.build(library, config, EntityRef::new(unit, self.kind, nid))
    }

    /// Like [`instantiate`](Self::instantiate), for item object `uid`.
    pub fn instantiate_item(
        &self,
        library: &ComponentLibrary,
        config: &HookConfig,
        nid: &str,
        unit: UnitId,
        uid: ItemUid,
    ) -> Result<Entity, CatalogError> {
        self.build(
            library,
            config,
            EntityRef::new(unit, self.kind, nid).with_item(uid),
        )
    }

    fn build(
        &self,
        library: &ComponentLibrary,
        config: &HookConfig,
        reference: EntityRef,
    ) -> Result<Entity, CatalogError> {
        let spec = self
            .get(&reference.nid)
            .ok_or_else(|| CatalogError::UnknownEntry {
                kind: self.kind,
                nid: reference.nid.clone(),
            })?;

        let mut entity = Entity::new(reference).negative(spec.negative);
        for component in &spec.components {
            if !config.strict_attach && !library.contains(&component.id) {
                tracing::warn!(entry = %spec.nid, component = %component.id, "skipping unknown component");
                continue;
            }
            entity
                .attach(library, &component.id, component.value.clone())
                .map_err(|source| CatalogError::Component {
                    kind: self.kind,
                    nid: spec.nid.clone(),
                    source,
                })?;
        }
        tracing::trace!(entity = %entity.reference(), components = entity.components().len(), "instantiated");
        Ok(entity)
    }
}
