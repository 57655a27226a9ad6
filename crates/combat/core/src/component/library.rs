//! Registration surface: component id → (definition, behavior).

use std::collections::BTreeMap;
use std::sync::Arc;

use super::{ComponentBehavior, ComponentDefinition, ComponentId, ComponentInstance, ComponentValue};
use crate::entity::EntityRef;
use crate::error::{ConfigError, RegistrationError};

/// Registered component: its definition and the behavior implementing it.
#[derive(Clone)]
pub struct LibraryEntry {
    pub definition: Arc<ComponentDefinition>,
    pub behavior: Arc<dyn ComponentBehavior>,
}

/// In-memory table of every component a host can attach.
///
/// Loading is pure data registration. Ids are unique within one library;
/// hosts typically keep one library for skills and one for items.
#[derive(Clone, Default)]
pub struct ComponentLibrary {
    entries: BTreeMap<ComponentId, LibraryEntry>,
}

impl ComponentLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a component.
    ///
    /// # Errors
    ///
    /// Rejects duplicate ids and definitions whose default value does not fit
    /// their own shape.
    pub fn register(
        &mut self,
        definition: ComponentDefinition,
        behavior: impl ComponentBehavior + 'static,
    ) -> Result<(), RegistrationError> {
        if self.entries.contains_key(definition.id()) {
            return Err(RegistrationError::DuplicateId(definition.id().clone()));
        }
        if !definition.shape().accepts(definition.default_value()) {
            return Err(RegistrationError::DefaultShapeMismatch {
                component: definition.id().clone(),
                shape: definition.shape(),
            });
        }

        tracing::trace!(component = %definition.id(), tag = %definition.tag(), "registered component");
        self.entries.insert(
            definition.id().clone(),
            LibraryEntry {
                definition: Arc::new(definition),
                behavior: Arc::new(behavior),
            },
        );
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<&LibraryEntry> {
        self.entries.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    /// Creates a fresh instance of component `id` owned by `owner`.
    ///
    /// # Errors
    ///
    /// `UnknownComponent` if `id` is not registered, `ShapeMismatch` if `value`
    /// does not fit the declared shape.
    pub fn instantiate(
        &self,
        id: &str,
        value: Option<ComponentValue>,
        owner: EntityRef,
    ) -> Result<ComponentInstance, ConfigError> {
        let entry = self
            .entries
            .get(id)
            .ok_or_else(|| ConfigError::UnknownComponent(ComponentId::new(id)))?;
        ComponentInstance::new(
            Arc::clone(&entry.definition),
            Arc::clone(&entry.behavior),
            value,
            owner,
        )
    }

    pub fn definitions(&self) -> impl Iterator<Item = &ComponentDefinition> {
        self.entries.values().map(|entry| entry.definition.as_ref())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::{ComponentTag, ConfigShape};
    use crate::entity::EntityKind;
    use crate::types::UnitId;

    struct Inert;
    impl ComponentBehavior for Inert {}

    fn owner() -> EntityRef {
        EntityRef::new(UnitId(1), EntityKind::Skill, "Vantage")
    }

    #[test]
    fn rejects_duplicate_ids() {
        let mut library = ComponentLibrary::new();
        library
            .register(ComponentDefinition::new("do_nothing", ComponentTag::Custom), Inert)
            .unwrap();
        let result =
            library.register(ComponentDefinition::new("do_nothing", ComponentTag::Base), Inert);
        assert!(matches!(result, Err(RegistrationError::DuplicateId(_))));
        assert_eq!(library.len(), 1);
    }

    #[test]
    fn rejects_default_outside_shape() {
        let mut library = ComponentLibrary::new();
        let definition = ComponentDefinition::new("broken", ComponentTag::Custom)
            .with_value(ConfigShape::Int, ComponentValue::from("ten"));
        let result = library.register(definition, Inert);
        assert!(matches!(
            result,
            Err(RegistrationError::DefaultShapeMismatch { .. })
        ));
    }

    #[test]
    fn instantiate_validates_value_shape() {
        let mut library = ComponentLibrary::new();
        let definition = ComponentDefinition::new("charge", ComponentTag::Charge)
            .with_value(ConfigShape::Int, ComponentValue::Int(10));
        library.register(definition, Inert).unwrap();

        let instance = library.instantiate("charge", None, owner()).unwrap();
        assert_eq!(instance.value(), &ComponentValue::Int(10));

        let error = library
            .instantiate("charge", Some(ComponentValue::from("x")), owner())
            .unwrap_err();
        assert!(matches!(error, ConfigError::ShapeMismatch { found: "text", .. }));

        let error = library.instantiate("missing", None, owner()).unwrap_err();
        assert_eq!(error, ConfigError::UnknownComponent(ComponentId::new("missing")));
    }
}
