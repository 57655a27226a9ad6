//! Component instances attached to skills and items.

use std::fmt;
use std::sync::Arc;

use super::{ComponentBehavior, ComponentDefinition, ComponentId, ComponentValue, InstanceState};
use crate::entity::{ComponentRef, EntityRef};
use crate::error::ConfigError;

/// One component attached to exactly one parent entity.
///
/// The instance owns its configuration value and its transient state. The
/// behavior is shared with every other instance of the same component, but it
/// is stateless; anything that changes during play lives in [`InstanceState`].
#[derive(Clone)]
pub struct ComponentInstance {
    definition: Arc<ComponentDefinition>,
    behavior: Arc<dyn ComponentBehavior>,
    value: ComponentValue,
    state: InstanceState,
    owner: EntityRef,
}

impl ComponentInstance {
    /// Builds an instance after validating `value` against the definition's shape.
    ///
    /// `None` selects the definition's default value.
    pub fn new(
        definition: Arc<ComponentDefinition>,
        behavior: Arc<dyn ComponentBehavior>,
        value: Option<ComponentValue>,
        owner: EntityRef,
    ) -> Result<Self, ConfigError> {
        let value = value.unwrap_or_else(|| definition.default_value().clone());
        check_shape(&definition, &value)?;

        let mut instance = Self {
            definition,
            behavior,
            value,
            state: InstanceState::new(),
            owner,
        };
        let behavior = Arc::clone(&instance.behavior);
        behavior.init(&mut instance);
        Ok(instance)
    }

    pub fn id(&self) -> &ComponentId {
        self.definition.id()
    }

    pub fn definition(&self) -> &ComponentDefinition {
        &self.definition
    }

    pub fn behavior(&self) -> &Arc<dyn ComponentBehavior> {
        &self.behavior
    }

    pub fn value(&self) -> &ComponentValue {
        &self.value
    }

    /// Replaces the configuration value, keeping the old one if the new value
    /// does not fit the declared shape.
    pub fn set_value(&mut self, value: ComponentValue) -> Result<(), ConfigError> {
        check_shape(&self.definition, &value)?;
        self.value = value;
        Ok(())
    }

    pub fn state(&self) -> &InstanceState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut InstanceState {
        &mut self.state
    }

    /// The entity this instance is attached to.
    pub fn owner(&self) -> &EntityRef {
        &self.owner
    }

    /// Address of this instance, usable in pending actions.
    pub fn reference(&self) -> ComponentRef {
        ComponentRef::new(self.owner.clone(), self.id().clone())
    }

    pub(crate) fn snapshot(&self) -> (ComponentValue, InstanceState) {
        (self.value.clone(), self.state.clone())
    }

    pub(crate) fn restore(&mut self, (value, state): (ComponentValue, InstanceState)) {
        self.value = value;
        self.state = state;
    }
}

impl fmt::Debug for ComponentInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentInstance")
            .field("id", self.id())
            .field("value", &self.value)
            .field("state", &self.state)
            .field("owner", &self.owner)
            .finish()
    }
}

fn check_shape(definition: &ComponentDefinition, value: &ComponentValue) -> Result<(), ConfigError> {
    if definition.shape().accepts(value) {
        Ok(())
    } else {
        Err(ConfigError::ShapeMismatch {
            component: definition.id().clone(),
            expected: definition.shape(),
            found: value.kind_name(),
        })
    }
}
