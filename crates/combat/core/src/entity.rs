//! Skills and items: ordered component lists with a hook registry.

use std::fmt;

use crate::component::{Capability, ComponentInstance, ComponentLibrary, ComponentValue};
use crate::error::ConfigError;
use crate::hook::HookRegistry;
use crate::types::{ItemUid, UnitId};

/// Whether an entity is a skill or an item.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, strum::Display, strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum EntityKind {
    Skill,
    Item,
}

/// Non-owning address of an entity: the unit holding it, its kind and nid.
///
/// Items also carry the uid of the item object, so two copies of the same
/// item template on one unit stay distinguishable.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EntityRef {
    pub unit: UnitId,
    pub kind: EntityKind,
    pub nid: String,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub item: Option<ItemUid>,
}

impl EntityRef {
    pub fn new(unit: UnitId, kind: EntityKind, nid: impl Into<String>) -> Self {
        Self {
            unit,
            kind,
            nid: nid.into(),
            item: None,
        }
    }

    /// Builder: the item object this reference points at.
    pub fn with_item(mut self, uid: ItemUid) -> Self {
        self.item = Some(uid);
        self
    }
}

impl fmt::Display for EntityRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind, self.nid)?;
        if let Some(uid) = self.item {
            write!(f, "[{}]", uid.0)?;
        }
        write!(f, "@{}", self.unit)
    }
}

/// Address of one component instance on one entity.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ComponentRef {
    pub entity: EntityRef,
    pub component: crate::component::ComponentId,
}

impl ComponentRef {
    pub fn new(entity: EntityRef, component: crate::component::ComponentId) -> Self {
        Self { entity, component }
    }
}

impl fmt::Display for ComponentRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.entity, self.component)
    }
}

/// A skill or item together with its components.
///
/// Attachment order is significant: it is the firing order of same-phase
/// hooks. The hook registry is rebuilt from scratch after every change to the
/// component list.
#[derive(Clone, Debug)]
pub struct Entity {
    reference: EntityRef,
    negative: bool,
    components: Vec<ComponentInstance>,
    registry: HookRegistry,
}

impl Entity {
    pub fn new(reference: EntityRef) -> Self {
        Self {
            reference,
            negative: false,
            components: Vec::new(),
            registry: HookRegistry::default(),
        }
    }

    /// Builder: mark the entity as a negative status (debuff).
    pub fn negative(mut self, negative: bool) -> Self {
        self.negative = negative;
        self
    }

    pub fn reference(&self) -> &EntityRef {
        &self.reference
    }

    pub fn nid(&self) -> &str {
        &self.reference.nid
    }

    /// The unit holding this entity.
    pub fn holder(&self) -> UnitId {
        self.reference.unit
    }

    pub fn is_negative(&self) -> bool {
        self.negative
    }

    /// Attaches a new instance of component `id` at the end of the list.
    ///
    /// # Errors
    ///
    /// The entity is left unchanged when the component is unknown, already
    /// attached, or `value` does not fit its shape.
    pub fn attach(
        &mut self,
        library: &ComponentLibrary,
        id: &str,
        value: Option<ComponentValue>,
    ) -> Result<(), ConfigError> {
        if self.component(id).is_some() {
            return Err(ConfigError::AlreadyAttached {
                component: id.into(),
                entity: self.reference.to_string(),
            });
        }
        let instance = library.instantiate(id, value, self.reference.clone())?;
        self.components.push(instance);
        self.rebuild();
        Ok(())
    }

    /// Removes component `id`, returning the detached instance.
    pub fn detach(&mut self, id: &str) -> Option<ComponentInstance> {
        let index = self
            .components
            .iter()
            .position(|c| c.id().as_str() == id)?;
        let removed = self.components.remove(index);
        self.rebuild();
        Some(removed)
    }

    pub fn components(&self) -> &[ComponentInstance] {
        &self.components
    }

    pub fn component(&self, id: &str) -> Option<&ComponentInstance> {
        self.components.iter().find(|c| c.id().as_str() == id)
    }

    /// Mutable access to one instance's value and state. The component list
    /// itself cannot change through this, so the registry stays valid.
    pub fn component_mut(&mut self, id: &str) -> Option<&mut ComponentInstance> {
        self.components.iter_mut().find(|c| c.id().as_str() == id)
    }

    /// First instance, in attachment order, advertising `capability`.
    pub fn find_capability(&self, capability: Capability) -> Option<&ComponentInstance> {
        self.components
            .iter()
            .find(|c| c.behavior().capabilities().contains(&capability))
    }

    pub fn registry(&self) -> &HookRegistry {
        &self.registry
    }

    /// Split borrow used by the dispatcher: the registry read-only, the
    /// instances mutably.
    pub(crate) fn parts_mut(
        &mut self,
    ) -> (&EntityRef, &HookRegistry, &mut [ComponentInstance]) {
        (&self.reference, &self.registry, &mut self.components)
    }

    fn rebuild(&mut self) {
        self.registry = HookRegistry::build(&self.components);
    }
}
