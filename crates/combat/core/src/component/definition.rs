//! Static component descriptions.

use std::borrow::Borrow;
use std::fmt;

use super::{ComponentTag, ComponentValue, ConfigShape};

/// Unique string id of a component within one library.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct ComponentId(String);

impl ComponentId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for ComponentId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ComponentId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Immutable description of a component: what it is called, how it is
/// filed, and what value it is configured with.
#[derive(Clone, Debug, PartialEq)]
pub struct ComponentDefinition {
    id: ComponentId,
    tag: ComponentTag,
    shape: ConfigShape,
    default: ComponentValue,
    description: &'static str,
}

impl ComponentDefinition {
    /// Creates a definition for a component that carries no value.
    pub fn new(id: impl Into<String>, tag: ComponentTag) -> Self {
        Self {
            id: ComponentId::new(id),
            tag,
            shape: ConfigShape::None,
            default: ComponentValue::None,
            description: "",
        }
    }

    /// Builder: declare the configuration shape and its default value.
    pub fn with_value(mut self, shape: ConfigShape, default: ComponentValue) -> Self {
        self.shape = shape;
        self.default = default;
        self
    }

    /// Builder: attach a one-line description.
    pub fn describe(mut self, description: &'static str) -> Self {
        self.description = description;
        self
    }

    pub fn id(&self) -> &ComponentId {
        &self.id
    }

    pub fn tag(&self) -> ComponentTag {
        self.tag
    }

    pub fn shape(&self) -> ConfigShape {
        self.shape
    }

    pub fn default_value(&self) -> &ComponentValue {
        &self.default
    }

    pub fn description(&self) -> &'static str {
        self.description
    }
}
