//! Configuration shapes, configuration values and per-instance state values.

use std::collections::BTreeMap;

/// Declares which kind of value a component is configured with.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum ConfigShape {
    /// The component carries no value.
    None,
    Int,
    Float,
    Bool,
    /// Free-form text.
    String,
    /// Reference to an event script nid.
    Event,
    /// Reference to a skill nid.
    Skill,
    /// Named equation or inline arithmetic expression.
    Equation,
    /// Ordered `(stat, expression)` pairs.
    StatExpressions,
}

impl ConfigShape {
    /// Returns true if `value` is acceptable for this shape.
    pub fn accepts(self, value: &ComponentValue) -> bool {
        match (self, value) {
            (Self::None, ComponentValue::None) => true,
            (Self::Int, ComponentValue::Int(_)) => true,
            (Self::Float, ComponentValue::Float(_) | ComponentValue::Int(_)) => true,
            (Self::Bool, ComponentValue::Bool(_)) => true,
            (Self::String | Self::Event | Self::Skill | Self::Equation, ComponentValue::Text(_)) => {
                true
            }
            (Self::StatExpressions, ComponentValue::Pairs(_)) => true,
            _ => false,
        }
    }
}

/// Configuration value held by a component instance.
#[derive(Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ComponentValue {
    #[default]
    None,
    Int(i64),
    Float(f64),
    Bool(bool),
    Text(String),
    Pairs(Vec<(String, String)>),
}

impl ComponentValue {
    /// Short name of the variant, used in error messages.
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::Bool(_) => "bool",
            Self::Text(_) => "text",
            Self::Pairs(_) => "pairs",
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_pairs(&self) -> Option<&[(String, String)]> {
        match self {
            Self::Pairs(pairs) => Some(pairs),
            _ => None,
        }
    }
}

impl From<i64> for ComponentValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<&str> for ComponentValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

/// Scalar stored in an instance's transient state.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DataValue {
    Int(i64),
    Float(f64),
    Bool(bool),
    Text(String),
}

/// Mutable per-instance state.
///
/// Every instance starts with its own empty map; nothing is shared between
/// instances of the same component. Components are responsible for resetting
/// the keys they write at the lifecycle boundary they document.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InstanceState {
    entries: BTreeMap<String, DataValue>,
}

impl InstanceState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&DataValue> {
        self.entries.get(key)
    }

    pub fn int(&self, key: &str) -> Option<i64> {
        match self.entries.get(key)? {
            DataValue::Int(value) => Some(*value),
            _ => None,
        }
    }

    /// Reads a boolean flag; absent flags read as `false`.
    pub fn flag(&self, key: &str) -> bool {
        matches!(self.entries.get(key), Some(DataValue::Bool(true)))
    }

    pub fn set(&mut self, key: impl Into<String>, value: DataValue) {
        self.entries.insert(key.into(), value);
    }

    pub fn set_int(&mut self, key: impl Into<String>, value: i64) {
        self.set(key, DataValue::Int(value));
    }

    pub fn set_flag(&mut self, key: impl Into<String>, value: bool) {
        self.set(key, DataValue::Bool(value));
    }

    pub fn remove(&mut self, key: &str) -> Option<DataValue> {
        self.entries.remove(key)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &DataValue)> {
        self.entries.iter().map(|(key, value)| (key.as_str(), value))
    }
}
