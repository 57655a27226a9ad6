//! Event-script triggers.

use std::collections::BTreeMap;

use crate::types::{Position, UnitId};

/// Request to run an event script in the host's scripting system.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EventTrigger {
    pub event: String,
    pub actor: UnitId,
    pub target: Option<UnitId>,
    pub position: Option<Position>,
    pub params: BTreeMap<String, String>,
}

/// Fire-and-forget entry point into the host's event system.
///
/// The framework never waits for or reads back a result.
pub trait EventSink {
    fn trigger(&self, trigger: &EventTrigger);
}
