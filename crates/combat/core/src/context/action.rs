//! Deferred state mutations queued by hooks.

use crate::component::{ComponentValue, DataValue};
use crate::entity::ComponentRef;
use crate::types::UnitId;

/// A mutation a hook wants applied to host state.
///
/// Hooks never touch units, skills or items directly; they queue intent here.
/// The pipeline applies the queue atomically after each phase.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PendingAction {
    /// Add `delta` (negative for damage) to the unit's HP, clamped to `0..=max`.
    ChangeHp { unit: UnitId, delta: i64 },

    /// Set the unit's HP outright, clamped to `0..=max`.
    SetHp { unit: UnitId, hp: u32 },

    /// Grant skill `skill` to `unit`, optionally crediting `source`.
    AddSkill {
        unit: UnitId,
        skill: String,
        source: Option<UnitId>,
    },

    RemoveSkill { unit: UnitId, skill: String },

    /// Write a key of one component instance's state.
    SetObjData {
        target: ComponentRef,
        key: String,
        value: DataValue,
    },

    /// Replace one component instance's configuration value.
    ModifyComponentValue {
        target: ComponentRef,
        value: ComponentValue,
    },

    /// Mark skill `skill` of `unit` as used; fires its `on_trigger_charge` hooks.
    TriggerCharge { unit: UnitId, skill: String },

    /// The unit dropped to 0 HP.
    Die { unit: UnitId, killer: Option<UnitId> },
}

impl PendingAction {
    /// The unit whose state this action changes.
    pub fn subject(&self) -> UnitId {
        match self {
            Self::ChangeHp { unit, .. }
            | Self::SetHp { unit, .. }
            | Self::AddSkill { unit, .. }
            | Self::RemoveSkill { unit, .. }
            | Self::TriggerCharge { unit, .. }
            | Self::Die { unit, .. } => *unit,
            Self::SetObjData { target, .. } | Self::ModifyComponentValue { target, .. } => {
                target.entity.unit
            }
        }
    }
}
