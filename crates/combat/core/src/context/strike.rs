//! Per-strike metadata.

use crate::types::UnitId;

/// Outcome of one strike attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum Strike {
    Hit,
    Crit,
    Miss,
}

impl Strike {
    /// Hits and crits connect; misses do not.
    pub const fn connected(self) -> bool {
        matches!(self, Strike::Hit | Strike::Crit)
    }
}

/// The strike currently being resolved.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StrikeInfo {
    pub attacker: UnitId,
    pub defender: UnitId,
    pub outcome: Strike,
    /// Damage the strike deals if it connects.
    pub damage: u32,
}

/// Role of the unit whose hook is running.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum CombatMode {
    Attack,
    Defense,
    /// Not in combat: upkeep, skill gain, chapter end.
    Neutral,
}
