//! Unit and item queries.

use crate::types::{ItemUid, Position, UnitId};

/// Side a unit fights for.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString, strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Team {
    Player,
    /// Allied NPCs fighting alongside the player.
    Other,
    Enemy,
    /// A second hostile faction, hostile to everyone else.
    Enemy2,
}

impl Team {
    pub fn is_allied_with(self, other: Team) -> bool {
        match (self, other) {
            (a, b) if a == b => true,
            (Team::Player, Team::Other) | (Team::Other, Team::Player) => true,
            _ => false,
        }
    }
}

/// Read-only view of unit state as committed by the host.
pub trait UnitOracle: Send + Sync {
    fn exists(&self, unit: UnitId) -> bool;

    fn hp(&self, unit: UnitId) -> Option<u32>;

    fn max_hp(&self, unit: UnitId) -> Option<u32>;

    fn position(&self, unit: UnitId) -> Option<Position>;

    fn team(&self, unit: UnitId) -> Option<Team>;

    /// Current value of a named stat (`STR`, `MND`, ...).
    fn stat(&self, unit: UnitId, stat: &str) -> Option<i64>;

    /// Every stat of the unit, used to build expression bindings.
    fn stats(&self, unit: UnitId) -> Vec<(String, i64)>;

    fn check_ally(&self, a: UnitId, b: UnitId) -> bool {
        match (self.team(a), self.team(b)) {
            (Some(a), Some(b)) => a.is_allied_with(b),
            _ => false,
        }
    }

    fn check_enemy(&self, a: UnitId, b: UnitId) -> bool {
        match (self.team(a), self.team(b)) {
            (Some(a), Some(b)) => !a.is_allied_with(b),
            _ => false,
        }
    }
}

/// Static facts about one item object.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemInfo {
    pub uid: ItemUid,
    pub nid: String,
    pub tags: Vec<String>,
    pub equippable: bool,
    pub accessory: bool,
}

impl ItemInfo {
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}

/// Read-only view of item objects.
pub trait ItemOracle: Send + Sync {
    fn item(&self, uid: ItemUid) -> Option<ItemInfo>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn player_and_other_are_allied() {
        assert!(Team::Player.is_allied_with(Team::Other));
        assert!(Team::Enemy.is_allied_with(Team::Enemy));
        assert!(!Team::Enemy.is_allied_with(Team::Enemy2));
        assert!(!Team::Player.is_allied_with(Team::Enemy));
    }
}
