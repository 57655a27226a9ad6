//! In-memory world state implementing the combat-core oracles.
//!
//! The world only holds committed state. Hooks read it through the oracle
//! traits; the pipeline's commit step is the only writer.

use std::collections::BTreeMap;

use combat_core::{
    BoardDimensions, BoardOracle, ItemInfo, ItemOracle, ItemUid, Position, Team, UnitId,
    UnitOracle,
};
use serde::{Deserialize, Serialize};

/// Committed state of one unit.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UnitRecord {
    pub id: UnitId,
    pub name: String,
    pub team: Team,
    pub hp: u32,
    pub max_hp: u32,
    pub position: Position,
    #[serde(default)]
    pub stats: BTreeMap<String, i64>,
    /// Cleared when a `Die` is committed; dead units leave the board.
    #[serde(default = "alive")]
    pub alive: bool,
}

fn alive() -> bool {
    true
}

impl UnitRecord {
    pub fn new(id: UnitId, name: impl Into<String>, team: Team, hp: u32, position: Position) -> Self {
        Self {
            id,
            name: name.into(),
            team,
            hp,
            max_hp: hp,
            position,
            stats: BTreeMap::new(),
            alive: true,
        }
    }

    pub fn with_max_hp(mut self, max_hp: u32) -> Self {
        self.max_hp = max_hp.max(self.hp);
        self
    }

    pub fn with_stat(mut self, stat: impl Into<String>, value: i64) -> Self {
        self.stats.insert(stat.into(), value);
        self
    }

    /// Applies `delta` to HP, clamped to `0..=max_hp`. Returns the new HP.
    pub fn change_hp(&mut self, delta: i64) -> u32 {
        let next = (i64::from(self.hp) + delta).clamp(0, i64::from(self.max_hp));
        self.hp = u32::try_from(next).unwrap_or(0);
        self.hp
    }

    pub fn set_hp(&mut self, hp: u32) -> u32 {
        self.hp = hp.min(self.max_hp);
        self.hp
    }
}

/// Board, units and items of one scenario.
#[derive(Clone, Debug)]
pub struct World {
    dimensions: BoardDimensions,
    units: BTreeMap<UnitId, UnitRecord>,
    items: BTreeMap<ItemUid, ItemInfo>,
}

impl World {
    pub fn new(dimensions: BoardDimensions) -> Self {
        Self {
            dimensions,
            units: BTreeMap::new(),
            items: BTreeMap::new(),
        }
    }

    pub fn add_unit(&mut self, unit: UnitRecord) {
        self.units.insert(unit.id, unit);
    }

    pub fn add_item(&mut self, item: ItemInfo) {
        self.items.insert(item.uid, item);
    }

    pub fn unit(&self, id: UnitId) -> Option<&UnitRecord> {
        self.units.get(&id)
    }

    pub fn unit_mut(&mut self, id: UnitId) -> Option<&mut UnitRecord> {
        self.units.get_mut(&id)
    }

    pub fn units(&self) -> impl Iterator<Item = &UnitRecord> {
        self.units.values()
    }

    pub fn is_alive(&self, id: UnitId) -> bool {
        self.units.get(&id).is_some_and(|unit| unit.alive)
    }
}

impl BoardOracle for World {
    fn dimensions(&self) -> BoardDimensions {
        self.dimensions
    }

    fn unit_at(&self, position: Position) -> Option<UnitId> {
        self.units
            .values()
            .find(|unit| unit.alive && unit.position == position)
            .map(|unit| unit.id)
    }
}

impl UnitOracle for World {
    fn exists(&self, unit: UnitId) -> bool {
        self.units.contains_key(&unit)
    }

    fn hp(&self, unit: UnitId) -> Option<u32> {
        self.units.get(&unit).map(|u| u.hp)
    }

    fn max_hp(&self, unit: UnitId) -> Option<u32> {
        self.units.get(&unit).map(|u| u.max_hp)
    }

    fn position(&self, unit: UnitId) -> Option<Position> {
        self.units.get(&unit).map(|u| u.position)
    }

    fn team(&self, unit: UnitId) -> Option<Team> {
        self.units.get(&unit).map(|u| u.team)
    }

    fn stat(&self, unit: UnitId, stat: &str) -> Option<i64> {
        self.units.get(&unit)?.stats.get(stat).copied()
    }

    fn stats(&self, unit: UnitId) -> Vec<(String, i64)> {
        self.units
            .get(&unit)
            .map(|u| u.stats.iter().map(|(k, v)| (k.clone(), *v)).collect())
            .unwrap_or_default()
    }
}

impl ItemOracle for World {
    fn item(&self, uid: ItemUid) -> Option<ItemInfo> {
        self.items.get(&uid).cloned()
    }
}
