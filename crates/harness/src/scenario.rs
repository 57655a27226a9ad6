//! Scenario files: who stands where, what they carry and what happens.
//!
//! A scenario is TOML:
//!
//! ```toml
//! [board]
//! width = 10
//! height = 10
//!
//! [equations]
//! MAGIC_DAMAGE = "unit.MAG + 3"
//!
//! [[units]]
//! id = 1
//! name = "Eirika"
//! team = "Player"
//! hp = 20
//! position = { x = 2, y = 2 }
//! stats = { STR = 6, MND = 4 }
//! skills = ["Miracle"]
//! items = [{ uid = 1, nid = "Rapier", tags = ["Sword"] }]
//!
//! [[steps]]
//! kind = "combat"
//! attacker = 1
//! defender = 2
//! attacker_item = 1
//! exchanges = [[{ by = "attacker", outcome = "Hit", damage = 7 }]]
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use combat_core::{
    BoardDimensions, EventTrigger, ItemInfo, ItemUid, PlaybackEvent, Position, Team, UnitId,
};
use serde::{Deserialize, Serialize};

use crate::eval::ArithmeticEvaluator;
use crate::pipeline::{CombatScript, CombatSummary, Content, Pipeline};
use crate::world::{UnitRecord, World};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ItemPlacement {
    pub uid: ItemUid,
    /// Item template in the item catalog.
    pub nid: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default = "equippable")]
    pub equippable: bool,
    #[serde(default)]
    pub accessory: bool,
}

fn equippable() -> bool {
    true
}

impl ItemPlacement {
    pub fn info(&self) -> ItemInfo {
        ItemInfo {
            uid: self.uid,
            nid: self.nid.clone(),
            tags: self.tags.clone(),
            equippable: self.equippable,
            accessory: self.accessory,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UnitPlacement {
    pub id: UnitId,
    pub name: String,
    pub team: Team,
    pub hp: u32,
    /// Defaults to `hp`.
    #[serde(default)]
    pub max_hp: Option<u32>,
    pub position: Position,
    #[serde(default)]
    pub stats: BTreeMap<String, i64>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub items: Vec<ItemPlacement>,
}

/// One thing that happens, in file order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Step {
    Combat(CombatScript),
    Upkeep {
        unit: UnitId,
    },
    GainSkill {
        unit: UnitId,
        skill: String,
        #[serde(default)]
        source: Option<UnitId>,
    },
    EndChapter,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub board: BoardDimensions,
    #[serde(default)]
    pub equations: BTreeMap<String, String>,
    #[serde(default)]
    pub units: Vec<UnitPlacement>,
    #[serde(default)]
    pub steps: Vec<Step>,
}

/// Everything a scenario run produced.
#[derive(Clone, Debug, Serialize)]
pub struct ScenarioReport {
    pub combats: Vec<CombatSummary>,
    pub playback: Vec<PlaybackEvent>,
    pub triggers: Vec<EventTrigger>,
    pub units: Vec<UnitRecord>,
    pub skills: BTreeMap<UnitId, Vec<String>>,
    pub deaths: Vec<UnitId>,
    pub hook_failures: usize,
    pub rejected_actions: usize,
}

impl Scenario {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Failed to read scenario {}: {}", path.display(), e))?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> anyhow::Result<Self> {
        toml::from_str(content).map_err(|e| anyhow::anyhow!("Failed to parse scenario TOML: {}", e))
    }

    /// Places the units and their loadouts. No hooks fire.
    pub fn build(&self, content: Content) -> anyhow::Result<Pipeline> {
        let mut world = World::new(self.board);
        for unit in &self.units {
            let mut record = UnitRecord::new(unit.id, unit.name.clone(), unit.team, unit.hp, unit.position)
                .with_max_hp(unit.max_hp.unwrap_or(unit.hp));
            record.stats = unit.stats.clone();
            world.add_unit(record);
            for item in &unit.items {
                world.add_item(item.info());
            }
        }

        let evaluator = ArithmeticEvaluator::new().with_equations(self.equations.clone());
        let mut pipeline = Pipeline::new(content, world, evaluator);
        for unit in &self.units {
            for skill in &unit.skills {
                pipeline
                    .grant_skill(unit.id, skill)
                    .map_err(|e| anyhow::anyhow!("Failed to grant '{}' to {}: {}", skill, unit.name, e))?;
            }
            for item in &unit.items {
                pipeline
                    .equip(unit.id, item.uid, &item.nid)
                    .map_err(|e| anyhow::anyhow!("Failed to equip '{}' on {}: {}", item.nid, unit.name, e))?;
            }
        }
        tracing::info!(units = self.units.len(), steps = self.steps.len(), "scenario built");
        Ok(pipeline)
    }

    /// Plays every step, then reports.
    pub fn run(&self, pipeline: &mut Pipeline) -> anyhow::Result<ScenarioReport> {
        let mut combats = Vec::new();
        for (index, step) in self.steps.iter().enumerate() {
            tracing::debug!(index, ?step, "step");
            match step {
                Step::Combat(script) => {
                    let summary = pipeline
                        .resolve_combat(script)
                        .map_err(|e| anyhow::anyhow!("Step {}: {}", index, e))?;
                    combats.push(summary);
                }
                Step::Upkeep { unit } => {
                    pipeline.upkeep(*unit);
                }
                Step::GainSkill { unit, skill, source } => {
                    pipeline
                        .gain_skill(*unit, skill, *source)
                        .map_err(|e| anyhow::anyhow!("Step {}: {}", index, e))?;
                }
                Step::EndChapter => {
                    pipeline.end_chapter();
                }
            }
        }

        Ok(ScenarioReport {
            combats,
            playback: pipeline.playback().to_vec(),
            triggers: pipeline.triggers(),
            units: pipeline.world().units().cloned().collect(),
            skills: self
                .units
                .iter()
                .map(|unit| {
                    let skills = pipeline
                        .loadout(unit.id)
                        .map(|loadout| loadout.skill_nids())
                        .unwrap_or_default();
                    (unit.id, skills)
                })
                .collect(),
            deaths: pipeline.deaths().to_vec(),
            hook_failures: pipeline.failures().len(),
            rejected_actions: pipeline.rejected().len(),
        })
    }
}
