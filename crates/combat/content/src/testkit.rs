//! In-memory collaborators for component tests.

use std::collections::BTreeMap;
use std::sync::Mutex;

use combat_core::{
    BoardDimensions, BoardOracle, Bindings, CombatContext, CombatEventDispatcher, ComponentLibrary,
    ComponentValue, DispatchReport, Entity, EntityKind, EntityRef, EvalError, EventSink,
    EventTrigger, HookEnv, Phase, Position, Team, UnitId, UnitOracle,
};

pub struct Fixture {
    pub hp: u32,
    pub max_hp: u32,
    pub position: Position,
    pub team: Team,
    pub stats: BTreeMap<String, i64>,
}

/// Units on a rectangular board.
pub struct Roster {
    pub dimensions: BoardDimensions,
    pub units: BTreeMap<UnitId, Fixture>,
}

impl Roster {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            dimensions: BoardDimensions::new(width, height),
            units: BTreeMap::new(),
        }
    }

    pub fn with(mut self, id: u32, team: Team, at: (i32, i32), hp: u32) -> Self {
        self.units.insert(
            UnitId(id),
            Fixture {
                hp,
                max_hp: hp.max(20),
                position: Position::new(at.0, at.1),
                team,
                stats: BTreeMap::new(),
            },
        );
        self
    }

    pub fn with_stat(mut self, id: u32, stat: &str, value: i64) -> Self {
        if let Some(unit) = self.units.get_mut(&UnitId(id)) {
            unit.stats.insert(stat.to_owned(), value);
        }
        self
    }
}

impl UnitOracle for Roster {
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

impl BoardOracle for Roster {
    fn dimensions(&self) -> BoardDimensions {
        self.dimensions
    }

    fn unit_at(&self, position: Position) -> Option<UnitId> {
        self.units
            .iter()
            .find(|(_, u)| u.position == position)
            .map(|(id, _)| *id)
    }
}

/// Integer literals and bound variables only.
pub fn literal(expression: &str, bindings: &Bindings) -> Result<i64, EvalError> {
    let expression = expression.trim();
    if let Ok(value) = expression.parse() {
        return Ok(value);
    }
    bindings
        .int(expression)
        .ok_or_else(|| EvalError::UnknownVariable(expression.to_owned()))
}

#[derive(Default)]
pub struct Events(pub Mutex<Vec<EventTrigger>>);

impl Events {
    pub fn names(&self) -> Vec<String> {
        self.0
            .lock()
            .unwrap()
            .iter()
            .map(|t| t.event.clone())
            .collect()
    }
}

impl EventSink for Events {
    fn trigger(&self, trigger: &EventTrigger) {
        self.0.lock().unwrap().push(trigger.clone());
    }
}

pub fn env<'a>(roster: &'a Roster, events: &'a Events) -> HookEnv<'a> {
    HookEnv::empty()
        .with_board(roster)
        .with_units(roster)
        .with_evaluator(&literal)
        .with_events(events)
}

pub fn entity(
    library: &ComponentLibrary,
    kind: EntityKind,
    unit: u32,
    nid: &str,
    parts: &[(&str, Option<ComponentValue>)],
) -> Entity {
    let mut entity = Entity::new(EntityRef::new(UnitId(unit), kind, nid));
    for (id, value) in parts {
        entity.attach(library, id, value.clone()).unwrap();
    }
    entity
}

pub fn fire(
    phase: Phase,
    entity: &mut Entity,
    ctx: &mut CombatContext,
    env: &HookEnv<'_>,
) -> DispatchReport {
    CombatEventDispatcher::new().fire(phase, entity, ctx, env)
}
