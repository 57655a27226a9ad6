//! Read-only view for conditions and queries.

use crate::env::{Binding, Bindings, HookEnv};
use crate::types::{ItemUid, UnitId};

/// Who is asking, against whom, with what, and the collaborators to look
/// things up in. Conditions and queries only ever read.
#[derive(Clone, Copy)]
pub struct Probe<'a> {
    pub unit: UnitId,
    pub target: Option<UnitId>,
    pub item: Option<ItemUid>,
    pub env: &'a HookEnv<'a>,
}

impl<'a> Probe<'a> {
    pub fn new(unit: UnitId, env: &'a HookEnv<'a>) -> Self {
        Self {
            unit,
            target: None,
            item: None,
            env,
        }
    }

    pub fn with_target(mut self, target: Option<UnitId>) -> Self {
        self.target = target;
        self
    }

    pub fn with_item(mut self, item: Option<ItemUid>) -> Self {
        self.item = item;
        self
    }

    /// Expression bindings for the probing unit and its target.
    pub fn bindings(&self) -> Bindings {
        unit_bindings(self.env, self.unit, self.target)
    }
}

/// Builds `unit.*` and `target.*` bindings from the unit oracle: every stat plus
/// `HP` and `MAXHP`. Without a unit oracle the bindings are empty.
pub(crate) fn unit_bindings(env: &HookEnv<'_>, unit: UnitId, target: Option<UnitId>) -> Bindings {
    let mut bindings = Bindings::new();
    let Ok(units) = env.units() else {
        return bindings;
    };

    let mut bind = |prefix: &str, id: UnitId| {
        for (stat, value) in units.stats(id) {
            bindings.insert_int(format!("{prefix}.{stat}"), value);
        }
        if let Some(hp) = units.hp(id) {
            bindings.insert_int(format!("{prefix}.HP"), i64::from(hp));
        }
        if let Some(max) = units.max_hp(id) {
            bindings.insert_int(format!("{prefix}.MAXHP"), i64::from(max));
        }
        if let Some(team) = units.team(id) {
            bindings.insert(format!("{prefix}.team"), Binding::Text(team.to_string()));
        }
    };

    bind("unit", unit);
    if let Some(target) = target {
        bind("target", target);
    }
    bindings
}
