//! Reference combat pipeline.
//!
//! Owns the committed world and every unit's loadout, fires phases through the
//! [`CombatEventDispatcher`] in the fixed order, and applies the queued
//! [`PendingAction`]s after each phase. Hooks only ever see the world through
//! the oracle traits, so nothing they do lands until the commit step runs.
//!
//! Per combat:
//!
//! ```text
//! before_combat
//! for each exchange:
//!     for each strike: before_strike, [before_crit], after_strike / after_take_strike
//!     end_sub_combat
//! end_combat
//! end_combat_unconditional
//! ```
//!
//! A unit that any committed HP change leaves at 0 dies on the spot, whether
//! or not it takes part in the combat.
//!
//! Committing an `AddSkill` fires `on_gain_skill` on the new skill and
//! `after_gain_skill` on the unit's other skills; committing a `TriggerCharge`
//! fires `on_trigger_charge` on the named skill. Both cascades commit their own
//! actions recursively, up to [`HookConfig::max_cascade_depth`].

use std::collections::{BTreeMap, BTreeSet};

use combat_content::{Catalog, item_library, skill_library};
use combat_core::{
    CombatContext, CombatEventDispatcher, ComponentLibrary, DispatchReport, EventTrigger,
    GainedSkill, HandlerFailure, HookConfig, HookEnv, HookError, ItemOracle, ItemUid,
    PendingAction, Phase, PlaybackEvent, Position, Probe, RegistrationError, Strike, StrikeInfo,
    UnitId, UnitOracle, query,
};
use serde::{Deserialize, Serialize};

use crate::error::CommitError;
use crate::eval::ArithmeticEvaluator;
use crate::events::RecordingEventSink;
use crate::loadout::Loadout;
use crate::world::World;

/// Component libraries, catalogs and tunables a pipeline builds entities from.
pub struct Content {
    pub skill_library: ComponentLibrary,
    pub item_library: ComponentLibrary,
    pub skills: Catalog,
    pub items: Catalog,
    pub config: HookConfig,
}

impl Content {
    /// Pairs the catalogs with the stock skill and item libraries.
    pub fn new(skills: Catalog, items: Catalog, config: HookConfig) -> Result<Self, RegistrationError> {
        Ok(Self {
            skill_library: skill_library()?,
            item_library: item_library()?,
            skills,
            items,
            config,
        })
    }
}

/// Which side of the combat swings.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Attacker,
    Defender,
}

/// One predetermined strike. The harness does not roll hit or crit chances.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptedStrike {
    pub by: Side,
    pub outcome: Strike,
    #[serde(default)]
    pub damage: u32,
}

/// A combat with its strikes grouped into exchanges.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombatScript {
    pub attacker: UnitId,
    pub defender: UnitId,
    #[serde(default)]
    pub attacker_item: Option<ItemUid>,
    #[serde(default)]
    pub defender_item: Option<ItemUid>,
    #[serde(default)]
    pub exchanges: Vec<Vec<ScriptedStrike>>,
}

/// Result of one combat.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombatSummary {
    pub attacker: UnitId,
    pub defender: UnitId,
    pub strikes: usize,
    pub attacker_hp: u32,
    pub defender_hp: u32,
    /// Every unit that died during the combat, bystanders included.
    pub deaths: Vec<UnitId>,
}

fn hook_env<'a>(
    world: &'a World,
    evaluator: &'a ArithmeticEvaluator,
    events: &'a RecordingEventSink,
) -> HookEnv<'a> {
    HookEnv::empty()
        .with_board(world)
        .with_units(world)
        .with_items(world)
        .with_evaluator(evaluator)
        .with_events(events)
}

pub struct Pipeline {
    content: Content,
    world: World,
    loadouts: BTreeMap<UnitId, Loadout>,
    evaluator: ArithmeticEvaluator,
    events: RecordingEventSink,
    dispatcher: CombatEventDispatcher,
    playback: Vec<PlaybackEvent>,
    failures: Vec<HandlerFailure>,
    rejected: Vec<CommitError>,
    deaths: Vec<UnitId>,
}

impl Pipeline {
    pub fn new(content: Content, world: World, evaluator: ArithmeticEvaluator) -> Self {
        Self {
            content,
            world,
            loadouts: BTreeMap::new(),
            evaluator,
            events: RecordingEventSink::new(),
            dispatcher: CombatEventDispatcher::new(),
            playback: Vec::new(),
            failures: Vec::new(),
            rejected: Vec::new(),
            deaths: Vec::new(),
        }
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn loadout(&self, unit: UnitId) -> Option<&Loadout> {
        self.loadouts.get(&unit)
    }

    /// Every playback event committed so far, in order.
    pub fn playback(&self) -> &[PlaybackEvent] {
        &self.playback
    }

    pub fn triggers(&self) -> Vec<EventTrigger> {
        self.events.triggers()
    }

    /// Hooks that failed and had their effects discarded.
    pub fn failures(&self) -> &[HandlerFailure] {
        &self.failures
    }

    /// Pending actions the commit step could not apply.
    pub fn rejected(&self) -> &[CommitError] {
        &self.rejected
    }

    /// Every unit that died so far, in order of death.
    pub fn deaths(&self) -> &[UnitId] {
        &self.deaths
    }

    /// Gives `unit` skill `nid` without firing gain hooks. Used to set up
    /// starting loadouts.
    pub fn grant_skill(&mut self, unit: UnitId, nid: &str) -> Result<(), CommitError> {
        if !self.world.exists(unit) {
            return Err(CommitError::UnknownUnit(unit));
        }
        let skill = self.content.skills.instantiate(
            &self.content.skill_library,
            &self.content.config,
            nid,
            unit,
        )?;
        self.loadouts.entry(unit).or_default().skills.push(skill);
        Ok(())
    }

    /// Equips item object `uid`, built from item template `nid`.
    pub fn equip(&mut self, unit: UnitId, uid: ItemUid, nid: &str) -> Result<(), CommitError> {
        if !self.world.exists(unit) {
            return Err(CommitError::UnknownUnit(unit));
        }
        let item = self.content.items.instantiate_item(
            &self.content.item_library,
            &self.content.config,
            nid,
            unit,
            uid,
        )?;
        self.loadouts.entry(unit).or_default().items.insert(uid, item);
        Ok(())
    }

    /// Gives `unit` skill `nid` the way an in-game effect would: gain hooks
    /// fire and their actions are committed.
    pub fn gain_skill(
        &mut self,
        unit: UnitId,
        nid: &str,
        source: Option<UnitId>,
    ) -> Result<(), CommitError> {
        self.add_skill(unit, nid, source, 0)
    }

    /// Commits actions raised outside any hook, such as by an event script,
    /// exactly as if a hook had queued them.
    pub fn execute(&mut self, actions: impl IntoIterator<Item = PendingAction>) {
        for action in actions {
            self.apply_logged(action, 0);
        }
    }

    /// Start of `unit`'s turn.
    pub fn upkeep(&mut self, unit: UnitId) -> DispatchReport {
        let mut ctx = CombatContext::solo(unit);
        let report = self.fire_unit(Phase::OnUpkeep, unit, None, &mut ctx);
        self.commit(&mut ctx, 0);
        report
    }

    /// End of chapter, for every unit carrying anything.
    pub fn end_chapter(&mut self) -> DispatchReport {
        let mut report = DispatchReport::default();
        let units: Vec<UnitId> = self.loadouts.keys().copied().collect();
        for unit in units {
            let mut ctx = CombatContext::solo(unit);
            report.merge(self.fire_unit(Phase::OnEndChapter, unit, None, &mut ctx));
            self.commit(&mut ctx, 0);
        }
        report
    }

    /// Resolves one scripted combat.
    ///
    /// # Errors
    ///
    /// Returns `CommitError::UnknownUnit` if either participant is not in the
    /// world. Nothing fires in that case.
    pub fn resolve_combat(&mut self, script: &CombatScript) -> Result<CombatSummary, CommitError> {
        let (attacker, defender) = (script.attacker, script.defender);
        for unit in [attacker, defender] {
            if !self.world.exists(unit) {
                return Err(CommitError::UnknownUnit(unit));
            }
        }
        tracing::info!(%attacker, %defender, exchanges = script.exchanges.len(), "combat started");

        let mut ctx = CombatContext::new(attacker, defender)
            .with_items(script.attacker_item, script.defender_item);
        let first_death = self.deaths.len();
        let mut strikes = 0;

        self.fire_both(Phase::BeforeCombat, &mut ctx);
        self.commit(&mut ctx, 0);

        for exchange in &script.exchanges {
            for strike in exchange {
                if !self.both_alive(attacker, defender) {
                    break;
                }
                let (striker, struck) = match strike.by {
                    Side::Attacker => (attacker, defender),
                    Side::Defender => (defender, attacker),
                };
                self.strike(&mut ctx, striker, struck, strike);
                strikes += 1;
            }
            ctx.strike = None;
            self.fire_both(Phase::EndSubCombat, &mut ctx);
            self.commit(&mut ctx, 0);
            if !self.both_alive(attacker, defender) {
                break;
            }
        }

        self.fire_both(Phase::EndCombat, &mut ctx);
        self.commit(&mut ctx, 0);
        self.fire_both(Phase::EndCombatUnconditional, &mut ctx);
        self.commit(&mut ctx, 0);

        let deaths = self.deaths[first_death..].to_vec();
        let summary = CombatSummary {
            attacker,
            defender,
            strikes,
            attacker_hp: self.world.hp(attacker).unwrap_or(0),
            defender_hp: self.world.hp(defender).unwrap_or(0),
            deaths,
        };
        tracing::info!(
            %attacker,
            %defender,
            strikes,
            attacker_hp = summary.attacker_hp,
            defender_hp = summary.defender_hp,
            "combat resolved"
        );
        Ok(summary)
    }

    /// Whether `unit`'s skills and the item itself allow using `uid`.
    pub fn can_use(&self, unit: UnitId, uid: ItemUid) -> bool {
        let Some(info) = self.world.item(uid) else {
            return false;
        };
        let env = hook_env(&self.world, &self.evaluator, &self.events);
        let probe = Probe::new(unit, &env).with_item(Some(uid));
        match self.loadouts.get(&unit) {
            Some(loadout) => query::available(
                loadout.skills.iter().chain(loadout.item(uid)),
                &probe,
                &info,
            ),
            None => true,
        }
    }

    /// Tiles item `uid` reaches when `unit` uses it on `center`.
    pub fn splash(&self, unit: UnitId, uid: ItemUid, center: Position) -> BTreeSet<Position> {
        let Some(loadout) = self.loadouts.get(&unit) else {
            return BTreeSet::new();
        };
        let env = hook_env(&self.world, &self.evaluator, &self.events);
        let probe = Probe::new(unit, &env).with_item(Some(uid));
        let empower = query::empower_splash(&loadout.skills, &probe);
        query::splash(loadout.item(uid), &probe, center, empower)
    }

    /// Equation `unit` deals damage with while wielding `uid`.
    pub fn damage_formula(&self, unit: UnitId, uid: ItemUid) -> Option<String> {
        let loadout = self.loadouts.get(&unit)?;
        let env = hook_env(&self.world, &self.evaluator, &self.events);
        let probe = Probe::new(unit, &env).with_item(Some(uid));
        query::damage_formula(loadout.item(uid).into_iter().chain(&loadout.skills), &probe)
    }

    pub fn resist_formula(&self, unit: UnitId, uid: ItemUid) -> Option<String> {
        let loadout = self.loadouts.get(&unit)?;
        let env = hook_env(&self.world, &self.evaluator, &self.events);
        let probe = Probe::new(unit, &env).with_item(Some(uid));
        query::resist_formula(loadout.item(uid).into_iter().chain(&loadout.skills), &probe)
    }

    pub fn growth_changes(&self, unit: UnitId) -> BTreeMap<String, i64> {
        let Some(loadout) = self.loadouts.get(&unit) else {
            return BTreeMap::new();
        };
        let env = hook_env(&self.world, &self.evaluator, &self.events);
        let probe = Probe::new(unit, &env);
        query::growth_changes(&loadout.skills, &probe)
    }

    fn strike(
        &mut self,
        ctx: &mut CombatContext,
        striker: UnitId,
        struck: UnitId,
        strike: &ScriptedStrike,
    ) {
        ctx.strike = Some(StrikeInfo {
            attacker: striker,
            defender: struck,
            outcome: strike.outcome,
            damage: strike.damage,
        });
        let striker_item = ctx.item_of(striker);
        let struck_item = ctx.item_of(struck);

        self.fire_unit(Phase::BeforeStrike, striker, striker_item, ctx);
        self.commit(ctx, 0);
        if strike.outcome == Strike::Crit {
            self.fire_unit(Phase::BeforeCrit, striker, striker_item, ctx);
            self.commit(ctx, 0);
        }

        if strike.outcome.connected() {
            ctx.queue(PendingAction::ChangeHp {
                unit: struck,
                delta: -i64::from(strike.damage),
            });
            let (attacker, defender, damage) = (striker, struck, strike.damage);
            ctx.play(match strike.outcome {
                Strike::Crit => PlaybackEvent::DamageCrit { attacker, defender, damage },
                _ => PlaybackEvent::DamageHit { attacker, defender, damage },
            });
        }
        self.fire_unit(Phase::AfterStrike, striker, striker_item, ctx);
        self.fire_unit(Phase::AfterTakeStrike, struck, struck_item, ctx);
        self.commit(ctx, 0);
    }

    fn both_alive(&self, a: UnitId, b: UnitId) -> bool {
        self.world.is_alive(a) && self.world.is_alive(b)
    }

    /// Fires `phase` on both participants, attacker first.
    fn fire_both(&mut self, phase: Phase, ctx: &mut CombatContext) -> DispatchReport {
        let mut report = DispatchReport::default();
        for unit in [Some(ctx.attacker), ctx.defender].into_iter().flatten() {
            let item = ctx.item_of(unit);
            report.merge(self.fire_unit(phase, unit, item, ctx));
        }
        report
    }

    /// Fires `phase` on `unit`'s skills, then on `item` if the unit carries it.
    fn fire_unit(
        &mut self,
        phase: Phase,
        unit: UnitId,
        item: Option<ItemUid>,
        ctx: &mut CombatContext,
    ) -> DispatchReport {
        let env = hook_env(&self.world, &self.evaluator, &self.events);
        let Some(loadout) = self.loadouts.get_mut(&unit) else {
            return DispatchReport::default();
        };
        let mut report = self
            .dispatcher
            .fire_all(phase, loadout.skills.iter_mut(), ctx, &env);
        if let Some(uid) = item
            && let Some(entity) = loadout.items.get_mut(&uid)
        {
            report.merge(self.dispatcher.fire(phase, entity, ctx, &env));
        }
        self.failures.extend(report.failures.iter().cloned());
        report
    }

    /// Applies everything queued on `ctx`, in queue order.
    ///
    /// Actions that cannot be applied are logged and skipped.
    fn commit(&mut self, ctx: &mut CombatContext, depth: u32) {
        self.playback.extend(ctx.take_playback());
        for action in ctx.take_pending() {
            self.apply_logged(action, depth);
        }
    }

    fn apply_logged(&mut self, action: PendingAction, depth: u32) {
        tracing::debug!(?action, depth, "committing");
        if let Err(error) = self.apply(action, depth) {
            tracing::warn!(code = error.error_code(), %error, "pending action skipped");
            self.rejected.push(error);
        }
    }

    fn apply(&mut self, action: PendingAction, depth: u32) -> Result<(), CommitError> {
        match action {
            PendingAction::ChangeHp { unit, delta } => {
                let record = self
                    .world
                    .unit_mut(unit)
                    .ok_or(CommitError::UnknownUnit(unit))?;
                if !record.alive {
                    tracing::debug!(%unit, delta, "hp change on a dead unit ignored");
                    return Ok(());
                }
                let hp = record.change_hp(delta);
                tracing::debug!(%unit, delta, hp, "hp changed");
                if hp == 0 {
                    self.kill(unit, None);
                }
            }
            PendingAction::SetHp { unit, hp } => {
                let record = self
                    .world
                    .unit_mut(unit)
                    .ok_or(CommitError::UnknownUnit(unit))?;
                if !record.alive {
                    tracing::debug!(%unit, hp, "hp change on a dead unit ignored");
                    return Ok(());
                }
                if record.set_hp(hp) == 0 {
                    self.kill(unit, None);
                }
            }
            PendingAction::AddSkill { unit, skill, source } => {
                self.add_skill(unit, &skill, source, depth)?;
            }
            PendingAction::RemoveSkill { unit, skill } => {
                self.loadouts
                    .get_mut(&unit)
                    .and_then(|loadout| loadout.remove_skill(&skill))
                    .ok_or(CommitError::UnknownSkill { unit, skill: skill.clone() })?;
                tracing::info!(%unit, %skill, "skill removed");
            }
            PendingAction::SetObjData { target, key, value } => {
                let instance = self
                    .loadouts
                    .get_mut(&target.entity.unit)
                    .and_then(|loadout| loadout.component_mut(&target))
                    .ok_or_else(|| CommitError::UnknownComponent(target.clone()))?;
                instance.state_mut().set(key, value);
            }
            PendingAction::ModifyComponentValue { target, value } => {
                let instance = self
                    .loadouts
                    .get_mut(&target.entity.unit)
                    .and_then(|loadout| loadout.component_mut(&target))
                    .ok_or_else(|| CommitError::UnknownComponent(target.clone()))?;
                instance.set_value(value)?;
            }
            PendingAction::TriggerCharge { unit, skill } => {
                self.trigger_charge(unit, &skill, depth)?;
            }
            PendingAction::Die { unit, killer } => {
                if !self.world.exists(unit) {
                    return Err(CommitError::UnknownUnit(unit));
                }
                self.kill(unit, killer);
            }
        }
        Ok(())
    }

    fn add_skill(
        &mut self,
        unit: UnitId,
        nid: &str,
        source: Option<UnitId>,
        depth: u32,
    ) -> Result<(), CommitError> {
        if !self.world.exists(unit) {
            return Err(CommitError::UnknownUnit(unit));
        }
        let skill = self.content.skills.instantiate(
            &self.content.skill_library,
            &self.content.config,
            nid,
            unit,
        )?;
        let gained = GainedSkill {
            nid: nid.to_owned(),
            negative: skill.is_negative(),
            source,
        };
        let loadout = self.loadouts.entry(unit).or_default();
        loadout.skills.push(skill);
        tracing::info!(%unit, skill = nid, ?source, "skill gained");

        if depth >= self.content.config.max_cascade_depth {
            tracing::warn!(%unit, skill = nid, depth, "cascade depth reached; gain hooks skipped");
            return Ok(());
        }

        let mut ctx = CombatContext::solo(unit).with_gained_skill(gained);
        let env = hook_env(&self.world, &self.evaluator, &self.events);
        if let Some((new, others)) = loadout.skills.split_last_mut() {
            let mut report = self.dispatcher.fire(Phase::OnGainSkill, new, &mut ctx, &env);
            report.merge(
                self.dispatcher
                    .fire_all(Phase::AfterGainSkill, others.iter_mut(), &mut ctx, &env),
            );
            self.failures.extend(report.failures);
        }
        self.commit(&mut ctx, depth + 1);
        Ok(())
    }

    fn trigger_charge(&mut self, unit: UnitId, nid: &str, depth: u32) -> Result<(), CommitError> {
        let unknown = || CommitError::UnknownSkill {
            unit,
            skill: nid.to_owned(),
        };
        if depth >= self.content.config.max_cascade_depth {
            tracing::warn!(%unit, skill = nid, depth, "cascade depth reached; charge hooks skipped");
            return Ok(());
        }

        let mut ctx = CombatContext::solo(unit);
        let env = hook_env(&self.world, &self.evaluator, &self.events);
        let skill = self
            .loadouts
            .get_mut(&unit)
            .and_then(|loadout| loadout.skill_mut(nid))
            .ok_or_else(unknown)?;
        let report = self
            .dispatcher
            .fire(Phase::OnTriggerCharge, skill, &mut ctx, &env);
        self.failures.extend(report.failures);
        self.commit(&mut ctx, depth + 1);
        Ok(())
    }

    fn kill(&mut self, unit: UnitId, killer: Option<UnitId>) {
        let Some(record) = self.world.unit_mut(unit) else {
            return;
        };
        if !record.alive {
            tracing::debug!(%unit, "already dead");
            return;
        }
        record.alive = false;
        record.hp = 0;
        self.deaths.push(unit);
        tracing::info!(%unit, ?killer, "unit died");
    }
}
