//! The per-invocation view a phase hook receives.

use std::collections::BTreeMap;

use super::probe::unit_bindings;
use super::{CombatContext, CombatMode, GainedSkill, PendingAction, PlaybackEvent, Probe, StrikeInfo};
use crate::component::{Capability, ComponentId, ComponentInstance};
use crate::entity::EntityRef;
use crate::env::{Binding, Bindings, EventTrigger, HookEnv};
use crate::hook::Phase;
use crate::types::{ItemUid, UnitId};

/// Read-only view of the other instances on the invoking component's entity,
/// in attachment order.
#[derive(Clone, Copy, Default)]
pub struct Siblings<'a> {
    before: &'a [ComponentInstance],
    after: &'a [ComponentInstance],
}

impl<'a> Siblings<'a> {
    pub fn new(before: &'a [ComponentInstance], after: &'a [ComponentInstance]) -> Self {
        Self { before, after }
    }

    pub fn iter(self) -> impl Iterator<Item = &'a ComponentInstance> {
        self.before.iter().chain(self.after.iter())
    }

    /// First sibling advertising `capability`.
    pub fn find_capability(&self, capability: Capability) -> Option<&'a ComponentInstance> {
        self.iter()
            .find(|c| c.behavior().capabilities().contains(&capability))
    }
}

/// Everything one hook invocation may read or append to.
///
/// Accessors are resolved to the perspective of the unit holding the
/// component: `target()` is the other combatant whether the holder attacked
/// or defended.
pub struct HookContext<'a> {
    phase: Phase,
    unit: UnitId,
    entity: &'a EntityRef,
    combat: &'a mut CombatContext,
    env: &'a HookEnv<'a>,
    siblings: Siblings<'a>,
}

impl<'a> HookContext<'a> {
    pub fn new(
        phase: Phase,
        entity: &'a EntityRef,
        combat: &'a mut CombatContext,
        env: &'a HookEnv<'a>,
    ) -> Self {
        Self {
            phase,
            unit: entity.unit,
            entity,
            combat,
            env,
            siblings: Siblings::default(),
        }
    }

    /// Builder: expose the entity's other instances to the hook.
    pub fn with_siblings(mut self, siblings: Siblings<'a>) -> Self {
        self.siblings = siblings;
        self
    }

    /// The other components on the same entity.
    pub fn siblings(&self) -> Siblings<'a> {
        self.siblings
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// The unit holding the component.
    pub fn unit(&self) -> UnitId {
        self.unit
    }

    /// The entity the component is attached to.
    pub fn entity(&self) -> &EntityRef {
        self.entity
    }

    pub fn target(&self) -> Option<UnitId> {
        self.combat.opponent_of(self.unit)
    }

    /// The item the holding unit fights with.
    pub fn item(&self) -> Option<ItemUid> {
        self.combat.item_of(self.unit)
    }

    /// The item the target fights with.
    pub fn target_item(&self) -> Option<ItemUid> {
        self.target().and_then(|target| self.combat.item_of(target))
    }

    pub fn mode(&self) -> CombatMode {
        self.combat.mode_for(self.unit)
    }

    pub fn strike(&self) -> Option<&StrikeInfo> {
        self.combat.strike.as_ref()
    }

    pub fn gained_skill(&self) -> Option<&GainedSkill> {
        self.combat.gained_skill.as_ref()
    }

    pub fn env(&self) -> &'a HookEnv<'a> {
        self.env
    }

    /// Read-only probe from the holder's perspective.
    pub fn probe(&self) -> Probe<'a> {
        Probe::new(self.unit, self.env)
            .with_target(self.target())
            .with_item(self.item())
    }

    /// Queues a deferred mutation.
    pub fn queue(&mut self, action: PendingAction) {
        self.combat.pending.push(action);
    }

    /// Appends a playback event.
    pub fn play(&mut self, event: PlaybackEvent) {
        self.combat.playback.push(event);
    }

    /// Actions queued so far in this phase, including the pipeline's own.
    pub fn pending(&self) -> &[PendingAction] {
        &self.combat.pending
    }

    /// Mutable access to queued actions, for hooks that rewrite an incoming
    /// effect (e.g. capping lethal damage). Rolled back if the hook fails.
    pub fn pending_mut(&mut self) -> &mut [PendingAction] {
        self.combat.pending_for_amend()
    }

    /// Requests event script `event` with the holder as actor.
    ///
    /// `params` gets the standard `item`, `item2` and `mode` entries.
    pub fn trigger_event(&mut self, event: &str, target: Option<UnitId>) {
        let position = self
            .env
            .units()
            .ok()
            .and_then(|units| units.position(self.unit));

        let mut params = BTreeMap::new();
        if let Some(item) = self.item() {
            params.insert("item".to_owned(), item.to_string());
        }
        if let Some(item2) = self.target_item() {
            params.insert("item2".to_owned(), item2.to_string());
        }
        params.insert("mode".to_owned(), self.mode().to_string());

        self.combat.push_trigger(EventTrigger {
            event: event.to_owned(),
            actor: self.unit,
            target,
            position,
            params,
        });
    }

    /// Bindings for expressions: `unit.*`, `target.*`, `mode`, and the current
    /// strike's `damage` if any.
    pub fn bindings(&self) -> Bindings {
        let mut bindings = unit_bindings(self.env, self.unit, self.target());
        bindings.insert("mode", Binding::Text(self.mode().to_string()));
        if let Some(strike) = self.strike() {
            bindings.insert_int("damage", i64::from(strike.damage));
        }
        bindings
    }

    /// Evaluates `expression` with [`bindings`](Self::bindings), substituting
    /// `default` on failure.
    pub fn evaluate_or(&self, component: &ComponentId, expression: &str, default: i64) -> i64 {
        self.env
            .evaluate_or(component, expression, &self.bindings(), default)
    }
}
