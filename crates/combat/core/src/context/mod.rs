//! Combat-scoped shared state passed through every phase.
//!
//! - [`CombatContext`]: created by the pipeline for one resolution and
//!   dropped at its end. Holds participants, the strike being resolved and the
//!   three append-only queues hooks write to (pending actions, playback,
//!   event triggers).
//! - [`HookContext`]: the view one hook invocation gets, resolved to the
//!   perspective of the unit owning the component.
//! - [`Probe`]: read-only subset used by conditions and queries.

mod action;
mod hook_context;
mod playback;
mod probe;
mod strike;

pub use action::PendingAction;
pub use hook_context::{HookContext, Siblings};
pub use playback::PlaybackEvent;
pub use probe::Probe;
pub use strike::{CombatMode, Strike, StrikeInfo};

use crate::env::EventTrigger;
use crate::types::{ItemUid, UnitId};

/// The skill a unit just gained, visible to `on_gain_skill`/`after_gain_skill`.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GainedSkill {
    pub nid: String,
    pub negative: bool,
    pub source: Option<UnitId>,
}

/// Queue lengths recorded before a hook runs, so its writes can be undone.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Checkpoint {
    pending: usize,
    playback: usize,
    triggers: usize,
}

/// Ephemeral state of one combat resolution.
#[derive(Clone, Debug)]
pub struct CombatContext {
    pub attacker: UnitId,
    pub defender: Option<UnitId>,
    pub attacker_item: Option<ItemUid>,
    pub defender_item: Option<ItemUid>,
    /// `Attack` for a regular combat, `Neutral` outside combat.
    pub mode: CombatMode,
    pub strike: Option<StrikeInfo>,
    pub gained_skill: Option<GainedSkill>,
    pending: Vec<PendingAction>,
    playback: Vec<PlaybackEvent>,
    triggers: Vec<EventTrigger>,
    open: Option<Checkpoint>,
    /// Copy of the pre-invocation pending queue, taken on the first amendment.
    amend_backup: Option<Vec<PendingAction>>,
}

impl CombatContext {
    /// Context for a combat between `attacker` and `defender`.
    pub fn new(attacker: UnitId, defender: UnitId) -> Self {
        Self::build(attacker, Some(defender), CombatMode::Attack)
    }

    /// Context for hooks fired outside combat (upkeep, skill gain, chapter end).
    pub fn solo(unit: UnitId) -> Self {
        Self::build(unit, None, CombatMode::Neutral)
    }

    fn build(attacker: UnitId, defender: Option<UnitId>, mode: CombatMode) -> Self {
        Self {
            attacker,
            defender,
            attacker_item: None,
            defender_item: None,
            mode,
            strike: None,
            gained_skill: None,
            pending: Vec::new(),
            playback: Vec::new(),
            triggers: Vec::new(),
            open: None,
            amend_backup: None,
        }
    }

    /// Builder: set the items both sides fight with.
    pub fn with_items(mut self, attacker: Option<ItemUid>, defender: Option<ItemUid>) -> Self {
        self.attacker_item = attacker;
        self.defender_item = defender;
        self
    }

    /// Builder: record the skill just gained.
    pub fn with_gained_skill(mut self, gained: GainedSkill) -> Self {
        self.gained_skill = Some(gained);
        self
    }

    /// The other participant, seen from `unit`.
    pub fn opponent_of(&self, unit: UnitId) -> Option<UnitId> {
        if unit == self.attacker {
            self.defender
        } else if Some(unit) == self.defender {
            Some(self.attacker)
        } else {
            None
        }
    }

    /// The item `unit` fights with.
    pub fn item_of(&self, unit: UnitId) -> Option<ItemUid> {
        if unit == self.attacker {
            self.attacker_item
        } else if Some(unit) == self.defender {
            self.defender_item
        } else {
            None
        }
    }

    /// Combat mode from `unit`'s point of view.
    pub fn mode_for(&self, unit: UnitId) -> CombatMode {
        match self.mode {
            CombatMode::Neutral => CombatMode::Neutral,
            _ if unit == self.attacker => CombatMode::Attack,
            _ => CombatMode::Defense,
        }
    }

    /// Queues an action from the pipeline itself (e.g. strike damage).
    pub fn queue(&mut self, action: PendingAction) {
        self.pending.push(action);
    }

    /// Appends a playback event from the pipeline itself.
    pub fn play(&mut self, event: PlaybackEvent) {
        self.playback.push(event);
    }

    pub fn pending(&self) -> &[PendingAction] {
        &self.pending
    }

    pub fn playback(&self) -> &[PlaybackEvent] {
        &self.playback
    }

    /// Every event script triggered so far, in order.
    pub fn triggers(&self) -> &[EventTrigger] {
        &self.triggers
    }

    /// Drains the pending queue for the pipeline's commit step.
    pub fn take_pending(&mut self) -> Vec<PendingAction> {
        std::mem::take(&mut self.pending)
    }

    /// Drains the playback log.
    pub fn take_playback(&mut self) -> Vec<PlaybackEvent> {
        std::mem::take(&mut self.playback)
    }

    pub(crate) fn push_trigger(&mut self, trigger: EventTrigger) {
        self.triggers.push(trigger);
    }

    pub(crate) fn begin(&mut self) -> Checkpoint {
        let checkpoint = Checkpoint {
            pending: self.pending.len(),
            playback: self.playback.len(),
            triggers: self.triggers.len(),
        };
        self.open = Some(checkpoint);
        self.amend_backup = None;
        checkpoint
    }

    /// Mutable access to already-queued actions, backed up once per invocation.
    pub(crate) fn pending_for_amend(&mut self) -> &mut [PendingAction] {
        if self.amend_backup.is_none() {
            let len = self.open.map_or(self.pending.len(), |cp| cp.pending);
            self.amend_backup = Some(self.pending[..len].to_vec());
        }
        &mut self.pending
    }

    /// Keeps the invocation's writes; returns the triggers it fired.
    pub(crate) fn commit(&mut self, checkpoint: Checkpoint) -> &[EventTrigger] {
        self.open = None;
        self.amend_backup = None;
        &self.triggers[checkpoint.triggers..]
    }

    /// Discards every write made since `checkpoint`.
    pub(crate) fn rollback(&mut self, checkpoint: Checkpoint) {
        match self.amend_backup.take() {
            Some(backup) => self.pending = backup,
            None => self.pending.truncate(checkpoint.pending),
        }
        self.playback.truncate(checkpoint.playback);
        self.triggers.truncate(checkpoint.triggers);
        self.open = None;
    }
}
