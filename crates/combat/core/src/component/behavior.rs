//! The behavior interface every component implements.

use std::collections::BTreeMap;

use super::ComponentInstance;
use crate::context::{HookContext, Probe};
use crate::env::ItemInfo;
use crate::error::HookResult;
use crate::hook::{Phase, PhaseSet};
use crate::types::Position;

/// Something a component can provide to its siblings on the same entity.
///
/// Paired components find each other through capabilities instead of holding
/// direct references, so either side may be missing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum Capability {
    /// Supplies a damage amount for post-combat splash.
    SplashDamage,
    /// Tracks charges and gates its skill on them.
    Charge,
}

/// Gameplay logic of a component.
///
/// Implementations are stateless and shared between instances; per-instance
/// data lives in the [`ComponentInstance`] passed to each call. Every method
/// has a no-op default, so a component only overrides what it takes part in.
///
/// Phase hooks must declare themselves in [`phases`](Self::phases): the
/// [`HookRegistry`](crate::hook::HookRegistry) only routes declared phases to
/// [`handle`](Self::handle).
pub trait ComponentBehavior: Send + Sync {
    /// Phases this component hooks into.
    fn phases(&self) -> PhaseSet {
        PhaseSet::empty()
    }

    fn capabilities(&self) -> &'static [Capability] {
        &[]
    }

    /// Components returning true fire even while their entity is inactive.
    /// They are expected to gate themselves internally.
    fn ignore_conditional(&self) -> bool {
        false
    }

    /// Called once when the instance is created.
    fn init(&self, _instance: &mut ComponentInstance) {}

    /// Predicate that must hold for the entity's hooks to fire.
    fn condition(&self, _instance: &ComponentInstance, _probe: &Probe<'_>) -> bool {
        true
    }

    /// Runs this component's hook for `phase`.
    ///
    /// Only phases declared in [`phases`](Self::phases) are ever passed in.
    fn handle(
        &self,
        _phase: Phase,
        _instance: &mut ComponentInstance,
        _ctx: &mut HookContext<'_>,
    ) -> HookResult {
        Ok(())
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    /// Whether `item` may be used or equipped. `None` means no opinion.
    fn available(
        &self,
        _instance: &ComponentInstance,
        _probe: &Probe<'_>,
        _item: &ItemInfo,
    ) -> Option<bool> {
        None
    }

    fn damage_formula(&self, _instance: &ComponentInstance, _probe: &Probe<'_>) -> Option<String> {
        None
    }

    fn resist_formula(&self, _instance: &ComponentInstance, _probe: &Probe<'_>) -> Option<String> {
        None
    }

    /// Growth-rate modifiers keyed by stat name.
    fn growth_change(
        &self,
        _instance: &ComponentInstance,
        _probe: &Probe<'_>,
    ) -> Option<BTreeMap<String, i64>> {
        None
    }

    /// Tiles hit by an area effect centred on `center`.
    fn splash(
        &self,
        _instance: &ComponentInstance,
        _probe: &Probe<'_>,
        _center: Position,
        _empower: i64,
    ) -> Option<Vec<Position>> {
        None
    }

    /// Bonus radius granted to the unit's area effects.
    fn empower_splash(&self, _instance: &ComponentInstance, _probe: &Probe<'_>) -> Option<i64> {
        None
    }

    /// Readiness fraction for UI cooldown displays.
    fn cooldown(&self, _instance: &ComponentInstance) -> Option<f64> {
        None
    }

    /// Short label for UI displays.
    fn text(&self, _instance: &ComponentInstance) -> Option<String> {
        None
    }
}
