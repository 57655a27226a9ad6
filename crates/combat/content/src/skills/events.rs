//! Components that hand control to the host's event scripts.

use combat_core::{
    ComponentBehavior, ComponentDefinition, ComponentInstance, ComponentLibrary, ComponentTag,
    ComponentValue, ConfigShape, HookContext, HookResult, Phase, PhaseSet, RegistrationError,
    UnitId,
};

const GOT_HIT: &str = "got_hit";

/// When a [`ScriptedEvent`] fires.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Moment {
    BeforeCombat,
    AfterCombat,
    /// After a combat in which the unit was hit at least once.
    AfterCombatWhenHit,
    WhenHit,
    WhenDodging,
    OnUpkeep,
}

/// Triggers the event script named by the component value.
///
/// An empty value means no script is configured and the trigger is skipped.
pub struct ScriptedEvent(pub Moment);

impl ScriptedEvent {
    fn trigger(instance: &ComponentInstance, ctx: &mut HookContext<'_>, target: Option<UnitId>) {
        let event = instance.value().as_text().unwrap_or_default();
        if event.is_empty() {
            tracing::debug!(component = %instance.id(), entity = %ctx.entity(), "no event configured");
            return;
        }
        ctx.trigger_event(event, target);
    }
}

impl ComponentBehavior for ScriptedEvent {
    fn phases(&self) -> PhaseSet {
        match self.0 {
            Moment::BeforeCombat => PhaseSet::BEFORE_COMBAT,
            Moment::AfterCombat => PhaseSet::END_COMBAT,
            Moment::AfterCombatWhenHit => {
                PhaseSet::AFTER_TAKE_STRIKE | PhaseSet::END_COMBAT | PhaseSet::END_COMBAT_UNCONDITIONAL
            }
            Moment::WhenHit | Moment::WhenDodging => PhaseSet::AFTER_TAKE_STRIKE,
            Moment::OnUpkeep => PhaseSet::ON_UPKEEP,
        }
    }

    fn handle(
        &self,
        phase: Phase,
        instance: &mut ComponentInstance,
        ctx: &mut HookContext<'_>,
    ) -> HookResult {
        let connected = ctx.strike().is_some_and(|strike| strike.outcome.connected());
        let target = ctx.target();

        match (self.0, phase) {
            (Moment::OnUpkeep, _) => {
                let unit = ctx.unit();
                Self::trigger(instance, ctx, Some(unit));
            }
            (Moment::WhenHit, _) if connected => Self::trigger(instance, ctx, target),
            (Moment::WhenDodging, _) if !connected => Self::trigger(instance, ctx, target),
            (Moment::BeforeCombat | Moment::AfterCombat, _) => Self::trigger(instance, ctx, target),
            (Moment::AfterCombatWhenHit, Phase::AfterTakeStrike) if connected => {
                instance.state_mut().set_flag(GOT_HIT, true);
            }
            (Moment::AfterCombatWhenHit, Phase::EndCombat) => {
                if instance.state().flag(GOT_HIT) && target.is_some() {
                    Self::trigger(instance, ctx, target);
                }
            }
            (Moment::AfterCombatWhenHit, Phase::EndCombatUnconditional) => {
                instance.state_mut().set_flag(GOT_HIT, false);
            }
            _ => {}
        }
        Ok(())
    }
}

pub(super) fn register(library: &mut ComponentLibrary) -> Result<(), RegistrationError> {
    let events = [
        ("event_before_combat", Moment::BeforeCombat, "Calls event before any combat"),
        ("event_after_combat", Moment::AfterCombat, "Calls event after any combat"),
        (
            "event_after_combat_when_hit",
            Moment::AfterCombatWhenHit,
            "Calls event after any combat where unit is hit",
        ),
        ("event_when_hit", Moment::WhenHit, "Calls event when unit is hit"),
        ("event_when_dodging", Moment::WhenDodging, "Calls event when unit dodges"),
        ("event_on_upkeep", Moment::OnUpkeep, "Triggers the designated event at upkeep"),
    ];
    for (id, moment, description) in events {
        let tag = match moment {
            Moment::OnUpkeep => ComponentTag::Time,
            _ => ComponentTag::Advanced,
        };
        library.register(
            ComponentDefinition::new(id, tag)
                .with_value(ConfigShape::Event, ComponentValue::Text(String::new()))
                .describe(description),
            ScriptedEvent(moment),
        )?;
    }
    Ok(())
}
