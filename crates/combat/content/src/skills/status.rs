//! Immunities reacting to newly gained skills.

use combat_core::{
    ComponentBehavior, ComponentDefinition, ComponentInstance, ComponentLibrary, ComponentTag,
    HookContext, HookResult, PendingAction, Phase, PhaseSet, RegistrationError,
};

/// Status every unit below the MND threshold is stuck with.
pub const PROPAGANDA_STATUS: &str = "Mandate_of_Heaven";
pub const PROPAGANDA_MIN_MND: i64 = 10;

/// Rejects every negative status the unit gains.
pub struct ImmuneNewStatus;

impl ComponentBehavior for ImmuneNewStatus {
    fn phases(&self) -> PhaseSet {
        PhaseSet::AFTER_GAIN_SKILL
    }

    fn handle(&self, _: Phase, _: &mut ComponentInstance, ctx: &mut HookContext<'_>) -> HookResult {
        let Some(skill) = ctx
            .gained_skill()
            .filter(|gained| gained.negative)
            .map(|gained| gained.nid.clone())
        else {
            return Ok(());
        };
        tracing::debug!(unit = %ctx.unit(), %skill, "negative status rejected");
        let unit = ctx.unit();
        ctx.queue(PendingAction::RemoveSkill { unit, skill });
        Ok(())
    }
}

/// Sheds [`PROPAGANDA_STATUS`] once the unit's MND is high enough.
pub struct ImmunePropaganda;

impl ComponentBehavior for ImmunePropaganda {
    fn phases(&self) -> PhaseSet {
        PhaseSet::AFTER_GAIN_SKILL
    }

    fn handle(&self, _: Phase, _: &mut ComponentInstance, ctx: &mut HookContext<'_>) -> HookResult {
        let gained = ctx.gained_skill().is_some_and(|g| g.nid == PROPAGANDA_STATUS);
        if !gained {
            return Ok(());
        }
        let unit = ctx.unit();
        let mnd = ctx.env().units()?.stat(unit, "MND").unwrap_or(0);
        if mnd >= PROPAGANDA_MIN_MND {
            ctx.queue(PendingAction::RemoveSkill {
                unit,
                skill: PROPAGANDA_STATUS.to_owned(),
            });
        }
        Ok(())
    }
}

pub(super) fn register(library: &mut ComponentLibrary) -> Result<(), RegistrationError> {
    library.register(
        ComponentDefinition::new("immune_new_status", ComponentTag::Status)
            .describe("Unit is not affected by incoming negative statuses"),
        ImmuneNewStatus,
    )?;
    library.register(
        ComponentDefinition::new("immune_propaganda", ComponentTag::Status)
            .describe("Removes Mandate of Heaven from units with enough MND"),
        ImmunePropaganda,
    )
}
