//! Charge-gated skills (combat arts).

use combat_core::{
    Capability, ComponentBehavior, ComponentDefinition, ComponentInstance, ComponentLibrary,
    ComponentTag, ComponentValue, ConfigShape, HookContext, HookResult, Phase, PhaseSet, Probe,
    RegistrationError,
};

pub const CHARGE: &str = "charge";
pub const TOTAL_CHARGE: &str = "total_charge";

/// Starts each chapter fully charged. The skill is active only while
/// `charge >= total_charge`; using it resets `charge` to 0.
///
/// Fires regardless of the skill's other conditions so it can observe use and
/// chapter ends while inactive.
pub struct BuildChargeStartCharged;

impl BuildChargeStartCharged {
    fn charges(instance: &ComponentInstance) -> (i64, i64) {
        let state = instance.state();
        (
            state.int(CHARGE).unwrap_or(0),
            state.int(TOTAL_CHARGE).unwrap_or(0),
        )
    }
}

impl ComponentBehavior for BuildChargeStartCharged {
    fn phases(&self) -> PhaseSet {
        PhaseSet::ON_END_CHAPTER | PhaseSet::ON_TRIGGER_CHARGE
    }

    fn capabilities(&self) -> &'static [Capability] {
        &[Capability::Charge]
    }

    fn ignore_conditional(&self) -> bool {
        true
    }

    fn init(&self, instance: &mut ComponentInstance) {
        let total = instance.value().as_int().unwrap_or(0);
        let state = instance.state_mut();
        state.set_int(CHARGE, total);
        state.set_int(TOTAL_CHARGE, total);
    }

    fn condition(&self, instance: &ComponentInstance, _: &Probe<'_>) -> bool {
        let (charge, total) = Self::charges(instance);
        charge >= total
    }

    fn handle(
        &self,
        phase: Phase,
        instance: &mut ComponentInstance,
        ctx: &mut HookContext<'_>,
    ) -> HookResult {
        let (charge, total) = Self::charges(instance);
        let next = match phase {
            Phase::OnEndChapter => total,
            Phase::OnTriggerCharge => 0,
            _ => return Ok(()),
        };
        tracing::debug!(entity = %ctx.entity(), %phase, from = charge, to = next, "charge updated");
        instance.state_mut().set_int(CHARGE, next);
        Ok(())
    }

    fn text(&self, instance: &ComponentInstance) -> Option<String> {
        Some(Self::charges(instance).0.to_string())
    }

    /// A zero total reads as fully ready.
    fn cooldown(&self, instance: &ComponentInstance) -> Option<f64> {
        let (charge, total) = Self::charges(instance);
        if total == 0 {
            return Some(1.0);
        }
        Some(charge as f64 / total as f64)
    }
}

pub(super) fn register(library: &mut ComponentLibrary) -> Result<(), RegistrationError> {
    library.register(
        ComponentDefinition::new("build_charge_start_charged", ComponentTag::Charge)
            .with_value(ConfigShape::Int, ComponentValue::Int(10))
            .describe(
                "Skill starts each chapter fully charged and is active only while charged; \
                 use resets the charge to 0",
            ),
        BuildChargeStartCharged,
    )
}
