//! Conditional gating of hooks and queries.

use crate::component::ComponentInstance;
use crate::context::Probe;

/// Decides whether a component's hooks may run for a given probe.
///
/// An entity is active while every one of its components' conditions holds;
/// components without a condition count as true. A component's hooks fire
/// only while its entity is active, unless the component opts out with
/// `ignore_conditional`, in which case it always fires and gates itself.
pub struct ConditionalGate;

impl ConditionalGate {
    /// Whether the instance at `slot` of `components` may fire.
    pub fn passes(components: &[ComponentInstance], slot: usize, probe: &Probe<'_>) -> bool {
        let Some(instance) = components.get(slot) else {
            return false;
        };
        if instance.behavior().ignore_conditional() {
            return true;
        }
        Self::entity_active(components, probe)
    }

    /// Whether every condition on the entity holds.
    pub fn entity_active(components: &[ComponentInstance], probe: &Probe<'_>) -> bool {
        components.iter().all(|component| {
            let holds = component.behavior().condition(component, probe);
            if !holds {
                tracing::trace!(component = %component.id(), unit = %probe.unit, "condition failed");
            }
            holds
        })
    }
}
