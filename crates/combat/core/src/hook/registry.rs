//! Phase → handler lookup table for one entity.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use super::Phase;
use crate::component::{ComponentBehavior, ComponentId, ComponentInstance};

/// One registered hook: where the instance sits on its entity and the
/// behavior handling the phase.
#[derive(Clone)]
pub struct HookEntry {
    /// Index of the instance in the entity's component list.
    pub slot: usize,
    pub component: ComponentId,
    pub handler: Arc<dyn ComponentBehavior>,
}

impl fmt::Debug for HookEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HookEntry")
            .field("slot", &self.slot)
            .field("component", &self.component)
            .finish()
    }
}

/// Maps each phase to the ordered hooks an entity registers for it.
///
/// Built in one pass over the component list, so hooks sharing a phase keep
/// attachment order; there is no priority or tag-based sorting. The table is
/// never patched in place: any change to the component list rebuilds it.
#[derive(Clone, Debug, Default)]
pub struct HookRegistry {
    hooks: BTreeMap<Phase, Vec<HookEntry>>,
}

impl HookRegistry {
    pub fn build(components: &[ComponentInstance]) -> Self {
        let mut hooks: BTreeMap<Phase, Vec<HookEntry>> = BTreeMap::new();

        for (slot, instance) in components.iter().enumerate() {
            for phase in instance.behavior().phases().phases() {
                hooks.entry(phase).or_default().push(HookEntry {
                    slot,
                    component: instance.id().clone(),
                    handler: Arc::clone(instance.behavior()),
                });
            }
        }

        Self { hooks }
    }

    /// Hooks registered for `phase`; empty when nothing handles it.
    pub fn lookup(&self, phase: Phase) -> &[HookEntry] {
        self.hooks.get(&phase).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Phases with at least one hook.
    pub fn phases(&self) -> impl Iterator<Item = Phase> + '_ {
        self.hooks.keys().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }
}
