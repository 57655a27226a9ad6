//! Phase hooks: names, per-entity registry, gating and dispatch.
mod dispatcher;
mod gate;
mod phase;
mod registry;

pub use dispatcher::{CombatEventDispatcher, DispatchReport, HandlerFailure};
pub use gate::ConditionalGate;
pub use phase::{Phase, PhaseSet};
pub use registry::{HookEntry, HookRegistry};
