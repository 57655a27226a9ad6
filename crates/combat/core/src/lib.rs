//! Capability-hook framework for turn-based combat engines.
//!
//! `combat-core` models skills and items as ordered lists of components. The
//! host's combat pipeline fires named phases through the
//! [`hook::CombatEventDispatcher`]; each component hook reads the shared
//! [`context::CombatContext`] and queues [`context::PendingAction`]s and
//! [`context::PlaybackEvent`]s, which the host commits after the phase.
//! Components never mutate host state directly and never reach for globals:
//! board, unit, item, evaluator and event collaborators arrive through
//! [`env::HookEnv`].
pub mod component;
pub mod config;
pub mod context;
pub mod entity;
pub mod env;
pub mod error;
pub mod hook;
pub mod query;
pub mod types;

pub use component::{
    Capability, ComponentBehavior, ComponentDefinition, ComponentId, ComponentInstance,
    ComponentLibrary, ComponentTag, ComponentValue, ConfigShape, DataValue, InstanceState,
    LibraryEntry,
};
pub use config::HookConfig;
pub use context::{
    CombatContext, CombatMode, GainedSkill, HookContext, PendingAction, PlaybackEvent, Probe,
    Siblings, Strike, StrikeInfo,
};
pub use entity::{ComponentRef, Entity, EntityKind, EntityRef};
pub use env::{
    Binding, Bindings, BoardDimensions, BoardOracle, EvalError, EventSink, EventTrigger,
    ExpressionEvaluator, HookEnv, ItemInfo, ItemOracle, OracleError, Team, UnitOracle,
    manhattan_sphere,
};
pub use error::{
    ConfigError, ErrorSeverity, HandlerError, HookError, HookResult, RegistrationError,
};
pub use hook::{
    CombatEventDispatcher, ConditionalGate, DispatchReport, HandlerFailure, HookEntry,
    HookRegistry, Phase, PhaseSet,
};
pub use types::{ItemUid, Position, UnitId};
