//! Reference host for the combat hook framework.
//!
//! Wires an in-memory [`World`] into the combat-core oracles, runs the fixed
//! phase order through [`Pipeline`], and commits pending actions after every
//! phase. Scenarios are TOML files; content comes from the RON catalogs
//! `combat-content` loads.
pub mod config;
pub mod error;
pub mod eval;
pub mod events;
pub mod loadout;
pub mod pipeline;
pub mod scenario;
pub mod world;

pub use config::HarnessConfig;
pub use error::CommitError;
pub use eval::ArithmeticEvaluator;
pub use events::RecordingEventSink;
pub use loadout::Loadout;
pub use pipeline::{CombatScript, CombatSummary, Content, Pipeline, ScriptedStrike, Side};
pub use scenario::{ItemPlacement, Scenario, ScenarioReport, Step, UnitPlacement};
pub use world::{UnitRecord, World};
