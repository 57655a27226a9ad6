//! Collaborators injected into every hook invocation.
//!
//! Components never reach for ambient game state. The host bundles read-only
//! oracles (board, units, items), the expression evaluator and the event-script
//! sink into a [`HookEnv`] and hands it to the dispatcher for each call.
mod board;
mod error;
mod eval;
mod events;
mod units;

pub use board::{BoardDimensions, BoardOracle, manhattan_sphere};
pub use error::OracleError;
pub use eval::{Binding, Bindings, EvalError, ExpressionEvaluator};
pub use events::{EventSink, EventTrigger};
pub use units::{ItemInfo, ItemOracle, Team, UnitOracle};

use crate::component::ComponentId;

/// Aggregates the collaborators available to hooks.
///
/// Every slot is optional; hooks that need a missing collaborator fail with an
/// [`OracleError`], which the dispatcher treats like any other handler error.
#[derive(Clone, Copy, Default)]
pub struct HookEnv<'a> {
    board: Option<&'a dyn BoardOracle>,
    units: Option<&'a dyn UnitOracle>,
    items: Option<&'a dyn ItemOracle>,
    evaluator: Option<&'a dyn ExpressionEvaluator>,
    events: Option<&'a dyn EventSink>,
}

impl<'a> HookEnv<'a> {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_board(mut self, board: &'a dyn BoardOracle) -> Self {
        self.board = Some(board);
        self
    }

    pub fn with_units(mut self, units: &'a dyn UnitOracle) -> Self {
        self.units = Some(units);
        self
    }

    pub fn with_items(mut self, items: &'a dyn ItemOracle) -> Self {
        self.items = Some(items);
        self
    }

    pub fn with_evaluator(mut self, evaluator: &'a dyn ExpressionEvaluator) -> Self {
        self.evaluator = Some(evaluator);
        self
    }

    pub fn with_events(mut self, events: &'a dyn EventSink) -> Self {
        self.events = Some(events);
        self
    }

    /// # Errors
    ///
    /// Returns `OracleError::BoardNotAvailable` if no board oracle was provided.
    pub fn board(&self) -> Result<&'a dyn BoardOracle, OracleError> {
        self.board.ok_or(OracleError::BoardNotAvailable)
    }

    /// # Errors
    ///
    /// Returns `OracleError::UnitsNotAvailable` if no unit oracle was provided.
    pub fn units(&self) -> Result<&'a dyn UnitOracle, OracleError> {
        self.units.ok_or(OracleError::UnitsNotAvailable)
    }

    /// # Errors
    ///
    /// Returns `OracleError::ItemsNotAvailable` if no item oracle was provided.
    pub fn items(&self) -> Result<&'a dyn ItemOracle, OracleError> {
        self.items.ok_or(OracleError::ItemsNotAvailable)
    }

    /// # Errors
    ///
    /// Returns `OracleError::EvaluatorNotAvailable` if no evaluator was provided.
    pub fn evaluator(&self) -> Result<&'a dyn ExpressionEvaluator, OracleError> {
        self.evaluator.ok_or(OracleError::EvaluatorNotAvailable)
    }

    /// The event sink, if the host wired one.
    pub fn events(&self) -> Option<&'a dyn EventSink> {
        self.events
    }

    /// Evaluates `expression`, returning the failure instead of a default.
    pub fn try_evaluate(&self, expression: &str, bindings: &Bindings) -> Result<i64, EvalError> {
        let evaluator = self.evaluator.ok_or(EvalError::Unavailable)?;
        evaluator.evaluate(expression, bindings)
    }

    /// Evaluates `expression`, substituting `default` on failure.
    ///
    /// Failures are logged with the component id and the raw expression and
    /// never propagate.
    pub fn evaluate_or(
        &self,
        component: &ComponentId,
        expression: &str,
        bindings: &Bindings,
        default: i64,
    ) -> i64 {
        match self.try_evaluate(expression, bindings) {
            Ok(value) => value,
            Err(error) => {
                tracing::warn!(
                    component = %component,
                    expression,
                    %error,
                    default,
                    "expression evaluation failed; using default"
                );
                default
            }
        }
    }
}
