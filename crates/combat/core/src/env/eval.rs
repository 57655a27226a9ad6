//! Boundary to the host's expression evaluator.
//!
//! The evaluator itself is a collaborator; components only rely on
//! [`ExpressionEvaluator::evaluate`] and must treat failure as non-fatal.

use std::collections::BTreeMap;

use crate::error::{ErrorSeverity, HookError};

/// Value bound to a variable name for one evaluation.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Binding {
    Int(i64),
    Text(String),
}

/// Variables visible to an expression (`unit.STR`, `target.HP`, `mode`, ...).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Bindings {
    values: BTreeMap<String, Binding>,
}

impl Bindings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: Binding) {
        self.values.insert(name.into(), value);
    }

    pub fn insert_int(&mut self, name: impl Into<String>, value: i64) {
        self.insert(name, Binding::Int(value));
    }

    /// Builder form of [`insert_int`](Self::insert_int).
    pub fn with_int(mut self, name: impl Into<String>, value: i64) -> Self {
        self.insert_int(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&Binding> {
        self.values.get(name)
    }

    pub fn int(&self, name: &str) -> Option<i64> {
        match self.values.get(name)? {
            Binding::Int(value) => Some(*value),
            Binding::Text(_) => None,
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Expression evaluation failure.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum EvalError {
    #[error("cannot parse '{expression}': {reason}")]
    Parse { expression: String, reason: String },

    #[error("unknown variable '{0}'")]
    UnknownVariable(String),

    #[error("variable '{0}' is not numeric")]
    NotNumeric(String),

    #[error("division by zero")]
    DivisionByZero,

    #[error("no expression evaluator available")]
    Unavailable,
}

impl HookError for EvalError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Recoverable
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::Parse { .. } => "EVAL_PARSE",
            Self::UnknownVariable(_) => "EVAL_UNKNOWN_VARIABLE",
            Self::NotNumeric(_) => "EVAL_NOT_NUMERIC",
            Self::DivisionByZero => "EVAL_DIVISION_BY_ZERO",
            Self::Unavailable => "EVAL_UNAVAILABLE",
        }
    }
}

/// Evaluates an expression against a set of bindings.
pub trait ExpressionEvaluator: Send + Sync {
    fn evaluate(&self, expression: &str, bindings: &Bindings) -> Result<i64, EvalError>;
}

impl<F> ExpressionEvaluator for F
where
    F: Fn(&str, &Bindings) -> Result<i64, EvalError> + Send + Sync,
{
    fn evaluate(&self, expression: &str, bindings: &Bindings) -> Result<i64, EvalError> {
        self(expression, bindings)
    }
}
