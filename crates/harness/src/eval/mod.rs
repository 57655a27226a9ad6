//! Integer arithmetic stand-in for the host's equation language.
//!
//! Expressions are parsed into an [`Expr`] tree, then evaluated against the
//! bindings a hook supplies. Names resolve against the bindings first, then
//! against named equations. All arithmetic saturates; division truncates
//! toward zero.
//!
//! ## Examples
//!
//! ```ignore
//! // unit.MAG * 2 + 3
//! Expr::Binary {
//!     op: BinaryOp::Add,
//!     lhs: Box::new(Expr::Binary {
//!         op: BinaryOp::Mul,
//!         lhs: Box::new(Expr::Name("unit.MAG".into())),
//!         rhs: Box::new(Expr::Number(2)),
//!     }),
//!     rhs: Box::new(Expr::Number(3)),
//! }
//! ```

pub mod evaluate;
pub mod parse;

pub use evaluate::evaluate;
pub use parse::parse;

use std::collections::BTreeMap;

use combat_core::{Bindings, EvalError, ExpressionEvaluator};

// ============================================================================
// Expression Tree
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
}

/// Parsed arithmetic expression.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Expr {
    Number(i64),
    /// A binding such as `unit.HP`, or a named equation.
    Name(String),
    Neg(Box<Expr>),
    Binary {
        op: BinaryOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
}

// ============================================================================
// Evaluator
// ============================================================================

#[derive(Clone, Debug, Default)]
pub struct ArithmeticEvaluator {
    equations: BTreeMap<String, String>,
}

impl ArithmeticEvaluator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a named equation, e.g. `MAGIC_DAMAGE = "unit.MAG + 2"`.
    pub fn with_equation(mut self, name: impl Into<String>, expression: impl Into<String>) -> Self {
        self.equations.insert(name.into(), expression.into());
        self
    }

    pub fn with_equations(mut self, equations: impl IntoIterator<Item = (String, String)>) -> Self {
        self.equations.extend(equations);
        self
    }

    pub fn equation(&self, name: &str) -> Option<&str> {
        self.equations.get(name).map(String::as_str)
    }
}

impl ExpressionEvaluator for ArithmeticEvaluator {
    fn evaluate(&self, expression: &str, bindings: &Bindings) -> Result<i64, EvalError> {
        let expr = parse(expression)?;
        evaluate(&expr, &evaluate::Scope::new(self, bindings))
    }
}
