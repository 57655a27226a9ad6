//! [`Expr`] evaluation against hook bindings.

use combat_core::{Binding, Bindings, EvalError};

use super::{ArithmeticEvaluator, BinaryOp, Expr, parse};

/// Named equations may reference each other up to this depth.
const MAX_EQUATION_DEPTH: usize = 16;

/// What names resolve against while evaluating.
pub struct Scope<'a> {
    evaluator: &'a ArithmeticEvaluator,
    bindings: &'a Bindings,
    depth: usize,
}

impl<'a> Scope<'a> {
    pub fn new(evaluator: &'a ArithmeticEvaluator, bindings: &'a Bindings) -> Self {
        Self {
            evaluator,
            bindings,
            depth: 0,
        }
    }

    fn resolve(&self, name: &str) -> Result<i64, EvalError> {
        match self.bindings.get(name) {
            Some(Binding::Int(value)) => return Ok(*value),
            Some(Binding::Text(_)) => return Err(EvalError::NotNumeric(name.to_owned())),
            None => {}
        }
        let equation = self
            .evaluator
            .equation(name)
            .ok_or_else(|| EvalError::UnknownVariable(name.to_owned()))?;
        if self.depth >= MAX_EQUATION_DEPTH {
            return Err(EvalError::Parse {
                expression: equation.to_owned(),
                reason: format!("equation '{name}' nests too deeply"),
            });
        }
        let nested = Scope {
            evaluator: self.evaluator,
            bindings: self.bindings,
            depth: self.depth + 1,
        };
        evaluate(&parse(equation)?, &nested)
    }
}

/// Evaluates `expr`. Arithmetic saturates; division truncates toward zero.
///
/// ## Error Handling
/// - `UnknownVariable` if a name is neither bound nor a named equation
/// - `NotNumeric` if a name is bound to text
/// - `DivisionByZero`
/// - `Parse` if a named equation is malformed or nests too deeply
pub fn evaluate(expr: &Expr, scope: &Scope<'_>) -> Result<i64, EvalError> {
    match expr {
        Expr::Number(value) => Ok(*value),

        Expr::Name(name) => scope.resolve(name),

        Expr::Neg(inner) => Ok(evaluate(inner, scope)?.saturating_neg()),

        Expr::Binary { op, lhs, rhs } => {
            let lhs = evaluate(lhs, scope)?;
            let rhs = evaluate(rhs, scope)?;
            match op {
                BinaryOp::Add => Ok(lhs.saturating_add(rhs)),
                BinaryOp::Sub => Ok(lhs.saturating_sub(rhs)),
                BinaryOp::Mul => Ok(lhs.saturating_mul(rhs)),
                BinaryOp::Div if rhs == 0 => Err(EvalError::DivisionByZero),
                BinaryOp::Div => Ok(lhs.saturating_div(rhs)),
            }
        }
    }
}
