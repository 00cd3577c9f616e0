//! Arithmetic for the calculator: the [`Number`] value type, its display
//! format, and the free-form expression evaluator.

pub mod parser;
mod value;

use itertools::Itertools;
use thiserror::Error;
use tracing::debug;

pub use parser::{parse_expr, Operator};
pub use value::{format_float, ArithmeticError, Expr, Number};

/// Symbol the user types for exponentiation.
pub const POWER_SYMBOL: &str = "^";
const POWER_OPERATOR: &str = "**";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvalError {
    #[error("empty expression")]
    Empty,
    #[error("division by zero")]
    DivideByZero,
    #[error("invalid expression ({0})")]
    InvalidExpression(String),
}

impl From<ArithmeticError> for EvalError {
    fn from(err: ArithmeticError) -> Self {
        match err {
            ArithmeticError::DivisionByZero => EvalError::DivideByZero,
            ArithmeticError::OutOfRange => {
                EvalError::InvalidExpression("numeric result out of range".to_string())
            }
        }
    }
}

/// A successfully evaluated expression.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    /// The text after `M`/`U` substitution, written with `^` for powers.
    pub expression: String,
    pub value: Number,
}

/// Replaces every `M` with the memory value and every `U` with the last
/// result (`0` before any result exists).
///
/// This is plain text replacement: it does not look at tokens, so an `M` or
/// `U` anywhere in the input is replaced.
pub fn substitute(raw: &str, memory: &Number, last_result: Option<&Number>) -> String {
    let last = last_result
        .map(Number::source_text)
        .unwrap_or_else(|| "0".to_string());
    raw.replace('M', &memory.source_text()).replace('U', &last)
}

pub fn evaluate(
    raw: &str,
    memory: &Number,
    last_result: Option<&Number>,
) -> Result<Evaluation, EvalError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(EvalError::Empty);
    }
    let source = substitute(raw, memory, last_result).replace(POWER_SYMBOL, POWER_OPERATOR);
    let expr = parse_expr(&source)
        .map_err(|errors| EvalError::InvalidExpression(errors.iter().join("; ")))?;
    debug!(%expr, depth = expr.depth(), "parsed expression");
    let value = expr.evaluate()?;
    Ok(Evaluation {
        expression: source.replace(POWER_OPERATOR, POWER_SYMBOL),
        value,
    })
}
