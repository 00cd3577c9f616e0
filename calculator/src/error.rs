use interpreter::{ArithmeticError, EvalError};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CalcError {
    #[error("'{0}' is not a valid number")]
    InvalidOperand(String),
    #[error("cannot divide by zero")]
    DivisionByZero,
    #[error("{0} is not defined for negative numbers")]
    NegativeInput(&'static str),
    #[error("empty expression")]
    EmptyExpression,
    #[error("invalid expression ({0})")]
    InvalidExpression(String),
    #[error("result out of range")]
    OutOfRange,
}

impl From<ArithmeticError> for CalcError {
    fn from(err: ArithmeticError) -> Self {
        match err {
            ArithmeticError::DivisionByZero => CalcError::DivisionByZero,
            ArithmeticError::OutOfRange => CalcError::OutOfRange,
        }
    }
}

impl From<EvalError> for CalcError {
    fn from(err: EvalError) -> Self {
        match err {
            EvalError::Empty => CalcError::EmptyExpression,
            EvalError::DivideByZero => CalcError::DivisionByZero,
            EvalError::InvalidExpression(detail) => CalcError::InvalidExpression(detail),
        }
    }
}
