use std::fmt::Display;

use crate::parser::Operator;

use super::{ArithmeticError, Number};

#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    Number(Number),
    Neg(Box<Expr>),
    Binary(Operator, Box<Expr>, Box<Expr>),
}

impl From<Number> for Expr {
    fn from(number: Number) -> Self {
        Expr::Number(number)
    }
}

impl Expr {
    pub fn binary(op: Operator, lhs: Expr, rhs: Expr) -> Self {
        Expr::Binary(op, Box::new(lhs), Box::new(rhs))
    }

    pub fn neg(expr: Expr) -> Self {
        Expr::Neg(Box::new(expr))
    }

    pub fn evaluate(&self) -> Result<Number, ArithmeticError> {
        match self {
            Expr::Number(number) => Ok(number.clone()),
            Expr::Neg(inner) => Ok(-inner.evaluate()?),
            Expr::Binary(op, lhs, rhs) => {
                let (lhs, rhs) = (lhs.evaluate()?, rhs.evaluate()?);
                match op {
                    Operator::Add => lhs.checked_add(&rhs),
                    Operator::Sub => lhs.checked_sub(&rhs),
                    Operator::Mul => lhs.checked_mul(&rhs),
                    Operator::Div => lhs.checked_div(&rhs),
                    Operator::Rem => lhs.checked_rem(&rhs),
                    Operator::Pow => lhs.checked_pow(&rhs),
                }
            }
        }
    }

    pub fn depth(&self) -> usize {
        match self {
            Expr::Number(_) => 1,
            Expr::Neg(inner) => inner.depth() + 1,
            Expr::Binary(_, lhs, rhs) => lhs.depth().max(rhs.depth()) + 1,
        }
    }
}

impl Display for Expr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Expr::Number(number) => write!(f, "{}", number.source_text()),
            Expr::Neg(inner) => write!(f, "-{inner}"),
            Expr::Binary(op, lhs, rhs) => write!(f, "({lhs} {op} {rhs})"),
        }
    }
}
