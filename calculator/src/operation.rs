use std::fmt::Display;

use interpreter::Number;
use num::{BigInt, BigUint, FromPrimitive, One, ToPrimitive};
use num_derive::FromPrimitive;

use crate::CalcError;

/// Largest factorial computed exactly without any warning.
pub const FACTORIAL_ADVISORY_LIMIT: u64 = 20;
/// Largest factorial computed at all. Anything above takes seconds to build
/// and print.
pub const MAX_FACTORIAL: u64 = 100_000;

/// Kind of a recorded operation. Discriminants match the main menu numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, FromPrimitive)]
#[repr(u32)]
pub enum OperationKind {
    Sum = 1,
    Sub = 2,
    Mul = 3,
    Div = 4,
    Mod = 5,
    Pow = 6,
    Sqrt = 7,
    Percent = 8,
    Factorial = 9,
    Expression = 10,
}

impl OperationKind {
    /// Menu choices `1`..=`9`. The expression evaluator has its own entry.
    pub fn from_menu(choice: &str) -> Option<Self> {
        choice
            .parse::<u32>()
            .ok()
            .and_then(Self::from_u32)
            .filter(|kind| *kind != OperationKind::Expression)
    }

    pub const fn name(self) -> &'static str {
        match self {
            OperationKind::Sum => "Sum",
            OperationKind::Sub => "Subtraction",
            OperationKind::Mul => "Multiplication",
            OperationKind::Div => "Division",
            OperationKind::Mod => "Modulo",
            OperationKind::Pow => "Power",
            OperationKind::Sqrt => "Square Root",
            OperationKind::Percent => "Percentage",
            OperationKind::Factorial => "Factorial",
            OperationKind::Expression => "Expression",
        }
    }

    pub const fn symbol(self) -> &'static str {
        match self {
            OperationKind::Sum => "+",
            OperationKind::Sub => "-",
            OperationKind::Mul => "×",
            OperationKind::Div => "÷",
            OperationKind::Mod => "%",
            OperationKind::Pow => "^",
            OperationKind::Sqrt => "√",
            OperationKind::Percent => "%",
            OperationKind::Factorial => "!",
            OperationKind::Expression => "=",
        }
    }

    pub const fn arity(self) -> usize {
        match self {
            OperationKind::Sqrt | OperationKind::Factorial | OperationKind::Expression => 1,
            _ => 2,
        }
    }
}

impl Display for OperationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// An arithmetic operation with its operands already resolved.
#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    Sum(Number, Number),
    Subtract(Number, Number),
    Multiply(Number, Number),
    Divide(Number, Number),
    Modulo(Number, Number),
    Power { base: Number, exponent: Number },
    SquareRoot(Number),
    Percent { value: Number, percent: Number },
    Factorial(Number),
}

/// Non-fatal remark attached to a successful calculation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advisory {
    LargeFactorial,
}

impl Display for Advisory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Advisory::LargeFactorial => write!(
                f,
                "factorials above {FACTORIAL_ADVISORY_LIMIT} grow very large"
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Calculation {
    pub kind: OperationKind,
    pub expression: String,
    pub value: Number,
    pub advisory: Option<Advisory>,
}

impl Calculation {
    fn new(kind: OperationKind, expression: String, value: Number) -> Self {
        Calculation {
            kind,
            expression,
            value,
            advisory: None,
        }
    }
}

impl Operation {
    /// Builds an operation from operands in prompt order.
    pub fn new(kind: OperationKind, operands: Vec<Number>) -> Option<Self> {
        let mut operands = operands.into_iter();
        let operation = match (kind, operands.next(), operands.next()) {
            (OperationKind::Sum, Some(a), Some(b)) => Operation::Sum(a, b),
            (OperationKind::Sub, Some(a), Some(b)) => Operation::Subtract(a, b),
            (OperationKind::Mul, Some(a), Some(b)) => Operation::Multiply(a, b),
            (OperationKind::Div, Some(a), Some(b)) => Operation::Divide(a, b),
            (OperationKind::Mod, Some(a), Some(b)) => Operation::Modulo(a, b),
            (OperationKind::Pow, Some(base), Some(exponent)) => {
                Operation::Power { base, exponent }
            }
            (OperationKind::Sqrt, Some(x), None) => Operation::SquareRoot(x),
            (OperationKind::Percent, Some(value), Some(percent)) => {
                Operation::Percent { value, percent }
            }
            (OperationKind::Factorial, Some(n), None) => Operation::Factorial(n),
            _ => return None,
        };
        operands.next().is_none().then_some(operation)
    }

    pub fn kind(&self) -> OperationKind {
        match self {
            Operation::Sum(..) => OperationKind::Sum,
            Operation::Subtract(..) => OperationKind::Sub,
            Operation::Multiply(..) => OperationKind::Mul,
            Operation::Divide(..) => OperationKind::Div,
            Operation::Modulo(..) => OperationKind::Mod,
            Operation::Power { .. } => OperationKind::Pow,
            Operation::SquareRoot(_) => OperationKind::Sqrt,
            Operation::Percent { .. } => OperationKind::Percent,
            Operation::Factorial(_) => OperationKind::Factorial,
        }
    }

    pub fn compute(&self) -> Result<Calculation, CalcError> {
        let kind = self.kind();
        let infix = |a: &Number, b: &Number| format!("{a} {} {b}", kind.symbol());
        let calculation = match self {
            Operation::Sum(a, b) => Calculation::new(kind, infix(a, b), a.checked_add(b)?),
            Operation::Subtract(a, b) => Calculation::new(kind, infix(a, b), a.checked_sub(b)?),
            Operation::Multiply(a, b) => Calculation::new(kind, infix(a, b), a.checked_mul(b)?),
            Operation::Divide(a, b) => Calculation::new(kind, infix(a, b), a.checked_div(b)?),
            Operation::Modulo(a, b) => {
                let a = Number::from(a.truncate().ok_or(CalcError::OutOfRange)?);
                let b = Number::from(b.truncate().ok_or(CalcError::OutOfRange)?);
                let value = a.checked_rem(&b)?;
                Calculation::new(kind, infix(&a, &b), value)
            }
            Operation::Power { base, exponent } => {
                Calculation::new(kind, infix(base, exponent), base.checked_pow(exponent)?)
            }
            Operation::SquareRoot(x) => {
                if x.is_negative() {
                    return Err(CalcError::NegativeInput("square root"));
                }
                Calculation::new(kind, format!("√{x}"), Number::Float(x.checked_f64()?.sqrt()))
            }
            Operation::Percent { value, percent } => {
                let result = value.checked_mul(percent)?.checked_div(&Number::from(100))?;
                Calculation::new(kind, format!("{value}% of {percent}"), result)
            }
            Operation::Factorial(n) => return factorial(n),
        };
        Ok(calculation)
    }
}

fn factorial(n: &Number) -> Result<Calculation, CalcError> {
    let n = n.truncate().ok_or(CalcError::OutOfRange)?;
    if n < BigInt::from(0) {
        return Err(CalcError::NegativeInput("factorial"));
    }
    let n = n
        .to_u64()
        .filter(|n| *n <= MAX_FACTORIAL)
        .ok_or(CalcError::OutOfRange)?;
    let value = (2..=n).fold(BigUint::one(), |acc, i| acc * i);
    Ok(Calculation {
        kind: OperationKind::Factorial,
        expression: format!("{n}!"),
        value: Number::from(BigInt::from(value)),
        advisory: (n > FACTORIAL_ADVISORY_LIMIT).then_some(Advisory::LargeFactorial),
    })
}
