use std::ops::{Add, Mul, Neg, Sub};

use num::{BigInt, BigRational, FromPrimitive, Integer, One, Signed, ToPrimitive, Zero};

mod expr;
mod format;

pub use expr::Expr;
pub use format::format_float;

/// Largest integer power we materialize, measured in bits of the result.
const MAX_POW_BITS: u64 = 1 << 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithmeticError {
    DivisionByZero,
    OutOfRange,
}

/// A calculator value. Integers stay exact until something forces them into
/// floating point (true division, a float operand, a negative exponent).
#[derive(Debug, Clone, PartialEq)]
pub enum Number {
    Int(BigInt),
    Float(f64),
}

impl Default for Number {
    fn default() -> Self {
        Number::Float(0.0)
    }
}

impl From<i64> for Number {
    fn from(int: i64) -> Self {
        Number::Int(BigInt::from(int))
    }
}

impl From<BigInt> for Number {
    fn from(int: BigInt) -> Self {
        Number::Int(int)
    }
}

impl From<f64> for Number {
    fn from(float: f64) -> Self {
        Number::Float(float)
    }
}

impl Number {
    /// Turns a whole float into an `Int`, leaving every other value alone.
    pub fn collapse(value: f64) -> Self {
        if value.is_finite() && value.fract() == 0.0 {
            if let Some(int) = BigInt::from_f64(value) {
                return Number::Int(int);
            }
        }
        Number::Float(value)
    }

    pub fn to_f64(&self) -> f64 {
        match self {
            Number::Int(int) => int.to_f64().unwrap_or(f64::NAN),
            Number::Float(float) => *float,
        }
    }

    /// Like [`Number::to_f64`], but an integer too large for an `f64` is an
    /// error instead of an infinity.
    pub fn checked_f64(&self) -> Result<f64, ArithmeticError> {
        match self {
            Number::Int(int) => finite(int.to_f64()),
            Number::Float(float) => Ok(*float),
        }
    }

    fn float_pair(&self, rhs: &Number) -> Result<(f64, f64), ArithmeticError> {
        Ok((self.checked_f64()?, rhs.checked_f64()?))
    }

    pub fn is_zero(&self) -> bool {
        match self {
            Number::Int(int) => int.is_zero(),
            Number::Float(float) => *float == 0.0,
        }
    }

    pub fn is_negative(&self) -> bool {
        match self {
            Number::Int(int) => int.is_negative(),
            Number::Float(float) => *float < 0.0,
        }
    }

    pub fn is_integral(&self) -> bool {
        match self {
            Number::Int(_) => true,
            Number::Float(float) => float.is_finite() && float.fract() == 0.0,
        }
    }

    /// Integer part, rounding toward zero. `None` for infinities and NaN.
    pub fn truncate(&self) -> Option<BigInt> {
        match self {
            Number::Int(int) => Some(int.clone()),
            Number::Float(float) if float.is_finite() => BigInt::from_f64(float.trunc()),
            Number::Float(_) => None,
        }
    }

    /// Text that the expression parser reads back as the same value.
    pub fn source_text(&self) -> String {
        match self {
            Number::Int(int) => int.to_string(),
            Number::Float(float) => format!("{float:?}"),
        }
    }

    pub fn checked_div(&self, rhs: &Number) -> Result<Number, ArithmeticError> {
        if rhs.is_zero() {
            return Err(ArithmeticError::DivisionByZero);
        }
        match (self, rhs) {
            (Number::Int(a), Number::Int(b)) => {
                finite(BigRational::new(a.clone(), b.clone()).to_f64()).map(Number::Float)
            }
            _ => {
                let (a, b) = self.float_pair(rhs)?;
                Ok(Number::Float(a / b))
            }
        }
    }

    /// Remainder taking the sign of the divisor.
    pub fn checked_rem(&self, rhs: &Number) -> Result<Number, ArithmeticError> {
        if rhs.is_zero() {
            return Err(ArithmeticError::DivisionByZero);
        }
        match (self, rhs) {
            (Number::Int(a), Number::Int(b)) => Ok(Number::Int(a.mod_floor(b))),
            _ => {
                let (a, b) = self.float_pair(rhs)?;
                let rem = a % b;
                if rem != 0.0 && (rem < 0.0) != (b < 0.0) {
                    Ok(Number::Float(rem + b))
                } else {
                    Ok(Number::Float(rem))
                }
            }
        }
    }

    pub fn checked_pow(&self, exponent: &Number) -> Result<Number, ArithmeticError> {
        if let (Number::Int(base), Number::Int(exp)) = (self, exponent) {
            if !exp.is_negative() {
                return int_pow(base, exp).map(Number::Int);
            }
        }
        let (base, exp) = self.float_pair(exponent)?;
        if base == 0.0 && exp < 0.0 {
            return Err(ArithmeticError::DivisionByZero);
        }
        let result = base.powf(exp);
        if result.is_infinite() && base.is_finite() && exp.is_finite() {
            return Err(ArithmeticError::OutOfRange);
        }
        Ok(Number::Float(result))
    }
}

fn finite(float: Option<f64>) -> Result<f64, ArithmeticError> {
    float
        .filter(|float| float.is_finite())
        .ok_or(ArithmeticError::OutOfRange)
}

fn int_pow(base: &BigInt, exp: &BigInt) -> Result<BigInt, ArithmeticError> {
    if base.is_zero() {
        return Ok(if exp.is_zero() { BigInt::one() } else { BigInt::zero() });
    }
    if base.abs().is_one() {
        return Ok(if base.is_negative() && exp.is_odd() {
            -BigInt::one()
        } else {
            BigInt::one()
        });
    }
    let exp = exp.to_u64().ok_or(ArithmeticError::OutOfRange)?;
    if base.bits().saturating_mul(exp) > MAX_POW_BITS {
        return Err(ArithmeticError::OutOfRange);
    }
    Ok(num::pow(base.clone(), exp as usize))
}

macro_rules! impl_arith {
    ($trait:ident, $method:ident, $checked:ident, $op:tt) => {
        impl Number {
            pub fn $checked(&self, rhs: &Number) -> Result<Number, ArithmeticError> {
                match (self, rhs) {
                    (Number::Int(a), Number::Int(b)) => Ok(Number::Int(a $op b)),
                    _ => {
                        let (a, b) = self.float_pair(rhs)?;
                        Ok(Number::Float(a $op b))
                    }
                }
            }
        }

        impl $trait for &Number {
            type Output = Number;

            fn $method(self, rhs: Self) -> Number {
                match (self, rhs) {
                    (Number::Int(a), Number::Int(b)) => Number::Int(a $op b),
                    _ => Number::Float(self.to_f64() $op rhs.to_f64()),
                }
            }
        }

        impl $trait for Number {
            type Output = Number;

            fn $method(self, rhs: Self) -> Number {
                &self $op &rhs
            }
        }
    };
}

// The operators saturate to infinity when a huge integer meets a float; the
// `checked_*` forms report `OutOfRange` instead.
impl_arith!(Add, add, checked_add, +);
impl_arith!(Sub, sub, checked_sub, -);
impl_arith!(Mul, mul, checked_mul, *);

impl Neg for &Number {
    type Output = Number;

    fn neg(self) -> Number {
        match self {
            Number::Int(int) => Number::Int(-int),
            Number::Float(float) => Number::Float(-float),
        }
    }
}

impl Neg for Number {
    type Output = Number;

    fn neg(self) -> Number {
        -&self
    }
}
