use std::fmt::Display;

use super::Number;

/// Decimal places kept before trailing zeros are stripped.
const PRECISION: usize = 10;

impl Display for Number {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Number::Int(int) => write!(f, "{int}"),
            Number::Float(float) => write!(f, "{}", format_float(*float)),
        }
    }
}

pub fn format_float(value: f64) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf" } else { "-inf" }.to_string();
    }
    if value == 0.0 {
        return "0".to_string();
    }
    if value.fract() == 0.0 {
        return format!("{value:.0}");
    }
    format!("{:.*}", PRECISION, value)
        .trim_end_matches('0')
        .trim_end_matches('.')
        .to_string()
}
