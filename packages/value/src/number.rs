//! Numeric coercion and arithmetic used by aggregates.

use std::cmp::Ordering;

use crate::{Error, Value};

/// A number produced by coercing a value for arithmetic.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Number {
    Integer(i64),
    Float(f64),
}

impl Number {
    /// Parse a numeric string. Surrounding whitespace is allowed; trailing
    /// garbage is not.
    pub fn parse(s: &str) -> Option<Number> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return None;
        }
        if let Ok(i) = trimmed.parse::<i64>() {
            return Some(Number::Integer(i));
        }
        // Rust accepts "inf" and "NaN"; those are not numeric strings here.
        if !trimmed
            .bytes()
            .all(|b| b.is_ascii_digit() || matches!(b, b'.' | b'-' | b'+' | b'e' | b'E'))
        {
            return None;
        }
        trimmed.parse::<f64>().ok().map(Number::Float)
    }

    pub fn as_f64(self) -> f64 {
        match self {
            Number::Integer(i) => i as f64,
            Number::Float(f) => f,
        }
    }

    pub fn compare(&self, other: &Number) -> Option<Ordering> {
        match (self, other) {
            (Number::Integer(a), Number::Integer(b)) => Some(a.cmp(b)),
            (a, b) => a.as_f64().partial_cmp(&b.as_f64()),
        }
    }

    /// Addition; integer overflow falls back to floating point.
    pub fn add(self, other: Number) -> Number {
        match (self, other) {
            (Number::Integer(a), Number::Integer(b)) => match a.checked_add(b) {
                Some(sum) => Number::Integer(sum),
                None => Number::Float(a as f64 + b as f64),
            },
            (a, b) => Number::Float(a.as_f64() + b.as_f64()),
        }
    }

    /// Division; stays integral only when both sides are integers and the
    /// division is exact.
    pub fn div(self, other: Number) -> Result<Number, Error> {
        if other.as_f64() == 0.0 {
            return Err(Error::type_mismatch("division by zero"));
        }
        match (self, other) {
            (Number::Integer(a), Number::Integer(b)) if a.checked_rem(b) == Some(0) => {
                Ok(a.checked_div(b)
                    .map(Number::Integer)
                    .unwrap_or(Number::Float(a as f64 / b as f64)))
            }
            (a, b) => Ok(Number::Float(a.as_f64() / b.as_f64())),
        }
    }
}

impl From<Number> for Value {
    fn from(n: Number) -> Self {
        match n {
            Number::Integer(i) => Value::Integer(i),
            Number::Float(f) => Value::Float(f),
        }
    }
}

impl Value {
    /// Coerce the value to a number for arithmetic.
    ///
    /// Null counts as `0`, booleans as `0`/`1`, numeric strings are parsed.
    /// Non-numeric strings and containers are a type mismatch.
    pub fn to_number(&self) -> Result<Number, Error> {
        match self {
            Value::Null => Ok(Number::Integer(0)),
            Value::Bool(b) => Ok(Number::Integer(i64::from(*b))),
            Value::Integer(i) => Ok(Number::Integer(*i)),
            Value::Float(f) => Ok(Number::Float(*f)),
            Value::String(s) => Number::parse(s).ok_or_else(|| {
                Error::type_mismatch(format!("non-numeric value \"{}\" encountered", s))
            }),
            other => Err(Error::type_mismatch(format!(
                "unsupported operand type: {}",
                other.type_name()
            ))),
        }
    }
}
