use std::fmt;
use std::hash::{Hash, Hasher};

use super::{number, Value};
use crate::error::EvalError;

/// The equatable values: the only legal set elements and map keys.
///
/// Doubles compare with NaN equal to itself and `-0.0` equal to `0.0`, so
/// equality and hashing stay consistent.
#[derive(Debug, Clone)]
pub enum Scalar {
    Null,
    String(String),
    Bool(bool),
    Int(i64),
    Double(f64),
}

pub(crate) fn doubles_equal(a: f64, b: f64) -> bool {
    a == b || (a.is_nan() && b.is_nan())
}

fn double_bits(d: f64) -> u64 {
    if d.is_nan() {
        f64::NAN.to_bits()
    } else if d == 0.0 {
        0.0f64.to_bits()
    } else {
        d.to_bits()
    }
}

impl PartialEq for Scalar {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Scalar::Null, Scalar::Null) => true,
            (Scalar::String(a), Scalar::String(b)) => a == b,
            (Scalar::Bool(a), Scalar::Bool(b)) => a == b,
            (Scalar::Int(a), Scalar::Int(b)) => a == b,
            (Scalar::Double(a), Scalar::Double(b)) => doubles_equal(*a, *b),
            _ => false,
        }
    }
}

impl Eq for Scalar {}

impl Hash for Scalar {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Scalar::Null => 0u8.hash(state),
            Scalar::String(s) => s.hash(state),
            Scalar::Bool(b) => b.hash(state),
            Scalar::Int(i) => i.hash(state),
            Scalar::Double(d) => double_bits(*d).hash(state),
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Null => f.write_str("null"),
            Scalar::String(s) => f.write_str(s),
            Scalar::Bool(b) => write!(f, "{b}"),
            Scalar::Int(i) => write!(f, "{i}"),
            Scalar::Double(d) => f.write_str(&number::format_double(*d)),
        }
    }
}

impl From<Scalar> for Value {
    fn from(scalar: Scalar) -> Self {
        match scalar {
            Scalar::Null => Value::Null,
            Scalar::String(s) => Value::String(s),
            Scalar::Bool(b) => Value::Bool(b),
            Scalar::Int(i) => Value::Int(i),
            Scalar::Double(d) => Value::Double(d),
        }
    }
}

impl TryFrom<&Value> for Scalar {
    type Error = EvalError;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        match value {
            Value::Null => Ok(Scalar::Null),
            Value::String(s) => Ok(Scalar::String(s.clone())),
            Value::Bool(b) => Ok(Scalar::Bool(*b)),
            Value::Int(i) => Ok(Scalar::Int(*i)),
            Value::Double(d) => Ok(Scalar::Double(*d)),
            other => Err(EvalError::NotEquatable {
                type_name: other.type_name(),
            }),
        }
    }
}

impl TryFrom<Value> for Scalar {
    type Error = EvalError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::String(s) => Ok(Scalar::String(s)),
            other => Scalar::try_from(&other),
        }
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Scalar::String(value.to_string())
    }
}

impl From<i64> for Scalar {
    fn from(value: i64) -> Self {
        Scalar::Int(value)
    }
}
