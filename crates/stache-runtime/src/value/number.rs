//! Int and Double properties and methods.

use super::params::method;
use super::{Params, Value};
use crate::error::{EvalError, EvalResult};

const MAX_FIXED_PRECISION: i64 = 20;

/// Extra digits formatted past the requested precision to detect exact ties.
const TIE_GUARD_DIGITS: usize = 30;

pub(crate) fn retrieve_int(i: i64, name: &str) -> EvalResult {
    match name {
        "isEven" => Ok(Value::Bool(i % 2 == 0)),
        "isOdd" => Ok(Value::Bool(i % 2 != 0)),
        "abs" => method(i, "abs", &[], |i, p| {
            i.checked_abs()
                .map(Value::Int)
                .ok_or_else(|| p.error("integer overflow"))
        }),
        "round" => method(i, "round", &[], |i, _| Ok(Value::Int(*i))),
        "floor" => method(i, "floor", &[], |i, _| Ok(Value::Int(*i))),
        "ceil" => method(i, "ceil", &[], |i, _| Ok(Value::Int(*i))),
        "toStringAsFixed" => {
            method(i as f64, "toStringAsFixed", &["precision"], to_string_as_fixed)
        }
        _ => Err(EvalError::unknown_property(name)),
    }
}

pub(crate) fn retrieve_double(d: f64, name: &str) -> EvalResult {
    match name {
        "abs" => method(d, "abs", &[], |d, _| Ok(Value::Double(d.abs()))),
        "round" => method(d, "round", &[], |d, p| to_int(d.round(), p)),
        "floor" => method(d, "floor", &[], |d, p| to_int(d.floor(), p)),
        "ceil" => method(d, "ceil", &[], |d, p| to_int(d.ceil(), p)),
        "toStringAsFixed" => method(d, "toStringAsFixed", &["precision"], to_string_as_fixed),
        _ => Err(EvalError::unknown_property(name)),
    }
}

/// Convert an already-rounded double to an Int.
fn to_int(d: f64, p: &Params<'_>) -> EvalResult {
    if !d.is_finite() || d < i64::MIN as f64 || d >= i64::MAX as f64 {
        return Err(p.error(format!("{} cannot be converted to Int", format_double(d))));
    }
    Ok(Value::Int(d as i64))
}

/// `toStringAsFixed(precision)`: decimal text with exactly `precision` fraction digits.
fn to_string_as_fixed(d: &f64, p: &Params<'_>) -> EvalResult {
    let precision = p.int(0)?;
    if !(0..=MAX_FIXED_PRECISION).contains(&precision) {
        return Err(p.error(format!(
            "precision must be between 0 and {MAX_FIXED_PRECISION}, got {precision}"
        )));
    }
    if !d.is_finite() || d.abs() >= 1e21 {
        return Ok(Value::String(format_double(*d)));
    }
    Ok(Value::String(round_half_away(*d, precision as usize)))
}

/// Fixed-point text of a finite `d` with ties rounded away from zero.
///
/// `format!` rounds exact ties to even, so a tie is detected on the exact
/// expansion and the kept digits are incremented by hand.
fn round_half_away(d: f64, precision: usize) -> String {
    let exact = format!("{:.*}", precision + TIE_GUARD_DIGITS, d.abs());
    let (kept, rest) = exact.split_at(exact.len() - TIE_GUARD_DIGITS);
    let is_tie = rest.starts_with('5') && rest[1..].bytes().all(|b| b == b'0');
    if !is_tie {
        return format!("{:.*}", precision, d);
    }

    let mut digits: Vec<char> = kept.trim_end_matches('.').chars().collect();
    let mut carry = true;
    for digit in digits.iter_mut().rev() {
        match *digit {
            '.' => continue,
            '9' => *digit = '0',
            _ => {
                *digit = char::from(*digit as u8 + 1);
                carry = false;
                break;
            }
        }
    }
    if carry {
        digits.insert(0, '1');
    }
    if d.is_sign_negative() {
        digits.insert(0, '-');
    }
    digits.into_iter().collect()
}

/// Render a double the way template output shows it: integral values keep a
/// trailing `.0`, non-finite values are spelled out, and magnitudes from
/// `1e21` up or below `1e-6` use a signed exponent.
pub(crate) fn format_double(d: f64) -> String {
    if d.is_nan() {
        "NaN".to_string()
    } else if d == f64::INFINITY {
        "Infinity".to_string()
    } else if d == f64::NEG_INFINITY {
        "-Infinity".to_string()
    } else if d.abs() >= 1e21 || (d != 0.0 && d.abs() < 1e-6) {
        exponential(d)
    } else if d.fract() == 0.0 {
        format!("{d:.1}")
    } else {
        d.to_string()
    }
}

/// Shortest exponent form with the exponent always signed: `1e+21`, `1.5e-7`.
fn exponential(d: f64) -> String {
    let text = format!("{d:e}");
    match text.split_once('e') {
        Some((mantissa, exponent)) if !exponent.starts_with('-') => {
            format!("{mantissa}e+{exponent}")
        }
        _ => text,
    }
}
