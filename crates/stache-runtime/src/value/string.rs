//! String properties and methods.
//!
//! Lengths and positions count Unicode scalar values.

use super::params::method;
use super::{List, Params, Value};
use crate::error::{EvalError, EvalResult};

pub(crate) fn retrieve(s: &str, name: &str) -> EvalResult {
    match name {
        // Properties
        "length" => Ok(Value::Int(char_count(s))),
        "isEmpty" => Ok(Value::Bool(s.is_empty())),
        "isNotEmpty" => Ok(Value::Bool(!s.is_empty())),
        "toUpperCase" => Ok(Value::String(s.to_uppercase())),
        "toLowerCase" => Ok(Value::String(s.to_lowercase())),

        // Methods
        "substring" => method(s.to_string(), "substring", &["start", "end"], substring),
        "replace" => method(s.to_string(), "replace", &["from", "to", "all"], replace),
        "contains" => method(s.to_string(), "contains", &["other"], |s, p| {
            Ok(Value::Bool(s.contains(p.string(0)?)))
        }),
        "startsWith" => method(s.to_string(), "startsWith", &["prefix"], |s, p| {
            Ok(Value::Bool(s.starts_with(p.string(0)?)))
        }),
        "endsWith" => method(s.to_string(), "endsWith", &["suffix"], |s, p| {
            Ok(Value::Bool(s.ends_with(p.string(0)?)))
        }),
        "indexOf" => method(s.to_string(), "indexOf", &["other"], index_of),
        "split" => method(s.to_string(), "split", &["separator"], split),
        "trim" => method(s.to_string(), "trim", &[], |s, _| {
            Ok(Value::String(s.trim().to_string()))
        }),

        _ => Err(EvalError::unknown_property(name)),
    }
}

fn char_count(s: &str) -> i64 {
    i64::try_from(s.chars().count()).unwrap_or(i64::MAX)
}

/// `substring(start, end?)`: characters in `start..end`; `end` defaults to the length.
fn substring(s: &String, p: &Params<'_>) -> EvalResult {
    let length = char_count(s);
    let start = p.int(0)?;
    let end = p.optional_int(1)?.unwrap_or(length);

    if start < 0 || end > length || start > end {
        return Err(p.error(format!(
            "range {start}..{end} is out of bounds for length {length}"
        )));
    }

    let text = s
        .chars()
        .skip(start as usize)
        .take((end - start) as usize)
        .collect();
    Ok(Value::String(text))
}

/// `replace(from, to, all = true)`.
fn replace(s: &String, p: &Params<'_>) -> EvalResult {
    let from = p.string(0)?;
    let to = p.string(1)?;
    let replaced = if p.optional_bool(2)?.unwrap_or(true) {
        s.replace(from, to)
    } else {
        s.replacen(from, to, 1)
    };
    Ok(Value::String(replaced))
}

/// `indexOf(other)`: position of the first match, or -1.
fn index_of(s: &String, p: &Params<'_>) -> EvalResult {
    let other = p.string(0)?;
    let index = s
        .find(other)
        .map_or(-1, |byte_index| char_count(&s[..byte_index]));
    Ok(Value::Int(index))
}

/// `split(separator)`. An empty separator splits into characters.
fn split(s: &String, p: &Params<'_>) -> EvalResult {
    let separator = p.string(0)?;
    let parts: List = if separator.is_empty() {
        s.chars().map(|c| Value::String(c.to_string())).collect()
    } else {
        s.split(separator)
            .map(|part| Value::String(part.to_string()))
            .collect()
    };
    Ok(Value::List(parts))
}
