use std::sync::Arc;

use super::params::method;
use super::{Indexable, Params, Value};
use crate::error::{EvalError, EvalResult};

/// An ordered sequence, indexable by non-negative Int.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct List(Arc<Vec<Value>>);

impl List {
    pub fn new(items: Vec<Value>) -> Self {
        Self(Arc::new(items))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Value> {
        self.0.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Value> {
        self.0.iter()
    }

    pub(crate) fn retrieve(&self, name: &str) -> EvalResult {
        match name {
            "length" => Ok(Value::Int(len_as_int(self.len()))),
            "isEmpty" => Ok(Value::Bool(self.is_empty())),
            "isNotEmpty" => Ok(Value::Bool(!self.is_empty())),
            "first" => self
                .0
                .first()
                .cloned()
                .ok_or_else(|| EvalError::message("first: the list is empty")),
            "last" => self
                .0
                .last()
                .cloned()
                .ok_or_else(|| EvalError::message("last: the list is empty")),

            "join" => method(self.clone(), "join", &["separator"], join),
            "reverse" => method(self.clone(), "reverse", &[], |list, _| {
                Ok(Value::List(list.iter().rev().cloned().collect()))
            }),
            "contains" => method(self.clone(), "contains", &["item"], |list, p| {
                let item = p.value(0)?;
                Ok(Value::Bool(list.iter().any(|v| v == item)))
            }),
            "indexOf" => method(self.clone(), "indexOf", &["item"], |list, p| {
                let item = p.value(0)?;
                let index = list.iter().position(|v| v == item);
                Ok(Value::Int(index.map_or(-1, len_as_int)))
            }),
            "slice" => method(self.clone(), "slice", &["start", "end"], slice),

            _ => Err(EvalError::unknown_property(name)),
        }
    }
}

pub(crate) fn len_as_int(len: usize) -> i64 {
    i64::try_from(len).unwrap_or(i64::MAX)
}

/// `join(separator = "")`: the items' rendered text, separated.
fn join(list: &List, p: &Params<'_>) -> EvalResult {
    let separator = p.optional_string(0)?.unwrap_or("");
    let parts: Vec<String> = list.iter().map(Value::to_string).collect();
    Ok(Value::String(parts.join(separator)))
}

/// `slice(start = 0, end?)`, with both bounds clamped to `0..=length`.
fn slice(list: &List, p: &Params<'_>) -> EvalResult {
    let length = len_as_int(list.len());
    let start = p.optional_int(0)?.unwrap_or(0).clamp(0, length) as usize;
    let end = p.optional_int(1)?.unwrap_or(length).clamp(0, length) as usize;

    if start >= end {
        return Ok(Value::List(List::default()));
    }
    Ok(Value::List(List::new(list.0[start..end].to_vec())))
}

impl FromIterator<Value> for List {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl Indexable for List {
    type Key = i64;

    const TYPE_NAME: &'static str = "List";
    const KEY_TYPE: &'static str = "Int";

    fn coerce_key(key: &Value) -> Option<i64> {
        match key {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    fn lookup(&self, key: &i64) -> Option<Value> {
        usize::try_from(*key)
            .ok()
            .and_then(|index| self.0.get(index))
            .cloned()
    }
}
