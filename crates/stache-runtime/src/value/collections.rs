//! Sets, maps and objects.

use std::sync::Arc;

use indexmap::{IndexMap, IndexSet};

use super::list::len_as_int;
use super::params::method;
use super::{Indexable, List, Scalar, Value};
use crate::error::{EvalError, EvalResult};
use crate::identifier::{Identifier, InvalidIdentifier};

/// Properties every keyed collection shares.
fn size_property(len: usize, name: &str) -> Option<Value> {
    match name {
        "length" => Some(Value::Int(len_as_int(len))),
        "isEmpty" => Some(Value::Bool(len == 0)),
        "isNotEmpty" => Some(Value::Bool(len != 0)),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Set
// ---------------------------------------------------------------------------

/// A collection of unique scalars, iterated in insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Set(Arc<IndexSet<Scalar>>);

impl Set {
    pub fn new(items: IndexSet<Scalar>) -> Self {
        Self(Arc::new(items))
    }

    /// Build a set from values, failing on any value that is not equatable.
    pub fn from_values(values: impl IntoIterator<Item = Value>) -> Result<Self, EvalError> {
        let items = values
            .into_iter()
            .map(Scalar::try_from)
            .collect::<Result<IndexSet<_>, _>>()?;
        Ok(Self::new(items))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, item: &Scalar) -> bool {
        self.0.contains(item)
    }

    pub fn iter(&self) -> indexmap::set::Iter<'_, Scalar> {
        self.0.iter()
    }

    pub(crate) fn retrieve(&self, name: &str) -> EvalResult {
        if let Some(value) = size_property(self.len(), name) {
            return Ok(value);
        }
        match name {
            "contains" => method(self.clone(), "contains", &["item"], |set, p| {
                let found = Scalar::try_from(p.value(0)?).is_ok_and(|item| set.contains(&item));
                Ok(Value::Bool(found))
            }),
            _ => Err(EvalError::unknown_property(name)),
        }
    }
}

impl FromIterator<Scalar> for Set {
    fn from_iter<I: IntoIterator<Item = Scalar>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

// ---------------------------------------------------------------------------
// Map
// ---------------------------------------------------------------------------

/// A scalar-keyed collection, iterated in insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Map(Arc<IndexMap<Scalar, Value>>);

impl Map {
    pub fn new(entries: IndexMap<Scalar, Value>) -> Self {
        Self(Arc::new(entries))
    }

    /// Build a map from value pairs, failing on any key that is not equatable.
    pub fn from_entries(
        entries: impl IntoIterator<Item = (Value, Value)>,
    ) -> Result<Self, EvalError> {
        let entries = entries
            .into_iter()
            .map(|(key, value)| Scalar::try_from(key).map(|key| (key, value)))
            .collect::<Result<IndexMap<_, _>, _>>()?;
        Ok(Self::new(entries))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, key: &Scalar) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn iter(&self) -> indexmap::map::Iter<'_, Scalar, Value> {
        self.0.iter()
    }

    pub(crate) fn retrieve(&self, name: &str) -> EvalResult {
        if let Some(value) = size_property(self.len(), name) {
            return Ok(value);
        }
        match name {
            "keys" => Ok(Value::List(
                self.0.keys().cloned().map(Value::from).collect::<List>(),
            )),
            "values" => Ok(Value::List(self.0.values().cloned().collect())),
            "containsKey" => method(self.clone(), "containsKey", &["key"], |map, p| {
                let found = Scalar::try_from(p.value(0)?).is_ok_and(|key| map.0.contains_key(&key));
                Ok(Value::Bool(found))
            }),
            _ => Err(EvalError::unknown_property(name)),
        }
    }
}

impl FromIterator<(Scalar, Value)> for Map {
    fn from_iter<I: IntoIterator<Item = (Scalar, Value)>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl Indexable for Map {
    type Key = Scalar;

    const TYPE_NAME: &'static str = "Map";
    const KEY_TYPE: &'static str = "an equatable value";

    fn coerce_key(key: &Value) -> Option<Scalar> {
        Scalar::try_from(key).ok()
    }

    fn lookup(&self, key: &Scalar) -> Option<Value> {
        self.0.get(key).cloned()
    }
}

// ---------------------------------------------------------------------------
// Object
// ---------------------------------------------------------------------------

/// A record of named fields, iterated in insertion order.
///
/// Objects are also the scopes names are resolved against during rendering.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Object(Arc<IndexMap<Identifier, Value>>);

impl Object {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_fields(fields: IndexMap<Identifier, Value>) -> Self {
        Self(Arc::new(fields))
    }

    /// Build an object from name/value pairs, validating every name.
    ///
    /// ```
    /// use stache_runtime::{Object, Value};
    ///
    /// let user = Object::from_pairs([("name", Value::from("Ada"))]).unwrap();
    /// assert_eq!(user.get("name"), Some(&Value::from("Ada")));
    /// assert!(Object::from_pairs([("not valid", Value::Null)]).is_err());
    /// ```
    pub fn from_pairs<K, V>(
        pairs: impl IntoIterator<Item = (K, V)>,
    ) -> Result<Self, InvalidIdentifier>
    where
        K: Into<String>,
        V: Into<Value>,
    {
        let fields = pairs
            .into_iter()
            .map(|(name, value)| Identifier::new(name).map(|name| (name, value.into())))
            .collect::<Result<IndexMap<_, _>, _>>()?;
        Ok(Self::from_fields(fields))
    }

    /// A copy of this object with `name` set to `value`.
    pub fn with(&self, name: Identifier, value: impl Into<Value>) -> Self {
        let mut fields = (*self.0).clone();
        fields.insert(name, value.into());
        Self::from_fields(fields)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The field named `name`, ignoring built-in properties.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    pub fn iter(&self) -> indexmap::map::Iter<'_, Identifier, Value> {
        self.0.iter()
    }

    /// Fields first, then `length`, `isEmpty` and `isNotEmpty`.
    pub(crate) fn retrieve(&self, name: &str) -> EvalResult {
        if let Some(value) = self.get(name) {
            return Ok(value.clone());
        }
        size_property(self.len(), name).ok_or_else(|| EvalError::unknown_property(name))
    }
}

impl FromIterator<(Identifier, Value)> for Object {
    fn from_iter<I: IntoIterator<Item = (Identifier, Value)>>(iter: I) -> Self {
        Self::from_fields(iter.into_iter().collect())
    }
}

/// Objects are indexed by String; a string that is not a valid identifier
/// can never name a field and is reported as an unknown key.
impl Indexable for Object {
    type Key = String;

    const TYPE_NAME: &'static str = "Object";
    const KEY_TYPE: &'static str = "String";

    fn coerce_key(key: &Value) -> Option<String> {
        match key {
            Value::String(s) => Some(s.clone()),
            _ => None,
        }
    }

    fn lookup(&self, key: &String) -> Option<Value> {
        if !Identifier::is_valid(key) {
            return None;
        }
        self.get(key).cloned()
    }
}
