//! Conversion from JSON host data.

use indexmap::IndexMap;
use serde_json::Value as Json;

use super::{List, Object, Scalar, Value};
use crate::error::EvalError;
use crate::identifier::Identifier;

impl Value {
    /// Convert JSON into a runtime value.
    ///
    /// Integers that fit in an i64 become `Int`, every other number a
    /// `Double`. Objects whose keys are all valid identifiers become
    /// [`Object`]s; any other JSON object becomes a String-keyed [`Map`].
    pub fn from_json(json: Json) -> Value {
        match json {
            Json::Null => Value::Null,
            Json::Bool(b) => Value::Bool(b),
            Json::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => n.as_f64().map_or(Value::Null, Value::Double),
            },
            Json::String(s) => Value::String(s),
            Json::Array(items) => {
                Value::List(items.into_iter().map(Value::from_json).collect::<List>())
            }
            Json::Object(fields) => {
                if fields.keys().all(|key| Identifier::is_valid(key)) {
                    Value::Object(object_from_fields(fields))
                } else {
                    Value::Map(
                        fields
                            .into_iter()
                            .map(|(key, value)| (Scalar::String(key), Value::from_json(value)))
                            .collect(),
                    )
                }
            }
        }
    }
}

impl From<Json> for Value {
    fn from(json: Json) -> Self {
        Value::from_json(json)
    }
}

fn object_from_fields(fields: serde_json::Map<String, Json>) -> Object {
    fields
        .into_iter()
        .filter_map(|(key, value)| {
            Identifier::new(key)
                .ok()
                .map(|name| (name, Value::from_json(value)))
        })
        .collect()
}

impl Object {
    /// Convert a JSON object into an [`Object`], as used for render contexts.
    ///
    /// Fails if `json` is not an object or has a key that is not a valid
    /// identifier.
    pub fn from_json(json: Json) -> Result<Object, EvalError> {
        match json {
            Json::Object(fields) => {
                let mut converted = IndexMap::with_capacity(fields.len());
                for (key, value) in fields {
                    converted.insert(Identifier::new(key)?, Value::from_json(value));
                }
                Ok(Object::from_fields(converted))
            }
            other => Err(EvalError::message(format!(
                "Expected a JSON object, got {}",
                json_type_name(&other)
            ))),
        }
    }
}

fn json_type_name(json: &Json) -> &'static str {
    match json {
        Json::Null => "null",
        Json::Bool(_) => "a boolean",
        Json::Number(_) => "a number",
        Json::String(_) => "a string",
        Json::Array(_) => "an array",
        Json::Object(_) => "an object",
    }
}
