//! Runtime values.
//!
//! [`Value`] is a closed set of immutable variants. Every value answers
//! [`Value::retrieve`] for properties and methods; methods come back as
//! [`Function`] values bound to their receiver, to be invoked by a call
//! expression. Lists, maps and objects can also be indexed through
//! [`Indexable`].
//!
//! Operations that look like mutation (`reverse`, `slice`, `replace`, ...)
//! always build a new value.

mod collections;
mod function;
mod indexable;
mod json;
mod list;
mod number;
mod params;
mod scalar;
mod string;

pub use collections::{Map, Object, Set};
pub use function::{Arguments, Function};
pub use indexable::{for_key, Indexable};
pub use list::List;
pub use scalar::Scalar;

pub(crate) use params::Params;

use std::fmt;

use crate::error::{EvalError, EvalResult};

/// A runtime value.
#[derive(Debug, Clone, Default)]
pub enum Value {
    #[default]
    Null,
    String(String),
    Bool(bool),
    Int(i64),
    Double(f64),
    List(List),
    Set(Set),
    Map(Map),
    Object(Object),
    Function(Function),
    Arguments(Arguments),
}

/// The shared null value.
pub const NULL: Value = Value::Null;

impl Value {
    /// Name of the variant, for diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "Null",
            Value::String(_) => "String",
            Value::Bool(_) => "Bool",
            Value::Int(_) => "Int",
            Value::Double(_) => "Double",
            Value::List(_) => "List",
            Value::Set(_) => "Set",
            Value::Map(_) => "Map",
            Value::Object(_) => "Object",
            Value::Function(_) => "Function",
            Value::Arguments(_) => "Arguments",
        }
    }

    /// Whether this value can be a set element or map key.
    pub fn is_equatable(&self) -> bool {
        matches!(
            self,
            Value::Null | Value::String(_) | Value::Bool(_) | Value::Int(_) | Value::Double(_)
        )
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Look up a property or method by name.
    ///
    /// Methods resolve to a [`Function`] bound to this value. Names the
    /// value's type does not define fail with [`EvalError::UnknownProperty`];
    /// `null` defines none.
    pub fn retrieve(&self, name: &str) -> EvalResult {
        match self {
            Value::Null | Value::Bool(_) => Err(EvalError::unknown_property(name)),
            Value::String(s) => string::retrieve(s, name),
            Value::Int(i) => number::retrieve_int(*i, name),
            Value::Double(d) => number::retrieve_double(*d, name),
            Value::List(list) => list.retrieve(name),
            Value::Set(set) => set.retrieve(name),
            Value::Map(map) => map.retrieve(name),
            Value::Object(object) => object.retrieve(name),
            Value::Function(_) => match name {
                "call" => Ok(self.clone()),
                _ => Err(EvalError::unknown_property(name)),
            },
            Value::Arguments(arguments) => arguments.retrieve(name),
        }
    }

    /// Index into a list, map or object.
    pub fn index(&self, key: &Value) -> EvalResult {
        match self {
            Value::List(list) => for_key(list, key),
            Value::Map(map) => for_key(map, key),
            Value::Object(object) => for_key(object, key),
            other => Err(EvalError::NotIndexable {
                type_name: other.type_name(),
            }),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Double(a), Value::Double(b)) => scalar::doubles_equal(*a, *b),
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Set(a), Value::Set(b)) => a == b,
            (Value::Map(a), Value::Map(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => a == b,
            (Value::Function(a), Value::Function(b)) => a == b,
            (Value::Arguments(a), Value::Arguments(b)) => a == b,
            _ => false,
        }
    }
}

/// The text a value renders as in template output.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::String(s) => f.write_str(s),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(i) => write!(f, "{i}"),
            Value::Double(d) => f.write_str(&number::format_double(*d)),
            Value::List(list) => write_joined(f, "[", list.iter(), "]"),
            Value::Set(set) => write_joined(f, "{", set.iter(), "}"),
            Value::Map(map) => {
                f.write_str("{")?;
                for (i, (key, value)) in map.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{key}: {value}")?;
                }
                f.write_str("}")
            }
            Value::Object(object) => {
                f.write_str("{")?;
                for (i, (name, value)) in object.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{name}: {value}")?;
                }
                f.write_str("}")
            }
            Value::Function(_) => f.write_str("<function>"),
            Value::Arguments(arguments) => write!(f, "{arguments}"),
        }
    }
}

fn write_joined<T: fmt::Display>(
    f: &mut fmt::Formatter<'_>,
    open: &str,
    items: impl Iterator<Item = T>,
    close: &str,
) -> fmt::Result {
    f.write_str(open)?;
    for (i, item) in items.enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{item}")?;
    }
    f.write_str(close)
}

// ---------------------------------------------------------------------------
// Conversions
// ---------------------------------------------------------------------------

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Int(i64::from(value))
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Double(value)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::List(List::new(items))
    }
}

impl From<List> for Value {
    fn from(value: List) -> Self {
        Value::List(value)
    }
}

impl From<Set> for Value {
    fn from(value: Set) -> Self {
        Value::Set(value)
    }
}

impl From<Map> for Value {
    fn from(value: Map) -> Self {
        Value::Map(value)
    }
}

impl From<Object> for Value {
    fn from(value: Object) -> Self {
        Value::Object(value)
    }
}

impl From<Function> for Value {
    fn from(value: Function) -> Self {
        Value::Function(value)
    }
}

impl From<Arguments> for Value {
    fn from(value: Arguments) -> Self {
        Value::Arguments(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}
