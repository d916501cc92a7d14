//! Evaluation errors.
//!
//! Every failure during rendering is an [`EvalError`]. The first one aborts
//! the render; no partial output is returned.

use crate::identifier::InvalidIdentifier;

/// Result type for evaluation.
pub type EvalResult<T = crate::Value> = Result<T, EvalError>;

/// Evaluation error.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EvalError {
    /// Free-form failure.
    #[error("{0}")]
    Message(String),

    /// A property or method name the value does not define.
    #[error("Unknown property: {name}")]
    UnknownProperty { name: String },

    /// An index out of range, or a key absent from a map or object.
    #[error("Unknown key: {key}")]
    UnknownKey { key: String },

    /// A name found in no scope.
    #[error("Undefined variable: {name}")]
    UnresolvedReference { name: String },

    /// An index whose runtime type the container does not accept.
    #[error("{container} cannot be indexed by {found}, expected {expected}")]
    KeyType {
        container: &'static str,
        expected: &'static str,
        found: &'static str,
    },

    #[error("{type_name} cannot be indexed")]
    NotIndexable { type_name: &'static str },

    #[error("{type_name} is not a function")]
    NotCallable { type_name: &'static str },

    /// A value used as a set element or map key that has no equality.
    #[error("{type_name} cannot be a set element or map key")]
    NotEquatable { type_name: &'static str },

    /// A bad argument to a built-in method.
    #[error("{method}: {message}")]
    Argument { method: String, message: String },

    #[error(transparent)]
    InvalidIdentifier(#[from] InvalidIdentifier),
}

impl EvalError {
    pub fn message(message: impl Into<String>) -> Self {
        EvalError::Message(message.into())
    }

    pub fn unknown_property(name: impl Into<String>) -> Self {
        EvalError::UnknownProperty { name: name.into() }
    }

    pub fn unknown_key(key: impl ToString) -> Self {
        EvalError::UnknownKey {
            key: key.to_string(),
        }
    }

    pub fn argument(method: impl Into<String>, message: impl Into<String>) -> Self {
        EvalError::Argument {
            method: method.into(),
            message: message.into(),
        }
    }

    pub fn is_unknown_property(&self) -> bool {
        matches!(self, EvalError::UnknownProperty { .. })
    }

    pub fn is_unknown_key(&self) -> bool {
        matches!(self, EvalError::UnknownKey { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        assert_eq!(EvalError::message("boom").to_string(), "boom");
        assert_eq!(
            EvalError::unknown_property("size").to_string(),
            "Unknown property: size"
        );
        assert_eq!(EvalError::unknown_key(7).to_string(), "Unknown key: 7");
        assert_eq!(
            EvalError::KeyType {
                container: "List",
                expected: "Int",
                found: "String"
            }
            .to_string(),
            "List cannot be indexed by String, expected Int"
        );
        assert_eq!(
            EvalError::argument("substring", "missing argument 'start'").to_string(),
            "substring: missing argument 'start'"
        );
    }

    #[test]
    fn test_kinds_are_distinguishable() {
        let property = EvalError::unknown_property("x");
        let key = EvalError::unknown_key("x");
        assert!(property.is_unknown_property() && !property.is_unknown_key());
        assert!(key.is_unknown_key() && !key.is_unknown_property());
    }
}
