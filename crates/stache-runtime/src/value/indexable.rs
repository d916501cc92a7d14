use super::Value;
use crate::error::{EvalError, EvalResult};

/// A value that supports `value[key]`.
///
/// Implementors say which runtime key type they accept and how to look a
/// converted key up; [`for_key`] does the type check and error mapping for
/// all of them.
pub trait Indexable {
    /// The key after conversion from a runtime value.
    type Key;

    /// Type name of the container, for diagnostics.
    const TYPE_NAME: &'static str;

    /// Name of the accepted runtime key type, for diagnostics.
    const KEY_TYPE: &'static str;

    /// Convert a runtime key, or `None` if its type is not accepted.
    fn coerce_key(key: &Value) -> Option<Self::Key>;

    /// Look up a converted key, or `None` if absent or out of range.
    fn lookup(&self, key: &Self::Key) -> Option<Value>;
}

/// Check `key`'s runtime type, then look it up.
///
/// Fails with [`EvalError::KeyType`] for a key of the wrong type and with
/// [`EvalError::UnknownKey`] when the key is absent.
pub fn for_key<I: Indexable>(container: &I, key: &Value) -> EvalResult {
    let typed = I::coerce_key(key).ok_or(EvalError::KeyType {
        container: I::TYPE_NAME,
        expected: I::KEY_TYPE,
        found: key.type_name(),
    })?;
    container
        .lookup(&typed)
        .ok_or_else(|| EvalError::unknown_key(key))
}
