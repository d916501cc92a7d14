use std::fmt;
use std::future::Future;
use std::sync::Arc;

use futures_util::future::{self, BoxFuture, FutureExt};
use indexmap::IndexMap;

use super::{List, Object, Value};
use crate::error::{EvalError, EvalResult};
use crate::identifier::Identifier;

type Callable = dyn Fn(Arguments) -> BoxFuture<'static, EvalResult> + Send + Sync;

/// A callable value.
///
/// Calls may suspend, so invoking a function yields a future. Built-in
/// methods use [`Function::sync`] and resolve immediately.
#[derive(Clone)]
pub struct Function {
    callable: Arc<Callable>,
}

impl Function {
    /// Wrap an asynchronous callable.
    pub fn new<F, Fut>(callable: F) -> Self
    where
        F: Fn(Arguments) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = EvalResult> + Send + 'static,
    {
        Self {
            callable: Arc::new(move |arguments| callable(arguments).boxed()),
        }
    }

    /// Wrap a callable that never suspends.
    pub fn sync<F>(callable: F) -> Self
    where
        F: Fn(Arguments) -> EvalResult + Send + Sync + 'static,
    {
        Self {
            callable: Arc::new(move |arguments| future::ready(callable(arguments)).boxed()),
        }
    }

    pub fn call(&self, arguments: Arguments) -> BoxFuture<'static, EvalResult> {
        (self.callable)(arguments)
    }
}

/// Functions are equal only to themselves.
impl PartialEq for Function {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.callable, &other.callable)
    }
}

impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Function")
    }
}

/// Arguments passed to a [`Function`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Arguments {
    pub positional: Vec<Value>,
    pub named: IndexMap<Identifier, Value>,
}

impl Arguments {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn positional(values: impl IntoIterator<Item = Value>) -> Self {
        Self {
            positional: values.into_iter().collect(),
            named: IndexMap::new(),
        }
    }

    /// Add a named argument, replacing any earlier value for `name`.
    pub fn with_named(mut self, name: Identifier, value: impl Into<Value>) -> Self {
        self.named.insert(name, value.into());
        self
    }

    pub fn get(&self, index: usize) -> Option<&Value> {
        self.positional.get(index)
    }

    pub fn get_named(&self, name: &str) -> Option<&Value> {
        self.named.get(name)
    }

    pub(crate) fn retrieve(&self, name: &str) -> EvalResult {
        match name {
            "positional" => Ok(Value::List(List::new(self.positional.clone()))),
            "named" => Ok(Value::Object(Object::from_fields(self.named.clone()))),
            _ => Err(EvalError::unknown_property(name)),
        }
    }
}

impl fmt::Display for Arguments {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("(")?;
        let positional = self.positional.iter().map(|v| v.to_string());
        let named = self.named.iter().map(|(k, v)| format!("{k}: {v}"));
        for (i, part) in positional.chain(named).enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            f.write_str(&part)?;
        }
        f.write_str(")")
    }
}
