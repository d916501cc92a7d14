//! Parameter binding for built-in methods.
//!
//! Each built-in method declares its parameter names in order. An argument
//! fills a parameter either by position or by name, so
//! `replace('a', 'b', all: false)` and `replace('a', 'b', false)` agree.

use super::{Arguments, Function, Value};
use crate::error::{EvalError, EvalResult};

/// Arguments bound to a built-in method's parameter list.
pub(crate) struct Params<'a> {
    method: &'static str,
    names: &'static [&'static str],
    arguments: &'a Arguments,
}

impl<'a> Params<'a> {
    /// Check arity and names against `names`.
    pub fn bind(
        method: &'static str,
        names: &'static [&'static str],
        arguments: &'a Arguments,
    ) -> Result<Self, EvalError> {
        if arguments.positional.len() > names.len() {
            return Err(EvalError::argument(
                method,
                format!(
                    "expected at most {} argument(s), got {}",
                    names.len(),
                    arguments.positional.len()
                ),
            ));
        }

        for name in arguments.named.keys() {
            match names.iter().position(|n| *n == name.as_str()) {
                None => {
                    return Err(EvalError::argument(
                        method,
                        format!("unknown named argument '{name}'"),
                    ))
                }
                Some(index) if index < arguments.positional.len() => {
                    return Err(EvalError::argument(
                        method,
                        format!("argument '{name}' given both by position and by name"),
                    ))
                }
                Some(_) => {}
            }
        }

        Ok(Self {
            method,
            names,
            arguments,
        })
    }

    pub fn error(&self, message: impl Into<String>) -> EvalError {
        EvalError::argument(self.method, message)
    }

    /// The argument for parameter `index`, treating `null` as absent.
    pub fn get(&self, index: usize) -> Option<&'a Value> {
        self.arguments
            .positional
            .get(index)
            .or_else(|| self.arguments.named.get(self.names[index]))
            .filter(|value| !value.is_null())
    }

    /// The argument for parameter `index`, where `null` is a real value.
    pub fn value(&self, index: usize) -> Result<&'a Value, EvalError> {
        self.arguments
            .positional
            .get(index)
            .or_else(|| self.arguments.named.get(self.names[index]))
            .ok_or_else(|| self.error(format!("missing argument '{}'", self.names[index])))
    }

    pub fn required(&self, index: usize) -> Result<&'a Value, EvalError> {
        self.get(index)
            .ok_or_else(|| self.error(format!("missing argument '{}'", self.names[index])))
    }

    pub fn string(&self, index: usize) -> Result<&'a str, EvalError> {
        match self.required(index)? {
            Value::String(s) => Ok(s),
            other => Err(self.type_error(index, "String", other)),
        }
    }

    pub fn int(&self, index: usize) -> Result<i64, EvalError> {
        match self.optional_int(index)? {
            Some(i) => Ok(i),
            None => Err(self.error(format!("missing argument '{}'", self.names[index]))),
        }
    }

    pub fn optional_int(&self, index: usize) -> Result<Option<i64>, EvalError> {
        match self.get(index) {
            None => Ok(None),
            Some(Value::Int(i)) => Ok(Some(*i)),
            Some(other) => Err(self.type_error(index, "Int", other)),
        }
    }

    pub fn optional_string(&self, index: usize) -> Result<Option<&'a str>, EvalError> {
        match self.get(index) {
            None => Ok(None),
            Some(Value::String(s)) => Ok(Some(s)),
            Some(other) => Err(self.type_error(index, "String", other)),
        }
    }

    pub fn optional_bool(&self, index: usize) -> Result<Option<bool>, EvalError> {
        match self.get(index) {
            None => Ok(None),
            Some(Value::Bool(b)) => Ok(Some(*b)),
            Some(other) => Err(self.type_error(index, "Bool", other)),
        }
    }

    fn type_error(&self, index: usize, expected: &str, found: &Value) -> EvalError {
        self.error(format!(
            "argument '{}' must be {expected}, got {}",
            self.names[index],
            found.type_name()
        ))
    }
}

/// A built-in method body: the receiver and its bound arguments.
pub(crate) type MethodBody<T> = fn(&T, &Params<'_>) -> EvalResult;

/// Bind a built-in method to a receiver, producing a callable value.
pub(crate) fn method<T>(
    receiver: T,
    name: &'static str,
    params: &'static [&'static str],
    body: MethodBody<T>,
) -> EvalResult
where
    T: Send + Sync + 'static,
{
    Ok(Value::Function(Function::sync(move |arguments| {
        let params = Params::bind(name, params, &arguments)?;
        body(&receiver, &params)
    })))
}
