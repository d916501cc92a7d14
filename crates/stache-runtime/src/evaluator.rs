//! Tree-walking evaluator.
//!
//! Walks a [`Statement`] tree against a scope chain and appends rendered
//! text to one output buffer. Sub-expressions are awaited strictly in source
//! order, one at a time, so side effects in user functions happen in a
//! predictable sequence.

use futures_util::future::{BoxFuture, FutureExt};
use stache_parser::{Expression, Literal, Statement};

use crate::error::{EvalError, EvalResult};
use crate::identifier::Identifier;
use crate::value::{Arguments, Object, Value};

/// Evaluates statements and expressions against a chain of scopes.
///
/// Scopes are ordered outermost first. Name lookup searches from the last
/// scope back to the first, so inner scopes shadow outer ones.
#[derive(Debug, Clone, Default)]
pub struct Evaluator {
    scopes: Vec<Object>,
}

impl Evaluator {
    pub fn new(scopes: Vec<Object>) -> Self {
        Self { scopes }
    }

    /// Add an innermost scope.
    pub fn push_scope(&mut self, scope: Object) {
        self.scopes.push(scope);
    }

    /// Resolve a variable name, innermost scope first.
    ///
    /// Each scope answers like a property access on it: declared fields
    /// first, then the object's built-in properties (`length`, `isEmpty`,
    /// `isNotEmpty`). An unknown property moves on to the next scope; any
    /// other error is returned as is.
    pub fn resolve(&self, name: &str) -> EvalResult {
        for scope in self.scopes.iter().rev() {
            match scope.retrieve(name) {
                Ok(value) => return Ok(value),
                Err(e) if e.is_unknown_property() => continue,
                Err(e) => return Err(e),
            }
        }
        tracing::trace!(name, scopes = self.scopes.len(), "unresolved reference");
        Err(EvalError::UnresolvedReference {
            name: name.to_string(),
        })
    }

    /// Render a statement tree to text.
    ///
    /// The first error aborts the render and discards any partial output.
    pub async fn render(&self, statement: &Statement) -> EvalResult<String> {
        let mut output = String::new();
        self.execute(statement, &mut output).await?;
        Ok(output)
    }

    /// Execute a statement, appending its output to `output`.
    pub fn execute<'a>(
        &'a self,
        statement: &'a Statement,
        output: &'a mut String,
    ) -> BoxFuture<'a, EvalResult<()>> {
        async move {
            match statement {
                Statement::Ordered(children) => {
                    for child in children {
                        self.execute(child, output).await?;
                    }
                }
                Statement::Text(text) => output.push_str(text),
                Statement::Expression(expression) => {
                    let value = self.evaluate(expression).await?;
                    output.push_str(&value.to_string());
                }
            }
            Ok(())
        }
        .boxed()
    }

    /// Evaluate an expression to a value.
    pub fn evaluate<'a>(&'a self, expression: &'a Expression) -> BoxFuture<'a, EvalResult> {
        async move {
            match expression {
                Expression::Identifier(token) => self.resolve(&token.value),

                Expression::Literal { value, .. } => Ok(literal_value(value)),

                Expression::Property { object, property } => {
                    let object = self.evaluate(object).await?;
                    object.retrieve(&property.value)
                }

                Expression::Index { object, index } => {
                    let object = self.evaluate(object).await?;
                    let key = self.evaluate(index).await?;
                    object.index(&key)
                }

                Expression::Call {
                    callee,
                    positional,
                    named,
                } => {
                    let function = match self.evaluate(callee).await? {
                        Value::Function(function) => function,
                        other => {
                            return Err(EvalError::NotCallable {
                                type_name: other.type_name(),
                            })
                        }
                    };

                    let mut arguments = Arguments::new();
                    for argument in positional {
                        arguments.positional.push(self.evaluate(argument).await?);
                    }
                    for (name, argument) in named {
                        let name = Identifier::new(name.as_str())?;
                        let value = self.evaluate(argument).await?;
                        arguments.named.insert(name, value);
                    }

                    function.call(arguments).await
                }
            }
        }
        .boxed()
    }
}

fn literal_value(literal: &Literal) -> Value {
    match literal {
        Literal::Null => Value::Null,
        Literal::String(s) => Value::String(s.clone()),
        Literal::Int(i) => Value::Int(*i),
        Literal::Double(d) => Value::Double(*d),
        Literal::Bool(b) => Value::Bool(*b),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Function;
    use pretty_assertions::assert_eq;
    use stache_parser::Parser;
    use std::sync::{Arc, Mutex};

    /// Helper: parse and render against the given scopes.
    async fn render(source: &str, scopes: Vec<Object>) -> EvalResult<String> {
        let statement = Parser::parse(source).expect("template should parse");
        Evaluator::new(scopes).render(&statement).await
    }

    fn scope(pairs: Vec<(&str, Value)>) -> Object {
        Object::from_pairs(pairs).unwrap()
    }

    // =========================================================================
    // Statements
    // =========================================================================

    #[tokio::test]
    async fn test_text_and_expressions() {
        let context = scope(vec![("name", Value::from("World"))]);
        assert_eq!(
            render("Hello, {{ name }}!", vec![context]).await,
            Ok("Hello, World!".to_string())
        );
    }

    #[tokio::test]
    async fn test_empty_template() {
        assert_eq!(render("", vec![]).await, Ok(String::new()));
    }

    #[tokio::test]
    async fn test_value_rendering() {
        let context = scope(vec![
            ("items", Value::from(vec![Value::Int(1), Value::Double(2.0)])),
            ("missing", Value::Null),
        ]);
        assert_eq!(
            render("{{ items }} {{ missing }} {{ true }}", vec![context]).await,
            Ok("[1, 2.0] null true".to_string())
        );
    }

    // =========================================================================
    // Scopes
    // =========================================================================

    #[tokio::test]
    async fn test_inner_scope_shadows_outer() {
        let globals = scope(vec![("a", Value::from("global")), ("b", Value::from("global"))]);
        let context = scope(vec![("a", Value::from("context"))]);
        assert_eq!(
            render("{{ a }} {{ b }}", vec![globals, context]).await,
            Ok("context global".to_string())
        );
    }

    #[tokio::test]
    async fn test_unresolved_reference() {
        let err = render("{{ nobody }}", vec![Object::new()]).await.unwrap_err();
        assert_eq!(
            err,
            EvalError::UnresolvedReference {
                name: "nobody".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_scope_builtin_properties_resolve() {
        let context = scope(vec![("x", Value::Int(1))]);
        assert_eq!(
            render("{{ isEmpty }} {{ isNotEmpty }} {{ length }}", vec![context]).await,
            Ok("false true 1".to_string())
        );
    }

    #[tokio::test]
    async fn test_scope_field_wins_over_builtin_property() {
        let context = scope(vec![("length", Value::from("declared"))]);
        assert_eq!(
            render("{{ length }}", vec![context]).await,
            Ok("declared".to_string())
        );
    }

    #[tokio::test]
    async fn test_inner_builtin_property_shadows_outer_field() {
        let globals = scope(vec![("isEmpty", Value::from("global"))]);
        let context = scope(vec![("x", Value::Int(1))]);
        assert_eq!(
            render("{{ isEmpty }}", vec![globals, context]).await,
            Ok("false".to_string())
        );
    }

    #[tokio::test]
    async fn test_empty_scope_builtin_properties() {
        assert_eq!(
            render("{{ isEmpty }} {{ length }}", vec![Object::new()]).await,
            Ok("true 0".to_string())
        );
    }

    #[tokio::test]
    async fn test_null_field_resolves() {
        let context = scope(vec![("nothing", Value::Null)]);
        assert_eq!(render("{{ nothing }}", vec![context]).await, Ok("null".to_string()));
    }

    // =========================================================================
    // Expressions
    // =========================================================================

    #[tokio::test]
    async fn test_literals() {
        assert_eq!(
            render("{{ 'hi' }} {{ 42 }} {{ -1.5 }} {{ false }} {{ null }}", vec![]).await,
            Ok("hi 42 -1.5 false null".to_string())
        );
    }

    #[tokio::test]
    async fn test_property_chain() {
        let user = scope(vec![("name", Value::from("ada"))]);
        let context = scope(vec![("user", Value::Object(user))]);
        assert_eq!(
            render("{{ user.name.toUpperCase }} {{ user.name.length }}", vec![context]).await,
            Ok("ADA 3".to_string())
        );
    }

    #[tokio::test]
    async fn test_method_call() {
        let context = scope(vec![("title", Value::from("a-b-c"))]);
        assert_eq!(
            render("{{ title.replace('-', ' ', all: false) }}", vec![context]).await,
            Ok("a b-c".to_string())
        );
    }

    #[tokio::test]
    async fn test_index() {
        let context = scope(vec![(
            "items",
            Value::from(vec![Value::from("x"), Value::from("y")]),
        )]);
        assert_eq!(render("{{ items[1] }}", vec![context]).await, Ok("y".to_string()));
    }

    #[tokio::test]
    async fn test_index_errors() {
        let context = scope(vec![
            ("items", Value::from(vec![Value::Int(1)])),
            ("count", Value::Int(3)),
        ]);
        let out_of_range = render("{{ items[5] }}", vec![context.clone()]).await.unwrap_err();
        assert!(out_of_range.is_unknown_key());

        let not_indexable = render("{{ count[0] }}", vec![context]).await.unwrap_err();
        assert_eq!(not_indexable, EvalError::NotIndexable { type_name: "Int" });
    }

    #[tokio::test]
    async fn test_call_non_function() {
        let context = scope(vec![("name", Value::from("x"))]);
        let err = render("{{ name() }}", vec![context]).await.unwrap_err();
        assert_eq!(err, EvalError::NotCallable { type_name: "String" });
        assert_eq!(err.to_string(), "String is not a function");
    }

    #[tokio::test]
    async fn test_unknown_property() {
        let context = scope(vec![("name", Value::from("x"))]);
        let err = render("{{ name.size }}", vec![context]).await.unwrap_err();
        assert!(err.is_unknown_property());
    }

    // =========================================================================
    // Calls
    // =========================================================================

    #[tokio::test]
    async fn test_user_function_receives_arguments() {
        let echo = Function::sync(|arguments| Ok(Value::Arguments(arguments)));
        let context = scope(vec![("f", Value::Function(echo))]);
        assert_eq!(
            render("{{ f(name: 'a', 1, age: 2, 'b') }}", vec![context]).await,
            Ok("(1, b, name: a, age: 2)".to_string())
        );
    }

    #[tokio::test]
    async fn test_arguments_are_evaluated_in_source_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let record = {
            let log = Arc::clone(&log);
            Function::new(move |arguments: Arguments| {
                let log = Arc::clone(&log);
                async move {
                    tokio::task::yield_now().await;
                    let label = arguments.get(0).cloned().unwrap_or_default();
                    log.lock().unwrap().push(label.to_string());
                    Ok(label)
                }
            })
        };
        let ignore = Function::sync(|_| Ok(Value::Null));
        let context = scope(vec![
            ("r", Value::Function(record)),
            ("f", Value::Function(ignore)),
        ]);

        let result = render(
            "{{ f(r('p1'), b: r('n1'), r('p2'), a: r('n2')) }}",
            vec![context],
        )
        .await;
        assert_eq!(result, Ok("null".to_string()));
        assert_eq!(*log.lock().unwrap(), vec!["p1", "p2", "n1", "n2"]);
    }

    #[tokio::test]
    async fn test_callee_checked_before_arguments() {
        let log = Arc::new(Mutex::new(0));
        let count = {
            let log = Arc::clone(&log);
            Function::sync(move |_| {
                *log.lock().unwrap() += 1;
                Ok(Value::Null)
            })
        };
        let context = scope(vec![("count", Value::Function(count)), ("n", Value::Int(1))]);
        let err = render("{{ n(count()) }}", vec![context]).await.unwrap_err();
        assert_eq!(err, EvalError::NotCallable { type_name: "Int" });
        assert_eq!(*log.lock().unwrap(), 0);
    }

    #[tokio::test]
    async fn test_error_discards_partial_output() {
        let context = scope(vec![("a", Value::from("ok"))]);
        let result = render("{{ a }} then {{ b }}", vec![context]).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_function_error_propagates() {
        let fail = Function::sync(|_| Err(EvalError::message("boom")));
        let context = scope(vec![("fail", Value::Function(fail))]);
        assert_eq!(
            render("{{ fail() }}", vec![context]).await,
            Err(EvalError::message("boom"))
        );
    }
}
