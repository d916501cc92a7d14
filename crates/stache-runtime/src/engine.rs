//! Compile and render entry points.

use std::sync::Arc;

use stache_parser::{ParseError, Parser, Statement};

use crate::error::EvalResult;
use crate::evaluator::Evaluator;
use crate::identifier::{Identifier, InvalidIdentifier};
use crate::value::{Object, Value};
use crate::Error;

/// A compiled template.
///
/// Holds only the immutable syntax tree, so one template can be rendered any
/// number of times, concurrently, with different contexts.
#[derive(Debug, Clone)]
pub struct Template {
    root: Arc<Statement>,
}

impl Template {
    /// Tokenize, apply whitespace control and parse `source`.
    pub fn compile(source: &str) -> Result<Self, ParseError> {
        let root = Parser::parse(source)?;
        Ok(Self {
            root: Arc::new(root),
        })
    }

    pub fn root(&self) -> &Statement {
        &self.root
    }

    /// Render with `context` as the only scope.
    pub async fn render(&self, context: &Object) -> EvalResult<String> {
        Engine::new().render(self, Some(context)).await
    }
}

/// Rendering configuration: the globals visible to every template.
///
/// ```
/// use stache_runtime::{Engine, Object, Value};
///
/// let engine = Engine::new().with_global("site", "stache").unwrap();
/// let template = engine.compile("{{ site }}: {{ page }}").unwrap();
/// let context = Object::from_pairs([("page", Value::from("home"))]).unwrap();
///
/// let runtime = tokio::runtime::Builder::new_current_thread().build().unwrap();
/// let output = runtime.block_on(engine.render(&template, Some(&context)));
/// assert_eq!(output.unwrap(), "stache: home");
/// ```
#[derive(Debug, Clone, Default)]
pub struct Engine {
    globals: Object,
}

impl Engine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_globals(globals: Object) -> Self {
        Self { globals }
    }

    /// Add a global, replacing any earlier global with the same name.
    pub fn with_global(
        self,
        name: &str,
        value: impl Into<Value>,
    ) -> Result<Self, InvalidIdentifier> {
        let name = Identifier::new(name)?;
        Ok(Self {
            globals: self.globals.with(name, value),
        })
    }

    pub fn globals(&self) -> &Object {
        &self.globals
    }

    pub fn compile(&self, source: &str) -> Result<Template, ParseError> {
        Template::compile(source)
    }

    /// Render `template` with the globals as the outer scope and `context`,
    /// if any, as the inner one.
    #[tracing::instrument(level = "debug", skip_all)]
    pub async fn render(
        &self,
        template: &Template,
        context: Option<&Object>,
    ) -> EvalResult<String> {
        let mut evaluator = Evaluator::new(vec![self.globals.clone()]);
        if let Some(context) = context {
            evaluator.push_scope(context.clone());
        }
        let output = evaluator.render(template.root()).await?;
        tracing::debug!(bytes = output.len(), "rendered template");
        Ok(output)
    }

    /// Compile and render in one step.
    pub async fn render_source(
        &self,
        source: &str,
        context: Option<&Object>,
    ) -> Result<String, Error> {
        let template = self.compile(source)?;
        Ok(self.render(&template, context).await?)
    }
}
