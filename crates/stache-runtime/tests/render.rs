//! End-to-end rendering through the public API.

use pretty_assertions::assert_eq;
use proptest::prelude::*;
use stache_runtime::{Arguments, Engine, Error, EvalError, Function, Object, Template, Value};

fn context(pairs: Vec<(&str, Value)>) -> Object {
    Object::from_pairs(pairs).unwrap()
}

async fn render(source: &str, context: &Object) -> Result<String, Error> {
    Engine::new().render_source(source, Some(context)).await
}

fn block_on<F: std::future::Future>(future: F) -> F::Output {
    tokio::runtime::Builder::new_current_thread()
        .build()
        .unwrap()
        .block_on(future)
}

// =============================================================================
// Basic rendering
// =============================================================================

#[tokio::test]
async fn test_render_name() {
    let output = render("{{ name }}", &context(vec![("name", Value::from("X"))])).await;
    assert_eq!(output, Ok("X".to_string()));
}

#[tokio::test]
async fn test_renders_are_independent() {
    let template = Template::compile("Hello {{ name }}").unwrap();
    let a = template.render(&context(vec![("name", Value::from("A"))])).await;
    let b = template.render(&context(vec![("name", Value::from("B"))])).await;
    let a_again = template.render(&context(vec![("name", Value::from("A"))])).await;
    assert_eq!(a, Ok("Hello A".to_string()));
    assert_eq!(b, Ok("Hello B".to_string()));
    assert_eq!(a, a_again);
}

#[tokio::test]
async fn test_template_shared_across_tasks() {
    let template = Template::compile("{{ n }}").unwrap();
    let mut handles = Vec::new();
    for n in 0..4i64 {
        let template = template.clone();
        handles.push(tokio::spawn(async move {
            template.render(&context(vec![("n", Value::Int(n))])).await
        }));
    }
    for (n, handle) in handles.into_iter().enumerate() {
        assert_eq!(handle.await.unwrap(), Ok(n.to_string()));
    }
}

#[tokio::test]
async fn test_json_context() {
    let json = serde_json::json!({
        "user": {"name": "Ada", "langs": ["en", "fr"]},
        "headers": {"Content-Type": "text/html"}
    });
    let context = Object::from_json(json).unwrap();
    let output = render(
        "{{ user.name }} speaks {{ user.langs.join(', ') }}; {{ headers['Content-Type'] }}",
        &context,
    )
    .await;
    assert_eq!(output, Ok("Ada speaks en, fr; text/html".to_string()));
}

// =============================================================================
// Whitespace control and comments
// =============================================================================

#[tokio::test]
async fn test_trim_both_sides() {
    let output = render(
        "Before   {{- name -}}   After",
        &context(vec![("name", Value::from("X"))]),
    )
    .await;
    assert_eq!(output, Ok("BeforeXAfter".to_string()));
}

#[tokio::test]
async fn test_trim_one_side() {
    let ctx = context(vec![("name", Value::from("X"))]);
    assert_eq!(render("a \n {{- name }} b", &ctx).await, Ok("aX b".to_string()));
    assert_eq!(render("a {{ name -}} \n b", &ctx).await, Ok("a Xb".to_string()));
}

#[tokio::test]
async fn test_comments_vanish() {
    let output = render("A {{# c #}} B", &Object::new()).await;
    assert_eq!(output, Ok("A  B".to_string()));
}

#[tokio::test]
async fn test_trimmed_comment() {
    let output = render("A {{#- {{ not evaluated }} -#}} B", &Object::new()).await;
    assert_eq!(output, Ok("AB".to_string()));
}

// =============================================================================
// Calls
// =============================================================================

#[tokio::test]
async fn test_argument_interleaving() {
    let echo = Function::sync(|arguments: Arguments| {
        let arguments = Value::Arguments(arguments);
        let positional = arguments.retrieve("positional")?;
        let named = arguments.retrieve("named")?;
        Ok(Value::String(format!("{positional} {named}")))
    });
    let output = render(
        "{{ f(name: \"a\", 1, age: 2, \"b\") }}",
        &context(vec![("f", Value::Function(echo))]),
    )
    .await;
    assert_eq!(output, Ok("[1, b] {name: a, age: 2}".to_string()));
}

#[tokio::test]
async fn test_async_function() {
    let fetch = Function::new(|arguments: Arguments| async move {
        tokio::task::yield_now().await;
        let id = arguments.get(0).cloned().unwrap_or_default();
        Ok(Value::String(format!("record {id}")))
    });
    let output = render(
        "<{{ fetch(7) }}>",
        &context(vec![("fetch", Value::Function(fetch))]),
    )
    .await;
    assert_eq!(output, Ok("<record 7>".to_string()));
}

#[tokio::test]
async fn test_builtin_method_chain() {
    let ctx = context(vec![("title", Value::from("  Hello World  "))]);
    let output = render(
        "{{ title.trim().toLowerCase.split(' ').reverse().join('-') }}",
        &ctx,
    )
    .await;
    assert_eq!(output, Ok("world-hello".to_string()));
}

// =============================================================================
// Errors
// =============================================================================

#[test]
fn test_duplicate_named_argument_is_parse_error() {
    let err = Template::compile("{{ f(x: 1, x: 2) }}").unwrap_err();
    assert_eq!(err.message, "Duplicate named parameter: x");
}

#[tokio::test]
async fn test_unknown_key_and_property_are_distinct() {
    let ctx = context(vec![
        ("items", Value::from(vec![Value::Int(1)])),
        ("user", Value::Object(context(vec![("name", Value::from("A"))]))),
    ]);

    for source in ["{{ items[3] }}", "{{ user['email'] }}"] {
        match render(source, &ctx).await {
            Err(Error::Eval(err)) => assert!(err.is_unknown_key(), "{source}: {err}"),
            other => panic!("{source}: expected unknown key, got {other:?}"),
        }
    }

    for source in ["{{ items.size }}", "{{ user.email }}"] {
        match render(source, &ctx).await {
            Err(Error::Eval(err)) => assert!(err.is_unknown_property(), "{source}: {err}"),
            other => panic!("{source}: expected unknown property, got {other:?}"),
        }
    }
}

#[tokio::test]
async fn test_null_has_no_properties() {
    let ctx = context(vec![("nothing", Value::Null)]);
    let err = render("{{ nothing.length }}", &ctx).await.unwrap_err();
    assert_eq!(
        err,
        Error::Eval(EvalError::UnknownProperty {
            name: "length".to_string()
        })
    );
}

#[test]
fn test_unclosed_tag() {
    let err = Template::compile("{{ name ").unwrap_err();
    assert_eq!(err.to_string(), "Parse error at end of input: Expected '}}' to close tag");
}

#[test]
fn test_unclosed_comment_terminates() {
    assert!(Template::compile("text {{# never closed").is_err());
}

#[tokio::test]
async fn test_negative_literal_and_minus() {
    assert_eq!(render("{{ -42 }}", &Object::new()).await, Ok("-42".to_string()));
    assert!(matches!(
        render("{{ 5 - 3 }}", &Object::new()).await,
        Err(Error::Parse(_))
    ));
}

// =============================================================================
// Properties
// =============================================================================

proptest! {
    #[test]
    fn prop_text_without_tags_renders_to_itself(text in any::<String>()) {
        prop_assume!(!text.contains("{{"));
        let output = block_on(render(&text, &Object::new()));
        prop_assert_eq!(output, Ok(text));
    }

    #[test]
    fn prop_rendering_is_deterministic(name in "[a-z ]{0,12}") {
        let template = Template::compile("<{{ name }}|{{ name.length }}>").unwrap();
        let ctx = context(vec![("name", Value::from(name.as_str()))]);
        let first = block_on(template.render(&ctx));
        let second = block_on(template.render(&ctx));
        prop_assert_eq!(&first, &second);
        prop_assert_eq!(first, Ok(format!("<{name}|{}>", name.chars().count())));
    }
}
