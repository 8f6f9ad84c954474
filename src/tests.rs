//! End-to-end scenarios driving the full pipeline: JSON scope in, template
//! markers walked, text out

use crate::{
    Context, Functions, SubTemplates, Value, WalkError, render, render_all,
    walk,
};
use pretty_assertions::assert_eq;
use rstest::rstest;
use std::{thread, time::Duration};

fn scope(json: serde_json::Value) -> Value {
    Value::from_json(json)
}

/// The classic fixture: a JSON document rendered into another JSON document
#[test]
fn test_json_to_json() {
    let data = scope(serde_json::json!({
        "id": "banana",
        "meta": {
            "counter": 11,
            "price": 2.99,
            "available": true,
        },
        "items": ["foo,bar", "bar"],
        "more_items": [
            {"gino": 22, "pino": 10, "cane": 5},
            {"gino": 22, "pino": 10, "cane": 5},
        ],
    }));
    let template = r#"{
    "name": "${id}",
    "availability": ${meta.counter},
    "price": ${meta.price},
    "in_stock": ${meta.available},
    "first_item": "${items[0]}",
    "all_items": ${items},
    "item_count": ${items.size()},
    "something": ${items[0].split(\,)},
    "more_something": ${more_items.collect(pino,cane)}
}"#;
    let expected = r#"{
    "name": "banana",
    "availability": 11,
    "price": 2.99,
    "in_stock": true,
    "first_item": "foo,bar",
    "all_items": ["foo,bar","bar"],
    "item_count": 2,
    "something": ["foo","bar"],
    "more_something": [{"cane":5,"pino":10},{"cane":5,"pino":10}]
}"#;
    let output = render(&Context::new(), template, &data, None).unwrap();
    assert_eq!(output, expected);
}

#[rstest]
#[case::scalar("name=${n}", serde_json::json!({"n": "x"}), "name=x")]
#[case::container_sorted(
    "${m}",
    serde_json::json!({"m": {"b": [2, 3], "a": 1}}),
    r#"{"a":1,"b":[2,3]}"#
)]
fn test_render_scenarios(
    #[case] template: &str,
    #[case] data: serde_json::Value,
    #[case] expected: &str,
) {
    let output = render(&Context::new(), template, &scope(data), None).unwrap();
    assert_eq!(output, expected);
}

/// Sub-templates render once per element with the element as scope
#[test]
fn test_render_each() {
    let sub_templates = SubTemplates::new().add("t2", "T2 ${.}");
    let output = render_all(
        &Context::new(),
        r"${items.renderEach(t2,\,)}",
        &sub_templates,
        &scope(serde_json::json!({"items": ["foo", "bar"]})),
        None,
    )
    .unwrap();
    assert_eq!(output, "T2 foo,T2 bar");
}

/// A slow callable trips the deadline on the step after it returns
#[test]
fn test_deadline_mid_template() {
    let mut functions = Functions::new();
    functions.add("wait", |_, _, _, _| {
        thread::sleep(Duration::from_millis(10));
        Ok("done".into())
    });
    let context = Context::with_timeout(Duration::from_millis(5));
    let error = render(
        &context,
        "a ${wait()} b",
        &scope(serde_json::json!({})),
        Some(&functions),
    )
    .unwrap_err();
    assert!(matches!(error.error, WalkError::DeadlineExceeded));
}

/// Walking into an array with a name segment is the one traversal that
/// fails outright
#[test]
fn test_sequence_field_error() {
    let data = scope(serde_json::json!({
        "foo": [{"gino": "pino"}, "bar2"],
    }));
    let error =
        walk(&Context::new(), "foo.bananas", &data, None).unwrap_err();
    assert!(matches!(error, WalkError::SequenceField));
}
