use super::*;
use serde_json::json;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

fn message(id: i64, method: &str, params: Value) -> String {
    json!({"id": id, "method": method, "params": params}).to_string()
}

fn calculator() -> Bindings {
    let bindings = Bindings::new();
    bindings.bind("add", |(a, b): (i64, i64)| a + b);
    bindings.bind("divide", |(a, b): (f64, f64)| -> Result<f64, String> {
        if b == 0.0 {
            Err("division by zero".to_string())
        } else {
            Ok(a / b)
        }
    });
    bindings.bind_variadic("sum", |(): (), values: Vec<i64>| values.iter().sum::<i64>());
    bindings
}

#[test]
fn resolves_with_result() {
    let bindings = calculator();

    let settlement = handle_message(
        &bindings,
        UnknownMethodPolicy::Ignore,
        &message(4, "add", json!([2, 40])),
    )
    .unwrap()
    .unwrap();

    assert_eq!(
        settlement,
        Settlement::Resolve {
            id: 4,
            value: json!(42)
        }
    );
    assert_eq!(
        settlement.script(),
        "window._rpc[4].resolve(42); window._rpc[4] = undefined"
    );
}

#[test]
fn rejects_with_error_text() {
    let bindings = calculator();

    let settlement = handle_message(
        &bindings,
        UnknownMethodPolicy::Ignore,
        &message(9, "divide", json!([1.0, 0.0])),
    )
    .unwrap()
    .unwrap();

    assert_eq!(
        settlement,
        Settlement::Reject {
            id: 9,
            reason: "division by zero".to_string()
        }
    );
    assert_eq!(
        settlement.script(),
        r#"window._rpc[9].reject("division by zero"); window._rpc[9] = undefined"#
    );
}

#[test]
fn arity_mismatch_rejects() {
    let bindings = calculator();

    let settlement = handle_message(
        &bindings,
        UnknownMethodPolicy::Ignore,
        &message(2, "add", json!([1])),
    )
    .unwrap()
    .unwrap();

    assert_eq!(
        settlement,
        Settlement::Reject {
            id: 2,
            reason: "function arguments mismatch".to_string()
        }
    );
}

#[test]
fn variadic_accepts_any_count() {
    let bindings = calculator();

    for (id, params, expected) in [
        (1, json!([]), 0),
        (2, json!([5]), 5),
        (3, json!([1, 2, 3, 4]), 10),
    ] {
        let settlement = handle_message(
            &bindings,
            UnknownMethodPolicy::Ignore,
            &message(id, "sum", params),
        )
        .unwrap()
        .unwrap();
        assert_eq!(
            settlement,
            Settlement::Resolve {
                id,
                value: json!(expected)
            }
        );
    }
}

#[test]
fn decode_mismatch_rejects_without_invoking() {
    let bindings = Bindings::new();
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();
    bindings.bind("store", move |(_key, _value): (String, i64)| {
        counter.fetch_add(1, Ordering::SeqCst);
    });

    let settlement = handle_message(
        &bindings,
        UnknownMethodPolicy::Ignore,
        &message(5, "store", json!(["key", {"nested": true}])),
    )
    .unwrap()
    .unwrap();

    assert_eq!(settlement.id(), 5);
    assert!(!settlement.is_resolve());
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[test]
fn unknown_method_is_dropped_by_default() {
    let bindings = calculator();

    let settlement = handle_message(
        &bindings,
        UnknownMethodPolicy::Ignore,
        &message(1, "missing", json!([])),
    )
    .unwrap();

    assert!(settlement.is_none());
}

#[test]
fn unknown_method_rejects_under_reject_policy() {
    let bindings = calculator();

    let settlement = handle_message(
        &bindings,
        UnknownMethodPolicy::Reject,
        &message(6, "missing", json!([])),
    )
    .unwrap()
    .unwrap();

    assert_eq!(
        settlement,
        Settlement::Reject {
            id: 6,
            reason: "unknown method: missing".to_string()
        }
    );
}

#[test]
fn missing_params_means_empty() {
    let bindings = Bindings::new();
    bindings.bind("ping", |(): ()| "pong");

    let settlement = handle_message(
        &bindings,
        UnknownMethodPolicy::Ignore,
        r#"{"id": 11, "method": "ping"}"#,
    )
    .unwrap()
    .unwrap();

    assert_eq!(
        settlement,
        Settlement::Resolve {
            id: 11,
            value: json!("pong")
        }
    );
}

#[test]
fn null_params_means_empty() {
    let bindings = calculator();

    let settlement = handle_message(
        &bindings,
        UnknownMethodPolicy::Ignore,
        r#"{"id": 3, "method": "sum", "params": null}"#,
    )
    .unwrap()
    .unwrap();

    assert_eq!(
        settlement,
        Settlement::Resolve {
            id: 3,
            value: json!(0)
        }
    );

    let request = RpcRequest::parse(r#"{"id": 5, "method": "add", "params": null}"#).unwrap();
    assert!(request.params.is_empty());
}

#[test]
fn malformed_message_is_an_error() {
    let bindings = calculator();

    for text in ["not json", r#"{"method": "add"}"#, r#"{"id": "x", "method": "add"}"#] {
        let err = handle_message(&bindings, UnknownMethodPolicy::Ignore, text).unwrap_err();
        assert!(err.to_string().starts_with("invalid RPC message"));
    }
}

#[test]
fn latest_binding_wins() {
    let bindings = Bindings::new();
    bindings.bind("which", |(): ()| "old");
    bindings.bind("which", |(): ()| "new");

    let settlement = handle_message(
        &bindings,
        UnknownMethodPolicy::Ignore,
        &message(1, "which", json!([])),
    )
    .unwrap()
    .unwrap();

    assert_eq!(
        settlement,
        Settlement::Resolve {
            id: 1,
            value: json!("new")
        }
    );
}

#[test]
fn unknown_method_policy_deserializes_lowercase() {
    #[derive(Deserialize)]
    struct Wrapper {
        policy: UnknownMethodPolicy,
    }

    let parsed: Wrapper = serde_json::from_str(r#"{"policy": "reject"}"#).unwrap();
    assert_eq!(parsed.policy, UnknownMethodPolicy::Reject);
    assert_eq!(UnknownMethodPolicy::default(), UnknownMethodPolicy::Ignore);
}
