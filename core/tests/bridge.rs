use edgeview_core::dispatch;
use edgeview_core::rpc::{self, Settlement, UnknownMethodPolicy};
use edgeview_core::{Bindings, Json};
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::thread;

#[derive(Serialize)]
struct Point {
    x: i32,
    y: i32,
}

fn page_bindings() -> Bindings {
    let bindings = Bindings::new();
    bindings.bind("add", |(a, b): (i64, i64)| a + b);
    bindings.bind("point", |(x, y): (i32, i32)| Json(Point { x, y }));
    bindings.bind("fail", |(): ()| Err::<(), _>("boom"));
    bindings
}

/// Verify a posted call settles with a script resolving its promise slot.
#[test]
fn test_message_resolves_promise_slot() {
    let bindings = page_bindings();

    let settlement = rpc::handle_message(
        &bindings,
        UnknownMethodPolicy::Ignore,
        r#"{"id": 4, "method": "point", "params": [1, 2]}"#,
    )
    .unwrap()
    .unwrap();

    assert_eq!(
        settlement.script(),
        r#"window._rpc[4].resolve({"x":1,"y":2}); window._rpc[4] = undefined"#
    );
}

/// Verify a failing callable rejects with its error text.
#[test]
fn test_failure_rejects_promise_slot() {
    let bindings = page_bindings();

    let settlement = rpc::handle_message(
        &bindings,
        UnknownMethodPolicy::Ignore,
        r#"{"id": 9, "method": "fail", "params": []}"#,
    )
    .unwrap()
    .unwrap();

    assert_eq!(
        settlement,
        Settlement::Reject {
            id: 9,
            reason: "boom".to_string()
        }
    );
    assert_eq!(
        settlement.script(),
        r#"window._rpc[9].reject("boom"); window._rpc[9] = undefined"#
    );
}

/// Verify settlements produced on a worker thread are evaluated on the
/// draining thread, in the order they were queued.
#[test]
fn test_settlements_cross_threads_in_order() {
    let wakes = Arc::new(AtomicUsize::new(0));
    let (dispatcher, queue) = dispatch::channel::<Mutex<Vec<String>>>({
        let wakes = wakes.clone();
        move || {
            wakes.fetch_add(1, Ordering::SeqCst);
        }
    });
    let bindings = Arc::new(page_bindings());

    let worker = {
        let bindings = bindings.clone();
        thread::spawn(move || {
            for id in 1..=3 {
                let text = json!({"id": id, "method": "add", "params": [id, 10]}).to_string();
                let settlement =
                    rpc::handle_message(&bindings, UnknownMethodPolicy::Ignore, &text)
                        .unwrap()
                        .unwrap();
                let script = settlement.script();
                dispatcher
                    .dispatch(move |evaluated: &Mutex<Vec<String>>| {
                        evaluated.lock().unwrap().push(script);
                    })
                    .unwrap();
            }
        })
    };
    worker.join().unwrap();

    let evaluated = Mutex::new(Vec::new());
    assert_eq!(queue.drain(&evaluated), 3);
    assert_eq!(wakes.load(Ordering::SeqCst), 3);
    assert_eq!(
        evaluated.into_inner().unwrap(),
        vec![
            "window._rpc[1].resolve(11); window._rpc[1] = undefined",
            "window._rpc[2].resolve(12); window._rpc[2] = undefined",
            "window._rpc[3].resolve(13); window._rpc[3] = undefined",
        ]
    );
}

/// Verify an unbound method is dropped by default and rejected on request.
#[test]
fn test_unknown_method_policies() {
    let bindings = page_bindings();
    let text = r#"{"id": 2, "method": "missing", "params": []}"#;

    assert_eq!(
        rpc::handle_message(&bindings, UnknownMethodPolicy::Ignore, text).unwrap(),
        None
    );
    assert_eq!(
        rpc::handle_message(&bindings, UnknownMethodPolicy::Reject, text).unwrap(),
        Some(Settlement::Reject {
            id: 2,
            reason: "unknown method: missing".to_string()
        })
    );
}
