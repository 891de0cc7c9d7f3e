//! Tests for the request dispatcher
//!
//! # Test Coverage
//!
//! - Handler invocation with captured path parameters
//! - Not-found synthesis (status, headers, empty body)
//! - Emission: status line, header order, body chunks
//! - Handler fault propagation and the optional recovery boundary
//! - Sharing one dispatcher across threads

use http::{Method, StatusCode};
use routelet::{
    DispatchError, Dispatcher, DispatcherConfig, Environ, Request, Response,
};
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Captures what the transport receives through `start_response`.
#[derive(Default)]
struct Emitted {
    status: String,
    headers: Vec<(String, String)>,
    calls: usize,
}

fn dispatch(dispatcher: &Dispatcher, method: &str, path: &str) -> (Emitted, Vec<u8>) {
    let mut emitted = Emitted::default();
    let body = dispatcher
        .dispatch(&Environ::new(method, path), |status, headers| {
            emitted.status = status.to_string();
            emitted.headers = headers.to_vec();
            emitted.calls += 1;
        })
        .unwrap();
    (emitted, body.into_bytes())
}

#[test]
fn test_dispatcher_passes_captures_in_order() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let seen_in_handler = Arc::clone(&seen);
    let mut builder = Dispatcher::builder();
    builder
        .get(r"/users/(\w+)/posts/(\d+)", move |req, caps| {
            assert_eq!(req.path(), "/users/ada/posts/7");
            seen_in_handler
                .lock()
                .unwrap()
                .extend(caps.iter().map(str::to_string));
            Ok(Response::empty())
        })
        .unwrap();
    let dispatcher = builder.build();

    let (emitted, body) = dispatch(&dispatcher, "GET", "/users/ada/posts/7");
    assert_eq!(emitted.status, "200 OK");
    assert!(body.is_empty());
    assert_eq!(*seen.lock().unwrap(), vec!["ada", "7"]);
}

#[test]
fn test_exactly_one_handler_invoked() {
    let first = Arc::new(AtomicUsize::new(0));
    let second = Arc::new(AtomicUsize::new(0));
    let (f, s) = (Arc::clone(&first), Arc::clone(&second));
    let mut builder = Dispatcher::builder();
    builder
        .get("/docs/(.*)", move |_req, _caps| {
            f.fetch_add(1, Ordering::SeqCst);
            Ok(Response::empty())
        })
        .unwrap()
        .get("/docs/1", move |_req, _caps| {
            s.fetch_add(1, Ordering::SeqCst);
            Ok(Response::empty())
        })
        .unwrap();
    let dispatcher = builder.build();

    dispatch(&dispatcher, "GET", "/docs/1");
    assert_eq!(first.load(Ordering::SeqCst), 1);
    assert_eq!(second.load(Ordering::SeqCst), 0);
}

#[test]
fn test_unmatched_request_gets_plain_404() {
    let called = Arc::new(AtomicUsize::new(0));
    let c = Arc::clone(&called);
    let mut builder = Dispatcher::builder();
    builder
        .get("/", move |_req, _caps| {
            c.fetch_add(1, Ordering::SeqCst);
            Ok(Response::new("root"))
        })
        .unwrap()
        .get("/docs", |_req, _caps| Ok(Response::new(json!([]))))
        .unwrap();
    let dispatcher = builder.build();

    let (emitted, body) = dispatch(&dispatcher, "GET", "/nope");
    assert_eq!(emitted.status, "404 NOT FOUND");
    assert_eq!(
        emitted.headers,
        vec![("Content-Type".to_string(), "text/plain".to_string())]
    );
    assert!(body.is_empty());
    assert_eq!(called.load(Ordering::SeqCst), 0);
}

#[test]
fn test_builder_verb_shorthands() {
    let mut builder = Dispatcher::builder();
    builder
        .get("/item", |_, _| Ok(Response::new("get")))
        .unwrap()
        .post("/item", |_, _| Ok(Response::new("post")))
        .unwrap()
        .put("/item", |_, _| Ok(Response::new("put")))
        .unwrap()
        .patch("/item", |_, _| Ok(Response::new("patch")))
        .unwrap()
        .delete("/item", |_, _| Ok(Response::new("delete")))
        .unwrap();
    let dispatcher = builder.build();

    for verb in ["GET", "POST", "PUT", "PATCH", "DELETE"] {
        let (emitted, body) = dispatch(&dispatcher, verb, "/item");
        assert_eq!(emitted.status, "200 OK");
        assert_eq!(body, format!("\"{}\"", verb.to_lowercase()).into_bytes());
    }
    let (emitted, _) = dispatch(&dispatcher, "HEAD", "/item");
    assert_eq!(emitted.status, "404 NOT FOUND");
}

#[test]
fn test_method_mismatch_is_not_found() {
    let mut builder = Dispatcher::builder();
    builder
        .post("/docs", |_req, _caps| Ok(Response::empty()))
        .unwrap();
    let dispatcher = builder.build();

    let (emitted, _) = dispatch(&dispatcher, "GET", "/docs");
    assert_eq!(emitted.status, "404 NOT FOUND");
}

#[test]
fn test_prefix_match_is_not_a_match() {
    let mut builder = Dispatcher::builder();
    builder
        .get("/docs", |_req, _caps| Ok(Response::empty()))
        .unwrap();
    let dispatcher = builder.build();

    let (emitted, _) = dispatch(&dispatcher, "GET", "/docs/extra");
    assert_eq!(emitted.status, "404 NOT FOUND");
}

#[test]
fn test_handler_status_and_headers_are_emitted_in_order() {
    let mut builder = Dispatcher::builder();
    builder
        .post("/items", |_req, _caps| {
            Ok(Response::new(json!({"id": 3}))
                .with_status(StatusCode::CREATED)
                .with_header("Content-Type", "application/json")
                .with_header("Location", "/items/3"))
        })
        .unwrap();
    let dispatcher = builder.build();

    let (emitted, body) = dispatch(&dispatcher, "POST", "/items");
    assert_eq!(emitted.calls, 1);
    assert_eq!(emitted.status, "201 CREATED");
    assert_eq!(
        emitted.headers,
        vec![
            ("Content-Type".to_string(), "application/json".to_string()),
            ("Location".to_string(), "/items/3".to_string()),
        ]
    );
    assert_eq!(body, br#"{"id":3}"#.to_vec());
}

#[test]
fn test_body_is_single_json_chunk() {
    let mut builder = Dispatcher::builder();
    builder
        .get("/", |_req, _caps| Ok(Response::new(json!({"pk": 1, "data": "Doc1"}))))
        .unwrap();
    let dispatcher = builder.build();

    let body = dispatcher
        .dispatch(&Environ::new("GET", "/"), |_, _| {})
        .unwrap();
    assert_eq!(body.chunks().len(), 1);
    assert_eq!(
        body.into_bytes(),
        serde_json::to_vec(&json!({"pk": 1, "data": "Doc1"})).unwrap()
    );
}

#[test]
fn test_handler_fault_propagates_without_emitting() {
    let mut builder = Dispatcher::builder();
    builder
        .get(r"/n/(.+)", |_req, caps| {
            let n: u32 = caps.parse(0)?;
            Ok(Response::new(n))
        })
        .unwrap();
    let dispatcher = builder.build();

    let mut started = false;
    let err = dispatcher
        .dispatch(&Environ::new("GET", "/n/abc"), |_, _| started = true)
        .unwrap_err();
    assert!(!started);
    match err {
        DispatchError::Handler { method, path, .. } => {
            assert_eq!(method, Method::GET);
            assert_eq!(path, "/n/abc");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_recovery_boundary_answers_500_for_errors() {
    let config = DispatcherConfig {
        recover_handler_faults: true,
        ..DispatcherConfig::default()
    };
    let mut builder = Dispatcher::builder().with_config(config);
    builder
        .get("/boom", |_req, _caps| Err(anyhow::anyhow!("database unavailable")))
        .unwrap();
    let dispatcher = builder.build();

    let (emitted, body) = dispatch(&dispatcher, "GET", "/boom");
    assert_eq!(emitted.status, "500 INTERNAL SERVER ERROR");
    assert_eq!(
        emitted.headers,
        vec![("Content-Type".to_string(), "text/plain".to_string())]
    );
    assert!(body.is_empty());
}

#[test]
fn test_recovery_boundary_answers_500_for_panics() {
    let config = DispatcherConfig {
        recover_handler_faults: true,
        ..DispatcherConfig::default()
    };
    let mut builder = Dispatcher::builder().with_config(config);
    builder
        .get("/panic", |_req, _caps| -> anyhow::Result<Response> {
            panic!("handler bug")
        })
        .unwrap();
    let dispatcher = builder.build();

    let (emitted, _) = dispatch(&dispatcher, "GET", "/panic");
    assert_eq!(emitted.status, "500 INTERNAL SERVER ERROR");
}

#[test]
fn test_invalid_transport_method_is_error() {
    let dispatcher = Dispatcher::builder().build();
    let err = dispatcher
        .dispatch(&Environ::new("GE T", "/"), |_, _| {})
        .unwrap_err();
    assert!(matches!(err, DispatchError::InvalidMethod { .. }));
}

#[test]
fn test_respond_without_transport() {
    let mut builder = Dispatcher::builder();
    builder
        .get("/", |_req, _caps| Ok(Response::new("Hello world!")))
        .unwrap();
    let dispatcher = builder.build();

    let resp = dispatcher.respond(&Request::new(Method::GET, "/")).unwrap();
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.data, Some(json!("Hello world!")));
}

#[test]
fn test_dispatcher_is_shareable_across_threads() {
    let mut builder = Dispatcher::builder();
    builder
        .get(r"/n/(\d+)", |_req, caps| {
            let n: u64 = caps.parse(0)?;
            Ok(Response::new(n * 2))
        })
        .unwrap();
    let dispatcher = Arc::new(builder.build());

    let handles: Vec<_> = (0..8u64)
        .map(|i| {
            let dispatcher = Arc::clone(&dispatcher);
            std::thread::spawn(move || {
                let body = dispatcher
                    .dispatch(&Environ::new("GET", format!("/n/{i}")), |_, _| {})
                    .unwrap();
                body.into_bytes()
            })
        })
        .collect();

    for (i, handle) in handles.into_iter().enumerate() {
        assert_eq!(handle.join().unwrap(), (i * 2).to_string().into_bytes());
    }
}
