use super::core::compile_pattern;
use super::RouteTable;
use crate::error::ConfigurationError;
use crate::model::Response;
use http::Method;

fn ok(_req: &crate::model::Request, _caps: &super::Captures) -> anyhow::Result<Response> {
    Ok(Response::empty())
}

#[test]
fn test_root_path() {
    let re = compile_pattern("/").unwrap();
    assert!(re.is_match("/"));
    assert!(!re.is_match("/docs"));
}

#[test]
fn test_pattern_is_anchored_at_both_ends() {
    let re = compile_pattern("/docs").unwrap();
    assert!(re.is_match("/docs"));
    assert!(!re.is_match("/docs/1"));
    assert!(!re.is_match("/api/docs"));
}

#[test]
fn test_alternation_stays_anchored() {
    let re = compile_pattern("/a|/b").unwrap();
    assert!(re.is_match("/a"));
    assert!(re.is_match("/b"));
    assert!(!re.is_match("/a/x"));
    assert!(!re.is_match("x/b"));
}

#[test]
fn test_unbalanced_pattern_cannot_escape_anchors() {
    assert!(matches!(
        compile_pattern("/a)|(/b"),
        Err(ConfigurationError::InvalidPattern { .. })
    ));
}

#[test]
fn test_invalid_regex_is_configuration_error() {
    let mut table = RouteTable::new();
    let err = table.get(r"/docs/(\d+", ok).unwrap_err();
    assert!(matches!(err, ConfigurationError::InvalidPattern { ref pattern, .. } if pattern == r"/docs/(\d+"));
    assert!(table.is_empty());
}

#[test]
fn test_invalid_methods_rejected() {
    let mut table = RouteTable::new();
    for method in ["", "get", "GE T"] {
        assert!(matches!(
            table.register(method, "/", ok),
            Err(ConfigurationError::InvalidMethod { .. })
        ));
    }
    assert!(table.register("PURGE", "/cache", ok).is_ok());
}

#[test]
fn test_captures_in_group_order() {
    let mut table = RouteTable::new();
    table.get(r"/users/(\w+)/posts/(\d+)", ok).unwrap();
    let m = table.lookup(&Method::GET, "/users/ada/posts/42").unwrap();
    assert_eq!(m.captures.as_slice(), &["ada".to_string(), "42".to_string()]);
    assert_eq!(m.route.capture_count(), 2);
}

#[test]
fn test_optional_group_yields_empty_string() {
    let mut table = RouteTable::new();
    table.get(r"/files(/(\w+))?", ok).unwrap();
    let m = table.lookup(&Method::GET, "/files").unwrap();
    assert_eq!(m.captures.len(), 2);
    assert_eq!(m.captures.get(0), Some(""));
    assert_eq!(m.captures.get(1), Some(""));
}

#[test]
fn test_first_registered_route_wins() {
    let mut table = RouteTable::new();
    table.get(r"/docs/(\d+)", ok).unwrap();
    table.get(r"/docs/(.+)", ok).unwrap();
    let m = table.lookup(&Method::GET, "/docs/1").unwrap();
    assert_eq!(m.route.pattern(), r"/docs/(\d+)");
    let m = table.lookup(&Method::GET, "/docs/abc").unwrap();
    assert_eq!(m.route.pattern(), r"/docs/(.+)");
}

#[test]
fn test_method_must_match() {
    let mut table = RouteTable::new();
    table.post("/docs", ok).unwrap();
    assert!(table.lookup(&Method::GET, "/docs").is_none());
    assert!(table.lookup(&Method::POST, "/docs").is_some());
}

#[test]
fn test_routes_iterate_in_registration_order() {
    let mut table = RouteTable::new();
    table.get("/", ok).unwrap();
    table.post("/docs", ok).unwrap();
    table.delete(r"/docs/(\d+)", ok).unwrap();
    let listed: Vec<(String, String)> = table
        .routes()
        .map(|r| (r.method().to_string(), r.pattern().to_string()))
        .collect();
    assert_eq!(
        listed,
        vec![
            ("GET".to_string(), "/".to_string()),
            ("POST".to_string(), "/docs".to_string()),
            ("DELETE".to_string(), r"/docs/(\d+)".to_string()),
        ]
    );
}

#[test]
fn test_capture_parse_failure_is_an_error() {
    let mut table = RouteTable::new();
    table.get(r"/n/(.+)", ok).unwrap();
    let m = table.lookup(&Method::GET, "/n/abc").unwrap();
    let err = m.captures.parse::<u32>(0).unwrap_err();
    assert!(err.to_string().contains("'abc'"));
    assert!(m.captures.parse::<u32>(5).is_err());
}
