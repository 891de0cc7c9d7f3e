//! # Router Module
//!
//! The route table maps `(method, path pattern)` pairs to handlers.
//!
//! ## Overview
//!
//! - Patterns are regular expressions compiled once at registration time and
//!   matched against the *whole* request path.
//! - Capture groups become positional string parameters handed to the handler.
//! - Lookup is first-match-wins in registration order. Duplicate or overlapping
//!   patterns are allowed; their priority is simply their registration order.
//!
//! ## Example
//!
//! ```rust
//! use http::Method;
//! use routelet::model::Response;
//! use routelet::router::RouteTable;
//!
//! let mut table = RouteTable::new();
//! table
//!     .get(r"/docs/(\d+)", |_req, caps| {
//!         let pk: u64 = caps.parse(0)?;
//!         Ok(Response::new(serde_json::json!({ "pk": pk })))
//!     })
//!     .unwrap();
//!
//! let m = table.lookup(&Method::GET, "/docs/7").unwrap();
//! assert_eq!(m.captures.get(0), Some("7"));
//! assert!(table.lookup(&Method::GET, "/docs/7/edit").is_none());
//! ```
//!
//! ## Performance
//!
//! Lookup is O(n) in the number of routes registered for the request's method.
//! Tables are expected to be small.

mod core;
#[cfg(test)]
mod tests;

pub use core::{Captures, CaptureVec, HandlerFn, Route, RouteMatch, RouteTable, MAX_INLINE_CAPTURES};
