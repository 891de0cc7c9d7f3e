//! # routelet
//!
//! **routelet** is a small, synchronous HTTP request dispatcher. It matches a
//! request's method and path against an ordered table of regular-expression
//! routes, runs observational middleware around the matched handler, and turns
//! the handler's [`Response`](model::Response) into a status line, headers and
//! a JSON body.
//!
//! It has no transport of its own. A hosting server reads the connection,
//! hands the dispatcher an [`Environ`](server::Environ) plus a callback for
//! the status line and headers, and writes back the returned body chunks.
//!
//! ## Architecture
//!
//! - **[`model`]** - `Request` / `Response` data carriers
//! - **[`router`]** - ordered route table, anchored regex matching, captures
//! - **[`middleware`]** - `before` / `after` observers and the chain running them
//! - **[`dispatcher`]** - the per-request cycle and its startup builder
//! - **[`server`]** - transport boundary: `Environ`, status lines, body chunks
//! - **[`config`]** - behavior switches from env or YAML
//! - **[`error`]** - registration and dispatch errors
//!
//! ### Request Handling Flow
//!
//! ```mermaid
//! sequenceDiagram
//!     participant Transport
//!     participant Dispatcher
//!     participant Chain as Middleware Chain
//!     participant Table as Route Table
//!     participant Handler
//!
//!     Transport->>Dispatcher: dispatch(Environ{GET, /docs/1}, start_response)
//!     Dispatcher->>Chain: run_before(request)
//!     Dispatcher->>Table: lookup(GET, /docs/1)
//!
//!     alt No Route Match
//!         Table-->>Dispatcher: None
//!         Dispatcher-->>Transport: start_response("404 NOT FOUND", [Content-Type: text/plain]), empty body
//!     end
//!
//!     Table-->>Dispatcher: RouteMatch(route, ["1"])
//!     Dispatcher->>Handler: call(request, ["1"])
//!     Handler-->>Dispatcher: Response{data, status, headers}
//!     Dispatcher->>Chain: run_after(request, response)
//!     Dispatcher-->>Transport: start_response("200 OK", headers), [JSON chunk]
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use http::StatusCode;
//! use routelet::{Dispatcher, Environ, Response, TracingMiddleware};
//!
//! let mut builder = Dispatcher::builder();
//! builder
//!     .get(r"/docs/(\d+)", |_req, caps| {
//!         let pk: u64 = caps.parse(0)?;
//!         if pk == 1 {
//!             Ok(Response::new(serde_json::json!({ "pk": 1, "data": "Doc1" })))
//!         } else {
//!             Ok(Response::empty().with_status(StatusCode::NOT_FOUND))
//!         }
//!     })
//!     .unwrap()
//!     .middleware(Arc::new(TracingMiddleware));
//! let dispatcher = builder.build();
//!
//! let mut status = String::new();
//! let body = dispatcher
//!     .dispatch(&Environ::new("GET", "/docs/1"), |line, _headers| status = line.to_string())
//!     .unwrap();
//! assert_eq!(status, "200 OK");
//! assert_eq!(body.into_bytes(), br#"{"pk":1,"data":"Doc1"}"#.to_vec());
//! ```
//!
//! ## Concurrency
//!
//! Dispatch never blocks or yields. The route table and middleware chain are
//! frozen when the builder is built, so a `Dispatcher` is `Send + Sync` and can
//! be called from many worker threads at once without locks.

pub mod cli;
pub mod config;
pub mod demo;
pub mod dispatcher;
pub mod error;
pub mod ids;
pub mod logging;
pub mod middleware;
pub mod model;
pub mod router;
pub mod server;

pub use config::DispatcherConfig;
pub use dispatcher::{Dispatcher, DispatcherBuilder};
pub use error::{ConfigurationError, DispatchError};
pub use middleware::{MetricsMiddleware, Middleware, TracingMiddleware};
pub use model::{Request, Response};
pub use router::{Captures, RouteTable};
pub use server::{Body, Environ};
