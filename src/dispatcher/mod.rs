//! # Dispatcher Module
//!
//! Runs one request through the whole cycle:
//!
//! 1. **Receive** - build a [`Request`](crate::model::Request) from the
//!    transport's [`Environ`](crate::server::Environ)
//! 2. **Before-hooks** - every middleware `before`, in registration order
//! 3. **Match** - first route whose method and full-path pattern match
//! 4. **Invoke** - call the handler with the request and captured strings
//! 5. **After-hooks** - every middleware `after`, in registration order
//! 6. **Emit** - status line, ordered headers and body chunks to the transport
//!
//! A request no route accepts is answered with `404 NOT FOUND`, an empty body
//! and `Content-Type: text/plain`. It skips the handler and, unless
//! [`DispatcherConfig::not_found_runs_after_hooks`](crate::config::DispatcherConfig)
//! is set, the after-hooks too.
//!
//! ## Error Handling
//!
//! Handler and middleware failures are not turned into responses. They return
//! as [`DispatchError`](crate::error::DispatchError) and the hosting transport
//! decides what the client sees. Setting
//! [`DispatcherConfig::recover_handler_faults`](crate::config::DispatcherConfig)
//! opts into a recovery boundary that answers handler errors and panics with
//! `500 INTERNAL SERVER ERROR`.
//!
//! ## Example
//!
//! ```rust
//! use routelet::dispatcher::Dispatcher;
//! use routelet::model::Response;
//! use routelet::server::Environ;
//!
//! let mut builder = Dispatcher::builder();
//! builder
//!     .get("/", |_req, _caps| Ok(Response::new("Hello world!")))
//!     .unwrap();
//! let dispatcher = builder.build();
//!
//! let mut status = String::new();
//! let body = dispatcher
//!     .dispatch(&Environ::new("GET", "/"), |line, _headers| status = line.to_string())
//!     .unwrap();
//! assert_eq!(status, "200 OK");
//! assert_eq!(body.into_bytes(), b"\"Hello world!\"".to_vec());
//! ```

mod core;

pub use core::{Dispatcher, DispatcherBuilder};
