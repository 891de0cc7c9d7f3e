//! # Server Module
//!
//! The boundary between the dispatcher and whatever hosts it. Connection
//! handling, TLS and concurrency live in the embedding server; this module
//! only defines what crosses the boundary.
//!
//! - [`Environ`] carries the request facts in.
//! - [`emit`] turns a [`Response`](crate::model::Response) into a status line,
//!   an ordered header list and a [`Body`] of byte chunks.

mod environ;
mod response;

pub use environ::Environ;
pub use response::{emit, status_line, Body, Emitted};
