//! # Request/Response Model
//!
//! Plain data carriers passed between the transport, the dispatcher, the
//! middleware chain and handlers.
//!
//! - [`Request`] is built once per dispatch from transport-supplied facts and
//!   is read-only afterwards.
//! - [`Response`] is produced by a handler (or synthesized by the dispatcher
//!   for a miss) and consumed exactly once when it is emitted.

mod request;
mod response;

pub use request::Request;
pub use response::{HeaderVec, Response, MAX_INLINE_HEADERS};
