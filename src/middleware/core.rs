use std::time::Duration;

use crate::model::{Request, Response};

/// Observer run around every dispatch.
///
/// Hooks can inspect the request and the final response but cannot
/// short-circuit dispatch or rewrite either value. Returning an error aborts
/// the dispatch; the error reaches the transport as
/// [`DispatchError::Middleware`](crate::error::DispatchError::Middleware).
pub trait Middleware: Send + Sync {
    fn before(&self, _req: &Request) -> anyhow::Result<()> {
        Ok(())
    }

    /// `latency` is the time the handler took to produce `res`.
    fn after(&self, _req: &Request, _res: &Response, _latency: Duration) -> anyhow::Result<()> {
        Ok(())
    }
}
