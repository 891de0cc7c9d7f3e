use std::time::Duration;

use tracing::info;

use super::Middleware;
use crate::model::{Request, Response};

/// Request logger.
///
/// Emits one `info` event when a request enters dispatch and one when its
/// response is final, keyed by request id.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingMiddleware;

impl Middleware for TracingMiddleware {
    fn before(&self, req: &Request) -> anyhow::Result<()> {
        info!(
            request_id = %req.request_id(),
            method = %req.method(),
            path = %req.path(),
            "Request received"
        );
        Ok(())
    }

    fn after(&self, req: &Request, res: &Response, latency: Duration) -> anyhow::Result<()> {
        info!(
            request_id = %req.request_id(),
            method = %req.method(),
            path = %req.path(),
            status = res.status.as_u16(),
            latency_us = latency.as_micros() as u64,
            "Request completed"
        );
        Ok(())
    }
}
