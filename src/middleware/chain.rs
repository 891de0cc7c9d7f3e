use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, error};

use super::Middleware;
use crate::error::{DispatchError, HookPhase};
use crate::model::{Request, Response};

/// Ordered list of middleware.
///
/// Both phases run in registration order (the `after` phase is not
/// reversed). The first failing hook stops the phase.
#[derive(Clone, Default)]
pub struct MiddlewareChain {
    middlewares: Vec<Arc<dyn Middleware>>,
}

impl MiddlewareChain {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a middleware to the end of the chain
    pub fn attach(&mut self, mw: Arc<dyn Middleware>) {
        debug!(
            middleware_idx = self.middlewares.len(),
            middleware_name = std::any::type_name_of_val(mw.as_ref()),
            "Middleware attached"
        );
        self.middlewares.push(mw);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.middlewares.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.middlewares.is_empty()
    }

    /// Run every `before` hook on `req`.
    pub fn run_before(&self, req: &Request) -> Result<(), DispatchError> {
        for (idx, mw) in self.middlewares.iter().enumerate() {
            mw.before(req)
                .map_err(|source| hook_failed(HookPhase::Before, idx, mw.as_ref(), req, source))?;
        }
        Ok(())
    }

    /// Run every `after` hook on `req` and its final response.
    pub fn run_after(&self, req: &Request, res: &Response, latency: Duration) -> Result<(), DispatchError> {
        for (idx, mw) in self.middlewares.iter().enumerate() {
            mw.after(req, res, latency)
                .map_err(|source| hook_failed(HookPhase::After, idx, mw.as_ref(), req, source))?;
        }
        Ok(())
    }
}

fn hook_failed(
    phase: HookPhase,
    index: usize,
    mw: &dyn Middleware,
    req: &Request,
    source: anyhow::Error,
) -> DispatchError {
    error!(
        request_id = %req.request_id(),
        phase = %phase,
        middleware_idx = index,
        middleware_name = std::any::type_name_of_val(mw),
        error = %source,
        "Middleware hook failed - aborting dispatch"
    );
    DispatchError::Middleware {
        phase,
        index,
        source,
    }
}

impl fmt::Debug for MiddlewareChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MiddlewareChain")
            .field("len", &self.middlewares.len())
            .finish()
    }
}
