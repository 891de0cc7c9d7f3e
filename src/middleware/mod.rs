//! # Middleware Module
//!
//! Observational hooks run around every dispatch. A middleware sees each
//! request before routing and the final response after the handler, but can
//! neither reject the request nor alter the response.

mod chain;
mod core;
mod metrics;
mod tracing;

pub use chain::MiddlewareChain;
pub use core::Middleware;
pub use metrics::MetricsMiddleware;
pub use tracing::TracingMiddleware;
