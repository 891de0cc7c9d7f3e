use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::Duration;

use super::Middleware;
use crate::model::{Request, Response};

/// Middleware for collecting dispatch counters
///
/// All counters use atomic operations so one instance can be shared by every
/// worker thread of the embedding server.
///
/// Metrics collected:
/// - Requests seen by the `before` phase (every dispatch)
/// - Responses seen by the `after` phase (matched routes, plus misses when the
///   dispatcher is configured to run after-hooks for them)
/// - Responses per status class (1xx..5xx)
/// - Accumulated and average handler latency
#[derive(Debug, Default)]
pub struct MetricsMiddleware {
    request_count: AtomicUsize,
    response_count: AtomicUsize,
    status_classes: [AtomicUsize; 5],
    total_latency_ns: AtomicU64,
}

impl MetricsMiddleware {
    /// Create a new metrics middleware with all counters initialized to zero
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of dispatches that reached the `before` phase
    #[must_use]
    pub fn request_count(&self) -> usize {
        self.request_count.load(Ordering::Relaxed)
    }

    /// Total number of responses observed by the `after` phase
    #[must_use]
    pub fn response_count(&self) -> usize {
        self.response_count.load(Ordering::Relaxed)
    }

    /// Responses observed for a status class, e.g. `2` for 2xx.
    ///
    /// Returns zero for classes outside `1..=5`.
    #[must_use]
    pub fn status_class_count(&self, class: u16) -> usize {
        match class {
            1..=5 => self.status_classes[usize::from(class - 1)].load(Ordering::Relaxed),
            _ => 0,
        }
    }

    /// Mean handler latency across observed responses.
    ///
    /// Returns zero duration if no responses have been observed yet.
    #[must_use]
    pub fn average_latency(&self) -> Duration {
        let count = self.response_count.load(Ordering::Relaxed) as u64;
        if count == 0 {
            Duration::ZERO
        } else {
            Duration::from_nanos(self.total_latency_ns.load(Ordering::Relaxed) / count)
        }
    }
}

impl Middleware for MetricsMiddleware {
    fn before(&self, _req: &Request) -> anyhow::Result<()> {
        self.request_count.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    fn after(&self, _req: &Request, res: &Response, latency: Duration) -> anyhow::Result<()> {
        self.response_count.fetch_add(1, Ordering::Relaxed);
        let class = res.status.as_u16() / 100;
        if (1..=5).contains(&class) {
            self.status_classes[usize::from(class - 1)].fetch_add(1, Ordering::Relaxed);
        }
        let nanos = u64::try_from(latency.as_nanos()).unwrap_or(u64::MAX);
        self.total_latency_ns.fetch_add(nanos, Ordering::Relaxed);
        Ok(())
    }
}
