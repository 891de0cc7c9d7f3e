//! Dispatcher core module - per-request orchestration.

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::time::{Duration, Instant};

use http::StatusCode;
use tracing::{debug, error, info, info_span, warn};

use crate::config::DispatcherConfig;
use crate::error::{ConfigurationError, DispatchError};
use crate::middleware::{Middleware, MiddlewareChain};
use crate::model::{Request, Response};
use crate::router::{Captures, Route, RouteTable};
use crate::server::{emit, Body, Environ};

/// Startup-time assembly of a [`Dispatcher`].
///
/// Routes and middleware can only be added here; [`build`](Self::build)
/// freezes them.
#[derive(Debug, Default)]
pub struct DispatcherBuilder {
    routes: RouteTable,
    middlewares: MiddlewareChain,
    config: DispatcherConfig,
}

impl DispatcherBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_config(mut self, config: DispatcherConfig) -> Self {
        self.config = config;
        self
    }

    /// Register a route. See [`RouteTable::register`].
    pub fn route<F>(&mut self, method: &str, pattern: &str, handler: F) -> Result<&mut Self, ConfigurationError>
    where
        F: Fn(&Request, &Captures) -> anyhow::Result<Response> + Send + Sync + 'static,
    {
        self.routes.register(method, pattern, handler)?;
        Ok(self)
    }

    pub fn get<F>(&mut self, pattern: &str, handler: F) -> Result<&mut Self, ConfigurationError>
    where
        F: Fn(&Request, &Captures) -> anyhow::Result<Response> + Send + Sync + 'static,
    {
        self.route("GET", pattern, handler)
    }

    pub fn post<F>(&mut self, pattern: &str, handler: F) -> Result<&mut Self, ConfigurationError>
    where
        F: Fn(&Request, &Captures) -> anyhow::Result<Response> + Send + Sync + 'static,
    {
        self.route("POST", pattern, handler)
    }

    pub fn put<F>(&mut self, pattern: &str, handler: F) -> Result<&mut Self, ConfigurationError>
    where
        F: Fn(&Request, &Captures) -> anyhow::Result<Response> + Send + Sync + 'static,
    {
        self.route("PUT", pattern, handler)
    }

    pub fn patch<F>(&mut self, pattern: &str, handler: F) -> Result<&mut Self, ConfigurationError>
    where
        F: Fn(&Request, &Captures) -> anyhow::Result<Response> + Send + Sync + 'static,
    {
        self.route("PATCH", pattern, handler)
    }

    pub fn delete<F>(&mut self, pattern: &str, handler: F) -> Result<&mut Self, ConfigurationError>
    where
        F: Fn(&Request, &Captures) -> anyhow::Result<Response> + Send + Sync + 'static,
    {
        self.route("DELETE", pattern, handler)
    }

    /// Append middleware; hooks run in the order middleware is added.
    pub fn middleware(&mut self, mw: Arc<dyn Middleware>) -> &mut Self {
        self.middlewares.attach(mw);
        self
    }

    #[must_use]
    pub fn build(self) -> Dispatcher {
        info!(
            routes_count = self.routes.len(),
            middleware_count = self.middlewares.len(),
            not_found_runs_after_hooks = self.config.not_found_runs_after_hooks,
            recover_handler_faults = self.config.recover_handler_faults,
            "Dispatcher ready"
        );
        Dispatcher {
            routes: self.routes,
            middlewares: self.middlewares,
            config: self.config,
        }
    }
}

/// Matches requests to routes and runs middleware around the handler.
///
/// Holds no per-request state. The route table and middleware chain are fixed
/// at construction, so one instance can be shared (e.g. behind an `Arc`) by
/// any number of transport worker threads without locking.
#[derive(Debug)]
pub struct Dispatcher {
    routes: RouteTable,
    middlewares: MiddlewareChain,
    config: DispatcherConfig,
}

impl Dispatcher {
    #[must_use]
    pub fn builder() -> DispatcherBuilder {
        DispatcherBuilder::new()
    }

    #[must_use]
    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }

    #[must_use]
    pub fn middlewares(&self) -> &MiddlewareChain {
        &self.middlewares
    }

    #[must_use]
    pub fn config(&self) -> DispatcherConfig {
        self.config
    }

    /// The single transport-facing entry point.
    ///
    /// Builds a [`Request`] from `environ`, produces its response, hands the
    /// status line and headers to `start_response` and returns the body.
    /// `start_response` is not called if dispatch fails.
    ///
    /// # Errors
    ///
    /// Any [`DispatchError`]: an invalid method from the transport, a failing
    /// middleware hook, a handler fault (unless recovery is enabled) or an
    /// unencodable payload.
    pub fn dispatch<F>(&self, environ: &Environ, start_response: F) -> Result<Body, DispatchError>
    where
        F: FnOnce(&str, &[(String, String)]),
    {
        let request = Request::from_environ(environ)?;
        let span = info_span!(
            "dispatch",
            request_id = %request.request_id(),
            method = %request.method(),
            path = %request.path()
        );
        let _entered = span.enter();

        let response = self.respond(&request)?;
        let emitted = emit(&response)?;

        debug!(
            status_line = %emitted.status_line,
            header_count = emitted.headers.len(),
            body_bytes = emitted.body.len(),
            "Emitting response"
        );
        start_response(&emitted.status_line, &emitted.headers);
        Ok(emitted.body)
    }

    /// Produce the response for `request`: before-hooks, route match,
    /// handler, after-hooks.
    pub fn respond(&self, request: &Request) -> Result<Response, DispatchError> {
        debug!(
            request_id = %request.request_id(),
            middleware_count = self.middlewares.len(),
            "Middleware before execution"
        );
        self.middlewares.run_before(request)?;

        let Some(route_match) = self.routes.lookup(request.method(), request.path()) else {
            return self.not_found(request);
        };

        info!(
            request_id = %request.request_id(),
            method = %request.method(),
            path = %request.path(),
            route_pattern = %route_match.route.pattern(),
            "Request dispatched to handler"
        );

        let start = Instant::now();
        let outcome = self.invoke(route_match.route, request, &route_match.captures);
        let latency = start.elapsed();

        let response = match outcome {
            Ok(response) => response,
            Err(source) if self.config.recover_handler_faults => {
                error!(
                    request_id = %request.request_id(),
                    route_pattern = %route_match.route.pattern(),
                    error = %format!("{source:#}"),
                    "Handler failed - answering 500"
                );
                return Ok(internal_error());
            }
            Err(source) => {
                error!(
                    request_id = %request.request_id(),
                    route_pattern = %route_match.route.pattern(),
                    error = %format!("{source:#}"),
                    "Handler failed - propagating to transport"
                );
                return Err(DispatchError::Handler {
                    method: request.method().clone(),
                    path: request.path().to_string(),
                    source,
                });
            }
        };

        info!(
            request_id = %request.request_id(),
            status = response.status.as_u16(),
            latency_us = latency.as_micros() as u64,
            "Handler response received"
        );

        self.middlewares.run_after(request, &response, latency)?;
        Ok(response)
    }

    fn not_found(&self, request: &Request) -> Result<Response, DispatchError> {
        warn!(
            request_id = %request.request_id(),
            method = %request.method(),
            path = %request.path(),
            routes_count = self.routes.len(),
            "No route matched - answering 404"
        );
        let response = Response::not_found();
        if self.config.not_found_runs_after_hooks {
            self.middlewares
                .run_after(request, &response, Duration::ZERO)?;
        }
        Ok(response)
    }

    /// Call the handler. Panics are only intercepted when fault recovery is
    /// on; otherwise they unwind into the transport like any other fault.
    fn invoke(&self, route: &Route, request: &Request, captures: &Captures) -> anyhow::Result<Response> {
        if !self.config.recover_handler_faults {
            return route.call(request, captures);
        }
        match panic::catch_unwind(AssertUnwindSafe(|| route.call(request, captures))) {
            Ok(outcome) => outcome,
            Err(payload) => Err(anyhow::anyhow!(
                "handler panicked: {}",
                panic_message(payload.as_ref())
            )),
        }
    }
}

fn internal_error() -> Response {
    Response::empty()
        .with_status(StatusCode::INTERNAL_SERVER_ERROR)
        .with_header("Content-Type", "text/plain")
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&'static str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.as_str()
    } else {
        "non-string panic payload"
    }
}
