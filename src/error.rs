//! Error types for route registration and dispatch.
//!
//! Two families exist:
//!
//! - [`ConfigurationError`] is raised while routes are registered. It is fatal
//!   to startup: the embedding application is expected to refuse to serve.
//! - [`DispatchError`] is raised while a single request is dispatched. The
//!   dispatcher does not turn these into responses (unless fault recovery is
//!   enabled in [`DispatcherConfig`](crate::config::DispatcherConfig)); they
//!   travel up to the hosting transport, which decides what the client sees.
//!
//! A request that matches no route is *not* an error. It is answered with a
//! `404 NOT FOUND` response.

use std::fmt;

/// Route registration failure
#[derive(Debug)]
pub enum ConfigurationError {
    /// The path pattern is not a valid regular expression
    InvalidPattern {
        /// Pattern as given to `register`
        pattern: String,
        /// Underlying regex compile error
        source: regex::Error,
    },
    /// The method is empty or not a valid HTTP method token
    InvalidMethod {
        /// Method as given to `register`
        method: String,
    },
}

impl fmt::Display for ConfigurationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigurationError::InvalidPattern { pattern, source } => {
                write!(f, "invalid route pattern '{pattern}': {source}")
            }
            ConfigurationError::InvalidMethod { method } => {
                write!(f, "invalid route method '{method}': expected an HTTP method token such as GET")
            }
        }
    }
}

impl std::error::Error for ConfigurationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigurationError::InvalidPattern { source, .. } => Some(source),
            ConfigurationError::InvalidMethod { .. } => None,
        }
    }
}

/// Which side of the handler a middleware hook runs on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookPhase {
    Before,
    After,
}

impl fmt::Display for HookPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HookPhase::Before => f.write_str("before"),
            HookPhase::After => f.write_str("after"),
        }
    }
}

/// Failure raised while dispatching a single request
#[derive(Debug)]
pub enum DispatchError {
    /// The transport handed over a method string that is not an HTTP token
    InvalidMethod {
        method: String,
    },
    /// The matched handler returned an error
    Handler {
        method: http::Method,
        path: String,
        source: anyhow::Error,
    },
    /// A middleware hook returned an error; dispatch stopped at that hook
    Middleware {
        phase: HookPhase,
        /// Position of the failing middleware in registration order
        index: usize,
        source: anyhow::Error,
    },
    /// The response payload could not be encoded as JSON
    Serialization(serde_json::Error),
}

impl fmt::Display for DispatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DispatchError::InvalidMethod { method } => {
                write!(f, "request method '{method}' is not a valid HTTP method")
            }
            DispatchError::Handler {
                method,
                path,
                source,
            } => write!(f, "handler for {method} {path} failed: {source:#}"),
            DispatchError::Middleware {
                phase,
                index,
                source,
            } => write!(f, "middleware #{index} failed in {phase} hook: {source:#}"),
            DispatchError::Serialization(e) => write!(f, "failed to encode response body: {e}"),
        }
    }
}

impl std::error::Error for DispatchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DispatchError::Handler { source, .. } | DispatchError::Middleware { source, .. } => {
                Some(&**source)
            }
            DispatchError::Serialization(e) => Some(e),
            DispatchError::InvalidMethod { .. } => None,
        }
    }
}

impl From<serde_json::Error> for DispatchError {
    fn from(e: serde_json::Error) -> Self {
        DispatchError::Serialization(e)
    }
}
