//! Router core module - ordered route table and regex matching.

use http::Method;
use regex::Regex;
use smallvec::SmallVec;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use crate::error::ConfigurationError;
use crate::model::{Request, Response};

/// Maximum number of captured path parameters before heap allocation.
pub const MAX_INLINE_CAPTURES: usize = 8;

/// Stack-allocated storage for captured path parameters.
pub type CaptureVec = SmallVec<[String; MAX_INLINE_CAPTURES]>;

/// Lookups slower than this are logged at `warn`.
const SLOW_MATCH_THRESHOLD: Duration = Duration::from_millis(1);

/// Substrings captured by a route pattern, in the order their groups open
/// in the pattern.
///
/// Values are always strings. Handlers convert them with [`Captures::parse`]
/// and report failures through their own `Result`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Captures(CaptureVec);

impl Captures {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a captured value by position
    #[inline]
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&str> {
        self.0.get(index).map(String::as_str)
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    #[must_use]
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    /// Parse the capture at `index` into `T`.
    ///
    /// Fails if the capture is missing or does not parse. The error names the
    /// position and the offending text.
    pub fn parse<T>(&self, index: usize) -> anyhow::Result<T>
    where
        T: FromStr,
        T::Err: std::error::Error + Send + Sync + 'static,
    {
        let raw = self
            .get(index)
            .ok_or_else(|| anyhow::anyhow!("no path parameter at position {index}"))?;
        raw.parse::<T>().map_err(|e| {
            anyhow::Error::new(e).context(format!("invalid path parameter #{index}: '{raw}'"))
        })
    }
}

impl FromIterator<String> for Captures {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Handler bound to a route.
///
/// Receives the request and the captured path parameters; its error is
/// propagated by the dispatcher untouched.
pub type HandlerFn = Arc<dyn Fn(&Request, &Captures) -> anyhow::Result<Response> + Send + Sync>;

/// A registered `(method, compiled pattern, handler)` triple
#[derive(Clone)]
pub struct Route {
    method: Method,
    pattern: String,
    regex: Regex,
    handler: HandlerFn,
}

impl Route {
    #[must_use]
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// The pattern as registered, before anchoring
    #[must_use]
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Number of capture groups the pattern declares
    #[must_use]
    pub fn capture_count(&self) -> usize {
        self.regex.captures_len().saturating_sub(1)
    }

    /// Match `path` against the whole pattern.
    ///
    /// Groups that do not take part in the match yield an empty string so
    /// positions stay stable.
    #[must_use]
    pub fn captures(&self, path: &str) -> Option<Captures> {
        let caps = self.regex.captures(path)?;
        Some(
            caps.iter()
                .skip(1)
                .map(|m| m.map_or_else(String::new, |m| m.as_str().to_string()))
                .collect(),
        )
    }

    /// Invoke the handler
    pub fn call(&self, request: &Request, captures: &Captures) -> anyhow::Result<Response> {
        (self.handler)(request, captures)
    }
}

impl fmt::Debug for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Route")
            .field("method", &self.method)
            .field("pattern", &self.pattern)
            .finish_non_exhaustive()
    }
}

/// Result of successfully matching a request to a route
#[derive(Debug, Clone)]
pub struct RouteMatch<'a> {
    pub route: &'a Route,
    pub captures: Captures,
}

/// Ordered route table with first-match-wins lookup
///
/// Routes are scanned in registration order. Overlapping patterns are legal;
/// the earliest registration wins. An index keyed by method narrows the scan
/// to candidate routes without changing their relative order.
#[derive(Clone, Default)]
pub struct RouteTable {
    routes: Vec<Route>,
    by_method: HashMap<Method, Vec<usize>>,
}

impl RouteTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler for `method` requests whose full path matches
    /// `pattern`.
    ///
    /// `pattern` uses `regex` syntax; capture groups become positional path
    /// parameters. No conflict detection is performed.
    ///
    /// # Errors
    ///
    /// [`ConfigurationError::InvalidPattern`] if the pattern does not compile,
    /// [`ConfigurationError::InvalidMethod`] if `method` is not an upper-case
    /// HTTP method token.
    pub fn register<F>(&mut self, method: &str, pattern: &str, handler: F) -> Result<(), ConfigurationError>
    where
        F: Fn(&Request, &Captures) -> anyhow::Result<Response> + Send + Sync + 'static,
    {
        let method = parse_method(method)?;
        let regex = compile_pattern(pattern)?;

        let index = self.routes.len();
        self.by_method.entry(method.clone()).or_default().push(index);

        info!(
            method = %method,
            pattern = %pattern,
            position = index,
            capture_groups = regex.captures_len().saturating_sub(1),
            "Route registered"
        );

        self.routes.push(Route {
            method,
            pattern: pattern.to_string(),
            regex,
            handler: Arc::new(handler),
        });
        Ok(())
    }

    pub fn get<F>(&mut self, pattern: &str, handler: F) -> Result<(), ConfigurationError>
    where
        F: Fn(&Request, &Captures) -> anyhow::Result<Response> + Send + Sync + 'static,
    {
        self.register("GET", pattern, handler)
    }

    pub fn post<F>(&mut self, pattern: &str, handler: F) -> Result<(), ConfigurationError>
    where
        F: Fn(&Request, &Captures) -> anyhow::Result<Response> + Send + Sync + 'static,
    {
        self.register("POST", pattern, handler)
    }

    pub fn put<F>(&mut self, pattern: &str, handler: F) -> Result<(), ConfigurationError>
    where
        F: Fn(&Request, &Captures) -> anyhow::Result<Response> + Send + Sync + 'static,
    {
        self.register("PUT", pattern, handler)
    }

    pub fn patch<F>(&mut self, pattern: &str, handler: F) -> Result<(), ConfigurationError>
    where
        F: Fn(&Request, &Captures) -> anyhow::Result<Response> + Send + Sync + 'static,
    {
        self.register("PATCH", pattern, handler)
    }

    pub fn delete<F>(&mut self, pattern: &str, handler: F) -> Result<(), ConfigurationError>
    where
        F: Fn(&Request, &Captures) -> anyhow::Result<Response> + Send + Sync + 'static,
    {
        self.register("DELETE", pattern, handler)
    }

    /// Find the first route whose method equals `method` and whose pattern
    /// matches all of `path`.
    ///
    /// Returns `None` when nothing matches; the dispatcher answers such
    /// requests with `404 NOT FOUND`.
    #[must_use]
    pub fn lookup(&self, method: &Method, path: &str) -> Option<RouteMatch<'_>> {
        debug!(method = %method, path = %path, "Route match attempt");

        let match_start = Instant::now();
        let found = self
            .by_method
            .get(method)
            .into_iter()
            .flatten()
            .filter_map(|&idx| self.routes.get(idx))
            .find_map(|route| route.captures(path).map(|captures| RouteMatch { route, captures }));
        let match_duration = match_start.elapsed();

        match &found {
            Some(m) if match_duration > SLOW_MATCH_THRESHOLD => warn!(
                method = %method,
                path = %path,
                route_pattern = %m.route.pattern,
                captures = ?m.captures.as_slice(),
                duration_us = match_duration.as_micros(),
                "Slow route matching detected"
            ),
            Some(m) => info!(
                method = %method,
                path = %path,
                route_pattern = %m.route.pattern,
                captures = ?m.captures.as_slice(),
                duration_us = match_duration.as_micros(),
                "Route matched"
            ),
            None => debug!(
                method = %method,
                path = %path,
                duration_us = match_duration.as_micros(),
                "No route matched"
            ),
        }

        found
    }

    /// Registered routes in registration order
    pub fn routes(&self) -> impl Iterator<Item = &Route> {
        self.routes.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

impl fmt::Debug for RouteTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.routes.iter()).finish()
    }
}

/// Accept only upper-case method tokens so a `get` typo cannot register a
/// route that never matches.
fn parse_method(method: &str) -> Result<Method, ConfigurationError> {
    let invalid = || ConfigurationError::InvalidMethod {
        method: method.to_string(),
    };
    if method.bytes().any(|b| b.is_ascii_lowercase()) {
        return Err(invalid());
    }
    Method::from_bytes(method.as_bytes()).map_err(|_| invalid())
}

/// Compile a route pattern anchored at both ends of the path.
///
/// The bare pattern is compiled first so that unbalanced input such as
/// `a)|(b` is rejected instead of escaping the anchoring group.
pub(crate) fn compile_pattern(pattern: &str) -> Result<Regex, ConfigurationError> {
    let invalid = |source| ConfigurationError::InvalidPattern {
        pattern: pattern.to_string(),
        source,
    };
    Regex::new(pattern).map_err(invalid)?;

    let mut anchored = String::with_capacity(pattern.len() + 8);
    anchored.push_str(r"\A(?:");
    anchored.push_str(pattern);
    anchored.push_str(r")\z");
    Regex::new(&anchored).map_err(invalid)
}
