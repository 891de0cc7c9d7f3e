use std::sync::Arc;

use http::StatusCode;
use serde::Serialize;
use serde_json::Value;
use smallvec::SmallVec;

/// Maximum inline headers before heap allocation
pub const MAX_INLINE_HEADERS: usize = 8;

/// Ordered response headers.
///
/// Names use `Arc<str>` since most are `'static` strings repeated on every
/// response. Names are unique (compared case-insensitively); first insertion
/// fixes a header's position.
pub type HeaderVec = SmallVec<[(Arc<str>, String); MAX_INLINE_HEADERS]>;

/// Outbound response produced by a handler
///
/// `data == None` means an empty body. Any other value is encoded as JSON
/// when the response is emitted. [`Response::json`] maps a payload that
/// serializes to `null` (`None`, `()`) to `None`; an explicit
/// `Response::new(Value::Null)` still emits `null`.
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    /// Structured payload
    pub data: Option<Value>,
    /// HTTP status, `200 OK` unless set otherwise
    pub status: StatusCode,
    /// Response headers in emission order
    pub headers: HeaderVec,
}

impl Default for Response {
    fn default() -> Self {
        Self {
            data: None,
            status: StatusCode::OK,
            headers: HeaderVec::new(),
        }
    }
}

impl Response {
    /// `200 OK` carrying `data`
    #[must_use]
    pub fn new(data: impl Into<Value>) -> Self {
        Self {
            data: Some(data.into()),
            ..Self::default()
        }
    }

    /// `200 OK` with an empty body
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// `200 OK` carrying any serializable payload. An absent payload gives
    /// an empty body.
    pub fn json<T: Serialize>(payload: &T) -> serde_json::Result<Self> {
        Ok(match serde_json::to_value(payload)? {
            Value::Null => Self::empty(),
            data => Self::new(data),
        })
    }

    /// The terminal response for a request no route accepts
    #[must_use]
    pub fn not_found() -> Self {
        Self::empty()
            .with_status(StatusCode::NOT_FOUND)
            .with_header("Content-Type", "text/plain")
    }

    #[must_use]
    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }

    #[must_use]
    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.set_header(name, value);
        self
    }

    /// Add or update a header.
    ///
    /// An existing header with the same name (case-insensitive) keeps its
    /// position and gets the new value.
    pub fn set_header(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        match self
            .headers
            .iter_mut()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
        {
            Some((_, existing)) => *existing = value,
            None => self.headers.push((Arc::from(name), value)),
        }
    }

    /// Get a header by name (case-insensitive per RFC 7230)
    #[inline]
    #[must_use]
    pub fn get_header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Headers as owned `(name, value)` pairs in emission order
    #[must_use]
    pub fn headers_list(&self) -> Vec<(String, String)> {
        self.headers
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[inline]
    #[must_use]
    pub fn has_body(&self) -> bool {
        self.data.is_some()
    }
}
