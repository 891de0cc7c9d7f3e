use http::Method;

use crate::error::DispatchError;
use crate::ids::RequestId;
use crate::server::Environ;

/// Inbound request facts for one dispatch
///
/// Fields are private: middleware and handlers observe the request but cannot
/// rewrite it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    request_id: RequestId,
    method: Method,
    path: String,
}

impl Request {
    /// Build a request with a fresh request id.
    ///
    /// The path is normalized so it always starts with `/`.
    #[must_use]
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self::with_request_id(RequestId::new(), method, path)
    }

    #[must_use]
    pub fn with_request_id(request_id: RequestId, method: Method, path: impl Into<String>) -> Self {
        Self {
            request_id,
            method,
            path: normalize_path(path.into()),
        }
    }

    /// Build a request from the facts a transport hands to
    /// [`Dispatcher::dispatch`](crate::dispatcher::Dispatcher::dispatch).
    ///
    /// Fails with [`DispatchError::InvalidMethod`] when the method string is not
    /// a valid HTTP token. Extension methods are accepted verbatim; no case
    /// folding is applied.
    pub fn from_environ(environ: &Environ) -> Result<Self, DispatchError> {
        let method = Method::from_bytes(environ.method.as_bytes()).map_err(|_| {
            DispatchError::InvalidMethod {
                method: environ.method.clone(),
            }
        })?;
        let request_id = RequestId::inherit(environ.request_id.as_deref());
        Ok(Self::with_request_id(request_id, method, environ.path.as_str()))
    }

    #[inline]
    #[must_use]
    pub fn request_id(&self) -> RequestId {
        self.request_id
    }

    #[inline]
    #[must_use]
    pub fn method(&self) -> &Method {
        &self.method
    }

    #[inline]
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }
}

fn normalize_path(path: String) -> String {
    if path.starts_with('/') {
        path
    } else {
        let mut normalized = String::with_capacity(path.len() + 1);
        normalized.push('/');
        normalized.push_str(&path);
        normalized
    }
}
