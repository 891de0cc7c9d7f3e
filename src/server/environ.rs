/// Request facts supplied by the hosting transport
///
/// This is the whole of what the dispatcher needs from a connection. Reading
/// sockets, parsing the request line and splitting off the query string all
/// happen in the transport before an `Environ` is built.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Environ {
    /// Request method as sent by the client, e.g. `GET`
    pub method: String,
    /// Request path without query string
    pub path: String,
    /// Inbound `X-Request-Id` header, if the transport saw one
    pub request_id: Option<String>,
}

impl Environ {
    #[must_use]
    pub fn new(method: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            path: path.into(),
            request_id: None,
        }
    }

    #[must_use]
    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = Some(request_id.into());
        self
    }
}
