//! Request correlation ids

use std::fmt;
use std::str::FromStr;

use tracing::debug;
use ulid::Ulid;

/// ULID naming one dispatch.
///
/// Every [`Request`](crate::model::Request) carries one so that the `before`
/// and `after` log lines of a single dispatch can be joined up. The id sorts
/// by creation time.
#[derive(Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub struct RequestId(Ulid);

impl RequestId {
    #[must_use]
    pub fn new() -> Self {
        Self(Ulid::new())
    }

    /// Keep the id the transport was handed when it is a ULID, otherwise
    /// mint a fresh one.
    #[must_use]
    pub fn inherit(upstream: Option<&str>) -> Self {
        match upstream.map(str::parse::<Self>) {
            Some(Ok(id)) => id,
            Some(Err(err)) => {
                debug!(error = %err, "Ignoring malformed upstream request id");
                Self::new()
            }
            None => Self::new(),
        }
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Parses a ULID, ignoring surrounding whitespace.
impl FromStr for RequestId {
    type Err = ulid::DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ulid::from_string(s.trim()).map(Self)
    }
}
