use http::StatusCode;

use crate::model::Response;

/// Format a status line such as `200 OK` or `404 NOT FOUND`.
///
/// The reason phrase is the canonical one, upper-cased. Codes without a
/// canonical phrase print as `<code> UNKNOWN`.
#[must_use]
pub fn status_line(status: StatusCode) -> String {
    let reason = status.canonical_reason().unwrap_or("Unknown");
    format!("{} {}", status.as_u16(), reason.to_ascii_uppercase())
}

/// Response body as a sequence of byte chunks
///
/// An absent payload yields no chunks at all; a present one yields exactly one
/// chunk of UTF-8 JSON.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Body(Vec<Vec<u8>>);

impl Body {
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn chunks(&self) -> &[Vec<u8>] {
        &self.0
    }

    /// Total length in bytes across all chunks
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.iter().map(Vec::len).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Concatenate all chunks
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.0.concat()
    }
}

impl IntoIterator for Body {
    type Item = Vec<u8>;
    type IntoIter = std::vec::IntoIter<Vec<u8>>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// A response translated into transport primitives
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Emitted {
    pub status_line: String,
    pub headers: Vec<(String, String)>,
    pub body: Body,
}

/// Translate a response into a status line, ordered header pairs and a body.
///
/// Fails only if the payload cannot be encoded as JSON (e.g. a map with
/// non-string keys built by hand).
pub fn emit(response: &Response) -> serde_json::Result<Emitted> {
    let body = match &response.data {
        None => Body::empty(),
        Some(data) => Body(vec![serde_json::to_vec(data)?]),
    };
    Ok(Emitted {
        status_line: status_line(response.status),
        headers: response.headers_list(),
        body,
    })
}
