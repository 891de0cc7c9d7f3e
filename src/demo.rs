//! Docs demo application.
//!
//! A three-route application used by the `routelet` binary and the
//! integration tests:
//!
//! | Method | Pattern       | Response                                      |
//! |--------|---------------|-----------------------------------------------|
//! | GET    | `/`           | `"Hello world!"`                              |
//! | GET    | `/docs`       | `{"docs": [{"pk": 1, "data": "Doc1"}]}`       |
//! | GET    | `/docs/(\d+)` | `{"pk": 1, "data": "Doc1"}` or an empty 404   |
//!
//! `\d` is Unicode-aware, so `/docs/١` names doc 1 just like `/docs/1`. Ids too
//! large for `u64` name no doc and get the empty 404.
//!
//! [`TracingMiddleware`] is attached as the request logger.

use std::sync::Arc;

use http::StatusCode;
use regex::Regex;
use serde::Serialize;
use tracing::debug;

use crate::config::DispatcherConfig;
use crate::dispatcher::Dispatcher;
use crate::error::ConfigurationError;
use crate::middleware::TracingMiddleware;
use crate::model::{Request, Response};
use crate::router::Captures;

#[derive(Debug, Clone, Serialize)]
struct Doc {
    pk: u64,
    data: &'static str,
}

#[derive(Debug, Serialize)]
struct DocList {
    docs: Vec<Doc>,
}

const DOCS: &[Doc] = &[Doc { pk: 1, data: "Doc1" }];

fn index(_req: &Request, _caps: &Captures) -> anyhow::Result<Response> {
    debug!("Index view");
    Ok(Response::new("Hello world!"))
}

fn docs(_req: &Request, _caps: &Captures) -> anyhow::Result<Response> {
    Ok(Response::json(&DocList {
        docs: DOCS.to_vec(),
    })?)
}

fn doc(digits: &DecimalDigits, _req: &Request, caps: &Captures) -> anyhow::Result<Response> {
    let raw = caps.get(0).unwrap_or_default();
    match digits
        .value(raw)
        .and_then(|pk| DOCS.iter().find(|d| d.pk == pk))
    {
        Some(found) => Ok(Response::json(found)?),
        None => {
            debug!(pk = raw, "No such doc");
            Ok(Response::empty().with_status(StatusCode::NOT_FOUND))
        }
    }
}

const DECIMAL_DIGIT: &str = r"\A\d\z";

/// Decoder for `\d` matches, which may use any Unicode decimal digit (`Nd`).
///
/// `Nd` characters are encoded in runs of ten ascending from zero and
/// neighbouring runs sit back to back, so a digit's value is its offset from
/// the start of its contiguous `Nd` span, modulo ten.
#[derive(Debug, Clone)]
struct DecimalDigits {
    nd: Regex,
}

impl DecimalDigits {
    fn new() -> Result<Self, ConfigurationError> {
        Regex::new(DECIMAL_DIGIT)
            .map(|nd| Self { nd })
            .map_err(|source| ConfigurationError::InvalidPattern {
                pattern: DECIMAL_DIGIT.to_string(),
                source,
            })
    }

    fn is_digit(&self, code_point: u32) -> bool {
        char::from_u32(code_point).is_some_and(|c| self.nd.is_match(c.encode_utf8(&mut [0; 4])))
    }

    fn digit(&self, c: char) -> Option<u64> {
        if let Some(d) = c.to_digit(10) {
            return Some(u64::from(d));
        }
        if !self.is_digit(u32::from(c)) {
            return None;
        }
        let offset = (0..u32::from(c))
            .rev()
            .take_while(|&cp| self.is_digit(cp))
            .count();
        u64::try_from(offset % 10).ok()
    }

    /// Value of a digit string; `None` when it does not fit in a `u64`.
    fn value(&self, digits: &str) -> Option<u64> {
        digits
            .chars()
            .try_fold(0u64, |acc, c| acc.checked_mul(10)?.checked_add(self.digit(c)?))
    }
}

/// Build the docs application.
pub fn docs_app(config: DispatcherConfig) -> Result<Dispatcher, ConfigurationError> {
    let digits = DecimalDigits::new()?;
    let mut builder = Dispatcher::builder().with_config(config);
    builder
        .get("/", index)?
        .get("/docs", docs)?
        .get(r"/docs/(\d+)", move |req, caps| doc(&digits, req, caps))?
        .middleware(Arc::new(TracingMiddleware));
    Ok(builder.build())
}
