//! Classifying requests as asynchronous (script-initiated) or not.
//!
//! The classic convention is `X-Requested-With: XMLHttpRequest`, which
//! `fetch()` does not send by default, so the mechanism is pluggable:
//!
//! ```rust,ignore
//! view.jsonable()                                          // X-Requested-With: XMLHttpRequest
//! view.jsonable().with_detector(AcceptsJson)               // Accept: application/json
//! view.jsonable().with_detector(XRequestedWith::matching("x-ajax", "1")?)
//! view.jsonable().with_detector(|h: &HeaderMap| h.contains_key("hx-request"))
//! ```

use axum::http::header::{ACCEPT, HeaderName, HeaderValue, InvalidHeaderName, InvalidHeaderValue};
use axum::http::HeaderMap;
use thiserror::Error;

/// Decides whether a request expects a JSON response.
pub trait AsyncDetector: Send + Sync {
    fn is_async(&self, headers: &HeaderMap) -> bool;
}

impl<F> AsyncDetector for F
where
    F: Fn(&HeaderMap) -> bool + Send + Sync,
{
    fn is_async(&self, headers: &HeaderMap) -> bool {
        self(headers)
    }
}

/// Matches a header against an exact value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XRequestedWith {
    name: HeaderName,
    value: HeaderValue,
}

#[derive(Debug, Error)]
pub enum DetectorError {
    #[error("invalid header name: {0}")]
    Name(#[from] InvalidHeaderName),
    #[error("invalid header value: {0}")]
    Value(#[from] InvalidHeaderValue),
}

impl XRequestedWith {
    pub const DEFAULT_HEADER: &'static str = "x-requested-with";
    pub const DEFAULT_VALUE: &'static str = "XMLHttpRequest";

    /// Match `name: value` instead of the default header.
    pub fn matching(name: &str, value: &str) -> Result<Self, DetectorError> {
        Ok(XRequestedWith {
            name: HeaderName::try_from(name)?,
            value: HeaderValue::try_from(value)?,
        })
    }

    pub fn header_name(&self) -> &HeaderName {
        &self.name
    }
}

impl Default for XRequestedWith {
    fn default() -> Self {
        XRequestedWith {
            name: HeaderName::from_static(Self::DEFAULT_HEADER),
            value: HeaderValue::from_static(Self::DEFAULT_VALUE),
        }
    }
}

impl AsyncDetector for XRequestedWith {
    fn is_async(&self, headers: &HeaderMap) -> bool {
        headers.get(&self.name) == Some(&self.value)
    }
}

/// Treats any request whose `Accept` header lists `application/json` as asynchronous.
#[derive(Debug, Clone, Copy, Default)]
pub struct AcceptsJson;

impl AsyncDetector for AcceptsJson {
    fn is_async(&self, headers: &HeaderMap) -> bool {
        headers
            .get_all(ACCEPT)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .flat_map(|value| value.split(','))
            .any(|media| {
                media
                    .split(';')
                    .next()
                    .is_some_and(|essence| essence.trim().eq_ignore_ascii_case("application/json"))
            })
    }
}

/// Detector assembled from configuration: the header match, optionally
/// widened to JSON `Accept` headers.
#[derive(Debug, Clone, Default)]
pub struct ConfiguredDetector {
    pub header: XRequestedWith,
    pub accepts_json: bool,
}

impl AsyncDetector for ConfiguredDetector {
    fn is_async(&self, headers: &HeaderMap) -> bool {
        self.header.is_async(headers) || (self.accepts_json && AcceptsJson.is_async(headers))
    }
}
