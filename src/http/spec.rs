use std::collections::BTreeMap;

use bytes::Bytes;
use reqwest::{
    Method, Url,
    header::{HeaderMap, HeaderName, HeaderValue},
};

use tracing::warn;

use crate::error::{ConfigError, RequestFailure, ValidationError};

/// The request every worker repeats. Validated once, then shared read-only.
#[derive(Debug, Clone)]
pub struct RequestSpec {
    url: Url,
    method: Method,
    headers: BTreeMap<String, String>,
    header_map: HeaderMap,
    body: Option<Bytes>,
}

impl RequestSpec {
    /// Validates and freezes a request description.
    ///
    /// The method is upper-cased before validation.
    ///
    /// Headers whose name or value is not valid HTTP are dropped with a
    /// warning; the run still starts.
    ///
    /// # Errors
    ///
    /// Returns an error when the URL is empty, unparsable or not http(s), or
    /// when the method is not a valid HTTP token.
    pub fn new(
        url: &str,
        method: &str,
        headers: BTreeMap<String, String>,
        body: Option<Bytes>,
    ) -> Result<Self, ConfigError> {
        let url = parse_url(url)?;
        let method = parse_method(method).map_err(|err| ConfigError::InvalidField {
            field: "method",
            source: err,
        })?;
        let (headers, header_map) = build_header_map(headers);

        Ok(Self {
            url,
            method,
            headers,
            header_map,
            body,
        })
    }

    #[must_use]
    pub const fn url(&self) -> &Url {
        &self.url
    }

    #[must_use]
    pub const fn method(&self) -> &Method {
        &self.method
    }

    #[must_use]
    pub const fn headers(&self) -> &BTreeMap<String, String> {
        &self.headers
    }

    #[must_use]
    pub const fn header_map(&self) -> &HeaderMap {
        &self.header_map
    }

    #[must_use]
    pub const fn body(&self) -> Option<&Bytes> {
        self.body.as_ref()
    }
}

/// Result of one request attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Success { status: u16, bytes: u64 },
    Failure(RequestFailure),
}

impl Outcome {
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Outcome::Success { .. })
    }
}

fn parse_url(raw: &str) -> Result<Url, ConfigError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::MissingUrl);
    }
    let url = Url::parse(trimmed).map_err(|err| ConfigError::InvalidUrl {
        url: trimmed.to_owned(),
        source: err,
    })?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ConfigError::UnsupportedScheme {
            scheme: other.to_owned(),
        }),
    }
}

fn parse_method(raw: &str) -> Result<Method, ValidationError> {
    let normalized = raw.trim().to_ascii_uppercase();
    if normalized.is_empty() {
        return Err(ValidationError::InvalidMethod {
            value: raw.to_owned(),
        });
    }
    Method::from_bytes(normalized.as_bytes()).map_err(|_invalid| ValidationError::InvalidMethod {
        value: raw.to_owned(),
    })
}

fn build_header_map(
    headers: BTreeMap<String, String>,
) -> (BTreeMap<String, String>, HeaderMap) {
    let mut kept = BTreeMap::new();
    let mut map = HeaderMap::with_capacity(headers.len());
    for (key, value) in headers {
        match validate_header(&key, &value) {
            Ok((name, header_value)) => {
                map.insert(name, header_value);
                kept.insert(key, value);
            }
            Err(err) => warn!("Skipping header: {}", err),
        }
    }
    (kept, map)
}

fn validate_header(key: &str, value: &str) -> Result<(HeaderName, HeaderValue), ValidationError> {
    let name =
        HeaderName::from_bytes(key.as_bytes()).map_err(|err| ValidationError::InvalidHeaderName {
            header: key.to_owned(),
            source: err,
        })?;
    let header_value =
        HeaderValue::from_str(value).map_err(|err| ValidationError::InvalidHeaderValue {
            header: key.to_owned(),
            source: err,
        })?;
    Ok((name, header_value))
}
