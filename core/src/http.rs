//! HTTP request and response descriptors as plain data.
//!
//! # Design
//! `ApiRequest` is what the executor is about to put on the wire and
//! `ApiResponse` is what came back. Neither touches the network, so the
//! build and classify stages of a call can be tested without a server.
//! Bodies are raw bytes: the executor never decodes a provider schema.

use std::fmt;
use std::str::FromStr;

use url::Url;

use crate::error::RequestError;

/// HTTP method for a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Head,
    Post,
    Put,
    Patch,
    Delete,
    Options,
    /// Any other syntactically valid method token, passed through as is.
    Other(String),
}

impl HttpMethod {
    pub fn as_str(&self) -> &str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Head => "HEAD",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Options => "OPTIONS",
            HttpMethod::Other(token) => token,
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HttpMethod {
    type Err = RequestError;

    /// Methods are case-sensitive, so `"get"` becomes `Other("get")`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let method = match s {
            "GET" => HttpMethod::Get,
            "HEAD" => HttpMethod::Head,
            "POST" => HttpMethod::Post,
            "PUT" => HttpMethod::Put,
            "PATCH" => HttpMethod::Patch,
            "DELETE" => HttpMethod::Delete,
            "OPTIONS" => HttpMethod::Options,
            "" => return Err(RequestError::RequestBuild("empty HTTP method".to_string())),
            other if other.bytes().all(is_token_byte) => HttpMethod::Other(other.to_string()),
            other => {
                return Err(RequestError::RequestBuild(format!(
                    "invalid HTTP method {other:?}"
                )))
            }
        };
        Ok(method)
    }
}

/// RFC 9110 `tchar`.
fn is_token_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b"!#$%&'*+-.^_`|~".contains(&b)
}

/// An outgoing request to the DNS provider API.
///
/// Built by `RequestExecutor::build_request`. Always carries
/// `content-type: application/json`, including when `body` is empty.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: HttpMethod,
    pub url: Url,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl ApiRequest {
    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// A response from the DNS provider API, body fully read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl ApiResponse {
    /// Statuses of 400 and above are application-level failures.
    pub fn is_error(&self) -> bool {
        self.status >= 400
    }
}
