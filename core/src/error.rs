//! Error types for the DNS provider request executor.
//!
//! # Design
//! One variant per stage of a call. None of them is retried here; the caller
//! decides. `Api` keeps the raw response bytes because the executor does not
//! know the provider's error schema.

use thiserror::Error;

/// Errors returned by `RequestExecutor::execute`.
#[derive(Debug, Error)]
pub enum RequestError {
    /// The base URL is not a valid absolute URL. No request was sent.
    #[error("invalid URL {url:?}: {source}")]
    UrlParse {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// The request could not be constructed (bad method, unsupported scheme).
    #[error("failed to build request: {0}")]
    RequestBuild(String),

    /// The server could not be reached.
    #[error("transport error: {0}")]
    Transport(#[source] Box<ureq::Error>),

    /// The response body could not be read to the end.
    #[error("failed to read response body: {0}")]
    BodyRead(#[source] Box<ureq::Error>),

    /// The server answered with a status of 400 or above.
    #[error("DNS provider API returned HTTP {status}: {}", String::from_utf8_lossy(.body))]
    Api { status: u16, body: Vec<u8> },
}

impl RequestError {
    /// Raw response body of an `Api` error.
    pub fn api_body(&self) -> Option<&[u8]> {
        match self {
            RequestError::Api { body, .. } => Some(body),
            _ => None,
        }
    }

    /// Short name of the stage that failed, used as a log field.
    pub fn stage(&self) -> &'static str {
        match self {
            RequestError::UrlParse { .. } => "url_parse",
            RequestError::RequestBuild(_) => "request_build",
            RequestError::Transport(_) => "transport",
            RequestError::BodyRead(_) => "body_read",
            RequestError::Api { .. } => "api",
        }
    }
}
