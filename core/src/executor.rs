//! One-shot HTTP calls against a DNS provider API.
//!
//! # Design
//! `execute` is three stages. `build_request` parses the URL and method into
//! an `ApiRequest` without I/O. The transport stage sends it with a
//! `ureq::Agent` and reads the whole body. `classify_response` turns the
//! status into success or `RequestError::Api`. The first and last stages are
//! pure and tested on their own; the integration tests cover the middle one
//! against the stub server.
//!
//! The agent passes any method token through and never follows redirects,
//! so a 3xx reaches `classify_response` like any other status below 400.
//!
//! Every failure is logged where it is detected and returned as is.

use std::fmt;

use tracing::{debug, error};
use ureq::http;
use ureq::{Agent, AsSendBody, Body};
use url::Url;

use crate::config::ExecutorConfig;
use crate::error::RequestError;
use crate::http::{ApiRequest, ApiResponse, HttpMethod};

const CONTENT_TYPE_JSON: &str = "application/json";

/// Blocking executor for single DNS provider API requests.
///
/// Holds no per-call state. Clones share the underlying agent, so one
/// executor can be used from several threads at once.
#[derive(Clone)]
pub struct RequestExecutor {
    agent: Agent,
    user_agent: Option<String>,
    max_body_bytes: u64,
}

impl fmt::Debug for RequestExecutor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestExecutor")
            .field("user_agent", &self.user_agent)
            .field("max_body_bytes", &self.max_body_bytes)
            .finish_non_exhaustive()
    }
}

impl Default for RequestExecutor {
    fn default() -> Self {
        Self::new(ExecutorConfig::default())
    }
}

impl RequestExecutor {
    pub fn new(config: ExecutorConfig) -> Self {
        let agent = Agent::config_builder()
            .http_status_as_error(false)
            .allow_non_standard_methods(true)
            .max_redirects(0)
            .max_redirects_will_error(false)
            .timeout_global(config.timeout)
            .build()
            .new_agent();

        Self {
            agent,
            user_agent: config.user_agent,
            max_body_bytes: config.max_body_bytes,
        }
    }

    /// Use a caller-owned agent.
    ///
    /// The agent must be built with `http_status_as_error(false)`, otherwise
    /// 4xx/5xx responses surface as `Transport` instead of `Api`. It also
    /// needs `allow_non_standard_methods(true)` for `HttpMethod::Other`, and
    /// `max_redirects(0)` with `max_redirects_will_error(false)` for 3xx
    /// bodies to be returned unchanged.
    pub fn with_agent(agent: Agent) -> Self {
        Self {
            agent,
            user_agent: None,
            max_body_bytes: crate::config::DEFAULT_MAX_BODY_BYTES,
        }
    }

    /// Send `body` to `base_url` and return the raw response body.
    ///
    /// `Content-Type: application/json` is always set, even when `body` is
    /// empty. Statuses of 400 and above fail with `RequestError::Api`
    /// carrying the response bytes.
    pub fn execute(
        &self,
        method: &str,
        base_url: &str,
        body: &[u8],
    ) -> Result<Vec<u8>, RequestError> {
        let request = self.build_request(method, base_url, body)?;
        let response = self.send(&request)?;
        classify_response(response)
    }

    /// Parse and assemble a request without sending it.
    pub fn build_request(
        &self,
        method: &str,
        base_url: &str,
        body: &[u8],
    ) -> Result<ApiRequest, RequestError> {
        let url = Url::parse(base_url).map_err(|source| {
            let e = RequestError::UrlParse {
                url: base_url.to_string(),
                source,
            };
            error!(
                stage = e.stage(),
                url = base_url,
                error = %e,
                "invalid DNS provider API url"
            );
            e
        })?;

        let method: HttpMethod = method.parse().inspect_err(|e: &RequestError| {
            error!(
                stage = e.stage(),
                url = %url,
                method,
                error = %e,
                "failed to build request"
            );
        })?;

        if !matches!(url.scheme(), "http" | "https") {
            let e = RequestError::RequestBuild(format!(
                "unsupported URL scheme {:?}",
                url.scheme()
            ));
            error!(
                stage = e.stage(),
                url = %url,
                %method,
                error = %e,
                "failed to build request"
            );
            return Err(e);
        }

        let mut headers = vec![("content-type".to_string(), CONTENT_TYPE_JSON.to_string())];
        if let Some(user_agent) = &self.user_agent {
            headers.push(("user-agent".to_string(), user_agent.clone()));
        }

        Ok(ApiRequest {
            method,
            url,
            headers,
            body: body.to_vec(),
        })
    }

    fn send(&self, request: &ApiRequest) -> Result<ApiResponse, RequestError> {
        debug!(
            method = %request.method,
            url = %request.url,
            body_len = request.body.len(),
            "sending DNS provider API request"
        );

        let builder = request.headers.iter().fold(
            http::Request::builder()
                .method(request.method.as_str())
                .uri(request.url.as_str()),
            |builder, (name, value)| builder.header(name.as_str(), value.as_str()),
        );

        // Methods that do not normally carry an entity go out without one
        // when the caller passed nothing.
        let response = if request.body.is_empty() && !method_takes_body(&request.method) {
            let http_request = builder.body(()).map_err(|e| build_error(request, e))?;
            self.run(request, http_request)?
        } else {
            let http_request = builder
                .body(request.body.as_slice())
                .map_err(|e| build_error(request, e))?;
            self.run(request, http_request)?
        };

        debug!(
            method = %request.method,
            url = %request.url,
            status = response.status,
            "received DNS provider API response"
        );
        Ok(response)
    }

    /// Perform the round-trip and read the body. The response, and with it
    /// the connection, is dropped before this returns on every path.
    fn run<B: AsSendBody>(
        &self,
        request: &ApiRequest,
        http_request: http::Request<B>,
    ) -> Result<ApiResponse, RequestError> {
        let mut response: http::Response<Body> = self.agent.run(http_request).map_err(|e| {
            let e = RequestError::Transport(Box::new(e));
            error!(
                stage = e.stage(),
                method = %request.method,
                url = %request.url,
                error = %e,
                "DNS provider API request failed"
            );
            e
        })?;

        let status = response.status().as_u16();
        let body = response
            .body_mut()
            .with_config()
            .limit(self.max_body_bytes)
            .read_to_vec()
            .map_err(|e| {
                let e = RequestError::BodyRead(Box::new(e));
                error!(
                    stage = e.stage(),
                    method = %request.method,
                    url = %request.url,
                    status,
                    error = %e,
                    "failed to read DNS provider API response body"
                );
                e
            })?;

        Ok(ApiResponse { status, body })
    }
}

/// Map a complete response to its raw body, or to `RequestError::Api` for
/// statuses of 400 and above.
pub fn classify_response(response: ApiResponse) -> Result<Vec<u8>, RequestError> {
    if !response.is_error() {
        return Ok(response.body);
    }
    let status = response.status;
    let e = RequestError::Api {
        status,
        body: response.body,
    };
    error!(
        stage = e.stage(),
        status,
        body = %String::from_utf8_lossy(e.api_body().unwrap_or_default()),
        "DNS provider API returned an error"
    );
    Err(e)
}

/// Run one request with a freshly built, default-configured executor.
pub fn execute(method: &str, base_url: &str, body: &[u8]) -> Result<Vec<u8>, RequestError> {
    RequestExecutor::default().execute(method, base_url, body)
}

fn method_takes_body(method: &HttpMethod) -> bool {
    matches!(
        method,
        HttpMethod::Post | HttpMethod::Put | HttpMethod::Patch | HttpMethod::Other(_)
    )
}

fn build_error(request: &ApiRequest, e: http::Error) -> RequestError {
    let e = RequestError::RequestBuild(e.to_string());
    error!(
        stage = e.stage(),
        method = %request.method,
        url = %request.url,
        error = %e,
        "failed to build request"
    );
    e
}
