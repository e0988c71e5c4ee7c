use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap, HeaderName, HeaderValue, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    Router,
};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::info;

/// A request as seen by the stub.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

/// What the stub answers to every request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Reply {
    pub status: u16,
    pub body: Vec<u8>,
    /// Extra response headers, e.g. `location` for a 3xx.
    pub headers: Vec<(String, String)>,
}

impl Reply {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
            headers: Vec::new(),
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }
}

impl Default for Reply {
    fn default() -> Self {
        Self::new(200, r#"{"id":"stub"}"#)
    }
}

#[derive(Debug, Default)]
struct Inner {
    reply: Reply,
    requests: Vec<RecordedRequest>,
}

/// Shared state of the stub: the scripted reply and every request received.
///
/// The `blocking_*` methods are for test threads outside the runtime.
#[derive(Clone, Debug, Default)]
pub struct StubState {
    inner: Arc<RwLock<Inner>>,
}

impl StubState {
    pub fn new(reply: Reply) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Inner {
                reply,
                requests: Vec::new(),
            })),
        }
    }

    pub async fn set_reply(&self, reply: Reply) {
        self.inner.write().await.reply = reply;
    }

    pub async fn requests(&self) -> Vec<RecordedRequest> {
        self.inner.read().await.requests.clone()
    }

    pub fn blocking_set_reply(&self, reply: Reply) {
        self.inner.blocking_write().reply = reply;
    }

    pub fn blocking_requests(&self) -> Vec<RecordedRequest> {
        self.inner.blocking_read().requests.clone()
    }
}

pub fn app(state: StubState) -> Router {
    Router::new().fallback(record_and_reply).with_state(state)
}

pub async fn run(listener: TcpListener, state: StubState) -> Result<(), std::io::Error> {
    axum::serve(listener, app(state)).await
}

async fn record_and_reply(
    State(state): State<StubState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let request = RecordedRequest {
        method: method.to_string(),
        path: uri.path().to_string(),
        query: uri.query().map(str::to_string),
        content_type: headers
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
        body: body.to_vec(),
    };

    let mut inner = state.inner.write().await;
    info!(
        method = %request.method,
        path = %request.path,
        status = inner.reply.status,
        "stub request"
    );
    inner.requests.push(request);

    let status =
        StatusCode::from_u16(inner.reply.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let mut response = (
        status,
        [(header::CONTENT_TYPE, "application/json")],
        inner.reply.body.clone(),
    )
        .into_response();

    // Headers that do not parse are skipped.
    for (name, value) in &inner.reply.headers {
        if let (Ok(name), Ok(value)) = (
            HeaderName::try_from(name.as_str()),
            HeaderValue::try_from(value.as_str()),
        ) {
            response.headers_mut().insert(name, value);
        }
    }
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_reply_is_ok_json() {
        let reply = Reply::default();
        assert_eq!(reply.status, 200);
        assert_eq!(reply.body, br#"{"id":"stub"}"#);
    }

    #[test]
    fn with_header_appends() {
        let reply = Reply::new(301, "moved").with_header("location", "/elsewhere");
        assert_eq!(reply.headers, [("location".to_string(), "/elsewhere".to_string())]);
    }

    #[test]
    fn new_state_has_no_requests() {
        let state = StubState::new(Reply::new(500, "boom"));
        assert!(state.blocking_requests().is_empty());
    }

    #[test]
    fn blocking_set_reply_replaces_reply() {
        let state = StubState::default();
        state.blocking_set_reply(Reply::new(404, "missing"));
        assert_eq!(state.inner.blocking_read().reply, Reply::new(404, "missing"));
    }
}
