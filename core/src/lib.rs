//! Blocking request executor for DNS provider APIs.
//!
//! # Overview
//! A DNS-01 solver uses this crate to create and delete TXT records through a
//! provider's HTTP API. `RequestExecutor::execute` sends one request and
//! hands back the raw response body, or a `RequestError` saying which stage
//! failed.
//!
//! # Design
//! - Request building and status classification are pure functions over
//!   `ApiRequest` / `ApiResponse`; only the middle stage does I/O.
//! - Bodies stay raw bytes in both directions. Provider error payloads are
//!   carried in `RequestError::Api` unparsed.
//! - The executor owns a `ureq::Agent` configured from `ExecutorConfig`.
//!   Callers that don't want to keep one around can use the free
//!   [`execute`] function.

pub mod config;
pub mod error;
pub mod executor;
pub mod http;

pub use config::ExecutorConfig;
pub use error::RequestError;
pub use executor::{classify_response, execute, RequestExecutor};
pub use http::{ApiRequest, ApiResponse, HttpMethod};
