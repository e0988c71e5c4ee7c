//! Client policy for `RequestExecutor`.

use std::time::Duration;

use serde::Deserialize;

/// Default cap on the in-memory response body.
pub const DEFAULT_MAX_BODY_BYTES: u64 = 10 * 1024 * 1024;

/// Settings for the HTTP client behind a `RequestExecutor`.
///
/// All fields default, so an empty table deserializes to
/// `ExecutorConfig::default()`. `timeout` is read from `timeout_secs`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ExecutorConfig {
    /// Whole-call timeout. `None` leaves the transport default in place.
    #[serde(rename = "timeout_secs", deserialize_with = "de_timeout_secs")]
    pub timeout: Option<Duration>,

    /// Replaces the client's User-Agent header.
    pub user_agent: Option<String>,

    /// Responses larger than this fail with `BodyRead`.
    pub max_body_bytes: u64,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            timeout: None,
            user_agent: None,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }
}

impl ExecutorConfig {
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    pub fn with_max_body_bytes(mut self, max_body_bytes: u64) -> Self {
        self.max_body_bytes = max_body_bytes;
        self
    }
}

fn de_timeout_secs<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let secs: Option<u64> = Option::deserialize(deserializer)?;
    Ok(secs.map(Duration::from_secs))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_has_no_timeout() {
        let config = ExecutorConfig::default();
        assert!(config.timeout.is_none());
        assert!(config.user_agent.is_none());
        assert_eq!(config.max_body_bytes, DEFAULT_MAX_BODY_BYTES);
    }

    #[test]
    fn empty_object_deserializes_to_default() {
        let config: ExecutorConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, ExecutorConfig::default());
    }

    #[test]
    fn timeout_is_read_in_seconds() {
        let config: ExecutorConfig =
            serde_json::from_str(r#"{"timeout_secs":30,"user_agent":"dns01-solver"}"#).unwrap();
        assert_eq!(config.timeout, Some(Duration::from_secs(30)));
        assert_eq!(config.user_agent.as_deref(), Some("dns01-solver"));
    }

    #[test]
    fn null_timeout_means_none() {
        let config: ExecutorConfig = serde_json::from_str(r#"{"timeout_secs":null}"#).unwrap();
        assert!(config.timeout.is_none());
    }

    #[test]
    fn builders_override_fields() {
        let config = ExecutorConfig::default()
            .with_timeout(Duration::from_secs(5))
            .with_max_body_bytes(1024);
        assert_eq!(config.timeout, Some(Duration::from_secs(5)));
        assert_eq!(config.max_body_bytes, 1024);
    }
}
