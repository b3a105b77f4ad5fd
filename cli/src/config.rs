//! CLI configuration file (JSON) and flag overrides.

use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use linkrpc_core::{ChannelConfig, ErrorCode, RetryConfig};

use crate::logging::LogConfig;

/// Settings for `linkrpc simulate`. Every field may be omitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    /// Deadline for one logical call, retries included.
    pub timeout_ms: u64,
    pub max_retry: u32,
    /// Pause before retrying a transient application error.
    pub retry_delay_ms: u64,
    pub retryable_codes: Vec<ErrorCode>,
    /// Shared secret for both ends of the simulated link.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secret: Option<String>,
    pub log: LogConfig,
}

impl Default for CliConfig {
    fn default() -> Self {
        let channel = ChannelConfig::default();
        let retry = RetryConfig::default();
        Self {
            timeout_ms: u64::try_from(channel.timeout.as_millis()).unwrap_or(u64::MAX),
            max_retry: channel.max_retry,
            retry_delay_ms: u64::try_from(retry.retry_delay.as_millis()).unwrap_or(u64::MAX),
            retryable_codes: retry.retryable_codes,
            secret: None,
            log: LogConfig::default(),
        }
    }
}

impl CliConfig {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::from_json(&raw).with_context(|| format!("parsing config {}", path.display()))
    }

    pub fn from_json(raw: &str) -> anyhow::Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn channel_config(&self) -> ChannelConfig {
        ChannelConfig {
            timeout: Duration::from_millis(self.timeout_ms),
            max_retry: self.max_retry,
        }
    }

    pub fn retry_config(&self) -> RetryConfig {
        RetryConfig {
            retry_delay: Duration::from_millis(self.retry_delay_ms),
            retryable_codes: self.retryable_codes.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_library_defaults() {
        let config = CliConfig::from_json("{}").unwrap();
        assert_eq!(config, CliConfig::default());
        assert_eq!(config.channel_config().timeout, Duration::from_secs(5));
        assert_eq!(config.retry_config().retry_delay, Duration::from_secs(1));
    }

    #[test]
    fn partial_file_overrides() {
        let config = CliConfig::from_json(
            r#"{
                "max_retry": 7,
                "retry_delay_ms": 0,
                "retryable_codes": ["UNEXPECTED_ERROR", "LINK_ID_NOT_FOUND"],
                "log": { "level": "debug", "json": true }
            }"#,
        )
        .unwrap();
        assert_eq!(config.channel_config().max_retry, 7);
        assert!(config.retry_config().retry_delay.is_zero());
        assert_eq!(
            config.retryable_codes,
            vec![ErrorCode::UnexpectedError, ErrorCode::LinkIdNotFound]
        );
        assert!(config.log.json);
        assert_eq!(config.timeout_ms, 5000);
    }

    #[test]
    fn unknown_code_is_an_error() {
        assert!(CliConfig::from_json(r#"{ "retryable_codes": ["NOPE"] }"#).is_err());
    }
}
