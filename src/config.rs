//! Hub configuration
//!
//! Loaded from YAML; every key is optional and falls back to its default.
//!
//! ```yaml
//! link_target: udp:0.0.0.0:14550
//! rate_window: 5
//! broadcast_period_ms: 500
//! send_timeout_ms: 100
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::rate::{DEFAULT_WINDOW, MAX_WINDOW};
use crate::{HubError, Result};

/// Runtime settings for a [`TelemetryHub`](crate::TelemetryHub).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HubConfig {
    /// Connection target handed to the device link
    pub link_target: String,
    /// Heartbeat timestamps kept by the rate estimator
    pub rate_window: usize,
    /// Interval between broadcasts
    pub broadcast_period_ms: u64,
    /// Per-subscriber send deadline within one broadcast
    pub send_timeout_ms: u64,
    /// Consecutive link failures tolerated before ingest stops
    pub max_link_errors: u32,
    /// Queue depth for channel-backed subscribers
    pub subscriber_buffer: usize,
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            link_target: "udp:127.0.0.1:14550".to_string(),
            rate_window: DEFAULT_WINDOW,
            broadcast_period_ms: 1000,
            send_timeout_ms: 250,
            max_link_errors: 10,
            subscriber_buffer: 16,
        }
    }
}

impl HubConfig {
    /// Parse and validate a YAML document.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: HubConfig = serde_yaml_ng::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let yaml = std::fs::read_to_string(path)
            .map_err(|e| HubError::file_error(path.to_path_buf(), e))?;
        Self::from_yaml_str(&yaml)
    }

    /// Reject settings the hub cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.broadcast_period_ms == 0 {
            return Err(HubError::config_error("broadcast_period_ms", "must be greater than zero"));
        }
        if self.send_timeout_ms == 0 {
            return Err(HubError::config_error("send_timeout_ms", "must be greater than zero"));
        }
        if self.max_link_errors == 0 {
            return Err(HubError::config_error("max_link_errors", "must be greater than zero"));
        }
        if self.rate_window < 2 {
            return Err(HubError::config_error("rate_window", "needs at least 2 samples"));
        }
        if self.rate_window > MAX_WINDOW {
            return Err(HubError::config_error(
                "rate_window",
                format!("at most {MAX_WINDOW} samples are kept, got {}", self.rate_window),
            ));
        }
        Ok(())
    }

    /// Broadcast period as a duration
    pub fn broadcast_period(&self) -> Duration {
        Duration::from_millis(self.broadcast_period_ms)
    }

    /// Send timeout as a duration
    pub fn send_timeout(&self) -> Duration {
        Duration::from_millis(self.send_timeout_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_yields_defaults() {
        let config = HubConfig::from_yaml_str("{}").unwrap();
        assert_eq!(config, HubConfig::default());
        assert_eq!(config.rate_window, 4);
        assert_eq!(config.broadcast_period(), Duration::from_secs(1));
    }

    #[test]
    fn partial_document_overrides_named_keys() {
        let config =
            HubConfig::from_yaml_str("broadcast_period_ms: 200\nlink_target: serial:/dev/ttyACM0\n")
                .unwrap();
        assert_eq!(config.broadcast_period(), Duration::from_millis(200));
        assert_eq!(config.link_target, "serial:/dev/ttyACM0");
        assert_eq!(config.send_timeout_ms, 250);
    }

    #[test]
    fn zero_period_is_rejected() {
        let err = HubConfig::from_yaml_str("broadcast_period_ms: 0").unwrap_err();
        assert!(
            matches!(err, HubError::Config { ref context, .. } if context == "broadcast_period_ms")
        );
    }

    #[test]
    fn oversized_rate_window_is_rejected() {
        let err = HubConfig::from_yaml_str("rate_window: 18446744073709551615").unwrap_err();
        assert!(matches!(err, HubError::Config { ref context, .. } if context == "rate_window"));

        let err = HubConfig::from_yaml_str("rate_window: 65").unwrap_err();
        assert!(err.to_string().contains("65"));

        let config = HubConfig::from_yaml_str("rate_window: 64").unwrap();
        assert_eq!(config.rate_window, MAX_WINDOW);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = HubConfig::from_yaml_str("broadcast_hz: 5").unwrap_err();
        assert!(matches!(err, HubError::Config { .. }));
    }

    #[test]
    fn missing_file_reports_path() {
        let err = HubConfig::from_file("/nonexistent/linkhub.yaml").unwrap_err();
        match err {
            HubError::File { path, .. } => assert!(path.ends_with("linkhub.yaml")),
            other => panic!("Expected File error, got {other:?}"),
        }
    }
}
