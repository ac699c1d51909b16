//! Error types for the telemetry hub.
//!
//! Most failure modes in the hub are absorbed rather than propagated: a missing
//! heartbeat history degrades to a sentinel rate, a field group that never
//! reported yields zeroed fields, and a failing subscriber is pruned without
//! affecting its peers. The errors here cover what remains: device link
//! failures, subscriber delivery failures and configuration problems.
//!
//! ## Recovery and Retry
//!
//! ```rust
//! use linkhub::HubError;
//!
//! let error = HubError::link_failed("udp socket closed");
//! if error.is_retryable() {
//!     for suggestion in error.recovery_suggestions() {
//!         println!("  - {}", suggestion);
//!     }
//! }
//! ```

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

use crate::broadcast::SubscriberId;

/// Result type alias for hub operations.
pub type Result<T, E = HubError> = std::result::Result<T, E>;

/// Main error type for hub operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum HubError {
    #[error("Device link failure: {reason}")]
    Link {
        reason: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Subscriber {id} channel closed")]
    SubscriberClosed { id: SubscriberId },

    #[error("Send to subscriber {id} timed out after {timeout:?}")]
    SendTimeout { id: SubscriberId, timeout: Duration },

    #[error("Invalid configuration in {context}: {details}")]
    Config { context: String, details: String },

    #[error("Configuration file error: {path}")]
    File {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl HubError {
    /// Returns whether this error is potentially recoverable through retry.
    pub fn is_retryable(&self) -> bool {
        match self {
            HubError::Link { .. } => true,
            HubError::SendTimeout { .. } => false,
            HubError::SubscriberClosed { .. } => false,
            HubError::Config { .. } => false,
            HubError::File { .. } => false,
        }
    }

    /// Returns suggested recovery actions for this error.
    pub fn recovery_suggestions(&self) -> Vec<&'static str> {
        match self {
            HubError::Link { .. } => vec![
                "Check the vehicle link is powered and in range",
                "Verify the connection target address and port",
                "Confirm no other process holds the link",
            ],
            HubError::SubscriberClosed { .. } => vec![
                "Reconnect the viewer to rejoin the broadcast",
                "Check the transport layer for dropped connections",
            ],
            HubError::SendTimeout { .. } => vec![
                "Reconnect the viewer to rejoin the broadcast",
                "Increase send_timeout_ms for slow networks",
                "Check viewer-side processing latency",
            ],
            HubError::Config { .. } => vec![
                "Check configuration values are non-zero where required",
                "Compare against the documented defaults",
            ],
            HubError::File { .. } => vec![
                "Check file exists and is readable",
                "Check file permissions",
            ],
        }
    }

    /// Helper constructor for link errors.
    pub fn link_failed(reason: impl Into<String>) -> Self {
        HubError::Link { reason: reason.into(), source: None }
    }

    /// Helper constructor for link errors with source.
    pub fn link_failed_with_source(
        reason: impl Into<String>,
        source: Box<dyn std::error::Error + Send + Sync>,
    ) -> Self {
        HubError::Link { reason: reason.into(), source: Some(source) }
    }

    /// Helper constructor for configuration errors.
    pub fn config_error(context: impl Into<String>, details: impl Into<String>) -> Self {
        HubError::Config { context: context.into(), details: details.into() }
    }

    /// Helper constructor for file errors with path context.
    pub fn file_error(path: PathBuf, source: std::io::Error) -> Self {
        HubError::File { path, source }
    }
}

impl From<serde_yaml_ng::Error> for HubError {
    fn from(err: serde_yaml_ng::Error) -> Self {
        HubError::Config { context: "YAML".to_string(), details: err.to_string() }
    }
}
