//! Tracing subscriber setup

use tracing_subscriber::EnvFilter;

/// Install a formatted tracing subscriber.
///
/// `RUST_LOG` wins when set; otherwise `default_directive` (e.g. `"linkhub=info"`)
/// is used. Returns `false` if a global subscriber was already installed.
pub fn init(default_directive: &str) -> bool {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));
    tracing_subscriber::fmt().with_env_filter(filter).try_init().is_ok()
}
