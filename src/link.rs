//! DeviceLink trait for vehicle telemetry sources

use crate::Result;
use crate::types::TimedUpdate;

/// Trait for vehicle telemetry links
///
/// A link hides the transport and message decoding. The driver owns it,
/// starts the heartbeat sub-protocol once, then pulls decoded updates until
/// the link ends or fails too often.
#[async_trait::async_trait]
pub trait DeviceLink: Send + 'static {
    /// Start the liveness sub-protocol (outbound heartbeats to the vehicle).
    ///
    /// Called once before the first [`DeviceLink::next_update`].
    async fn start_heartbeat(&mut self) -> Result<()>;

    /// Get the next decoded field update
    ///
    /// Returns:
    /// - `Ok(Some(update))` - New update available
    /// - `Ok(None)` - Link closed (normal termination)
    /// - `Err(e)` - Transient failure; the driver backs off and retries
    async fn next_update(&mut self) -> Result<Option<TimedUpdate>>;

    /// Human-readable connection target, e.g. `udp:127.0.0.1:14550`
    fn target(&self) -> &str;
}
