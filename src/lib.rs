//! Telemetry aggregation and fan-out core for remote vehicle links.
//!
//! Linkhub merges decoded field updates from a vehicle link into one
//! last-value-wins state, estimates link health from heartbeat timing, and
//! republishes a converted snapshot to any number of viewers.
//!
//! # Components
//!
//! - **[`RateEstimator`]**: smoothed heartbeat rate from a short timestamp window
//! - **[`SnapshotAggregator`]**: per-group locked state with on-read conversions
//! - **[`MessageLog`]**: status text drained into each snapshot
//! - **[`SubscriberRegistry`] / [`BroadcastScheduler`]**: periodic fan-out with
//!   per-subscriber timeouts and pruning of failed channels
//! - **[`TelemetryHub`]**: wires a [`DeviceLink`] to all of the above
//!
//! # Example
//!
//! ```rust,no_run
//! use linkhub::{ChannelLink, HubConfig, SystemClock, TelemetryHub};
//! use linkhub::types::{ArmState, FieldUpdate};
//! use futures::StreamExt;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> linkhub::Result<()> {
//!     let config = HubConfig::default();
//!     let (link, sender) = ChannelLink::new(config.link_target.clone(), 64);
//!     let hub = TelemetryHub::start(link, config, Arc::new(SystemClock))?;
//!
//!     sender.send(1_700_000_000.0, FieldUpdate::Heartbeat(ArmState::default())).await?;
//!
//!     let (_id, mut snapshots) = hub.subscribe_stream();
//!     while let Some(snapshot) = snapshots.next().await {
//!         println!("heartbeat {:.1} Hz, armed={}", snapshot.heartbeat_hz, snapshot.armed);
//!     }
//!     Ok(())
//! }
//! ```

// Core state
pub mod aggregator;
pub mod conversions;
mod error;
pub mod message_log;
pub mod rate;
#[cfg_attr(any(test, feature = "benchmark"), path = "test_utils.rs")]
#[cfg(any(test, feature = "benchmark"))]
pub mod test_utils;
pub mod types;

// Ingest and distribution
pub mod broadcast;
pub mod driver;
pub mod hub;
pub mod link;
pub mod links;

// Ambient
pub mod clock;
pub mod config;
pub mod logging;

// Core exports
pub use aggregator::{SnapshotAggregator, SnapshotSource};
pub use error::*;
pub use message_log::MessageLog;
pub use rate::{MAX_WINDOW, RATE_UNKNOWN, RateEstimator};

// Distribution exports
pub use broadcast::{
    BroadcastScheduler, ChannelSubscriber, Subscriber, SubscriberId, SubscriberRegistry,
    TickReport,
};
pub use hub::TelemetryHub;

// Ingest exports
pub use driver::{Driver, DriverHandle};
pub use link::DeviceLink;
pub use links::{ChannelLink, LinkSender, ScriptStep, ScriptedLink};

// Ambient exports
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::HubConfig;
