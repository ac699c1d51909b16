//! Core types for vehicle telemetry.
//!
//! - [`FieldUpdate`] is one decoded message from the device link, targeting
//!   exactly one field group ([`Attitude`], [`Hud`], [`Position`], [`Power`],
//!   [`GpsFix`], [`ArmState`]) or the status text log.
//! - [`TimedUpdate`] pairs an update with the link's event timestamp.
//! - [`Snapshot`] is the converted, flattened view handed to viewers.
//! - [`CommandAck`] is the acknowledgement slot the transport layer fills in.
//!
//! ## Usage Example
//!
//! ```rust
//! use linkhub::types::{ArmState, FieldUpdate, TimedUpdate};
//!
//! let update = TimedUpdate::new(
//!     1_700_000_000.25,
//!     FieldUpdate::Heartbeat(ArmState { base_mode: 0x80, ..Default::default() }),
//! );
//! assert_eq!(update.update.kind(), "heartbeat");
//! ```

mod field_update;
mod snapshot;

pub use field_update::{
    ArmState, Attitude, CELL_SLOTS, FieldUpdate, GpsFix, Hud, MODE_FLAG_SAFETY_ARMED, Position,
    Power, TimedUpdate, system_status,
};
pub use snapshot::{CommandAck, CommandResult, Snapshot};
