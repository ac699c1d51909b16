//! Bundled [`DeviceLink`](crate::link::DeviceLink) implementations

pub mod channel;
pub mod scripted;

pub use channel::{ChannelLink, LinkSender};
pub use scripted::{ScriptStep, ScriptedLink};
