//! Fan-out of snapshots to push subscribers.
//!
//! Each subscriber is `Connected` until its first failed or timed-out send,
//! after which it is removed for good; a viewer that drops must reconnect and
//! is registered under a new [`SubscriberId`].

mod registry;
mod scheduler;

pub use registry::{ChannelSubscriber, Subscriber, SubscriberId, SubscriberRegistry};
pub use scheduler::{BroadcastScheduler, TickReport};
