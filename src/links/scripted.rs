//! Scripted link replaying a fixed sequence of updates

use std::collections::VecDeque;
use std::time::Duration;
use tracing::{debug, trace};

use crate::link::DeviceLink;
use crate::types::TimedUpdate;
use crate::{HubError, Result};

/// One step of a script.
#[derive(Debug, Clone)]
pub enum ScriptStep {
    /// Deliver an update
    Update(TimedUpdate),
    /// Fail the next read with a link error
    Fail(String),
}

/// Link that replays scripted steps, optionally paced.
#[derive(Debug)]
pub struct ScriptedLink {
    steps: VecDeque<ScriptStep>,
    pacing: Option<Duration>,
    heartbeat_started: bool,
    delivered: usize,
}

impl ScriptedLink {
    /// Create a link that delivers `updates` in order, then ends.
    pub fn new(updates: impl IntoIterator<Item = TimedUpdate>) -> Self {
        Self::from_steps(updates.into_iter().map(ScriptStep::Update))
    }

    /// Create a link from explicit steps, including injected failures.
    pub fn from_steps(steps: impl IntoIterator<Item = ScriptStep>) -> Self {
        Self {
            steps: steps.into_iter().collect(),
            pacing: None,
            heartbeat_started: false,
            delivered: 0,
        }
    }

    /// Sleep `pacing` before each step
    pub fn with_pacing(mut self, pacing: Duration) -> Self {
        self.pacing = Some(pacing);
        self
    }

    /// Steps not yet replayed.
    pub fn remaining(&self) -> usize {
        self.steps.len()
    }

    /// Whether the heartbeat sub-protocol was started.
    pub fn heartbeat_started(&self) -> bool {
        self.heartbeat_started
    }
}

#[async_trait::async_trait]
impl DeviceLink for ScriptedLink {
    async fn start_heartbeat(&mut self) -> Result<()> {
        self.heartbeat_started = true;
        Ok(())
    }

    async fn next_update(&mut self) -> Result<Option<TimedUpdate>> {
        if let Some(pacing) = self.pacing {
            tokio::time::sleep(pacing).await;
        }

        match self.steps.pop_front() {
            Some(ScriptStep::Update(update)) => {
                self.delivered += 1;
                trace!(delivered = self.delivered, kind = update.update.kind(), "Scripted update");
                Ok(Some(update))
            }
            Some(ScriptStep::Fail(reason)) => Err(HubError::link_failed(reason)),
            None => {
                debug!("Script finished after {} updates", self.delivered);
                Ok(None)
            }
        }
    }

    fn target(&self) -> &str {
        "scripted"
    }
}
