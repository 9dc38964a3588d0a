// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Barrier configuration

use std::time::Duration;

/// Default re-check granularity for both wait strategies
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Configuration for a barrier instance
#[derive(Clone, Debug)]
pub struct BarrierConfig {
    /// Name identifying this barrier in trace output
    pub name: String,
    /// Re-check granularity for both wait strategies
    pub poll_interval: Duration,
    /// Emit a trace event on every state transition
    pub trace: bool,
}

impl BarrierConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            poll_interval: DEFAULT_POLL_INTERVAL,
            trace: false,
        }
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn with_trace(mut self, enabled: bool) -> Self {
        self.trace = enabled;
        self
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
