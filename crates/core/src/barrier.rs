// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Blocking entry points for the preemption barrier
//!
//! A rare privileged ("exclusive") operation runs with the guarantee
//! that no ordinary ("normal") operation is mid-flight; normal
//! operations otherwise run in full parallelism with each other. The
//! barrier never inspects the protected actions and never retries them.

use crate::config::BarrierConfig;
use crate::state::{BarrierSnapshot, ExclusiveRelease, NormalRelease, State};
use std::sync::Arc;

/// Preemption barrier for one protected resource.
///
/// Create one per resource (e.g., one per managed pool) and clone it to
/// every call site; clones share the same counters. Waiting is bounded
/// polling: predicates are re-checked at most one `poll_interval` after
/// any counter change, so a lost wake-up costs a bounded delay.
#[derive(Clone, Debug)]
pub struct Barrier {
    config: Arc<BarrierConfig>,
    state: Arc<State>,
}

impl Barrier {
    pub fn new(config: BarrierConfig) -> Self {
        Self {
            config: Arc::new(config),
            state: Arc::new(State::default()),
        }
    }

    /// Barrier with default configuration
    pub fn named(name: impl Into<String>) -> Self {
        Self::new(BarrierConfig::new(name))
    }

    pub fn config(&self) -> &BarrierConfig {
        &self.config
    }

    pub(crate) fn state(&self) -> &State {
        &self.state
    }

    /// Run a privileged action with no normal operation mid-flight.
    ///
    /// Registers intent, blocks in bounded slices until running normal
    /// operations drain, runs the action, and releases the counters on
    /// every exit path. The action's result or error is returned verbatim.
    ///
    /// Exclusive calls are not mutually exclusive with each other; only
    /// exclusive-vs-normal is enforced. Callers that must serialize
    /// privileged operations should invoke this from a single coordinator.
    pub fn exclusive<T, E, F>(&self, action: F) -> Result<T, E>
    where
        F: FnOnce() -> Result<T, E>,
    {
        let snap = self.state.register_exclusive();
        self.trace("exclusive registered", snap);

        let snap = self.state.enter_exclusive(self.config.poll_interval);
        self.trace("exclusive entered", snap);

        let release = ExclusiveRelease::new(&self.state);
        let result = action();
        let snap = release.finish();
        self.trace("exclusive released", snap);
        result
    }

    /// Run an ordinary action, concurrently with other normal operations
    /// but never overlapping an exclusive operation's protected region.
    ///
    /// Registers intent, blocks in bounded slices until no exclusive
    /// operation is registered, runs the action, and releases the
    /// counters on every exit path. Result or error returned verbatim.
    pub fn normal<T, E, F>(&self, action: F) -> Result<T, E>
    where
        F: FnOnce() -> Result<T, E>,
    {
        let snap = self.state.register_normal();
        self.trace("normal registered", snap);

        let snap = self.state.enter_normal(self.config.poll_interval);
        self.trace("normal entered", snap);

        let release = NormalRelease::new(&self.state);
        let result = action();
        let snap = release.finish();
        self.trace("normal released", snap);
        result
    }

    /// Whether an exclusive operation is currently running
    pub fn is_exclusive(&self) -> bool {
        self.state.snapshot().running_exclusive > 0
    }

    /// Whether the barrier is in its normal mode: no exclusive operation
    /// running. Both booleans derive from the running exclusive count, so
    /// an idle barrier reports normal.
    pub fn is_normal(&self) -> bool {
        self.state.snapshot().running_exclusive == 0
    }

    /// Consistent copy of all four counters
    pub fn snapshot(&self) -> BarrierSnapshot {
        self.state.snapshot()
    }

    /// Formatted counter snapshot for logs and health output, e.g.
    /// `exclusive: pending=1 running=1, normal: pending=3 running=0`
    pub fn status(&self) -> String {
        self.snapshot().to_string()
    }

    pub(crate) fn trace(&self, event: &str, snap: BarrierSnapshot) {
        if self.config.trace {
            tracing::trace!(barrier = %self.config.name, state = %snap, "{}", event);
        }
    }
}

#[cfg(test)]
#[path = "barrier_tests.rs"]
mod tests;
