// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared counter state for the preemption barrier
//!
//! Four counters behind a single mutex plus two condition signals. Every
//! wait is a bounded `wait_timeout` loop that re-checks its predicate
//! after each wake, so a missed notification costs at most one poll
//! interval, never permanent starvation.

use std::sync::{Condvar, Mutex, MutexGuard};
use std::time::Duration;

/// Point-in-time copy of the barrier counters
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BarrierSnapshot {
    /// Exclusive calls registered; counted until exit, including while running
    pub pending_exclusive: u32,
    /// Exclusive calls currently inside their protected action
    pub running_exclusive: u32,
    /// Normal calls registered and waiting to enter
    pub pending_normal: u32,
    /// Normal calls currently inside their protected action
    pub running_normal: u32,
}

impl std::fmt::Display for BarrierSnapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "exclusive: pending={} running={}, normal: pending={} running={}",
            self.pending_exclusive,
            self.running_exclusive,
            self.pending_normal,
            self.running_normal
        )
    }
}

#[derive(Debug, Default)]
struct Counters {
    pending_exclusive: u32,
    running_exclusive: u32,
    pending_normal: u32,
    running_normal: u32,
}

impl Counters {
    fn snapshot(&self) -> BarrierSnapshot {
        BarrierSnapshot {
            pending_exclusive: self.pending_exclusive,
            running_exclusive: self.running_exclusive,
            pending_normal: self.pending_normal,
            running_normal: self.running_normal,
        }
    }
}

/// Counter state shared by the blocking and suspending entry points.
///
/// All mutation happens under the mutex. Registration always precedes
/// execution; de-registration always follows completion, on every exit
/// path.
#[derive(Debug, Default)]
pub(crate) struct State {
    counters: Mutex<Counters>,
    /// Notified when `running_normal` reaches zero
    normal_drained: Condvar,
    /// Notified when both exclusive counters reach zero
    exclusive_cleared: Condvar,
}

impl State {
    fn lock(&self) -> MutexGuard<'_, Counters> {
        self.counters.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Register intent to run an exclusive operation
    pub(crate) fn register_exclusive(&self) -> BarrierSnapshot {
        let mut c = self.lock();
        c.pending_exclusive += 1;
        c.snapshot()
    }

    /// Wait until no normal operation is running, then mark one exclusive
    /// operation as running. Blocks the calling thread in bounded slices.
    pub(crate) fn enter_exclusive(&self, poll: Duration) -> BarrierSnapshot {
        let mut c = self.lock();
        while c.running_normal > 0 {
            let (guard, _timeout) = self
                .normal_drained
                .wait_timeout(c, poll)
                .unwrap_or_else(|e| e.into_inner());
            c = guard;
        }
        c.running_exclusive += 1;
        c.snapshot()
    }

    /// Release an exclusive operation (running and registered counts)
    pub(crate) fn finish_exclusive(&self) -> BarrierSnapshot {
        let mut c = self.lock();
        c.running_exclusive = c.running_exclusive.saturating_sub(1);
        c.pending_exclusive = c.pending_exclusive.saturating_sub(1);
        if c.pending_exclusive == 0 && c.running_exclusive == 0 {
            self.exclusive_cleared.notify_all();
        }
        c.snapshot()
    }

    /// Register intent to run a normal operation
    pub(crate) fn register_normal(&self) -> BarrierSnapshot {
        let mut c = self.lock();
        c.pending_normal += 1;
        c.snapshot()
    }

    /// Wait until no exclusive operation is registered, then convert one
    /// pending normal operation to running. Blocks in bounded slices.
    pub(crate) fn enter_normal(&self, poll: Duration) -> BarrierSnapshot {
        let mut c = self.lock();
        while c.pending_exclusive > 0 {
            let (guard, _timeout) = self
                .exclusive_cleared
                .wait_timeout(c, poll)
                .unwrap_or_else(|e| e.into_inner());
            c = guard;
        }
        c.pending_normal = c.pending_normal.saturating_sub(1);
        c.running_normal += 1;
        c.snapshot()
    }

    /// Non-blocking admission check used by the suspending wait loop.
    /// Converts pending to running and returns a snapshot on success.
    pub(crate) fn try_enter_normal(&self) -> Option<BarrierSnapshot> {
        let mut c = self.lock();
        if c.pending_exclusive > 0 {
            return None;
        }
        c.pending_normal = c.pending_normal.saturating_sub(1);
        c.running_normal += 1;
        Some(c.snapshot())
    }

    /// Release a registered normal operation that never entered
    /// (cancelled or abandoned while waiting)
    pub(crate) fn abandon_normal(&self) -> BarrierSnapshot {
        let mut c = self.lock();
        c.pending_normal = c.pending_normal.saturating_sub(1);
        c.snapshot()
    }

    /// Release a running normal operation
    pub(crate) fn finish_normal(&self) -> BarrierSnapshot {
        let mut c = self.lock();
        c.running_normal = c.running_normal.saturating_sub(1);
        if c.running_normal == 0 {
            self.normal_drained.notify_all();
        }
        c.snapshot()
    }

    /// Consistent copy of all four counters
    pub(crate) fn snapshot(&self) -> BarrierSnapshot {
        self.lock().snapshot()
    }
}

/// Releases an exclusive operation on every exit path.
///
/// `finish` consumes the guard and returns the post-release snapshot for
/// tracing; the `Drop` fallback covers panics inside the protected action.
pub(crate) struct ExclusiveRelease<'a> {
    state: &'a State,
    done: bool,
}

impl<'a> ExclusiveRelease<'a> {
    pub(crate) fn new(state: &'a State) -> Self {
        Self { state, done: false }
    }

    pub(crate) fn finish(mut self) -> BarrierSnapshot {
        self.done = true;
        self.state.finish_exclusive()
    }
}

impl Drop for ExclusiveRelease<'_> {
    fn drop(&mut self) {
        if !self.done {
            self.state.finish_exclusive();
        }
    }
}

/// Releases a running normal operation on every exit path, including a
/// dropped suspending-call future.
pub(crate) struct NormalRelease<'a> {
    state: &'a State,
    done: bool,
}

impl<'a> NormalRelease<'a> {
    pub(crate) fn new(state: &'a State) -> Self {
        Self { state, done: false }
    }

    pub(crate) fn finish(mut self) -> BarrierSnapshot {
        self.done = true;
        self.state.finish_normal()
    }
}

impl Drop for NormalRelease<'_> {
    fn drop(&mut self) {
        if !self.done {
            self.state.finish_normal();
        }
    }
}

/// Releases registered-but-not-entered intent if a suspending caller
/// abandons its wait (cancellation or future drop). Disarmed on entry.
pub(crate) struct NormalIntent<'a> {
    state: &'a State,
    armed: bool,
}

impl<'a> NormalIntent<'a> {
    pub(crate) fn new(state: &'a State) -> Self {
        Self { state, armed: true }
    }

    pub(crate) fn disarm(&mut self) {
        self.armed = false;
    }
}

impl Drop for NormalIntent<'_> {
    fn drop(&mut self) {
        if self.armed {
            self.state.abandon_normal();
        }
    }
}

#[cfg(test)]
#[path = "state_tests.rs"]
mod tests;
