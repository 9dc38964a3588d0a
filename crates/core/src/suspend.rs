// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Suspending entry points for the preemption barrier
//!
//! Same admission contract as the blocking entry points, for callers
//! that must not occupy an OS thread while waiting. The wait is a
//! sequence of bounded cooperative sleeps over the same counter state;
//! suspension points occur only at poll boundaries, never inside the
//! protected action.

use crate::barrier::Barrier;
use crate::cancel::CancelToken;
use crate::error::BarrierError;
use crate::state::{NormalIntent, NormalRelease};
use std::future::Future;
use std::time::Duration;

impl Barrier {
    /// Run an ordinary action from a suspendable call site.
    ///
    /// Registers intent and polls for admission with cooperative sleeps.
    /// The token cancels the call while waiting to enter or while the
    /// action is running; either way the counters are released, as they
    /// are if the returned future is dropped mid-wait. The token is
    /// passed on to the action so it can observe cancellation itself.
    pub async fn normal_suspending<T, E, F, Fut>(
        &self,
        mut cancel: CancelToken,
        action: F,
    ) -> Result<T, BarrierError<E>>
    where
        F: FnOnce(CancelToken) -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        if !self.wait_enter_normal(&mut cancel).await {
            return Err(BarrierError::Cancelled);
        }

        let release = NormalRelease::new(self.state());
        let fut = action(cancel.clone());
        tokio::pin!(fut);
        let result = tokio::select! {
            res = &mut fut => res.map_err(BarrierError::Action),
            () = cancel.cancelled() => Err(BarrierError::Cancelled),
        };
        let snap = release.finish();
        self.trace("normal released", snap);
        result
    }

    /// [`normal_suspending`](Barrier::normal_suspending) with a bound on
    /// the protected action itself. The limit never applies to the
    /// wait-to-enter phase, which stays unbounded-but-polled; exceeding
    /// it yields [`BarrierError::Timeout`] and releases the counters
    /// like any other failure.
    pub async fn normal_suspending_timeout<T, E, F, Fut>(
        &self,
        mut cancel: CancelToken,
        limit: Duration,
        action: F,
    ) -> Result<T, BarrierError<E>>
    where
        F: FnOnce(CancelToken) -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        if !self.wait_enter_normal(&mut cancel).await {
            return Err(BarrierError::Cancelled);
        }

        let release = NormalRelease::new(self.state());
        let fut = action(cancel.clone());
        tokio::pin!(fut);
        let result = tokio::select! {
            res = tokio::time::timeout(limit, &mut fut) => match res {
                Ok(inner) => inner.map_err(BarrierError::Action),
                Err(_elapsed) => Err(BarrierError::Timeout { limit }),
            },
            () = cancel.cancelled() => Err(BarrierError::Cancelled),
        };
        let snap = release.finish();
        self.trace("normal released", snap);
        result
    }

    /// Cooperative admission loop. Returns false if cancelled while
    /// waiting; registered intent is released on every path out,
    /// including a dropped future.
    async fn wait_enter_normal(&self, cancel: &mut CancelToken) -> bool {
        let snap = self.state().register_normal();
        self.trace("normal registered", snap);

        let mut intent = NormalIntent::new(self.state());
        loop {
            if cancel.is_cancelled() {
                return false;
            }
            if let Some(snap) = self.state().try_enter_normal() {
                intent.disarm();
                self.trace("normal entered", snap);
                return true;
            }
            tokio::select! {
                () = tokio::time::sleep(self.config().poll_interval) => {}
                () = cancel.cancelled() => {}
            }
        }
    }
}

#[cfg(test)]
#[path = "suspend_tests.rs"]
mod tests;
