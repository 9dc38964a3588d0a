// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for the suspending entry points

use std::time::Duration;
use thiserror::Error;

/// Errors surfaced by the suspending entry points.
///
/// The blocking entry points return the action's own error verbatim;
/// only the suspending surface needs to distinguish cancellation and
/// timeout from action failure.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BarrierError<E> {
    /// The protected action failed; carried verbatim, never retried here
    #[error("action failed: {0}")]
    Action(E),
    /// The caller's cancellation token fired while waiting to enter or
    /// while the action was running
    #[error("cancelled")]
    Cancelled,
    /// The protected action exceeded the configured limit
    #[error("action timed out after {limit:?}")]
    Timeout { limit: Duration },
}

impl<E> BarrierError<E> {
    /// Extract the action's own error, if that is what this is
    pub fn into_action(self) -> Option<E> {
        match self {
            BarrierError::Action(e) => Some(e),
            _ => None,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, BarrierError::Cancelled)
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, BarrierError::Timeout { .. })
    }
}
