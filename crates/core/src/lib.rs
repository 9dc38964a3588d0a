// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! quiesce-core: a preemption barrier for exclusive-vs-normal coordination
//!
//! This crate provides:
//! - A [`Barrier`] that lets a rare privileged ("exclusive") operation run
//!   with the guarantee that no ordinary ("normal") operation is mid-flight,
//!   while normal operations run in full parallelism with each other
//! - Blocking entry points for thread-based call sites and suspending
//!   entry points for async call sites, over one shared counter core
//! - Cooperative cancellation and an optional per-action timeout for
//!   suspending callers
//! - Counter snapshots and a formatted status line for observability
//!
//! Not a reader/writer lock: exclusive operations do not exclude each
//! other (documented contract), there is no FIFO fairness among waiting
//! normal operations, and all waiting is bounded polling rather than
//! indefinite blocking on a single signal.

pub mod barrier;
pub mod cancel;
pub mod config;
pub mod error;

mod state;
mod suspend;

// Re-exports
pub use barrier::Barrier;
pub use cancel::{CancelHandle, CancelToken};
pub use config::{BarrierConfig, DEFAULT_POLL_INTERVAL};
pub use error::BarrierError;
pub use state::BarrierSnapshot;
