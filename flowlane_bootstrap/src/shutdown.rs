// /////////////////////////////////////////////////////////////////////////////
// Flowlane
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Run Cancellation
//!
//! Cooperative cancellation for pipeline runs. The executor never blocks
//! on shutdown - it polls a shared flag between suspension points (before
//! each node, after each load/transform/save) - so the token here is
//! exactly that: a clone-able flag, with no wakeup machinery behind it.
//!
//! `ShutdownCoordinator` owns the flag and wires it to Ctrl-C. A cancelled
//! run is reported as a failed run with a *cancelled* error; nodes that
//! already completed keep their success records.
//!
//! ## Usage
//!
//! ```rust
//! use flowlane_bootstrap::shutdown::ShutdownCoordinator;
//!
//! let coordinator = ShutdownCoordinator::new();
//! let token = coordinator.token();
//!
//! coordinator.request_shutdown();
//! assert!(token.is_cancelled());
//! ```

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Clone-able cancellation flag polled by the executor.
///
/// All clones observe the same flag; once set it never clears.
#[derive(Clone, Default)]
pub struct CancellationToken {
    flag: Arc<AtomicBool>,
}

impl CancellationToken {
    /// Creates a fresh, un-cancelled token
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the flag
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Release);
    }

    /// Polls the flag
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Acquire)
    }
}

/// Owns the run's cancellation flag and connects it to process signals.
#[derive(Clone, Default)]
pub struct ShutdownCoordinator {
    token: CancellationToken,
}

impl ShutdownCoordinator {
    /// Creates a coordinator with an un-cancelled token
    pub fn new() -> Self {
        Self::default()
    }

    /// Gets a token to hand to the executor
    pub fn token(&self) -> CancellationToken {
        self.token.clone()
    }

    /// Checks whether shutdown has been requested
    pub fn is_shutting_down(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Requests shutdown. Repeated requests are no-ops; only the first
    /// one logs.
    pub fn request_shutdown(&self) {
        let was_cancelled = self.token.flag.swap(true, Ordering::AcqRel);
        if !was_cancelled {
            tracing::warn!("shutdown requested; the run stops at the next node boundary");
        }
    }

    /// Spawns the Ctrl-C listener that requests shutdown on signal.
    pub fn listen_for_signals(&self) {
        let coordinator = self.clone();
        tokio::spawn(async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => coordinator.request_shutdown(),
                Err(error) => {
                    tracing::error!("failed to install signal handler: {}", error);
                }
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_flag_is_shared_across_clones() {
        let token = CancellationToken::new();
        let clone = token.clone();
        assert!(!clone.is_cancelled());

        token.cancel();
        assert!(clone.is_cancelled());
    }

    #[test]
    fn test_cancellation_is_permanent() {
        let token = CancellationToken::new();
        token.cancel();
        token.cancel();
        assert!(token.is_cancelled());
    }

    #[test]
    fn test_request_shutdown_cancels_issued_tokens() {
        let coordinator = ShutdownCoordinator::new();
        let token = coordinator.token();

        coordinator.request_shutdown();
        coordinator.request_shutdown();

        assert!(coordinator.is_shutting_down());
        assert!(token.is_cancelled());
    }

    #[tokio::test]
    async fn test_cancellation_crosses_tasks() {
        let coordinator = ShutdownCoordinator::new();
        let token = coordinator.token();

        let canceller = tokio::spawn(async move {
            coordinator.request_shutdown();
        });
        canceller.await.expect("canceller completes");

        assert!(token.is_cancelled());
    }
}
