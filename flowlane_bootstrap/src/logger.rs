// /////////////////////////////////////////////////////////////////////////////
// Flowlane
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Bootstrap Logger
//!
//! Minimal logging abstraction for bootstrap-phase messages and reporter
//! output. The console implementation forwards into `tracing` under the
//! `bootstrap` target, so everything lands in the same subscriber the
//! rest of the engine logs through; tests substitute a buffer instead of
//! capturing stdout.

/// Bootstrap logging abstraction.
///
/// Implementations forward into `tracing`, write to a buffer (tests), or
/// drop everything (`NoopLogger`).
pub trait BootstrapLogger: Send + Sync {
    /// Logs an error message
    fn error(&self, message: &str);

    /// Logs a warning message
    fn warn(&self, message: &str);

    /// Logs an info message
    fn info(&self, message: &str);
}

/// Logger forwarding into `tracing` under the `bootstrap` target.
#[derive(Debug, Default, Clone)]
pub struct ConsoleLogger;

impl ConsoleLogger {
    /// Creates a console logger
    pub fn new() -> Self {
        Self
    }
}

impl BootstrapLogger for ConsoleLogger {
    fn error(&self, message: &str) {
        tracing::error!(target: "bootstrap", "{}", message);
    }

    fn warn(&self, message: &str) {
        tracing::warn!(target: "bootstrap", "{}", message);
    }

    fn info(&self, message: &str) {
        tracing::info!(target: "bootstrap", "{}", message);
    }
}

/// No-op logger for tests
#[derive(Debug, Default, Clone)]
pub struct NoopLogger;

impl BootstrapLogger for NoopLogger {
    fn error(&self, _message: &str) {}

    fn warn(&self, _message: &str) {}

    fn info(&self, _message: &str) {}
}
