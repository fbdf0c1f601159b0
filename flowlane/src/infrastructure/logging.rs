// /////////////////////////////////////////////////////////////////////////////
// Flowlane
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Logging Setup
//!
//! Installs the global tracing subscriber for the application. The filter
//! comes from `RUST_LOG` when set, otherwise from the CLI's `--log-level`.
//! Installation is idempotent so tests that construct the application
//! twice do not panic.

use tracing_subscriber::EnvFilter;

/// Initializes the tracing subscriber with the given default level.
///
/// # Errors
///
/// Returns an error when the level string is not a valid filter
/// directive.
pub fn init_tracing(default_level: &str) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .map_err(|e| anyhow::anyhow!("invalid log level '{}': {}", default_level, e))?;

    // A second install attempt (tests, embedded use) is not an error.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
    Ok(())
}
