// /////////////////////////////////////////////////////////////////////////////
// Flowlane
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

// Production code safety enforced via CI and `make lint-strict`
// (lib/bins checked separately from tests - tests may use unwrap/expect)

//! # Bootstrap Module
//!
//! Sits outside the application layers (domain, application,
//! infrastructure) and provides the process-level scaffolding:
//!
//! - **Argument parsing** - clap CLI for the `flowlane` binary
//! - **Signal handling** - Ctrl-C wired to a cancellation token
//! - **Shutdown coordination** - a polled cancellation flag shared with
//!   the executor
//! - **Exit codes** - 0 success, 1 failure, 130 cancelled
//! - **Bootstrap logging** - minimal logger abstraction for the phase
//!   before the tracing subscriber exists

pub mod cli;
pub mod logger;
pub mod shutdown;

pub use cli::{parse_cli, Cli, Commands, EXIT_CANCELLED, EXIT_FAILURE, EXIT_SUCCESS};
pub use logger::{BootstrapLogger, ConsoleLogger, NoopLogger};
pub use shutdown::{CancellationToken, ShutdownCoordinator};
