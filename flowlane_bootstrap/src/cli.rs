// /////////////////////////////////////////////////////////////////////////////
// Flowlane
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Command-Line Interface
//!
//! Bootstrap-layer CLI for the flowlane binary. The engine itself owns no
//! CLI surface; this wrapper selects one pipeline label, chooses export
//! options, and hands the rest to the application crate.
//!
//! ## Commands
//!
//! - `run <pipeline>` - execute a registered pipeline, optionally
//!   exporting DAG metadata afterwards
//! - `export <pipeline>` - write DAG metadata without executing
//! - `list` - list registered pipeline labels
//!
//! Exit code is `0` on success and non-zero on failure; an interrupted
//! run exits with the conventional `130`.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Process exit code for a successful run
pub const EXIT_SUCCESS: i32 = 0;
/// Process exit code for a failed run or build
pub const EXIT_FAILURE: i32 = 1;
/// Process exit code for a cancelled run (128 + SIGINT)
pub const EXIT_CANCELLED: i32 = 130;

/// Declarative data-pipeline engine
#[derive(Debug, Parser)]
#[command(name = "flowlane", version, about = "Declarative, statically-typed data-pipeline engine")]
pub struct Cli {
    /// Log level filter (error, warn, info, debug, trace)
    #[arg(long, global = true, default_value = "info")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Commands,
}

/// Subcommands of the flowlane binary
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Execute a registered pipeline
    Run {
        /// Label of the pipeline to run
        pipeline: String,

        /// Export DAG metadata to this directory after the run
        #[arg(long)]
        export_dir: Option<PathBuf>,

        /// Also render the DAG as a Mermaid diagram when exporting
        #[arg(long)]
        diagram: bool,

        /// Skip pre-execution inspection of external inputs
        #[arg(long)]
        skip_inspection: bool,
    },

    /// Export DAG metadata for a registered pipeline without running it
    Export {
        /// Label of the pipeline to export
        pipeline: String,

        /// Directory the artifacts are written to
        #[arg(long, default_value = ".")]
        output_dir: PathBuf,

        /// Also render the DAG as a Mermaid diagram
        #[arg(long)]
        diagram: bool,
    },

    /// List registered pipeline labels
    List,
}

/// Parses the process arguments
pub fn parse_cli() -> Cli {
    Cli::parse()
}
