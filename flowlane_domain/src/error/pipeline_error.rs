// /////////////////////////////////////////////////////////////////////////////
// Flowlane
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Domain Error System
//!
//! This module provides the hierarchical error system for the flowlane
//! engine. Failures are categorized by the phase that produced them so
//! callers can distinguish structural problems (caught before any node
//! runs) from execution problems (attributed to a single node).
//!
//! ## Error Phases
//!
//! - **Build** - structural defects in the pipeline declaration: duplicate
//!   node names, incomplete mappings, multiple producers, circular
//!   dependencies. Reported by the builder before execution.
//! - **Validation** - verdicts collected by the inspector over external
//!   inputs. Reported before any node executes, carrying *every* failed
//!   verdict, not just the first.
//! - **Execution** - missing data, codec failures, node failures, invalid
//!   output maps, cancellation. Attributed to the current node and halting
//!   the run.
//!
//! ## Propagation Policy
//!
//! Errors are never silently swallowed. The single exception is DAG
//! metadata export, which logs a warning and never fails a run.

use thiserror::Error;

use crate::value_objects::EntryVerdict;

/// Domain-specific errors for the flowlane pipeline engine.
///
/// Each variant represents a specific failure mode and carries a
/// descriptive message with enough context to act on. Variants are grouped
/// by the phase that raises them; `category()` exposes the grouping for
/// logging and metrics.
#[derive(Error, Debug, Clone)]
pub enum PipelineError {
    /// Structural defect detected while declaring or building a pipeline.
    #[error("Build error: {0}")]
    BuildError(String),

    /// One or more external inputs failed pre-execution inspection.
    ///
    /// Carries every failed verdict so a single run surfaces all bad
    /// inputs at once.
    #[error("Validation error: {} input(s) failed inspection", failures.len())]
    ValidationError { failures: Vec<EntryVerdict> },

    /// An input entry's backing storage does not exist at read time.
    #[error("Missing data: {0}")]
    MissingData(String),

    /// Unsupported codec operation or a format/storage failure.
    #[error("Codec error: {0}")]
    CodecError(String),

    /// Error surfaced by a user node's `transform`.
    #[error("Node error: {0}")]
    NodeError(String),

    /// Attempt to save through a catalog map holding parameter bindings.
    #[error("Invalid output map: {0}")]
    InvalidOutputMap(String),

    /// Cooperative cancellation observed at a suspension point.
    #[error("Cancelled: {0}")]
    Cancelled(String),

    #[error("IO error: {0}")]
    IoError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl PipelineError {
    /// Creates a new build error
    pub fn build_error(msg: impl Into<String>) -> Self {
        Self::BuildError(msg.into())
    }

    /// Creates a missing-data error naming the affected entry
    pub fn missing_data(key: impl Into<String>) -> Self {
        Self::MissingData(key.into())
    }

    /// Creates a new codec error
    pub fn codec_error(msg: impl Into<String>) -> Self {
        Self::CodecError(msg.into())
    }

    /// Creates a new node error
    pub fn node_error(msg: impl Into<String>) -> Self {
        Self::NodeError(msg.into())
    }

    /// Creates a new internal error
    pub fn internal_error(msg: impl Into<String>) -> Self {
        Self::InternalError(msg.into())
    }

    /// Checks whether the error was raised before any node executed
    pub fn is_pre_execution(&self) -> bool {
        matches!(
            self,
            PipelineError::BuildError(_) | PipelineError::ValidationError { .. }
        )
    }

    /// Gets the error category
    pub fn category(&self) -> &'static str {
        match self {
            PipelineError::BuildError(_) => "build",
            PipelineError::ValidationError { .. } => "validation",
            PipelineError::MissingData(_) => "missing-data",
            PipelineError::CodecError(_) => "codec",
            PipelineError::NodeError(_) => "node",
            PipelineError::InvalidOutputMap(_) => "invalid-output-map",
            PipelineError::Cancelled(_) => "cancellation",
            PipelineError::IoError(_) => "io",
            PipelineError::SerializationError(_) => "serialization",
            PipelineError::InternalError(_) => "internal",
        }
    }
}

// Implement conversion from standard library errors
impl From<std::io::Error> for PipelineError {
    fn from(err: std::io::Error) -> Self {
        PipelineError::IoError(err.to_string())
    }
}

impl From<serde_json::Error> for PipelineError {
    fn from(err: serde_json::Error) -> Self {
        PipelineError::SerializationError(err.to_string())
    }
}
