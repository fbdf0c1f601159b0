// /////////////////////////////////////////////////////////////////////////////
// Flowlane
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Execution Results
//!
//! Per-node and per-pipeline execution records. The executor appends one
//! `NodeExecution` per attempted node, in registration order, and seals
//! the aggregate `PipelineExecution` when the run finishes or halts.
//! Reporters consume these records; nothing here formats output.

use std::time::Duration;

use crate::value_objects::RunId;
use crate::PipelineError;

/// Result of executing one pipeline node.
#[derive(Debug, Clone)]
pub struct NodeExecution {
    name: String,
    success: bool,
    error: Option<PipelineError>,
    trace: Option<String>,
    execution_time: Duration,
    input_count: u64,
    output_count: u64,
}

impl NodeExecution {
    /// Records a successful node execution
    pub fn succeeded(
        name: impl Into<String>,
        execution_time: Duration,
        input_count: u64,
        output_count: u64,
    ) -> Self {
        Self {
            name: name.into(),
            success: true,
            error: None,
            trace: None,
            execution_time,
            input_count,
            output_count,
        }
    }

    /// Records a failed node execution.
    ///
    /// `trace` carries a bounded backtrace excerpt when one was captured.
    pub fn failed(
        name: impl Into<String>,
        execution_time: Duration,
        error: PipelineError,
        trace: Option<String>,
    ) -> Self {
        Self {
            name: name.into(),
            success: false,
            error: Some(error),
            trace,
            execution_time,
            input_count: 0,
            output_count: 0,
        }
    }

    /// Gets the node name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Checks whether the node completed successfully
    pub fn success(&self) -> bool {
        self.success
    }

    /// Gets the captured error, if the node failed
    pub fn error(&self) -> Option<&PipelineError> {
        self.error.as_ref()
    }

    /// Gets the bounded backtrace excerpt, if one was captured
    pub fn trace(&self) -> Option<&str> {
        self.trace.as_deref()
    }

    /// Gets the node's wall-clock execution time
    pub fn execution_time(&self) -> Duration {
        self.execution_time
    }

    /// Gets the total input record count
    pub fn input_count(&self) -> u64 {
        self.input_count
    }

    /// Gets the total output record count
    pub fn output_count(&self) -> u64 {
        self.output_count
    }
}

/// Aggregated result of one pipeline run.
///
/// Node records appear in the order nodes were registered; nodes in layers
/// after a failure never appear at all.
#[derive(Debug, Clone)]
pub struct PipelineExecution {
    run_id: RunId,
    pipeline_name: String,
    success: bool,
    nodes: Vec<NodeExecution>,
    error: Option<PipelineError>,
    execution_time: Duration,
}

impl PipelineExecution {
    /// Creates an empty, in-progress record for a run
    pub fn started(pipeline_name: impl Into<String>) -> Self {
        Self {
            run_id: RunId::new(),
            pipeline_name: pipeline_name.into(),
            success: false,
            nodes: Vec::new(),
            error: None,
            execution_time: Duration::ZERO,
        }
    }

    /// Appends a node record (insertion order is preserved)
    pub fn record(&mut self, node: NodeExecution) {
        self.nodes.push(node);
    }

    /// Seals the record as successful
    pub fn complete(&mut self, execution_time: Duration) {
        self.success = true;
        self.execution_time = execution_time;
    }

    /// Seals the record as failed with the halting error
    pub fn fail(&mut self, error: PipelineError, execution_time: Duration) {
        self.success = false;
        self.error = Some(error);
        self.execution_time = execution_time;
    }

    /// Gets the run identifier
    pub fn run_id(&self) -> RunId {
        self.run_id
    }

    /// Gets the pipeline name
    pub fn pipeline_name(&self) -> &str {
        &self.pipeline_name
    }

    /// Checks whether the whole run succeeded
    pub fn success(&self) -> bool {
        self.success
    }

    /// Gets the per-node records in registration order
    pub fn nodes(&self) -> &[NodeExecution] {
        &self.nodes
    }

    /// Gets the error that halted the run, if any
    pub fn error(&self) -> Option<&PipelineError> {
        self.error.as_ref()
    }

    /// Gets the total wall-clock duration
    pub fn execution_time(&self) -> Duration {
        self.execution_time
    }

    /// Gets the record of the node that failed, if any
    pub fn failed_node(&self) -> Option<&NodeExecution> {
        self.nodes.iter().find(|n| !n.success())
    }

    /// Counts the nodes that completed successfully
    pub fn completed_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.success()).count()
    }
}
