// /////////////////////////////////////////////////////////////////////////////
// Flowlane
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Pipeline Executor
//!
//! Runs a built pipeline: the inspection phase first, then the layers in
//! ascending order, nodes within a layer in registration order. At any
//! point in time at most one node body executes; the only concurrency the
//! engine introduces is the fan-out inside a single mapped input's load.
//!
//! Per node: start the timer, load every input, transform, save every
//! output, stop the timer, record the result. The first load/transform/
//! save error is captured (kind, message, backtrace when available),
//! attributed to the node, and halts the pipeline - remaining layers are
//! not attempted.
//!
//! Cancellation is cooperative: the executor probes the token between
//! suspension points and before each node. A cancelled run is a failed
//! run with a *cancelled* error; nodes that already completed keep their
//! success records.
//!
//! Each node body runs inside a `tracing` span named after the node, so a
//! node's own log lines arrive attributed without the node holding any
//! logger.

use std::backtrace::{Backtrace, BacktraceStatus};
use std::time::Instant;
use tracing::{error, info, Instrument};

use flowlane_bootstrap::CancellationToken;
use flowlane_domain::aggregates::Pipeline;
use flowlane_domain::entities::{NodeExecution, PipelineExecution};
use flowlane_domain::PipelineError;

use super::inspector::InputInspector;

/// Layered, sequential pipeline executor.
#[derive(Debug, Clone)]
pub struct PipelineExecutor {
    inspection_enabled: bool,
}

impl PipelineExecutor {
    /// Creates an executor with the inspection phase enabled
    pub fn new() -> Self {
        Self {
            inspection_enabled: true,
        }
    }

    /// Disables the pre-execution inspection phase
    pub fn without_inspection(mut self) -> Self {
        self.inspection_enabled = false;
        self
    }

    /// Runs the pipeline to completion, failure, or cancellation.
    ///
    /// Always returns a `PipelineExecution`; the run's outcome is in its
    /// `success`/`error` fields rather than a `Result`, so reporters see
    /// partial records either way.
    pub async fn execute(&self, pipeline: &Pipeline, cancel: &CancellationToken) -> PipelineExecution {
        let started = Instant::now();
        let mut execution = PipelineExecution::started(pipeline.name());
        info!(
            pipeline = pipeline.name(),
            nodes = pipeline.nodes().len(),
            layers = pipeline.layer_count(),
            "starting pipeline run"
        );

        if self.inspection_enabled {
            if let Err(e) = InputInspector::new().inspect(pipeline).await {
                error!(pipeline = pipeline.name(), "input validation failed: {}", e);
                execution.fail(e, started.elapsed());
                return execution;
            }
        }

        let probe = || cancel.is_cancelled();

        'layers: for layer in 0..pipeline.layer_count() {
            for node in pipeline.nodes().iter().filter(|n| n.layer() == layer) {
                if cancel.is_cancelled() {
                    let reason = PipelineError::Cancelled(format!(
                        "run cancelled before node '{}'",
                        node.name()
                    ));
                    execution.fail(reason, started.elapsed());
                    break 'layers;
                }

                let span = tracing::info_span!("node", name = node.name(), layer = layer);
                let node_started = Instant::now();
                let outcome = node.execute(&probe).instrument(span).await;
                let node_elapsed = node_started.elapsed();

                match outcome {
                    Ok(counts) => {
                        info!(
                            node = node.name(),
                            layer,
                            input_count = counts.input_count,
                            output_count = counts.output_count,
                            elapsed_ms = node_elapsed.as_millis() as u64,
                            "node completed"
                        );
                        execution.record(NodeExecution::succeeded(
                            node.name(),
                            node_elapsed,
                            counts.input_count,
                            counts.output_count,
                        ));
                    }
                    Err(e) => {
                        error!(node = node.name(), layer, "node failed: {}", e);
                        let trace = captured_backtrace();
                        execution.record(NodeExecution::failed(
                            node.name(),
                            node_elapsed,
                            e.clone(),
                            trace,
                        ));
                        execution.fail(e, started.elapsed());
                        break 'layers;
                    }
                }
            }
        }

        if execution.error().is_none() {
            execution.complete(started.elapsed());
            info!(
                pipeline = pipeline.name(),
                nodes = execution.nodes().len(),
                elapsed_ms = execution.execution_time().as_millis() as u64,
                "pipeline run succeeded"
            );
        }
        execution
    }
}

impl Default for PipelineExecutor {
    fn default() -> Self {
        Self::new()
    }
}

fn captured_backtrace() -> Option<String> {
    let backtrace = Backtrace::capture();
    match backtrace.status() {
        BacktraceStatus::Captured => Some(backtrace.to_string()),
        _ => None,
    }
}
