// /////////////////////////////////////////////////////////////////////////////
// Flowlane
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Execution Reporters
//!
//! A reporter consumes a `PipelineExecution` and emits human- or
//! machine-readable output through a logger. The console reporter writes a
//! banner, the run status and total duration, and one line per node: a
//! success mark, the name, the duration, and the I/O counts. For the
//! failing node only, it adds the truncated error and a bounded backtrace
//! excerpt.
//!
//! Rendering is a pure function over the execution record, so tests
//! assert on lines instead of capturing stdout.

use flowlane_bootstrap::BootstrapLogger;
use flowlane_domain::entities::PipelineExecution;

/// Maximum backtrace frames shown for the failing node
pub const MAX_TRACE_LINES: usize = 10;
/// Maximum characters of an error message before truncation
pub const MAX_ERROR_CHARS: usize = 200;

/// Consumes a pipeline execution and emits a report.
pub trait ExecutionReporter: Send + Sync {
    /// Writes the report through the given logger
    fn report(&self, execution: &PipelineExecution, logger: &dyn BootstrapLogger);
}

/// Human-readable console reporter.
#[derive(Debug, Default, Clone)]
pub struct ConsoleReporter;

impl ConsoleReporter {
    /// Creates a console reporter
    pub fn new() -> Self {
        Self
    }

    /// Renders the report lines without writing them anywhere.
    pub fn render(execution: &PipelineExecution) -> Vec<String> {
        let mut lines = Vec::new();
        let banner = "=".repeat(64);

        lines.push(banner.clone());
        lines.push(format!(
            " Pipeline '{}'  (run {})",
            execution.pipeline_name(),
            execution.run_id()
        ));
        lines.push(banner);
        lines.push(format!(
            " Status: {}",
            if execution.success() { "OK" } else { "FAILED" }
        ));
        lines.push(format!(" Duration: {:.3}s", execution.execution_time().as_secs_f64()));

        for node in execution.nodes() {
            let mark = if node.success() { "+" } else { "x" };
            let mut line = format!(
                "  [{}] {:<24} {:>8.1}ms  in={} out={}",
                mark,
                node.name(),
                node.execution_time().as_secs_f64() * 1000.0,
                node.input_count(),
                node.output_count()
            );
            if let Some(error) = node.error() {
                line.push_str(&format!("  {}", truncate(&error.to_string(), MAX_ERROR_CHARS)));
            }
            lines.push(line);

            if let Some(trace) = node.trace() {
                for frame in trace.lines().take(MAX_TRACE_LINES) {
                    lines.push(format!("        {}", frame));
                }
            }
        }

        if let Some(error) = execution.error() {
            if execution.failed_node().is_none() {
                // Pre-execution failure: no node line carries it
                lines.push(format!(" Error: {}", truncate(&error.to_string(), MAX_ERROR_CHARS)));
            }
        }

        lines
    }
}

impl ExecutionReporter for ConsoleReporter {
    fn report(&self, execution: &PipelineExecution, logger: &dyn BootstrapLogger) {
        for line in Self::render(execution) {
            if execution.success() {
                logger.info(&line);
            } else {
                logger.error(&line);
            }
        }
    }
}

/// Machine-readable single-line JSON reporter (extension point).
#[derive(Debug, Default, Clone)]
pub struct JsonReporter;

impl JsonReporter {
    /// Creates a JSON reporter
    pub fn new() -> Self {
        Self
    }

    /// Renders the compact JSON document.
    pub fn render(execution: &PipelineExecution) -> String {
        let nodes: Vec<serde_json::Value> = execution
            .nodes()
            .iter()
            .map(|node| {
                serde_json::json!({
                    "name": node.name(),
                    "success": node.success(),
                    "durationMs": node.execution_time().as_millis() as u64,
                    "inputCount": node.input_count(),
                    "outputCount": node.output_count(),
                    "error": node.error().map(|e| e.to_string()),
                })
            })
            .collect();

        serde_json::json!({
            "runId": execution.run_id().to_string(),
            "pipelineName": execution.pipeline_name(),
            "success": execution.success(),
            "durationMs": execution.execution_time().as_millis() as u64,
            "nodes": nodes,
            "error": execution.error().map(|e| e.to_string()),
        })
        .to_string()
    }
}

impl ExecutionReporter for JsonReporter {
    fn report(&self, execution: &PipelineExecution, logger: &dyn BootstrapLogger) {
        logger.info(&Self::render(execution));
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let kept: String = text.chars().take(max_chars).collect();
    format!("{}...", kept)
}
