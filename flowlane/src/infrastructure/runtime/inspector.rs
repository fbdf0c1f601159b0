// /////////////////////////////////////////////////////////////////////////////
// Flowlane
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Input Inspector
//!
//! Pre-execution validation of a pipeline's external inputs. For every
//! layer-0 external prerequisite whose entry declares an inspection level,
//! the inspector resolves the entry's codec, runs `inspect(level)`, and
//! collects the verdict. Only after *all* inspections complete does it
//! decide: any failed verdict fails the run with a `ValidationError`
//! carrying every failure, before a single node has executed.
//!
//! Inspection never mutates data; entries without a declared level are
//! not touched.

use tracing::{debug, warn};

use flowlane_domain::aggregates::Pipeline;
use flowlane_domain::value_objects::EntryVerdict;
use flowlane_domain::PipelineError;

/// Runs registered inspections over a pipeline's external inputs.
#[derive(Debug, Default, Clone)]
pub struct InputInspector;

impl InputInspector {
    /// Creates an inspector
    pub fn new() -> Self {
        Self
    }

    /// Inspects every external input with a declared level.
    ///
    /// Returns all collected verdicts (passing ones included, for
    /// diagnostics) when every inspection passed.
    ///
    /// # Errors
    ///
    /// * `ValidationError` - one or more inspections failed; carries every
    ///   failed verdict, not just the first
    pub async fn inspect(&self, pipeline: &Pipeline) -> Result<Vec<EntryVerdict>, PipelineError> {
        let mut verdicts = Vec::new();

        for entry in pipeline.external_inputs() {
            let Some(level) = entry.inspection_level() else {
                continue;
            };
            let verdict = entry.inspect(level).await;
            debug!(entry = %entry.key(), level = %level, verdict = %verdict, "inspected external input");
            verdicts.push(EntryVerdict::new(entry.key().clone(), level, verdict));
        }

        let failures: Vec<EntryVerdict> = verdicts.iter().filter(|v| !v.passed()).cloned().collect();
        if failures.is_empty() {
            Ok(verdicts)
        } else {
            for failure in &failures {
                warn!("input inspection failed: {}", failure);
            }
            Err(PipelineError::ValidationError { failures })
        }
    }
}
