// /////////////////////////////////////////////////////////////////////////////
// Flowlane
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Pipeline Registry
//!
//! Maps pipeline labels to factories. The CLI wrapper selects one label;
//! the factory constructs the catalog and builds the pipeline fresh for
//! that run (the engine is stateless between runs, so nothing is cached
//! across invocations).

use std::collections::BTreeMap;

use flowlane_domain::aggregates::Pipeline;
use flowlane_domain::PipelineError;

type PipelineFactory = Box<dyn Fn() -> Result<Pipeline, PipelineError> + Send + Sync>;

/// Label-indexed collection of pipeline factories.
#[derive(Default)]
pub struct PipelineRegistry {
    factories: BTreeMap<String, PipelineFactory>,
}

impl PipelineRegistry {
    /// Creates an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a factory under a label.
    ///
    /// # Errors
    ///
    /// Returns `BuildError` when the label is already registered.
    pub fn register<F>(&mut self, label: impl Into<String>, factory: F) -> Result<(), PipelineError>
    where
        F: Fn() -> Result<Pipeline, PipelineError> + Send + Sync + 'static,
    {
        let label = label.into();
        if self.factories.contains_key(&label) {
            return Err(PipelineError::build_error(format!(
                "Pipeline label '{}' is already registered",
                label
            )));
        }
        self.factories.insert(label, Box::new(factory));
        Ok(())
    }

    /// Builds the pipeline registered under `label`.
    ///
    /// # Errors
    ///
    /// * `BuildError` - unknown label, or the factory's own build failure
    pub fn build(&self, label: &str) -> Result<Pipeline, PipelineError> {
        let factory = self.factories.get(label).ok_or_else(|| {
            PipelineError::build_error(format!(
                "No pipeline registered under label '{}' (known: {})",
                label,
                self.labels().join(", ")
            ))
        })?;
        factory()
    }

    /// Gets the registered labels, sorted
    pub fn labels(&self) -> Vec<&str> {
        self.factories.keys().map(String::as_str).collect()
    }

    /// Checks whether a label is registered
    pub fn contains(&self, label: &str) -> bool {
        self.factories.contains_key(label)
    }
}
