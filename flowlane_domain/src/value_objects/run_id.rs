// /////////////////////////////////////////////////////////////////////////////
// Flowlane
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Run Identifier
//!
//! Every pipeline execution result carries a `RunId`, a ULID that is
//! time-ordered (millisecond resolution) and collision-free without
//! coordination. The engine is stateless between runs; the id exists so
//! logs, reports, and exported artifacts from concurrent or historical
//! runs can be correlated.

use serde::{Deserialize, Serialize};
use std::fmt;
use ulid::Ulid;

use crate::PipelineError;

/// Unique, time-ordered identifier for one pipeline run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RunId(Ulid);

impl RunId {
    /// Creates a fresh run id from the current timestamp
    pub fn new() -> Self {
        Self(Ulid::new())
    }

    /// Parses a run id from its canonical string form.
    ///
    /// # Errors
    ///
    /// Returns `BuildError` when the string is not a valid ULID.
    pub fn from_string(s: &str) -> Result<Self, PipelineError> {
        Ulid::from_string(s)
            .map(Self)
            .map_err(|e| PipelineError::build_error(format!("Invalid run id '{}': {}", s, e)))
    }

    /// Gets the run's creation timestamp in epoch milliseconds
    pub fn timestamp_ms(&self) -> u64 {
        self.0.timestamp_ms()
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
