// /////////////////////////////////////////////////////////////////////////////
// Flowlane
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # DAG Metadata Export
//!
//! Writes a pipeline's DAG snapshot to the configured output directory as
//! `dag-<pipeline>-<timestamp>.json` and, optionally, the Mermaid
//! rendering as `dag-<pipeline>-<timestamp>.mmd`. The timestamp format is
//! configurable (default `%Y%m%d-%H%M%S`); characters that are invalid in
//! filenames are replaced with `_`.
//!
//! Export is diagnostics, not data flow: every failure here is logged as
//! a warning and never fails the run. That is the one place the engine
//! swallows an error deliberately.

use std::path::{Path, PathBuf};
use tracing::{info, warn};

use flowlane_domain::services::dag_metadata::DagSnapshot;

use super::mermaid::render_mermaid;

/// Default timestamp format for export filenames
pub const DEFAULT_TIMESTAMP_FORMAT: &str = "%Y%m%d-%H%M%S";

/// Writes DAG snapshots to disk.
#[derive(Debug, Clone)]
pub struct DagExporter {
    output_dir: PathBuf,
    timestamp_format: String,
}

impl DagExporter {
    /// Creates an exporter targeting the given directory
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            timestamp_format: DEFAULT_TIMESTAMP_FORMAT.to_string(),
        }
    }

    /// Overrides the filename timestamp format
    pub fn with_timestamp_format(mut self, format: impl Into<String>) -> Self {
        self.timestamp_format = format.into();
        self
    }

    /// Writes the JSON artifact; returns the path on success.
    ///
    /// Failures are logged as warnings and reported as `None` - export
    /// never fails a run.
    pub fn export_json(&self, snapshot: &DagSnapshot) -> Option<PathBuf> {
        match self.try_export_json(snapshot) {
            Ok(path) => {
                info!(path = %path.display(), "exported DAG metadata");
                Some(path)
            }
            Err(reason) => {
                warn!("DAG metadata export failed: {}", reason);
                None
            }
        }
    }

    /// Writes the Mermaid artifact; returns the path on success.
    ///
    /// Same warning-only failure policy as [`export_json`](Self::export_json).
    pub fn export_diagram(&self, snapshot: &DagSnapshot) -> Option<PathBuf> {
        let path = self.artifact_path(snapshot, "mmd");
        match std::fs::create_dir_all(&self.output_dir)
            .and_then(|_| std::fs::write(&path, render_mermaid(snapshot)))
        {
            Ok(()) => {
                info!(path = %path.display(), "exported DAG diagram");
                Some(path)
            }
            Err(reason) => {
                warn!("DAG diagram export failed: {}", reason);
                None
            }
        }
    }

    fn try_export_json(&self, snapshot: &DagSnapshot) -> Result<PathBuf, String> {
        let json = snapshot.to_json().map_err(|e| e.to_string())?;
        std::fs::create_dir_all(&self.output_dir).map_err(|e| e.to_string())?;
        let path = self.artifact_path(snapshot, "json");
        std::fs::write(&path, json).map_err(|e| e.to_string())?;
        Ok(path)
    }

    fn artifact_path(&self, snapshot: &DagSnapshot, extension: &str) -> PathBuf {
        let timestamp = snapshot
            .generated_at
            .format(&self.timestamp_format)
            .to_string();
        self.output_dir.join(format!(
            "dag-{}-{}.{}",
            sanitize_filename(&snapshot.pipeline_name),
            sanitize_filename(&timestamp),
            extension
        ))
    }

    /// Gets the configured output directory
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }
}

fn sanitize_filename(raw: &str) -> String {
    raw.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect()
}
