// /////////////////////////////////////////////////////////////////////////////
// Flowlane
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Codec Contract
//!
//! A codec implements load/save/inspect for one storage form (a CSV file,
//! a JSON document, an in-memory slot). The engine is agnostic to the
//! storage form; everything it needs is behind the four traits here.
//!
//! ## Capability Interfaces
//!
//! Read and write halves are distinct traits so that misuse is caught
//! before run time: a catalog entry constructed from only a
//! `DatasetSource` simply has no sink to hand to an output binding, and
//! the pipeline builder reports the impossible wiring as a build error.
//! Codecs that support both implement both traits and are registered once.
//!
//! ## Payload Shapes
//!
//! - **Dataset** codecs move `Vec<T>` - a finite, materialized sequence of
//!   rows. Re-iteration is the caller's business; the codec hands over an
//!   owned vector.
//! - **Object** codecs move a single `T`.
//!
//! ## Contract Obligations
//!
//! - `load` on absent storage fails with `MissingData` naming the entry.
//! - File-backed `save` is atomic: write a temp file in the destination
//!   directory, then rename. On failure the original (if any) survives and
//!   the temp is removed. Parent directories are created lazily.
//! - `inspect` never mutates data. Codecs that cannot inspect return
//!   `NotApplicable` (the default implementation).

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::value_objects::{InspectionLevel, InspectionVerdict};
use crate::PipelineError;

/// Storage metadata a codec exposes for DAG metadata export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageDescriptor {
    codec_kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    filepath: Option<PathBuf>,
}

impl StorageDescriptor {
    /// Describes a file-backed codec
    pub fn file(codec_kind: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            codec_kind: codec_kind.into(),
            filepath: Some(path.into()),
        }
    }

    /// Describes a codec with no externally visible location
    pub fn opaque(codec_kind: impl Into<String>) -> Self {
        Self {
            codec_kind: codec_kind.into(),
            filepath: None,
        }
    }

    /// Gets the codec kind label (e.g. `"csv"`, `"memory"`)
    pub fn codec_kind(&self) -> &str {
        &self.codec_kind
    }

    /// Gets the backing file path, if the codec is file-backed
    pub fn filepath(&self) -> Option<&PathBuf> {
        self.filepath.as_ref()
    }
}

/// Readable half of a dataset codec.
#[async_trait]
pub trait DatasetSource<T>: Send + Sync {
    /// Loads the full dataset.
    ///
    /// # Errors
    ///
    /// * `MissingData` - the backing storage does not exist
    /// * `CodecError` - the storage exists but cannot be decoded
    async fn load(&self) -> Result<Vec<T>, PipelineError>;

    /// Checks whether the backing storage exists
    async fn exists(&self) -> bool;

    /// Inspects the backing storage without mutating it.
    ///
    /// The default advertises no inspection support.
    async fn inspect(&self, _level: InspectionLevel) -> InspectionVerdict {
        InspectionVerdict::NotApplicable
    }

    /// Describes the backing storage for metadata export
    fn storage(&self) -> StorageDescriptor {
        StorageDescriptor::opaque("opaque")
    }
}

/// Writable half of a dataset codec.
#[async_trait]
pub trait DatasetSink<T>: Send + Sync {
    /// Persists the full dataset, replacing any previous contents.
    ///
    /// # Errors
    ///
    /// * `CodecError` / `IoError` - encoding or storage failure
    async fn save(&self, rows: Vec<T>) -> Result<(), PipelineError>;
}

/// Readable half of an object codec.
#[async_trait]
pub trait ObjectSource<T>: Send + Sync {
    /// Loads the single value.
    ///
    /// # Errors
    ///
    /// * `MissingData` - the backing storage does not exist
    /// * `CodecError` - the storage exists but cannot be decoded
    async fn load(&self) -> Result<T, PipelineError>;

    /// Checks whether the backing storage exists
    async fn exists(&self) -> bool;

    /// Inspects the backing storage without mutating it.
    async fn inspect(&self, _level: InspectionLevel) -> InspectionVerdict {
        InspectionVerdict::NotApplicable
    }

    /// Describes the backing storage for metadata export
    fn storage(&self) -> StorageDescriptor {
        StorageDescriptor::opaque("opaque")
    }
}

/// Writable half of an object codec.
#[async_trait]
pub trait ObjectSink<T>: Send + Sync {
    /// Persists the single value, replacing any previous contents.
    async fn save(&self, value: T) -> Result<(), PipelineError>;
}
