// /////////////////////////////////////////////////////////////////////////////
// Flowlane
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # JSON Codecs
//!
//! File-backed JSON storage: `JsonDataset<T>` persists a dataset as a
//! top-level JSON array, `JsonObject<T>` persists a single value. Writes
//! share the CSV codec's atomic temp-and-rename path.
//!
//! Inspection distinguishes the failure shapes: undecodable text is
//! `FormatInvalid`, decodable-but-not-an-array is `SchemaMismatch`, and a
//! specific element that fails to decode as `T` is `SampleRowFailed` with
//! its index.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use tracing::debug;

use flowlane_domain::services::codec::{
    DatasetSink, DatasetSource, ObjectSink, ObjectSource, StorageDescriptor,
};
use flowlane_domain::value_objects::{InspectionLevel, InspectionVerdict};
use flowlane_domain::PipelineError;

use super::csv::write_atomically;

/// Default number of elements a shallow inspection samples
pub const DEFAULT_SAMPLE_SIZE: usize = 100;

/// JSON array codec for datasets of `T`.
pub struct JsonDataset<T> {
    path: PathBuf,
    sample_size: usize,
    _rows: PhantomData<fn() -> T>,
}

impl<T> JsonDataset<T> {
    /// Creates a codec over the given file path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            sample_size: DEFAULT_SAMPLE_SIZE,
            _rows: PhantomData,
        }
    }

    /// Overrides the shallow-inspection sample size
    pub fn with_sample_size(mut self, sample_size: usize) -> Self {
        self.sample_size = sample_size;
        self
    }

    /// Gets the backing file path
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl<T> DatasetSource<T> for JsonDataset<T>
where
    T: DeserializeOwned + Send + Sync + 'static,
{
    async fn load(&self) -> Result<Vec<T>, PipelineError> {
        if !self.exists().await {
            return Err(PipelineError::missing_data(format!(
                "JSON file '{}' does not exist",
                self.path.display()
            )));
        }
        let bytes = tokio::fs::read(&self.path).await?;
        let rows: Vec<T> = serde_json::from_slice(&bytes).map_err(|e| {
            PipelineError::codec_error(format!("JSON '{}': {}", self.path.display(), e))
        })?;
        debug!(path = %self.path.display(), rows = rows.len(), "loaded JSON dataset");
        Ok(rows)
    }

    async fn exists(&self) -> bool {
        tokio::fs::try_exists(&self.path).await.unwrap_or(false)
    }

    async fn inspect(&self, level: InspectionLevel) -> InspectionVerdict {
        if !self.exists().await {
            return InspectionVerdict::FileMissing;
        }
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) => return InspectionVerdict::FormatInvalid(e.to_string()),
        };

        let value: serde_json::Value = match serde_json::from_slice(&bytes) {
            Ok(value) => value,
            Err(e) => return InspectionVerdict::FormatInvalid(e.to_string()),
        };
        let Some(elements) = value.as_array() else {
            return InspectionVerdict::SchemaMismatch("top-level value is not an array".into());
        };

        let limit = match level {
            InspectionLevel::Shallow => self.sample_size,
            InspectionLevel::Deep => usize::MAX,
        };
        for (index, element) in elements.iter().take(limit).enumerate() {
            if let Err(e) = serde_json::from_value::<T>(element.clone()) {
                return InspectionVerdict::SampleRowFailed {
                    index: index as u64,
                    reason: e.to_string(),
                };
            }
        }
        InspectionVerdict::Ok
    }

    fn storage(&self) -> StorageDescriptor {
        StorageDescriptor::file("json", self.path.clone())
    }
}

#[async_trait]
impl<T> DatasetSink<T> for JsonDataset<T>
where
    T: Serialize + Send + Sync + 'static,
{
    async fn save(&self, rows: Vec<T>) -> Result<(), PipelineError> {
        let bytes = serde_json::to_vec_pretty(&rows)?;
        write_atomically(&self.path, &bytes).await?;
        debug!(path = %self.path.display(), rows = rows.len(), "saved JSON dataset");
        Ok(())
    }
}

/// JSON document codec for a single value of `T`.
pub struct JsonObject<T> {
    path: PathBuf,
    _value: PhantomData<fn() -> T>,
}

impl<T> JsonObject<T> {
    /// Creates a codec over the given file path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            _value: PhantomData,
        }
    }

    /// Gets the backing file path
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl<T> ObjectSource<T> for JsonObject<T>
where
    T: DeserializeOwned + Send + Sync + 'static,
{
    async fn load(&self) -> Result<T, PipelineError> {
        if !self.exists().await {
            return Err(PipelineError::missing_data(format!(
                "JSON file '{}' does not exist",
                self.path.display()
            )));
        }
        let bytes = tokio::fs::read(&self.path).await?;
        serde_json::from_slice(&bytes).map_err(|e| {
            PipelineError::codec_error(format!("JSON '{}': {}", self.path.display(), e))
        })
    }

    async fn exists(&self) -> bool {
        tokio::fs::try_exists(&self.path).await.unwrap_or(false)
    }

    async fn inspect(&self, _level: InspectionLevel) -> InspectionVerdict {
        if !self.exists().await {
            return InspectionVerdict::FileMissing;
        }
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) => return InspectionVerdict::FormatInvalid(e.to_string()),
        };
        match serde_json::from_slice::<T>(&bytes) {
            Ok(_) => InspectionVerdict::Ok,
            Err(e) => InspectionVerdict::FormatInvalid(e.to_string()),
        }
    }

    fn storage(&self) -> StorageDescriptor {
        StorageDescriptor::file("json", self.path.clone())
    }
}

#[async_trait]
impl<T> ObjectSink<T> for JsonObject<T>
where
    T: Serialize + Send + Sync + 'static,
{
    async fn save(&self, value: T) -> Result<(), PipelineError> {
        let bytes = serde_json::to_vec_pretty(&value)?;
        write_atomically(&self.path, &bytes).await?;
        Ok(())
    }
}
