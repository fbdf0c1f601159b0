// /////////////////////////////////////////////////////////////////////////////
// Flowlane
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # CSV Dataset Codec
//!
//! Serde-backed CSV storage for dataset entries: one header row, one
//! record per data row. Rows are any `T: Serialize + DeserializeOwned`.
//!
//! ## Atomic Writes
//!
//! Saves go to a temp file in the destination directory and are renamed
//! over the target. A failed write leaves the original file (if any)
//! untouched and removes the temp. Parent directories are created lazily
//! before the first write.
//!
//! ## Inspection
//!
//! - Shallow: decode a bounded prefix of records (default 100).
//! - Deep: decode every record.
//!
//! The first undecodable record yields `SampleRowFailed` with the
//! zero-based record index and the decoder's reason; an unreadable file
//! yields `FormatInvalid`; an absent file yields `FileMissing`.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::io::Write;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use tracing::debug;

use flowlane_domain::services::codec::{DatasetSink, DatasetSource, StorageDescriptor};
use flowlane_domain::value_objects::{InspectionLevel, InspectionVerdict};
use flowlane_domain::PipelineError;

/// Default number of records a shallow inspection samples
pub const DEFAULT_SAMPLE_SIZE: usize = 100;

/// CSV file codec for datasets of `T`.
pub struct CsvDataset<T> {
    path: PathBuf,
    sample_size: usize,
    _rows: PhantomData<fn() -> T>,
}

impl<T> CsvDataset<T> {
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
impl<T> DatasetSource<T> for CsvDataset<T>
where
    T: DeserializeOwned + Send + Sync + 'static,
{
    async fn load(&self) -> Result<Vec<T>, PipelineError> {
        if !self.exists().await {
            return Err(PipelineError::missing_data(format!(
                "CSV file '{}' does not exist",
                self.path.display()
            )));
        }
        let bytes = tokio::fs::read(&self.path).await?;
        let mut reader = csv::Reader::from_reader(bytes.as_slice());
        let mut rows = Vec::new();
        for (index, record) in reader.deserialize::<T>().enumerate() {
            rows.push(record.map_err(|e| {
                PipelineError::codec_error(format!(
                    "CSV '{}' record {}: {}",
                    self.path.display(),
                    index,
                    e
                ))
            })?);
        }
        debug!(path = %self.path.display(), rows = rows.len(), "loaded CSV dataset");
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

        let limit = match level {
            InspectionLevel::Shallow => self.sample_size,
            InspectionLevel::Deep => usize::MAX,
        };

        let mut reader = csv::Reader::from_reader(bytes.as_slice());
        if let Err(e) = reader.headers() {
            return InspectionVerdict::FormatInvalid(e.to_string());
        }
        for (index, record) in reader.deserialize::<T>().enumerate() {
            if index >= limit {
                break;
            }
            if let Err(e) = record {
                return InspectionVerdict::SampleRowFailed {
                    index: index as u64,
                    reason: e.to_string(),
                };
            }
        }
        InspectionVerdict::Ok
    }

    fn storage(&self) -> StorageDescriptor {
        StorageDescriptor::file("csv", self.path.clone())
    }
}

#[async_trait]
impl<T> DatasetSink<T> for CsvDataset<T>
where
    T: Serialize + Send + Sync + 'static,
{
    async fn save(&self, rows: Vec<T>) -> Result<(), PipelineError> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        for row in &rows {
            writer
                .serialize(row)
                .map_err(|e| PipelineError::codec_error(format!("CSV encoding failed: {}", e)))?;
        }
        let bytes = writer
            .into_inner()
            .map_err(|e| PipelineError::codec_error(format!("CSV encoding failed: {}", e)))?;

        write_atomically(&self.path, &bytes).await?;
        debug!(path = %self.path.display(), rows = rows.len(), "saved CSV dataset");
        Ok(())
    }
}

/// Writes `bytes` to `path` via a sibling temp file and rename.
///
/// The temp file lives in the destination directory so the rename stays on
/// one filesystem; it is removed on every failure path.
pub(crate) async fn write_atomically(path: &Path, bytes: &[u8]) -> Result<(), PipelineError> {
    let parent = path.parent().filter(|p| !p.as_os_str().is_empty());
    if let Some(parent) = parent {
        tokio::fs::create_dir_all(parent).await?;
    }

    let dir = parent.map(Path::to_path_buf).unwrap_or_else(|| PathBuf::from("."));
    let mut temp = tempfile::NamedTempFile::new_in(&dir)?;
    temp.write_all(bytes)?;
    temp.flush()?;
    temp.persist(path)
        .map_err(|e| PipelineError::IoError(format!("atomic rename failed: {}", e)))?;
    Ok(())
}
