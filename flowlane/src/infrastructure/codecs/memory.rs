// /////////////////////////////////////////////////////////////////////////////
// Flowlane
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # In-Memory Codec
//!
//! Dataset and object codecs backed by a process-local slot. Used for
//! intermediate entries that only live for one run - the catalog drops
//! them when the run ends - and for discarded sinks of pure side-effect
//! nodes (register under a `_nodata`-prefixed key via `discard()`).
//!
//! The slot is guarded by a `parking_lot` lock for the codec contract's
//! `&self` methods; the engine's single-threaded layered execution is what
//! actually serializes access, and no cross-thread contention is expected.
//!
//! Inspection is `NotApplicable`: there is no storage form to inspect.

use async_trait::async_trait;
use parking_lot::RwLock;

use flowlane_domain::services::codec::{
    DatasetSink, DatasetSource, ObjectSink, ObjectSource, StorageDescriptor,
};
use flowlane_domain::PipelineError;

/// In-memory dataset codec.
pub struct MemoryDataset<T> {
    slot: RwLock<Option<Vec<T>>>,
}

impl<T> MemoryDataset<T> {
    /// Creates an empty slot; loading before the first save is a
    /// missing-data error
    pub fn new() -> Self {
        Self {
            slot: RwLock::new(None),
        }
    }

    /// Creates a slot pre-filled with rows (an external in-memory input)
    pub fn seeded(rows: Vec<T>) -> Self {
        Self {
            slot: RwLock::new(Some(rows)),
        }
    }
}

impl<T> Default for MemoryDataset<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<T: Clone + Send + Sync + 'static> DatasetSource<T> for MemoryDataset<T> {
    async fn load(&self) -> Result<Vec<T>, PipelineError> {
        self.slot
            .read()
            .clone()
            .ok_or_else(|| PipelineError::missing_data("in-memory dataset was never written"))
    }

    async fn exists(&self) -> bool {
        self.slot.read().is_some()
    }

    fn storage(&self) -> StorageDescriptor {
        StorageDescriptor::opaque("memory")
    }
}

#[async_trait]
impl<T: Clone + Send + Sync + 'static> DatasetSink<T> for MemoryDataset<T> {
    async fn save(&self, rows: Vec<T>) -> Result<(), PipelineError> {
        *self.slot.write() = Some(rows);
        Ok(())
    }
}

/// In-memory object codec.
pub struct MemoryObject<T> {
    slot: RwLock<Option<T>>,
}

impl<T> MemoryObject<T> {
    /// Creates an empty slot
    pub fn new() -> Self {
        Self {
            slot: RwLock::new(None),
        }
    }

    /// Creates a slot pre-filled with a value
    pub fn seeded(value: T) -> Self {
        Self {
            slot: RwLock::new(Some(value)),
        }
    }
}

impl<T> Default for MemoryObject<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<T: Clone + Send + Sync + 'static> ObjectSource<T> for MemoryObject<T> {
    async fn load(&self) -> Result<T, PipelineError> {
        self.slot
            .read()
            .clone()
            .ok_or_else(|| PipelineError::missing_data("in-memory object was never written"))
    }

    async fn exists(&self) -> bool {
        self.slot.read().is_some()
    }

    fn storage(&self) -> StorageDescriptor {
        StorageDescriptor::opaque("memory")
    }
}

#[async_trait]
impl<T: Clone + Send + Sync + 'static> ObjectSink<T> for MemoryObject<T> {
    async fn save(&self, value: T) -> Result<(), PipelineError> {
        *self.slot.write() = Some(value);
        Ok(())
    }
}

/// Write-only sink that drops everything it receives.
///
/// Pair with a `_nodata`-prefixed key for pure side-effect nodes: the
/// dependency analyzer ignores the entry, and the payload is discarded.
pub struct DiscardSink;

#[async_trait]
impl<T: Send + Sync + 'static> DatasetSink<T> for DiscardSink {
    async fn save(&self, _rows: Vec<T>) -> Result<(), PipelineError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flowlane_domain::entities::DatasetEntry;
    use flowlane_domain::value_objects::{InspectionLevel, InspectionVerdict};

    #[tokio::test]
    async fn test_dataset_roundtrip() {
        let codec = MemoryDataset::new();
        assert!(!DatasetSource::<i64>::exists(&codec).await);

        codec.save(vec![1i64, 2, 3]).await.unwrap();
        assert_eq!(codec.load().await.unwrap(), vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_load_before_write_is_missing_data() {
        let codec = MemoryDataset::<i64>::new();
        let err = codec.load().await.unwrap_err();
        assert_eq!(err.category(), "missing-data");
    }

    #[tokio::test]
    async fn test_inspection_is_not_applicable() {
        let codec = MemoryDataset::seeded(vec![1i64]);
        let verdict = codec.inspect(InspectionLevel::Deep).await;
        assert_eq!(verdict, InspectionVerdict::NotApplicable);
    }

    #[tokio::test]
    async fn test_object_roundtrip() {
        let codec = MemoryObject::new();
        codec.save("config".to_string()).await.unwrap();
        assert_eq!(codec.load().await.unwrap(), "config");
    }

    #[tokio::test]
    async fn test_discard_sink_entry() {
        let entry = DatasetEntry::<i64>::writable("_nodata_audit", DiscardSink).unwrap();
        assert!(entry.key().is_reserved());
        entry.save(vec![1, 2, 3]).await.unwrap();
    }
}
