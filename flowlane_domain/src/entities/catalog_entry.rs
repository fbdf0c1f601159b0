// /////////////////////////////////////////////////////////////////////////////
// Flowlane
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Catalog Entries
//!
//! A catalog entry is a named, typed handle to data: a dataset (a finite
//! sequence of rows) or an object (a single value). The handle owns its
//! storage binding through the codec halves it was constructed with, and
//! its capability is exactly the set of halves present - an entry built
//! from only a `DatasetSource` has nothing to hand to an output binding,
//! so the builder can refuse the wiring before a run starts.
//!
//! ## Typed and Erased Views
//!
//! The engine stores entries of many payload types in one collection
//! (the catalog, the producer map, the DAG snapshot). Following the usual
//! trait-object-with-type-tag approach, every typed handle also implements
//! [`ErasedEntry`], which carries the payload type's name as a tag and
//! exposes the type-independent operations (`exists`, `inspect`, storage
//! metadata). Typed access goes back through `as_any` downcasting, which
//! checks the tag once; after that all calls are statically typed.
//!
//! ## Identity
//!
//! Handles are cheap clones of a shared inner allocation. Every accessor
//! on one catalog returns clones of the same inner, so two references to
//! the same key are the same entry instance - `same_instance` makes the
//! guarantee testable.

use async_trait::async_trait;
use std::any::Any;
use std::sync::Arc;

use crate::services::codec::{
    DatasetSink, DatasetSource, ObjectSink, ObjectSource, StorageDescriptor,
};
use crate::value_objects::{
    Capability, EntryKey, EntryKind, FieldSpec, InspectionLevel, InspectionVerdict,
};
use crate::PipelineError;

/// Type-erased view of a catalog entry.
///
/// This is what the catalog registry, the dependency analyzer, the
/// inspector, and the metadata extractor operate on. Typed load/save stays
/// on the concrete handles; `as_any` recovers them.
#[async_trait]
pub trait ErasedEntry: Send + Sync {
    /// Gets the entry's key
    fn key(&self) -> &EntryKey;

    /// Gets the payload kind (dataset or object)
    fn kind(&self) -> EntryKind;

    /// Gets the entry's capability
    fn capability(&self) -> Capability;

    /// Gets the payload type's name (type tag)
    fn data_type_name(&self) -> &'static str;

    /// Gets the preferred inspection level, if one was declared
    fn inspection_level(&self) -> Option<InspectionLevel>;

    /// Gets the declared row schema, if one was provided
    fn declared_schema(&self) -> Option<Vec<FieldSpec>>;

    /// Describes the backing storage
    fn storage(&self) -> StorageDescriptor;

    /// Checks whether the backing storage exists
    async fn exists(&self) -> bool;

    /// Inspects the backing storage through the codec
    async fn inspect(&self, level: InspectionLevel) -> InspectionVerdict;

    /// Upcast for typed downcasting
    fn as_any(&self) -> &dyn Any;
}

/// Shared, type-erased entry handle.
pub type AnyEntry = Arc<dyn ErasedEntry>;

struct DatasetEntryInner<T> {
    key: EntryKey,
    source: Option<Arc<dyn DatasetSource<T>>>,
    sink: Option<Arc<dyn DatasetSink<T>>>,
    inspection: Option<InspectionLevel>,
    schema: Option<Vec<FieldSpec>>,
    storage: StorageDescriptor,
}

impl<T> Clone for DatasetEntryInner<T> {
    fn clone(&self) -> Self {
        Self {
            key: self.key.clone(),
            source: self.source.clone(),
            sink: self.sink.clone(),
            inspection: self.inspection,
            schema: self.schema.clone(),
            storage: self.storage.clone(),
        }
    }
}

/// Typed handle to a dataset entry (payload `Vec<T>`).
///
/// # Examples
///
/// ```
/// use flowlane_domain::entities::DatasetEntry;
/// use flowlane_domain::value_objects::Capability;
/// # use flowlane_domain::services::codec::{DatasetSource, DatasetSink};
/// # use flowlane_domain::PipelineError;
/// # use async_trait::async_trait;
/// # struct Slot;
/// # #[async_trait]
/// # impl DatasetSource<i64> for Slot {
/// #     async fn load(&self) -> Result<Vec<i64>, PipelineError> { Ok(vec![]) }
/// #     async fn exists(&self) -> bool { true }
/// # }
/// # #[async_trait]
/// # impl DatasetSink<i64> for Slot {
/// #     async fn save(&self, _rows: Vec<i64>) -> Result<(), PipelineError> { Ok(()) }
/// # }
///
/// let entry = DatasetEntry::read_write("numbers", Slot).unwrap();
/// assert_eq!(entry.capability(), Capability::ReadWrite);
/// assert_eq!(entry.key().as_str(), "numbers");
/// ```
pub struct DatasetEntry<T> {
    inner: Arc<DatasetEntryInner<T>>,
}

impl<T> Clone for DatasetEntry<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T: Send + Sync + 'static> DatasetEntry<T> {
    /// Creates a readable and writable dataset entry from one codec
    pub fn read_write<C>(key: impl Into<String>, codec: C) -> Result<Self, PipelineError>
    where
        C: DatasetSource<T> + DatasetSink<T> + 'static,
    {
        let codec = Arc::new(codec);
        let storage = codec.storage();
        Ok(Self {
            inner: Arc::new(DatasetEntryInner {
                key: EntryKey::new(key)?,
                source: Some(codec.clone() as Arc<dyn DatasetSource<T>>),
                sink: Some(codec as Arc<dyn DatasetSink<T>>),
                inspection: None,
                schema: None,
                storage,
            }),
        })
    }

    /// Creates a readable-only dataset entry
    pub fn readable<C>(key: impl Into<String>, codec: C) -> Result<Self, PipelineError>
    where
        C: DatasetSource<T> + 'static,
    {
        let codec = Arc::new(codec);
        let storage = codec.storage();
        Ok(Self {
            inner: Arc::new(DatasetEntryInner {
                key: EntryKey::new(key)?,
                source: Some(codec as Arc<dyn DatasetSource<T>>),
                sink: None,
                inspection: None,
                schema: None,
                storage,
            }),
        })
    }

    /// Creates a writable-only dataset entry
    pub fn writable<C>(key: impl Into<String>, codec: C) -> Result<Self, PipelineError>
    where
        C: DatasetSink<T> + 'static,
    {
        Ok(Self {
            inner: Arc::new(DatasetEntryInner {
                key: EntryKey::new(key)?,
                source: None,
                sink: Some(Arc::new(codec) as Arc<dyn DatasetSink<T>>),
                inspection: None,
                schema: None,
                storage: StorageDescriptor::opaque("sink"),
            }),
        })
    }

    /// Declares the preferred inspection level for this entry.
    ///
    /// Only meaningful before the entry is shared; the inspector reads the
    /// hint when the entry turns out to be an external layer-0 input.
    pub fn with_inspection(mut self, level: InspectionLevel) -> Self {
        Arc::make_mut(&mut self.inner).inspection = Some(level);
        self
    }

    /// Declares the row schema exported with DAG metadata
    pub fn with_schema(mut self, fields: Vec<FieldSpec>) -> Self {
        Arc::make_mut(&mut self.inner).schema = Some(fields);
        self
    }

    /// Gets the entry key
    pub fn key(&self) -> &EntryKey {
        &self.inner.key
    }

    /// Gets the entry's capability
    pub fn capability(&self) -> Capability {
        match (&self.inner.source, &self.inner.sink) {
            (Some(_), Some(_)) => Capability::ReadWrite,
            (Some(_), None) => Capability::ReadOnly,
            _ => Capability::WriteOnly,
        }
    }

    /// Loads the dataset through the codec.
    ///
    /// # Errors
    ///
    /// * `CodecError` - the entry is not readable
    /// * `MissingData` / `CodecError` - propagated from the codec
    pub async fn load(&self) -> Result<Vec<T>, PipelineError> {
        match &self.inner.source {
            Some(source) => match source.load().await {
                Err(PipelineError::MissingData(reason)) => Err(PipelineError::MissingData(
                    format!("entry '{}': {}", self.inner.key, reason),
                )),
                other => other,
            },
            None => Err(PipelineError::codec_error(format!(
                "Entry '{}' does not support loading (write-only)",
                self.inner.key
            ))),
        }
    }

    /// Saves the dataset through the codec.
    ///
    /// # Errors
    ///
    /// * `CodecError` - the entry is not writable
    /// * `IoError` / `CodecError` - propagated from the codec
    pub async fn save(&self, rows: Vec<T>) -> Result<(), PipelineError> {
        match &self.inner.sink {
            Some(sink) => sink.save(rows).await,
            None => Err(PipelineError::codec_error(format!(
                "Entry '{}' does not support saving (read-only)",
                self.inner.key
            ))),
        }
    }

    /// Checks whether two handles refer to the same entry instance
    pub fn same_instance(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Produces the type-erased view of this entry
    pub fn erased(&self) -> AnyEntry {
        Arc::new(self.clone())
    }
}

impl<T> std::fmt::Debug for DatasetEntry<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatasetEntry")
            .field("key", &self.inner.key)
            .finish()
    }
}

#[async_trait]
impl<T: Send + Sync + 'static> ErasedEntry for DatasetEntry<T> {
    fn key(&self) -> &EntryKey {
        &self.inner.key
    }

    fn kind(&self) -> EntryKind {
        EntryKind::Dataset
    }

    fn capability(&self) -> Capability {
        DatasetEntry::capability(self)
    }

    fn data_type_name(&self) -> &'static str {
        std::any::type_name::<T>()
    }

    fn inspection_level(&self) -> Option<InspectionLevel> {
        self.inner.inspection
    }

    fn declared_schema(&self) -> Option<Vec<FieldSpec>> {
        self.inner.schema.clone()
    }

    fn storage(&self) -> StorageDescriptor {
        self.inner.storage.clone()
    }

    async fn exists(&self) -> bool {
        match &self.inner.source {
            Some(source) => source.exists().await,
            None => false,
        }
    }

    async fn inspect(&self, level: InspectionLevel) -> InspectionVerdict {
        match &self.inner.source {
            Some(source) => source.inspect(level).await,
            None => InspectionVerdict::NotApplicable,
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

struct ObjectEntryInner<T> {
    key: EntryKey,
    source: Option<Arc<dyn ObjectSource<T>>>,
    sink: Option<Arc<dyn ObjectSink<T>>>,
    inspection: Option<InspectionLevel>,
    schema: Option<Vec<FieldSpec>>,
    storage: StorageDescriptor,
}

impl<T> Clone for ObjectEntryInner<T> {
    fn clone(&self) -> Self {
        Self {
            key: self.key.clone(),
            source: self.source.clone(),
            sink: self.sink.clone(),
            inspection: self.inspection,
            schema: self.schema.clone(),
            storage: self.storage.clone(),
        }
    }
}

/// Typed handle to an object entry (payload `T`).
pub struct ObjectEntry<T> {
    inner: Arc<ObjectEntryInner<T>>,
}

impl<T> Clone for ObjectEntry<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T: Send + Sync + 'static> ObjectEntry<T> {
    /// Creates a readable and writable object entry from one codec
    pub fn read_write<C>(key: impl Into<String>, codec: C) -> Result<Self, PipelineError>
    where
        C: ObjectSource<T> + ObjectSink<T> + 'static,
    {
        let codec = Arc::new(codec);
        let storage = codec.storage();
        Ok(Self {
            inner: Arc::new(ObjectEntryInner {
                key: EntryKey::new(key)?,
                source: Some(codec.clone() as Arc<dyn ObjectSource<T>>),
                sink: Some(codec as Arc<dyn ObjectSink<T>>),
                inspection: None,
                schema: None,
                storage,
            }),
        })
    }

    /// Creates a readable-only object entry
    pub fn readable<C>(key: impl Into<String>, codec: C) -> Result<Self, PipelineError>
    where
        C: ObjectSource<T> + 'static,
    {
        let codec = Arc::new(codec);
        let storage = codec.storage();
        Ok(Self {
            inner: Arc::new(ObjectEntryInner {
                key: EntryKey::new(key)?,
                source: Some(codec as Arc<dyn ObjectSource<T>>),
                sink: None,
                inspection: None,
                schema: None,
                storage,
            }),
        })
    }

    /// Creates a writable-only object entry
    pub fn writable<C>(key: impl Into<String>, codec: C) -> Result<Self, PipelineError>
    where
        C: ObjectSink<T> + 'static,
    {
        Ok(Self {
            inner: Arc::new(ObjectEntryInner {
                key: EntryKey::new(key)?,
                source: None,
                sink: Some(Arc::new(codec) as Arc<dyn ObjectSink<T>>),
                inspection: None,
                schema: None,
                storage: StorageDescriptor::opaque("sink"),
            }),
        })
    }

    /// Declares the preferred inspection level for this entry
    pub fn with_inspection(mut self, level: InspectionLevel) -> Self {
        Arc::make_mut(&mut self.inner).inspection = Some(level);
        self
    }

    /// Declares the value schema exported with DAG metadata
    pub fn with_schema(mut self, fields: Vec<FieldSpec>) -> Self {
        Arc::make_mut(&mut self.inner).schema = Some(fields);
        self
    }

    /// Gets the entry key
    pub fn key(&self) -> &EntryKey {
        &self.inner.key
    }

    /// Gets the entry's capability
    pub fn capability(&self) -> Capability {
        match (&self.inner.source, &self.inner.sink) {
            (Some(_), Some(_)) => Capability::ReadWrite,
            (Some(_), None) => Capability::ReadOnly,
            _ => Capability::WriteOnly,
        }
    }

    /// Loads the value through the codec.
    ///
    /// # Errors
    ///
    /// * `CodecError` - the entry is not readable
    /// * `MissingData` / `CodecError` - propagated from the codec
    pub async fn load(&self) -> Result<T, PipelineError> {
        match &self.inner.source {
            Some(source) => match source.load().await {
                Err(PipelineError::MissingData(reason)) => Err(PipelineError::MissingData(
                    format!("entry '{}': {}", self.inner.key, reason),
                )),
                other => other,
            },
            None => Err(PipelineError::codec_error(format!(
                "Entry '{}' does not support loading (write-only)",
                self.inner.key
            ))),
        }
    }

    /// Saves the value through the codec.
    ///
    /// # Errors
    ///
    /// * `CodecError` - the entry is not writable
    /// * `IoError` / `CodecError` - propagated from the codec
    pub async fn save(&self, value: T) -> Result<(), PipelineError> {
        match &self.inner.sink {
            Some(sink) => sink.save(value).await,
            None => Err(PipelineError::codec_error(format!(
                "Entry '{}' does not support saving (read-only)",
                self.inner.key
            ))),
        }
    }

    /// Checks whether two handles refer to the same entry instance
    pub fn same_instance(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Produces the type-erased view of this entry
    pub fn erased(&self) -> AnyEntry {
        Arc::new(self.clone())
    }
}

impl<T> std::fmt::Debug for ObjectEntry<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObjectEntry")
            .field("key", &self.inner.key)
            .finish()
    }
}

#[async_trait]
impl<T: Send + Sync + 'static> ErasedEntry for ObjectEntry<T> {
    fn key(&self) -> &EntryKey {
        &self.inner.key
    }

    fn kind(&self) -> EntryKind {
        EntryKind::Object
    }

    fn capability(&self) -> Capability {
        ObjectEntry::capability(self)
    }

    fn data_type_name(&self) -> &'static str {
        std::any::type_name::<T>()
    }

    fn inspection_level(&self) -> Option<InspectionLevel> {
        self.inner.inspection
    }

    fn declared_schema(&self) -> Option<Vec<FieldSpec>> {
        self.inner.schema.clone()
    }

    fn storage(&self) -> StorageDescriptor {
        self.inner.storage.clone()
    }

    async fn exists(&self) -> bool {
        match &self.inner.source {
            Some(source) => source.exists().await,
            None => false,
        }
    }

    async fn inspect(&self, level: InspectionLevel) -> InspectionVerdict {
        match &self.inner.source {
            Some(source) => source.inspect(level).await,
            None => InspectionVerdict::NotApplicable,
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
