// /////////////////////////////////////////////////////////////////////////////
// Flowlane
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Catalog Maps
//!
//! A catalog map binds a node's input or output position to the catalog.
//! It comes in two modes:
//!
//! - **Pass-through** wraps a single entry. Loading yields the dataset (or
//!   the object wrapped as a one-element sequence); saving writes the
//!   sequence back. This is the mode bulk data flows through.
//! - **Mapped** connects the named fields of a structural schema to
//!   individual entries and/or literal parameter values. Loading fans out
//!   over all entry-bound fields concurrently, joins, synthesizes exactly
//!   one schema instance, and returns it as a **singleton sequence**.
//!   Mapped inputs are coordination objects, not bulk data - the engine
//!   never vectorizes them.
//!
//! Parameter bindings are only meaningful in input position; saving
//! through a map that holds any fails with `InvalidOutputMap`.
//!
//! ## Field Descriptors
//!
//! The source system selected schema properties with expression-tree
//! lambdas. Here a schema declares [`SchemaField`] constants - one
//! `{name, get, set}` descriptor per field - and implements
//! [`MappedSchema`] to enumerate its fields for build-time completeness
//! validation. The getter returns `Option<V>`: an absent value at save
//! time skips that entry's save with a warning instead of failing.
//!
//! ## Example
//!
//! ```
//! use flowlane_domain::entities::{CatalogMap, SchemaField};
//! use flowlane_domain::entities::MappedSchema;
//! use flowlane_domain::value_objects::FieldSpec;
//!
//! #[derive(Default)]
//! struct JoinInputs {
//!     left: Vec<i64>,
//!     cutoff: i64,
//! }
//!
//! impl JoinInputs {
//!     const LEFT: SchemaField<Self, Vec<i64>> =
//!         SchemaField::new("left", |s| Some(s.left.clone()), |s, v| s.left = v);
//!     const CUTOFF: SchemaField<Self, i64> =
//!         SchemaField::new("cutoff", |s| Some(s.cutoff), |s, v| s.cutoff = v);
//! }
//!
//! impl MappedSchema for JoinInputs {
//!     fn schema_name() -> &'static str {
//!         "JoinInputs"
//!     }
//!
//!     fn fields() -> Vec<FieldSpec> {
//!         vec![
//!             FieldSpec::required("left", "Vec<i64>"),
//!             FieldSpec::required("cutoff", "i64"),
//!         ]
//!     }
//! }
//!
//! let mut map = CatalogMap::<JoinInputs>::mapped();
//! map.bind_value(JoinInputs::CUTOFF, 10).unwrap();
//! // JoinInputs::LEFT stays unbound here; build-time validation would
//! // report it as an incomplete mapping.
//! assert!(map.validate_required().is_err());
//! ```

use async_trait::async_trait;
use futures::future::try_join_all;
use std::sync::Arc;
use tracing::warn;

use crate::entities::catalog_entry::{AnyEntry, DatasetEntry, ObjectEntry};
use crate::value_objects::FieldSpec;
use crate::PipelineError;

/// Structural schema usable in mapped mode.
///
/// `Default` provides the blank instance bindings are applied to;
/// `fields()` enumerates the schema for completeness validation and DAG
/// metadata.
pub trait MappedSchema: Default + Send + Sync + 'static {
    /// Gets the schema's display name
    fn schema_name() -> &'static str;

    /// Enumerates the schema's fields
    fn fields() -> Vec<FieldSpec>;
}

/// Const-constructible descriptor for one field of a schema.
///
/// Replaces runtime property selectors: `get` extracts the field's value
/// (returning `None` when absent), `set` writes it.
pub struct SchemaField<S, V> {
    name: &'static str,
    get: fn(&S) -> Option<V>,
    set: fn(&mut S, V),
}

impl<S, V> SchemaField<S, V> {
    /// Creates a field descriptor
    pub const fn new(name: &'static str, get: fn(&S) -> Option<V>, set: fn(&mut S, V)) -> Self {
        Self { name, get, set }
    }

    /// Gets the field name
    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl<S, V> Clone for SchemaField<S, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<S, V> Copy for SchemaField<S, V> {}

/// Catalog entry bindable to a schema field carrying payload `V`.
///
/// Dataset entries bind fields of type `Vec<T>`; object entries bind
/// fields of type `T`. The compiler enforces the exact-type-match rule of
/// the catalog model: there is no way to bind a field to an entry with a
/// different payload type.
#[async_trait]
pub trait BoundEntry<V>: Send + Sync {
    /// Gets the erased entry for dependency analysis and metadata
    fn descriptor(&self) -> AnyEntry;

    /// Loads the entry's payload
    async fn load_payload(&self) -> Result<V, PipelineError>;

    /// Saves the payload, returning the number of records written
    async fn save_payload(&self, value: V) -> Result<u64, PipelineError>;
}

#[async_trait]
impl<T: Send + Sync + 'static> BoundEntry<Vec<T>> for DatasetEntry<T> {
    fn descriptor(&self) -> AnyEntry {
        self.erased()
    }

    async fn load_payload(&self) -> Result<Vec<T>, PipelineError> {
        self.load().await
    }

    async fn save_payload(&self, value: Vec<T>) -> Result<u64, PipelineError> {
        let count = value.len() as u64;
        self.save(value).await?;
        Ok(count)
    }
}

#[async_trait]
impl<T: Send + Sync + 'static> BoundEntry<T> for ObjectEntry<T> {
    fn descriptor(&self) -> AnyEntry {
        self.erased()
    }

    async fn load_payload(&self) -> Result<T, PipelineError> {
        self.load().await
    }

    async fn save_payload(&self, value: T) -> Result<u64, PipelineError> {
        self.save(value).await?;
        Ok(1)
    }
}

type FieldSetter<S> = Box<dyn FnOnce(&mut S) + Send>;

#[async_trait]
trait BoundLoad<S>: Send + Sync {
    async fn load(&self) -> Result<FieldSetter<S>, PipelineError>;
}

enum SaveOutcome {
    Saved(u64),
    Skipped,
}

#[async_trait]
trait BoundSave<S>: Send + Sync {
    async fn save(&self, value: &S) -> Result<SaveOutcome, PipelineError>;
}

struct EntryFieldBinding<S, V, E> {
    field: SchemaField<S, V>,
    entry: E,
}

#[async_trait]
impl<S, V, E> BoundLoad<S> for EntryFieldBinding<S, V, E>
where
    S: Send + Sync + 'static,
    V: Send + Sync + 'static,
    E: BoundEntry<V>,
{
    async fn load(&self) -> Result<FieldSetter<S>, PipelineError> {
        let value = self.entry.load_payload().await?;
        let set = self.field.set;
        Ok(Box::new(move |target| set(target, value)))
    }
}

#[async_trait]
impl<S, V, E> BoundSave<S> for EntryFieldBinding<S, V, E>
where
    S: Send + Sync + 'static,
    V: Send + Sync + 'static,
    E: BoundEntry<V>,
{
    async fn save(&self, value: &S) -> Result<SaveOutcome, PipelineError> {
        match (self.field.get)(value) {
            Some(payload) => self.entry.save_payload(payload).await.map(SaveOutcome::Saved),
            None => Ok(SaveOutcome::Skipped),
        }
    }
}

struct ParamFieldBinding<S, V> {
    field: SchemaField<S, V>,
    value: V,
}

#[async_trait]
impl<S, V> BoundLoad<S> for ParamFieldBinding<S, V>
where
    S: Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    async fn load(&self) -> Result<FieldSetter<S>, PipelineError> {
        let value = self.value.clone();
        let set = self.field.set;
        Ok(Box::new(move |target| set(target, value)))
    }
}

struct FieldBinding<S> {
    field_name: &'static str,
    entry: Option<AnyEntry>,
    loader: Arc<dyn BoundLoad<S>>,
    saver: Option<Arc<dyn BoundSave<S>>>,
}

enum MapMode<S> {
    DatasetPassThrough(DatasetEntry<S>),
    ObjectPassThrough(ObjectEntry<S>),
    Mapped {
        factory: fn() -> S,
        schema_name: &'static str,
        schema_fields: Vec<FieldSpec>,
        bindings: Vec<FieldBinding<S>>,
    },
}

/// Binding between a node's input/output position and the catalog.
pub struct CatalogMap<S> {
    mode: MapMode<S>,
}

impl<S> std::fmt::Debug for CatalogMap<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mode = match &self.mode {
            MapMode::DatasetPassThrough(_) => "DatasetPassThrough",
            MapMode::ObjectPassThrough(_) => "ObjectPassThrough",
            MapMode::Mapped { .. } => "Mapped",
        };
        f.debug_struct("CatalogMap").field("mode", &mode).finish()
    }
}

impl<S: Send + Sync + 'static> CatalogMap<S> {
    /// Creates a pass-through map over a dataset entry
    pub fn dataset(entry: DatasetEntry<S>) -> Self {
        Self {
            mode: MapMode::DatasetPassThrough(entry),
        }
    }

    /// Creates a pass-through map over an object entry
    pub fn object(entry: ObjectEntry<S>) -> Self {
        Self {
            mode: MapMode::ObjectPassThrough(entry),
        }
    }

    /// Creates an empty mapped-mode map for schema `S`
    pub fn mapped() -> Self
    where
        S: MappedSchema,
    {
        Self {
            mode: MapMode::Mapped {
                factory: S::default,
                schema_name: S::schema_name(),
                schema_fields: S::fields(),
                bindings: Vec::new(),
            },
        }
    }

    /// Binds a schema field to a catalog entry (bidirectional).
    ///
    /// In input position the field is populated from the entry's load; in
    /// output position the field's value is extracted and saved to the
    /// entry.
    ///
    /// # Errors
    ///
    /// * `BuildError` - the map is pass-through, the field is not part of
    ///   the schema, or the field is already bound
    pub fn bind<V, E>(&mut self, field: SchemaField<S, V>, entry: E) -> Result<&mut Self, PipelineError>
    where
        V: Send + Sync + 'static,
        E: BoundEntry<V> + 'static,
    {
        let descriptor = entry.descriptor();
        let binding = Arc::new(EntryFieldBinding { field, entry });
        self.push_binding(FieldBinding {
            field_name: field.name,
            entry: Some(descriptor),
            loader: binding.clone(),
            saver: Some(binding),
        })
    }

    /// Binds a schema field to a literal parameter value.
    ///
    /// Valid only in input position; a map holding parameter bindings
    /// fails `save` with `InvalidOutputMap`.
    ///
    /// # Errors
    ///
    /// * `BuildError` - the map is pass-through, the field is not part of
    ///   the schema, or the field is already bound
    pub fn bind_value<V>(&mut self, field: SchemaField<S, V>, value: V) -> Result<&mut Self, PipelineError>
    where
        V: Clone + Send + Sync + 'static,
    {
        self.push_binding(FieldBinding {
            field_name: field.name,
            entry: None,
            loader: Arc::new(ParamFieldBinding { field, value }),
            saver: None,
        })
    }

    fn push_binding(&mut self, binding: FieldBinding<S>) -> Result<&mut Self, PipelineError> {
        match &mut self.mode {
            MapMode::Mapped {
                schema_name,
                schema_fields,
                bindings,
                ..
            } => {
                if !schema_fields.iter().any(|f| f.name() == binding.field_name) {
                    return Err(PipelineError::build_error(format!(
                        "Schema '{}' has no field '{}'",
                        schema_name, binding.field_name
                    )));
                }
                if bindings.iter().any(|b| b.field_name == binding.field_name) {
                    return Err(PipelineError::build_error(format!(
                        "Field '{}' of schema '{}' is already bound",
                        binding.field_name, schema_name
                    )));
                }
                bindings.push(binding);
                Ok(self)
            }
            _ => Err(PipelineError::build_error(
                "Field bindings are only valid on mapped-mode catalog maps",
            )),
        }
    }

    /// Checks whether the map is in mapped mode
    pub fn is_mapped(&self) -> bool {
        matches!(self.mode, MapMode::Mapped { .. })
    }

    /// Checks whether any binding is a parameter binding
    pub fn has_parameter_bindings(&self) -> bool {
        match &self.mode {
            MapMode::Mapped { bindings, .. } => bindings.iter().any(|b| b.entry.is_none()),
            _ => false,
        }
    }

    /// Gets the erased entries this map touches, in binding order.
    ///
    /// The dependency analyzer sees exactly the entries the executor will
    /// load or save through this map; parameter bindings contribute none.
    pub fn entries(&self) -> Vec<AnyEntry> {
        match &self.mode {
            MapMode::DatasetPassThrough(entry) => vec![entry.erased()],
            MapMode::ObjectPassThrough(entry) => vec![entry.erased()],
            MapMode::Mapped { bindings, .. } => {
                bindings.iter().filter_map(|b| b.entry.clone()).collect()
            }
        }
    }

    /// Validates that every required schema field is bound.
    ///
    /// Pass-through maps are trivially complete.
    ///
    /// # Errors
    ///
    /// Returns `BuildError` listing *all* unmapped required fields.
    pub fn validate_required(&self) -> Result<(), PipelineError> {
        let MapMode::Mapped {
            schema_name,
            schema_fields,
            bindings,
            ..
        } = &self.mode
        else {
            return Ok(());
        };

        let unmapped: Vec<&str> = schema_fields
            .iter()
            .filter(|f| f.is_required())
            .filter(|f| !bindings.iter().any(|b| b.field_name == f.name()))
            .map(|f| f.name())
            .collect();

        if unmapped.is_empty() {
            Ok(())
        } else {
            Err(PipelineError::build_error(format!(
                "Incomplete mapping for schema '{}': required fields not mapped: {}",
                schema_name,
                unmapped.join(", ")
            )))
        }
    }

    /// Loads the map's value sequence.
    ///
    /// Pass-through dataset: the dataset itself. Pass-through object: the
    /// value as a one-element sequence. Mapped: all entry-bound fields
    /// load concurrently, then exactly one synthesized instance is
    /// returned as a singleton sequence.
    pub async fn load(&self) -> Result<Vec<S>, PipelineError> {
        match &self.mode {
            MapMode::DatasetPassThrough(entry) => entry.load().await,
            MapMode::ObjectPassThrough(entry) => Ok(vec![entry.load().await?]),
            MapMode::Mapped {
                factory, bindings, ..
            } => {
                let setters =
                    try_join_all(bindings.iter().map(|binding| binding.loader.load())).await?;
                let mut instance = factory();
                for setter in setters {
                    setter(&mut instance);
                }
                Ok(vec![instance])
            }
        }
    }

    /// Saves the node's output sequence through the map, returning the
    /// number of records written.
    ///
    /// Pass-through dataset: the whole sequence. Pass-through object and
    /// mapped maps follow the singleton convention and expect exactly one
    /// value. Mapped saves extract each entry-bound field; absent field
    /// values skip the corresponding save with a warning.
    ///
    /// # Errors
    ///
    /// * `InvalidOutputMap` - the map holds parameter bindings
    /// * `CodecError` - output arity violates the singleton convention
    pub async fn save(&self, values: Vec<S>) -> Result<u64, PipelineError> {
        match &self.mode {
            MapMode::DatasetPassThrough(entry) => {
                let count = values.len() as u64;
                entry.save(values).await?;
                Ok(count)
            }
            MapMode::ObjectPassThrough(entry) => {
                let mut values = values;
                match (values.pop(), values.is_empty()) {
                    (Some(value), true) => {
                        entry.save(value).await?;
                        Ok(1)
                    }
                    _ => Err(PipelineError::codec_error(format!(
                        "Object entry '{}' expects exactly one output value",
                        entry.key()
                    ))),
                }
            }
            MapMode::Mapped {
                schema_name,
                bindings,
                ..
            } => {
                let params: Vec<&str> = bindings
                    .iter()
                    .filter(|b| b.entry.is_none())
                    .map(|b| b.field_name)
                    .collect();
                if !params.is_empty() {
                    return Err(PipelineError::InvalidOutputMap(format!(
                        "Map for schema '{}' holds parameter bindings ({}) and cannot be used as an output",
                        schema_name,
                        params.join(", ")
                    )));
                }

                let mut values = values;
                let (Some(instance), true) = (values.pop(), values.is_empty()) else {
                    return Err(PipelineError::codec_error(format!(
                        "Mapped output for schema '{}' expects exactly one instance",
                        schema_name
                    )));
                };

                let mut written = 0u64;
                for binding in bindings {
                    let Some(saver) = &binding.saver else { continue };
                    match saver.save(&instance).await? {
                        SaveOutcome::Saved(count) => written += count,
                        SaveOutcome::Skipped => {
                            let key = binding
                                .entry
                                .as_ref()
                                .map(|e| e.key().to_string())
                                .unwrap_or_default();
                            warn!(
                                field = binding.field_name,
                                entry = %key,
                                "output field has no value; skipping save"
                            );
                        }
                    }
                }
                Ok(written)
            }
        }
    }
}

impl<T: Send + Sync + 'static> From<DatasetEntry<T>> for CatalogMap<T> {
    fn from(entry: DatasetEntry<T>) -> Self {
        CatalogMap::dataset(entry)
    }
}

impl<T: Send + Sync + 'static> From<ObjectEntry<T>> for CatalogMap<T> {
    fn from(entry: ObjectEntry<T>) -> Self {
        CatalogMap::object(entry)
    }
}
