// /////////////////////////////////////////////////////////////////////////////
// Flowlane
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Catalog
//!
//! The catalog is the registry of every named data handle a run can touch.
//! It is populated once, before the pipeline is built, and its entries stay
//! live for the duration of the run; in-memory entries are simply dropped
//! with the catalog afterwards.
//!
//! ## Identity Caching
//!
//! The source system declared entries as reflective accessors that memoized
//! the created instance. Here the registry is explicit: entries are
//! registered under their key and every typed accessor returns a clone of
//! the *same* shared handle, so repeated lookups observe one entry
//! instance per key without any reflection.
//!
//! ## Typed Access
//!
//! `dataset::<T>(key)` / `object::<T>(key)` check the stored type tag once
//! (via downcast) and hand back the statically-typed handle. A lookup with
//! the wrong payload type is a build error naming both types.

use std::collections::HashMap;

use crate::entities::catalog_entry::{AnyEntry, DatasetEntry, ObjectEntry};
use crate::value_objects::EntryKey;
use crate::PipelineError;

/// Registry of catalog entries for one run.
#[derive(Default)]
pub struct Catalog {
    entries: HashMap<EntryKey, AnyEntry>,
    order: Vec<EntryKey>,
}

impl Catalog {
    /// Creates an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a dataset entry.
    ///
    /// # Errors
    ///
    /// Returns `BuildError` when the key is already registered.
    pub fn add_dataset<T: Send + Sync + 'static>(
        &mut self,
        entry: DatasetEntry<T>,
    ) -> Result<(), PipelineError> {
        self.insert(entry.key().clone(), entry.erased())
    }

    /// Registers an object entry.
    ///
    /// # Errors
    ///
    /// Returns `BuildError` when the key is already registered.
    pub fn add_object<T: Send + Sync + 'static>(
        &mut self,
        entry: ObjectEntry<T>,
    ) -> Result<(), PipelineError> {
        self.insert(entry.key().clone(), entry.erased())
    }

    fn insert(&mut self, key: EntryKey, entry: AnyEntry) -> Result<(), PipelineError> {
        if self.entries.contains_key(&key) {
            return Err(PipelineError::build_error(format!(
                "Catalog entry '{}' is already registered",
                key
            )));
        }
        self.order.push(key.clone());
        self.entries.insert(key, entry);
        Ok(())
    }

    /// Gets the typed dataset handle registered under `key`.
    ///
    /// Every call returns the same entry instance (identity caching).
    ///
    /// # Errors
    ///
    /// * `BuildError` - no entry under `key`
    /// * `BuildError` - the entry's payload type is not `Vec<T>`
    pub fn dataset<T: Send + Sync + 'static>(
        &self,
        key: &str,
    ) -> Result<DatasetEntry<T>, PipelineError> {
        let entry = self.lookup(key)?;
        entry
            .as_any()
            .downcast_ref::<DatasetEntry<T>>()
            .cloned()
            .ok_or_else(|| {
                PipelineError::build_error(format!(
                    "Catalog entry '{}' holds {} of {}, not a dataset of {}",
                    key,
                    entry.kind(),
                    entry.data_type_name(),
                    std::any::type_name::<T>()
                ))
            })
    }

    /// Gets the typed object handle registered under `key`.
    ///
    /// # Errors
    ///
    /// * `BuildError` - no entry under `key`
    /// * `BuildError` - the entry's payload type is not `T`
    pub fn object<T: Send + Sync + 'static>(
        &self,
        key: &str,
    ) -> Result<ObjectEntry<T>, PipelineError> {
        let entry = self.lookup(key)?;
        entry
            .as_any()
            .downcast_ref::<ObjectEntry<T>>()
            .cloned()
            .ok_or_else(|| {
                PipelineError::build_error(format!(
                    "Catalog entry '{}' holds {} of {}, not an object of {}",
                    key,
                    entry.kind(),
                    entry.data_type_name(),
                    std::any::type_name::<T>()
                ))
            })
    }

    fn lookup(&self, key: &str) -> Result<&AnyEntry, PipelineError> {
        let key = EntryKey::new(key)?;
        self.entries
            .get(&key)
            .ok_or_else(|| PipelineError::build_error(format!("Catalog has no entry '{}'", key)))
    }

    /// Gets the erased entry under `key`, if any
    pub fn get(&self, key: &EntryKey) -> Option<AnyEntry> {
        self.entries.get(key).cloned()
    }

    /// Checks whether a key is registered
    pub fn contains(&self, key: &EntryKey) -> bool {
        self.entries.contains_key(key)
    }

    /// Iterates entries in registration order
    pub fn entries(&self) -> impl Iterator<Item = AnyEntry> + '_ {
        self.order.iter().filter_map(|key| self.entries.get(key).cloned())
    }

    /// Gets the number of registered entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Checks whether the catalog is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
