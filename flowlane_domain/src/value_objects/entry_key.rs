// /////////////////////////////////////////////////////////////////////////////
// Flowlane
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Entry Key Value Object
//!
//! `EntryKey` identifies a catalog entry within one catalog instance. Keys
//! are validated at construction and never change afterwards, which is what
//! lets the rest of the engine treat them as stable identity: the producer
//! map, the dependency analyzer, and the DAG metadata all index by key.
//!
//! ## Validation Rules
//!
//! - Non-empty
//! - First character: ASCII letter or underscore
//! - Remaining characters: ASCII letters, digits, `_`, `.`, `-`
//!
//! ## Reserved Keys
//!
//! Keys with the `_nodata` prefix name discarded sinks for side-effect
//! nodes. The dependency analyzer skips them entirely, so they never create
//! producer/consumer edges.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::PipelineError;

/// Prefix marking entries the dependency analyzer must ignore.
pub const RESERVED_KEY_PREFIX: &str = "_nodata";

static KEY_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_.\-]*$").expect("valid entry key pattern"));

/// Validated identifier for a catalog entry.
///
/// Construction is the only place validation happens; once built, the key
/// is immutable for the entry's lifetime.
///
/// # Examples
///
/// ```
/// use flowlane_domain::value_objects::EntryKey;
///
/// let key = EntryKey::new("raw_orders").unwrap();
/// assert_eq!(key.as_str(), "raw_orders");
/// assert!(!key.is_reserved());
///
/// let sink = EntryKey::new("_nodata_audit").unwrap();
/// assert!(sink.is_reserved());
///
/// assert!(EntryKey::new("").is_err());
/// assert!(EntryKey::new("no spaces").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryKey(String);

impl EntryKey {
    /// Creates a validated entry key.
    ///
    /// # Errors
    ///
    /// Returns `BuildError` when the key is empty or contains characters
    /// outside the allowed set.
    pub fn new(key: impl Into<String>) -> Result<Self, PipelineError> {
        let key = key.into();
        if key.is_empty() {
            return Err(PipelineError::build_error("Catalog entry key cannot be empty"));
        }
        if !KEY_PATTERN.is_match(&key) {
            return Err(PipelineError::build_error(format!(
                "Catalog entry key '{}' contains invalid characters (allowed: letters, digits, '_', '.', '-')",
                key
            )));
        }
        Ok(Self(key))
    }

    /// Gets the key as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Checks whether the key carries the reserved `_nodata` prefix
    pub fn is_reserved(&self) -> bool {
        self.0.starts_with(RESERVED_KEY_PREFIX)
    }
}

impl fmt::Display for EntryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for EntryKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
