// /////////////////////////////////////////////////////////////////////////////
// Flowlane
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Inspection Levels and Verdicts
//!
//! External inputs can be validated before any node executes. A codec
//! advertises its inspection support by answering `inspect(level)` with a
//! structured verdict; codecs that cannot inspect (the in-memory codec)
//! answer `NotApplicable`.
//!
//! ## Levels
//!
//! - **Shallow** - samples a bounded prefix of the records. Cheap, catches
//!   gross format problems.
//! - **Deep** - walks every record. Catches the malformed row in the middle
//!   of the file at the cost of a full read.
//!
//! The "no inspection" case of the catalog model is expressed as the
//! absence of a configured level on the entry, not as a third variant here.
//!
//! Inspection never mutates data.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::value_objects::EntryKey;

/// Depth of a pre-execution inspection pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum InspectionLevel {
    /// Sample a bounded prefix of the records.
    Shallow,
    /// Walk every record.
    Deep,
}

impl fmt::Display for InspectionLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InspectionLevel::Shallow => f.write_str("shallow"),
            InspectionLevel::Deep => f.write_str("deep"),
        }
    }
}

/// Structured outcome of a codec inspection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum InspectionVerdict {
    /// The data passed inspection at the requested level.
    Ok,
    /// The codec does not support inspection (e.g. in-memory storage).
    NotApplicable,
    /// The backing storage does not exist.
    FileMissing,
    /// The storage exists but is not decodable at all.
    FormatInvalid(String),
    /// The storage decodes but its shape disagrees with the declared type.
    SchemaMismatch(String),
    /// A specific record failed to decode.
    SampleRowFailed { index: u64, reason: String },
}

impl InspectionVerdict {
    /// Checks whether this verdict allows execution to proceed
    pub fn passed(&self) -> bool {
        matches!(self, InspectionVerdict::Ok | InspectionVerdict::NotApplicable)
    }
}

impl fmt::Display for InspectionVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InspectionVerdict::Ok => f.write_str("ok"),
            InspectionVerdict::NotApplicable => f.write_str("not applicable"),
            InspectionVerdict::FileMissing => f.write_str("file missing"),
            InspectionVerdict::FormatInvalid(reason) => write!(f, "format invalid: {}", reason),
            InspectionVerdict::SchemaMismatch(reason) => write!(f, "schema mismatch: {}", reason),
            InspectionVerdict::SampleRowFailed { index, reason } => {
                write!(f, "row {} failed: {}", index, reason)
            }
        }
    }
}

/// A verdict attributed to one catalog entry.
///
/// The inspector collects these for every registered external input and
/// reports all failures together in a single `ValidationError`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryVerdict {
    key: EntryKey,
    level: InspectionLevel,
    verdict: InspectionVerdict,
}

impl EntryVerdict {
    /// Creates a verdict record for an inspected entry
    pub fn new(key: EntryKey, level: InspectionLevel, verdict: InspectionVerdict) -> Self {
        Self { key, level, verdict }
    }

    /// Gets the inspected entry's key
    pub fn key(&self) -> &EntryKey {
        &self.key
    }

    /// Gets the level the inspection ran at
    pub fn level(&self) -> InspectionLevel {
        self.level
    }

    /// Gets the verdict
    pub fn verdict(&self) -> &InspectionVerdict {
        &self.verdict
    }

    /// Checks whether the entry passed
    pub fn passed(&self) -> bool {
        self.verdict.passed()
    }
}

impl fmt::Display for EntryVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} inspection): {}", self.key, self.level, self.verdict)
    }
}
