// /////////////////////////////////////////////////////////////////////////////
// Flowlane
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Entry Capability
//!
//! A catalog entry's capability is a static property derived from the codec
//! halves it was constructed with. The pipeline builder uses it to refuse
//! impossible wirings (an output bound to a read-only entry) before any
//! node runs; the codec layer enforces the same rule again at run time.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Read/write capability of a catalog entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Capability {
    /// Entry can only be loaded; wiring it as an output is a build error.
    ReadOnly,
    /// Entry can only be saved; wiring it as an input is a build error.
    WriteOnly,
    /// Entry supports both load and save.
    ReadWrite,
}

impl Capability {
    /// Checks whether loads are permitted
    pub fn can_read(&self) -> bool {
        matches!(self, Capability::ReadOnly | Capability::ReadWrite)
    }

    /// Checks whether saves are permitted
    pub fn can_write(&self) -> bool {
        matches!(self, Capability::WriteOnly | Capability::ReadWrite)
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Capability::ReadOnly => "read-only",
            Capability::WriteOnly => "write-only",
            Capability::ReadWrite => "read-write",
        };
        f.write_str(label)
    }
}

/// Kind of payload a catalog entry holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EntryKind {
    /// A lazy, finite sequence of rows.
    Dataset,
    /// A single value.
    Object,
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntryKind::Dataset => f.write_str("dataset"),
            EntryKind::Object => f.write_str("object"),
        }
    }
}
