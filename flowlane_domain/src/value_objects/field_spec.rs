// /////////////////////////////////////////////////////////////////////////////
// Flowlane
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Field Descriptors
//!
//! `FieldSpec` describes one named field of a structural schema: its type
//! name, whether a mapping for it is required, and whether its value may be
//! absent. It serves two roles:
//!
//! - enumeration of a mapped schema's fields for build-time completeness
//!   validation (`MappedSchema::fields`), and
//! - the `schema.fields` list in exported DAG metadata.
//!
//! There is no runtime reflection here; schemas declare their own field
//! lists as constants.

use serde::{Deserialize, Serialize};

/// Description of one field of a structural schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldSpec {
    name: String,
    #[serde(rename = "type")]
    type_name: String,
    required: bool,
    is_nullable: bool,
}

impl FieldSpec {
    /// Creates a required, non-nullable field description
    pub fn required(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            required: true,
            is_nullable: false,
        }
    }

    /// Creates an optional field description whose value may be absent
    pub fn optional(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            required: false,
            is_nullable: true,
        }
    }

    /// Gets the field name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Gets the logical type name of the field's payload
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Checks whether a mapping for this field must exist at build time
    pub fn is_required(&self) -> bool {
        self.required
    }

    /// Checks whether the field's value may be absent at save time
    pub fn is_nullable(&self) -> bool {
        self.is_nullable
    }
}

/// Shortens a `std::any::type_name` to its final path segments.
///
/// `alloc::vec::Vec<my_crate::schema::OrderRow>` becomes `Vec<OrderRow>`.
/// Used for node type names and entry data-type names in DAG metadata.
pub fn short_type_name(full: &str) -> String {
    let mut out = String::with_capacity(full.len());
    let mut segment = String::new();
    for ch in full.chars() {
        match ch {
            ':' => segment.clear(),
            '<' | '>' | ',' | ' ' | '(' | ')' | '[' | ']' | ';' | '&' => {
                out.push_str(&segment);
                segment.clear();
                out.push(ch);
            }
            _ => segment.push(ch),
        }
    }
    out.push_str(&segment);
    out
}
