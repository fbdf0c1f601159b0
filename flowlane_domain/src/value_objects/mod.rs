// /////////////////////////////////////////////////////////////////////////////
// Flowlane
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Value objects shared across the flowlane domain: validated identifiers,
//! capabilities, inspection verdicts, and schema field descriptors.

pub mod capability;
pub mod entry_key;
pub mod field_spec;
pub mod inspection;
pub mod run_id;

pub use capability::{Capability, EntryKind};
pub use entry_key::{EntryKey, RESERVED_KEY_PREFIX};
pub use field_spec::{short_type_name, FieldSpec};
pub use inspection::{EntryVerdict, InspectionLevel, InspectionVerdict};
pub use run_id::RunId;
