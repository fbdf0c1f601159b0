// /////////////////////////////////////////////////////////////////////////////
// Flowlane
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! DAG metadata export: JSON artifacts and Mermaid diagrams.

pub mod dag_exporter;
pub mod mermaid;

pub use dag_exporter::{DagExporter, DEFAULT_TIMESTAMP_FORMAT};
pub use mermaid::render_mermaid;
