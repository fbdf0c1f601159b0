// /////////////////////////////////////////////////////////////////////////////
// Flowlane
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Domain services and contracts: the codec traits, the node trait, the
//! dependency analyzer, and DAG metadata extraction.

pub mod codec;
pub mod dag_metadata;
pub mod dependency_analyzer;
pub mod node;

pub use codec::{DatasetSink, DatasetSource, ObjectSink, ObjectSource, StorageDescriptor};
pub use dag_metadata::{DagEdge, DagEntry, DagEntryFields, DagNode, DagSchema, DagSnapshot};
pub use node::Node;
