// /////////////////////////////////////////////////////////////////////////////
// Flowlane
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

// Production code safety enforced via CI and `make lint-strict`
// (lib/bins checked separately from tests - tests may use unwrap/expect)

//! # Flowlane Domain
//!
//! Pure domain layer of the flowlane data-pipeline engine: a declarative,
//! statically-typed pipeline model in the Kedro lineage. A user declares a
//! **catalog** (named, typed handles to persisted or in-memory data) and a
//! **pipeline** (nodes, each a pure transformation from named inputs to
//! named outputs); the engine resolves the declaration into a DAG with
//! layered execution order.
//!
//! ## Core Concepts
//!
//! ### Catalog
//! A registry of typed data handles. Each entry is a dataset (a finite
//! sequence of rows) or an object (a single value), with read/write
//! capability derived from the codec halves it was built from. Repeated
//! lookups return the same entry instance.
//!
//! ### Nodes
//! Pure transformations `Vec<Input> -> Vec<Output>`, stateless across
//! invocations, with input/output/parameter types exposed as associated
//! types.
//!
//! ### Catalog Maps
//! The binding layer between nodes and the catalog. Pass-through maps wrap
//! a single entry; mapped maps connect the named fields of a structural
//! schema to entries and literal parameter values, loading concurrently
//! and synthesizing a singleton schema instance.
//!
//! ### Build-Time Analysis
//! `PipelineBuilder::build()` derives the producer map, rejects multiple
//! producers and cycles, and assigns every node a layer such that all of
//! its dependencies live in strictly lower layers.
//!
//! ### DAG Metadata
//! A built pipeline exports a structural snapshot (nodes, entries, edges)
//! as round-trippable camelCase JSON.
//!
//! ## Layer Boundaries
//!
//! This crate owns no runtime: codec traits and maps are async because
//! they model I/O, but scheduling, concrete codecs, inspection
//! orchestration, and reporting live in the application crate.

pub mod aggregates;
pub mod entities;
pub mod error;
pub mod services;
pub mod value_objects;

pub use error::PipelineError;

pub use aggregates::{Catalog, Pipeline, PipelineBuilder};
pub use entities::{
    AnyEntry, CatalogMap, DatasetEntry, MappedSchema, NodeExecution, ObjectEntry,
    PipelineExecution, PipelineNode, SchemaField,
};
pub use services::{DagSnapshot, Node};
