// /////////////////////////////////////////////////////////////////////////////
// Flowlane
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Pipeline Node
//!
//! A pipeline node is one registered transformation: a node instance plus
//! its input and output catalog maps, under a name unique within the
//! pipeline. The dependency analyzer fills in `dependencies` and `layer`
//! at build time.
//!
//! ## Type Erasure
//!
//! The pipeline holds nodes of many input/output types in one vector.
//! Registration captures the typed node and maps inside a [`NodeRunner`]
//! trait object; from that point the engine only needs the erased
//! operations (run, entry expansion, the node type's name). This is the
//! same tag-then-proceed-typed approach the catalog entries use.
//!
//! ## Execution Shape
//!
//! `run` loads every input map in registration order (mapped maps fan out
//! over their entries internally), concatenates the sequences, calls
//! `transform` once, then saves the output sequence through every output
//! map. Cancellation is checked between the suspension points through the
//! probe the executor supplies.

use async_trait::async_trait;
use std::sync::Arc;

use crate::entities::catalog_entry::AnyEntry;
use crate::entities::catalog_map::CatalogMap;
use crate::services::node::Node;
use crate::value_objects::{short_type_name, EntryKey};
use crate::PipelineError;

/// Record counts observed while running one node.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IoCounts {
    /// Total records across all loaded input sequences.
    pub input_count: u64,
    /// Total records written across all output maps.
    pub output_count: u64,
}

/// Cancellation probe handed down by the executor.
///
/// Returns `true` once the run should stop; checked between suspension
/// points.
pub type CancelProbe<'a> = dyn Fn() -> bool + Send + Sync + 'a;

/// Type-erased executable view of a registered node.
#[async_trait]
pub trait NodeRunner: Send + Sync {
    /// Loads inputs, transforms, saves outputs
    async fn run(&self, cancelled: &CancelProbe<'_>) -> Result<IoCounts, PipelineError>;
}

struct TypedNodeRunner<N: Node> {
    node: N,
    inputs: Vec<CatalogMap<N::Input>>,
    outputs: Vec<CatalogMap<N::Output>>,
}

#[async_trait]
impl<N: Node> NodeRunner for TypedNodeRunner<N> {
    async fn run(&self, cancelled: &CancelProbe<'_>) -> Result<IoCounts, PipelineError> {
        let mut sequence = Vec::new();
        for map in &self.inputs {
            let part = map.load().await?;
            if cancelled() {
                return Err(PipelineError::Cancelled("run cancelled during input load".into()));
            }
            sequence.extend(part);
        }
        let input_count = sequence.len() as u64;

        let produced = self.node.transform(sequence).await?;
        if cancelled() {
            return Err(PipelineError::Cancelled("run cancelled after transform".into()));
        }

        let mut output_count = 0u64;
        for map in &self.outputs {
            output_count += map.save(produced.clone()).await?;
            if cancelled() {
                return Err(PipelineError::Cancelled("run cancelled during output save".into()));
            }
        }

        Ok(IoCounts {
            input_count,
            output_count,
        })
    }
}

/// One registered node of a pipeline.
pub struct PipelineNode {
    name: String,
    node_type: String,
    runner: Arc<dyn NodeRunner>,
    inputs: Vec<AnyEntry>,
    outputs: Vec<AnyEntry>,
    dependencies: Vec<String>,
    layer: u32,
}

impl Clone for PipelineNode {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            node_type: self.node_type.clone(),
            runner: self.runner.clone(),
            inputs: self.inputs.clone(),
            outputs: self.outputs.clone(),
            dependencies: self.dependencies.clone(),
            layer: self.layer,
        }
    }
}

impl PipelineNode {
    /// Registers a typed node with its maps, erasing the types.
    pub fn new<N: Node>(
        name: impl Into<String>,
        node: N,
        inputs: Vec<CatalogMap<N::Input>>,
        outputs: Vec<CatalogMap<N::Output>>,
    ) -> Self {
        let input_entries = inputs.iter().flat_map(|m| m.entries()).collect();
        let output_entries = outputs.iter().flat_map(|m| m.entries()).collect();
        Self {
            name: name.into(),
            node_type: short_type_name(std::any::type_name::<N>()),
            runner: Arc::new(TypedNodeRunner {
                node,
                inputs,
                outputs,
            }),
            inputs: input_entries,
            outputs: output_entries,
            dependencies: Vec::new(),
            layer: 0,
        }
    }

    /// Gets the node's unique name within its pipeline
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Gets the short type name of the node implementation
    pub fn node_type(&self) -> &str {
        &self.node_type
    }

    /// Gets the entries every input map touches, in registration order
    pub fn input_entries(&self) -> &[AnyEntry] {
        &self.inputs
    }

    /// Gets the entries every output map touches, in registration order
    pub fn output_entries(&self) -> &[AnyEntry] {
        &self.outputs
    }

    /// Gets the input entry keys
    pub fn input_keys(&self) -> Vec<EntryKey> {
        self.inputs.iter().map(|e| e.key().clone()).collect()
    }

    /// Gets the output entry keys
    pub fn output_keys(&self) -> Vec<EntryKey> {
        self.outputs.iter().map(|e| e.key().clone()).collect()
    }

    /// Gets the names of the nodes this node depends on (set at build)
    pub fn dependencies(&self) -> &[String] {
        &self.dependencies
    }

    /// Gets the execution layer (set at build)
    pub fn layer(&self) -> u32 {
        self.layer
    }

    /// Executes the node: load inputs, transform, save outputs.
    pub async fn execute(&self, cancelled: &CancelProbe<'_>) -> Result<IoCounts, PipelineError> {
        self.runner.run(cancelled).await
    }

    pub(crate) fn set_dependencies(&mut self, dependencies: Vec<String>) {
        self.dependencies = dependencies;
    }

    pub(crate) fn set_layer(&mut self, layer: u32) {
        self.layer = layer;
    }

    pub(crate) fn renamed(&self, name: String) -> Self {
        let mut node = self.clone();
        node.name = name;
        node.dependencies = Vec::new();
        node.layer = 0;
        node
    }
}

impl std::fmt::Debug for PipelineNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PipelineNode")
            .field("name", &self.name)
            .field("node_type", &self.node_type)
            .field("inputs", &self.input_keys())
            .field("outputs", &self.output_keys())
            .field("dependencies", &self.dependencies)
            .field("layer", &self.layer)
            .finish()
    }
}
