// /////////////////////////////////////////////////////////////////////////////
// Flowlane
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Pipeline Aggregate
//!
//! `PipelineBuilder` accumulates node registrations and validates each one
//! immediately; `build()` runs the dependency analyzer and freezes the
//! result into a `Pipeline`. The source system tracked an `is_built` flag;
//! here the flag is the type system - a `Pipeline` only exists built, and
//! nothing on it mutates the node set.
//!
//! ## Registration Validation
//!
//! `add_node` rejects, at the moment of registration:
//!
//! - an empty or duplicate node name,
//! - a mapped input/output map with unmapped required fields
//!   (*incomplete-mapping*, listing all of them),
//! - an input wired to an entry that cannot be read,
//! - an output wired to an entry that cannot be written.
//!
//! Input/output *type* agreement is not a runtime check: the signature of
//! `add_node` ties the maps to the node's associated types, so a mismatch
//! does not compile.
//!
//! ## Merging
//!
//! `Pipeline::merge` combines built pipelines into one, renaming each node
//! `Origin.NodeName` and re-running the analyzer over the union, so
//! cross-pipeline producer conflicts and cycles surface exactly like
//! intra-pipeline ones. The DAG metadata extractor later splits the name
//! on the first dot to recover the origin pipeline.

use std::collections::HashSet;

use crate::entities::catalog_entry::AnyEntry;
use crate::entities::catalog_map::CatalogMap;
use crate::entities::pipeline_node::PipelineNode;
use crate::services::dependency_analyzer;
use crate::services::node::Node;
use crate::value_objects::EntryKey;
use crate::PipelineError;

/// Accumulates and validates node registrations for one pipeline.
#[derive(Debug)]
pub struct PipelineBuilder {
    name: String,
    description: Option<String>,
    tags: Vec<String>,
    nodes: Vec<PipelineNode>,
}

impl PipelineBuilder {
    /// Creates a builder for a named pipeline
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            tags: Vec::new(),
            nodes: Vec::new(),
        }
    }

    /// Sets the pipeline description
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Adds a tag
    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    /// Registers a node with its input and output maps.
    ///
    /// Single entries convert into pass-through maps via `Into`, so the
    /// common linear case reads
    /// `builder.add_node("double", Double, vec![a.into()], vec![b.into()])`.
    ///
    /// # Errors
    ///
    /// * `BuildError` - empty/duplicate name, incomplete mapping, or an
    ///   unreadable input / unwritable output entry
    pub fn add_node<N: Node>(
        &mut self,
        name: impl Into<String>,
        node: N,
        inputs: Vec<CatalogMap<N::Input>>,
        outputs: Vec<CatalogMap<N::Output>>,
    ) -> Result<&mut Self, PipelineError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(PipelineError::build_error("Node name cannot be empty"));
        }
        if self.nodes.iter().any(|n| n.name() == name) {
            return Err(PipelineError::build_error(format!(
                "Node '{}' is already registered in pipeline '{}'",
                name, self.name
            )));
        }

        for map in &inputs {
            map.validate_required()?;
            for entry in map.entries() {
                if !entry.capability().can_read() {
                    return Err(PipelineError::build_error(format!(
                        "Node '{}' reads entry '{}', which is {}",
                        name,
                        entry.key(),
                        entry.capability()
                    )));
                }
            }
        }
        for map in &outputs {
            map.validate_required()?;
            for entry in map.entries() {
                if !entry.capability().can_write() {
                    return Err(PipelineError::build_error(format!(
                        "Node '{}' writes entry '{}', which is {}",
                        name,
                        entry.key(),
                        entry.capability()
                    )));
                }
            }
        }

        self.nodes.push(PipelineNode::new(name, node, inputs, outputs));
        Ok(self)
    }

    /// Registers a node after injecting its parameters.
    ///
    /// # Errors
    ///
    /// Same as [`add_node`](Self::add_node).
    pub fn add_node_with_params<N: Node>(
        &mut self,
        name: impl Into<String>,
        mut node: N,
        params: N::Params,
        inputs: Vec<CatalogMap<N::Input>>,
        outputs: Vec<CatalogMap<N::Output>>,
    ) -> Result<&mut Self, PipelineError> {
        node.set_params(params);
        self.add_node(name, node, inputs, outputs)
    }

    /// Freezes the pipeline: runs dependency analysis and layering.
    ///
    /// # Errors
    ///
    /// * `BuildError` - multiple producers or circular dependencies
    pub fn build(mut self) -> Result<Pipeline, PipelineError> {
        dependency_analyzer::analyze(&mut self.nodes)?;
        Ok(Pipeline {
            name: self.name,
            description: self.description,
            tags: self.tags,
            nodes: self.nodes,
        })
    }
}

/// A built, frozen pipeline.
///
/// Every node carries its dependencies and layer; the node set and wiring
/// cannot change anymore.
#[derive(Clone, Debug)]
pub struct Pipeline {
    name: String,
    description: Option<String>,
    tags: Vec<String>,
    nodes: Vec<PipelineNode>,
}

impl Pipeline {
    /// Gets the pipeline name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Gets the description, if one was set
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Gets the tags
    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    /// Gets the nodes in registration order
    pub fn nodes(&self) -> &[PipelineNode] {
        &self.nodes
    }

    /// Gets a node by name
    pub fn node(&self, name: &str) -> Option<&PipelineNode> {
        self.nodes.iter().find(|n| n.name() == name)
    }

    /// Gets the number of execution layers
    pub fn layer_count(&self) -> u32 {
        self.nodes.iter().map(|n| n.layer() + 1).max().unwrap_or(0)
    }

    /// Gets every non-reserved entry any node touches, first occurrence
    /// order, one instance per key.
    pub fn entries(&self) -> Vec<AnyEntry> {
        let mut seen: HashSet<EntryKey> = HashSet::new();
        let mut out = Vec::new();
        for node in &self.nodes {
            for entry in node.input_entries().iter().chain(node.output_entries()) {
                if entry.key().is_reserved() || !seen.insert(entry.key().clone()) {
                    continue;
                }
                out.push(entry.clone());
            }
        }
        out
    }

    /// Gets the external prerequisites: non-reserved input entries no node
    /// produces. These must exist before execution; they are the
    /// inspector's subjects.
    pub fn external_inputs(&self) -> Vec<AnyEntry> {
        let produced: HashSet<EntryKey> = self
            .nodes
            .iter()
            .flat_map(|n| n.output_keys())
            .filter(|k| !k.is_reserved())
            .collect();

        let mut seen: HashSet<EntryKey> = HashSet::new();
        let mut out = Vec::new();
        for node in &self.nodes {
            for entry in node.input_entries() {
                let key = entry.key();
                if key.is_reserved() || produced.contains(key) || !seen.insert(key.clone()) {
                    continue;
                }
                out.push(entry.clone());
            }
        }
        out
    }

    /// Merges built pipelines into one, renaming nodes `Origin.NodeName`.
    ///
    /// # Errors
    ///
    /// * `BuildError` - duplicate origin pipeline names, cross-pipeline
    ///   producer conflicts, or cycles introduced by the union
    pub fn merge(
        name: impl Into<String>,
        pipelines: impl IntoIterator<Item = Pipeline>,
    ) -> Result<Pipeline, PipelineError> {
        let name = name.into();
        let mut origins: HashSet<String> = HashSet::new();
        let mut nodes = Vec::new();
        let mut tags: Vec<String> = Vec::new();

        for pipeline in pipelines {
            if !origins.insert(pipeline.name.clone()) {
                return Err(PipelineError::build_error(format!(
                    "Cannot merge two pipelines named '{}'",
                    pipeline.name
                )));
            }
            for tag in &pipeline.tags {
                if !tags.contains(tag) {
                    tags.push(tag.clone());
                }
            }
            for node in &pipeline.nodes {
                nodes.push(node.renamed(format!("{}.{}", pipeline.name, node.name())));
            }
        }

        dependency_analyzer::analyze(&mut nodes)?;
        Ok(Pipeline {
            name,
            description: None,
            tags,
            nodes,
        })
    }
}
