// /////////////////////////////////////////////////////////////////////////////
// Flowlane
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Dependency Analyzer
//!
//! Build-time analysis of a pipeline's node list. The analyzer derives,
//! from the catalog entries each node reads and writes:
//!
//! 1. the **producer map** (entry -> producing node, at most one producer
//!    per entry),
//! 2. each node's **dependencies** (the producers of its inputs; inputs
//!    with no producer are external prerequisites), and
//! 3. each node's **layer**: the smallest integer such that every
//!    dependency sits in a strictly lower layer. Layer 0 nodes have only
//!    external inputs.
//!
//! Entries under the reserved `_nodata` prefix are invisible here, so
//! discarded sinks never create edges.
//!
//! A node that reads its own output depends on itself and can never be
//! assigned a layer; it is reported as a circular dependency like any
//! other cycle.

use std::collections::{HashMap, HashSet};

use crate::entities::pipeline_node::PipelineNode;
use crate::value_objects::EntryKey;
use crate::PipelineError;

/// Fills `dependencies` and `layer` on every node.
///
/// # Errors
///
/// * `BuildError` (*multiple-producers*) - an entry is written by two
///   nodes; names the entry and both nodes
/// * `BuildError` (*circular-dependency*) - a layering pass assigns
///   nothing while nodes remain; names every unassigned node
pub fn analyze(nodes: &mut [PipelineNode]) -> Result<(), PipelineError> {
    let producers = build_producer_map(nodes)?;

    let dependencies: Vec<Vec<String>> = nodes
        .iter()
        .map(|node| {
            let mut deps: Vec<String> = node
                .input_keys()
                .iter()
                .filter(|key| !key.is_reserved())
                .filter_map(|key| producers.get(key).cloned())
                .collect();
            deps.sort();
            deps.dedup();
            deps
        })
        .collect();

    for (node, deps) in nodes.iter_mut().zip(dependencies) {
        node.set_dependencies(deps);
    }

    assign_layers(nodes)
}

fn build_producer_map(nodes: &[PipelineNode]) -> Result<HashMap<EntryKey, String>, PipelineError> {
    let mut producers: HashMap<EntryKey, String> = HashMap::new();
    for node in nodes {
        for key in node.output_keys() {
            if key.is_reserved() {
                continue;
            }
            if let Some(existing) = producers.get(&key) {
                return Err(PipelineError::build_error(format!(
                    "Multiple producers for entry '{}': nodes '{}' and '{}'",
                    key,
                    existing,
                    node.name()
                )));
            }
            producers.insert(key, node.name().to_string());
        }
    }
    Ok(producers)
}

fn assign_layers(nodes: &mut [PipelineNode]) -> Result<(), PipelineError> {
    let mut assigned: HashSet<String> = HashSet::new();
    let mut layer = 0u32;

    while assigned.len() < nodes.len() {
        let ready: Vec<usize> = nodes
            .iter()
            .enumerate()
            .filter(|(_, node)| !assigned.contains(node.name()))
            .filter(|(_, node)| node.dependencies().iter().all(|dep| assigned.contains(dep)))
            .map(|(index, _)| index)
            .collect();

        if ready.is_empty() {
            let mut stuck: Vec<&str> = nodes
                .iter()
                .filter(|node| !assigned.contains(node.name()))
                .map(|node| node.name())
                .collect();
            stuck.sort_unstable();
            return Err(PipelineError::build_error(format!(
                "Circular dependency among nodes: {}",
                stuck.join(", ")
            )));
        }

        for index in ready {
            nodes[index].set_layer(layer);
            assigned.insert(nodes[index].name().to_string());
        }
        layer += 1;
    }

    Ok(())
}
