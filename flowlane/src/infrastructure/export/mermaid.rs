// /////////////////////////////////////////////////////////////////////////////
// Flowlane
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Mermaid Diagram Rendering
//!
//! Renders a DAG snapshot as a `flowchart TD` diagram:
//!
//! - each origin pipeline becomes a subgraph,
//! - produced entries are drawn inside their producer's subgraph,
//! - external inputs are drawn once, outside every subgraph, and connect
//!   with solid edges,
//! - a read of an entry produced in a *different* origin pipeline is drawn
//!   dashed, making cross-pipeline data flow visible at a glance.
//!
//! Nodes are rectangles, catalog entries are cylinders.

use std::collections::HashMap;

use flowlane_domain::services::dag_metadata::DagSnapshot;

/// Renders the snapshot as a Mermaid flowchart.
pub fn render_mermaid(snapshot: &DagSnapshot) -> String {
    let mut out = String::from("flowchart TD\n");

    // Entry key -> producing node's origin pipeline
    let producer_origin: HashMap<&str, &str> = snapshot
        .catalog_entries
        .iter()
        .filter_map(|entry| {
            let producer = entry.producer.as_deref()?;
            let origin = snapshot
                .nodes
                .iter()
                .find(|n| n.id == producer)
                .map(|n| n.pipeline_name.as_str())?;
            Some((entry.key.as_str(), origin))
        })
        .collect();

    // External inputs live outside every subgraph and are declared first.
    for entry in &snapshot.catalog_entries {
        if entry.producer.is_none() {
            out.push_str(&format!(
                "    {}[(\"{}\")]\n",
                entry_id(&entry.key),
                entry.label
            ));
        }
    }

    // One subgraph per origin pipeline, in first-appearance order.
    let mut origins: Vec<&str> = Vec::new();
    for node in &snapshot.nodes {
        if !origins.contains(&node.pipeline_name.as_str()) {
            origins.push(&node.pipeline_name);
        }
    }

    for origin in origins {
        out.push_str(&format!("    subgraph {}\n", sanitize(origin)));
        for node in snapshot.nodes.iter().filter(|n| n.pipeline_name == origin) {
            out.push_str(&format!("        {}[\"{}\"]\n", node_id(&node.id), node.label));
            for key in &node.outputs {
                if let Some(entry) = snapshot.catalog_entries.iter().find(|e| &e.key == key) {
                    out.push_str(&format!(
                        "        {}[(\"{}\")]\n",
                        entry_id(&entry.key),
                        entry.label
                    ));
                }
            }
        }
        out.push_str("    end\n");
    }

    // Edges: writes are always solid; reads are dashed when they cross
    // origin-pipeline boundaries.
    for node in &snapshot.nodes {
        for key in &node.inputs {
            let crosses = producer_origin
                .get(key.as_str())
                .is_some_and(|origin| *origin != node.pipeline_name);
            let arrow = if crosses { "-.->" } else { "-->" };
            out.push_str(&format!(
                "    {} {} {}\n",
                entry_id(key),
                arrow,
                node_id(&node.id)
            ));
        }
        for key in &node.outputs {
            out.push_str(&format!("    {} --> {}\n", node_id(&node.id), entry_id(key)));
        }
    }

    out
}

fn node_id(id: &str) -> String {
    format!("n_{}", sanitize(id))
}

fn entry_id(key: &str) -> String {
    format!("e_{}", sanitize(key))
}

fn sanitize(raw: &str) -> String {
    raw.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect()
}
