// /////////////////////////////////////////////////////////////////////////////
// Flowlane
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # DAG Metadata
//!
//! An out-of-band structural snapshot of a built pipeline: every node with
//! its layer and origin pipeline, every catalog entry with its producer,
//! consumers and storage fields, and every directed edge. The snapshot
//! serializes to language-neutral JSON with camelCase keys; null-valued
//! fields are omitted, enums are strings, and the round trip
//! `deserialize(serialize(d)) == d` holds.
//!
//! Rebuilding the same pipeline declaration yields the same snapshot
//! modulo `generatedAt`.
//!
//! For merged pipelines (nodes named `Origin.NodeName`), the extractor
//! splits each id on the first dot to recover the origin pipeline;
//! unmerged nodes belong to the pipeline itself.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::aggregates::pipeline::Pipeline;
use crate::value_objects::{short_type_name, Capability, FieldSpec, InspectionLevel};

/// Structural snapshot of a built pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DagSnapshot {
    pub pipeline_name: String,
    pub generated_at: DateTime<Utc>,
    pub nodes: Vec<DagNode>,
    pub catalog_entries: Vec<DagEntry>,
    pub edges: Vec<DagEdge>,
}

/// One pipeline node in the snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DagNode {
    pub id: String,
    pub label: String,
    pub node_type: String,
    pub layer: u32,
    pub pipeline_name: String,
    pub inputs: Vec<String>,
    pub outputs: Vec<String>,
}

/// Declared row/value schema of an entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DagSchema {
    pub fields: Vec<FieldSpec>,
}

/// Storage-facing fields of an entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DagEntryFields {
    pub catalog_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filepath: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_read_only: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inspection_level: Option<InspectionLevel>,
}

/// One catalog entry in the snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DagEntry {
    pub key: String,
    pub label: String,
    pub data_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<DagSchema>,
    pub fields: DagEntryFields,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub producer: Option<String>,
    pub consumers: Vec<String>,
}

/// One directed edge: entry -> node for a read, node -> entry for a write.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DagEdge {
    pub source: String,
    pub target: String,
    pub data_type: String,
}

impl DagSnapshot {
    /// Extracts the snapshot from a built pipeline.
    pub fn from_pipeline(pipeline: &Pipeline) -> Self {
        let nodes: Vec<DagNode> = pipeline
            .nodes()
            .iter()
            .map(|node| DagNode {
                id: node.name().to_string(),
                label: humanize(node.name()),
                node_type: node.node_type().to_string(),
                layer: node.layer(),
                pipeline_name: origin_of(node.name(), pipeline.name()),
                inputs: visible_keys(node.input_keys()),
                outputs: visible_keys(node.output_keys()),
            })
            .collect();

        let mut edges = Vec::new();
        let mut catalog_entries = Vec::new();

        for entry in pipeline.entries() {
            let key = entry.key().to_string();
            let data_type = short_type_name(entry.data_type_name());

            let producer = pipeline
                .nodes()
                .iter()
                .find(|n| n.output_keys().iter().any(|k| k.as_str() == key))
                .map(|n| n.name().to_string());
            let consumers: Vec<String> = pipeline
                .nodes()
                .iter()
                .filter(|n| n.input_keys().iter().any(|k| k.as_str() == key))
                .map(|n| n.name().to_string())
                .collect();

            for consumer in &consumers {
                edges.push(DagEdge {
                    source: key.clone(),
                    target: consumer.clone(),
                    data_type: data_type.clone(),
                });
            }
            if let Some(producer) = &producer {
                edges.push(DagEdge {
                    source: producer.clone(),
                    target: key.clone(),
                    data_type: data_type.clone(),
                });
            }

            let storage = entry.storage();
            catalog_entries.push(DagEntry {
                label: humanize(&key),
                key,
                data_type,
                schema: entry.declared_schema().map(|fields| DagSchema { fields }),
                fields: DagEntryFields {
                    catalog_type: storage.codec_kind().to_string(),
                    filepath: storage.filepath().map(|p| p.display().to_string()),
                    is_read_only: (entry.capability() == Capability::ReadOnly).then_some(true),
                    inspection_level: entry.inspection_level(),
                },
                producer,
                consumers,
            });
        }

        Self {
            pipeline_name: pipeline.name().to_string(),
            generated_at: Utc::now(),
            nodes,
            catalog_entries,
            edges,
        }
    }

    /// Serializes the snapshot to pretty JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserializes a snapshot from JSON
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

fn visible_keys(keys: Vec<crate::value_objects::EntryKey>) -> Vec<String> {
    keys.into_iter()
        .filter(|k| !k.is_reserved())
        .map(|k| k.to_string())
        .collect()
}

fn origin_of(node_id: &str, pipeline_name: &str) -> String {
    match node_id.split_once('.') {
        Some((origin, _)) => origin.to_string(),
        None => pipeline_name.to_string(),
    }
}

/// Turns an identifier into a display label: `raw_orders` -> `Raw Orders`.
pub fn humanize(identifier: &str) -> String {
    identifier
        .split(['_', '.', '-'])
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
