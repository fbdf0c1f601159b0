// /////////////////////////////////////////////////////////////////////////////
// Flowlane
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Metadata and Export Tests
//!
//! The DAG snapshot round-trips through JSON, stays stable across
//! rebuilds of the same declaration, and lands on disk under the
//! `dag-<pipeline>-<timestamp>.<ext>` convention together with the
//! Mermaid rendering.

use async_trait::async_trait;
use tempfile::TempDir;

use flowlane::infrastructure::codecs::MemoryDataset;
use flowlane::infrastructure::export::{render_mermaid, DagExporter};
use flowlane_domain::services::dag_metadata::DagSnapshot;
use flowlane_domain::value_objects::FieldSpec;
use flowlane_domain::{DatasetEntry, Node, Pipeline, PipelineBuilder, PipelineError};

struct Identity;

#[async_trait]
impl Node for Identity {
    type Input = i64;
    type Output = i64;
    type Params = ();

    async fn transform(&self, inputs: Vec<i64>) -> Result<Vec<i64>, PipelineError> {
        Ok(inputs)
    }
}

fn build_pipeline() -> Pipeline {
    let raw = DatasetEntry::read_write("raw_values", MemoryDataset::<i64>::new())
        .unwrap()
        .with_schema(vec![FieldSpec::required("value", "i64")]);
    let clean = DatasetEntry::read_write("clean_values", MemoryDataset::<i64>::new()).unwrap();
    let published = DatasetEntry::read_write("published_values", MemoryDataset::<i64>::new()).unwrap();

    let mut builder = PipelineBuilder::new("values")
        .description("metadata test pipeline")
        .tag("nightly");
    builder
        .add_node("clean", Identity, vec![raw.into()], vec![clean.clone().into()])
        .unwrap();
    builder
        .add_node("publish", Identity, vec![clean.into()], vec![published.into()])
        .unwrap();
    builder.build().unwrap()
}

#[test]
fn snapshot_roundtrip_preserves_everything() {
    let snapshot = DagSnapshot::from_pipeline(&build_pipeline());
    let back = DagSnapshot::from_json(&snapshot.to_json().unwrap()).unwrap();
    assert_eq!(back, snapshot);
}

#[test]
fn rebuilding_the_declaration_is_deterministic() {
    let mut first = DagSnapshot::from_pipeline(&build_pipeline());
    let mut second = DagSnapshot::from_pipeline(&build_pipeline());

    // Node set, entry set, edge set, and layers must match; only the
    // generation stamp differs.
    second.generated_at = first.generated_at;
    first.generated_at = second.generated_at;
    assert_eq!(first, second);
}

#[test]
fn declared_schema_appears_in_snapshot() {
    let snapshot = DagSnapshot::from_pipeline(&build_pipeline());
    let raw = snapshot
        .catalog_entries
        .iter()
        .find(|e| e.key == "raw_values")
        .unwrap();

    let schema = raw.schema.as_ref().expect("declared schema present");
    assert_eq!(schema.fields.len(), 1);
    assert_eq!(schema.fields[0].name(), "value");

    let clean = snapshot
        .catalog_entries
        .iter()
        .find(|e| e.key == "clean_values")
        .unwrap();
    assert!(clean.schema.is_none(), "undeclared schema is omitted");
}

#[test]
fn export_writes_json_and_diagram_artifacts() {
    let dir = TempDir::new().unwrap();
    let snapshot = DagSnapshot::from_pipeline(&build_pipeline());
    let exporter = DagExporter::new(dir.path());

    let json_path = exporter.export_json(&snapshot).expect("json written");
    let diagram_path = exporter.export_diagram(&snapshot).expect("diagram written");

    let json_name = json_path.file_name().unwrap().to_string_lossy().to_string();
    assert!(json_name.starts_with("dag-values-"));
    assert!(json_name.ends_with(".json"));
    assert!(diagram_path.to_string_lossy().ends_with(".mmd"));

    let reloaded = DagSnapshot::from_json(&std::fs::read_to_string(&json_path).unwrap()).unwrap();
    assert_eq!(reloaded, snapshot);

    let diagram = std::fs::read_to_string(&diagram_path).unwrap();
    assert!(diagram.starts_with("flowchart TD"));
    assert!(diagram.contains("subgraph values"));
}

#[test]
fn merged_pipeline_diagram_draws_cross_pipeline_reads_dashed() {
    let shared = DatasetEntry::read_write("shared", MemoryDataset::<i64>::new()).unwrap();
    let start = DatasetEntry::read_write("start", MemoryDataset::<i64>::new()).unwrap();
    let end = DatasetEntry::read_write("end", MemoryDataset::<i64>::new()).unwrap();

    let mut producer = PipelineBuilder::new("producer");
    producer
        .add_node("make", Identity, vec![start.into()], vec![shared.clone().into()])
        .unwrap();
    let producer = producer.build().unwrap();

    let mut consumer = PipelineBuilder::new("consumer");
    consumer
        .add_node("use", Identity, vec![shared.into()], vec![end.into()])
        .unwrap();
    let consumer = consumer.build().unwrap();

    let merged = Pipeline::merge("both", [producer, consumer]).unwrap();
    let diagram = render_mermaid(&DagSnapshot::from_pipeline(&merged));

    assert!(diagram.contains("subgraph producer"));
    assert!(diagram.contains("subgraph consumer"));
    assert!(diagram.contains("-.->"), "cross-pipeline read is dashed:\n{}", diagram);
}
