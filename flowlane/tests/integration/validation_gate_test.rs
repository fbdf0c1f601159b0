// /////////////////////////////////////////////////////////////////////////////
// Flowlane
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Validation Gate Tests
//!
//! The inspector runs before any node executes. A CSV external input
//! configured for deep inspection with one malformed row must abort the
//! run with a validation error naming the row, and no output entry may be
//! written.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tempfile::TempDir;

use flowlane::infrastructure::codecs::{CsvDataset, MemoryDataset};
use flowlane::infrastructure::runtime::PipelineExecutor;
use flowlane_bootstrap::CancellationToken;
use flowlane_domain::value_objects::{InspectionLevel, InspectionVerdict};
use flowlane_domain::{DatasetEntry, Node, PipelineBuilder, PipelineError};

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Person {
    id: i64,
    name: String,
}

struct PassPeople;

#[async_trait]
impl Node for PassPeople {
    type Input = Person;
    type Output = Person;
    type Params = ();

    async fn transform(&self, inputs: Vec<Person>) -> Result<Vec<Person>, PipelineError> {
        Ok(inputs)
    }
}

#[tokio::test]
async fn deep_inspection_aborts_before_any_node() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("people.csv");
    // Row index 1 has a non-integer id
    tokio::fs::write(&path, "id,name\n1,ada\nnot_an_int,grace\n3,edsger\n")
        .await
        .unwrap();

    let source = DatasetEntry::readable("C", CsvDataset::<Person>::new(&path))
        .unwrap()
        .with_inspection(InspectionLevel::Deep);
    let sink = DatasetEntry::read_write("clean", MemoryDataset::<Person>::new()).unwrap();

    let mut builder = PipelineBuilder::new("gated");
    builder
        .add_node("pass", PassPeople, vec![source.into()], vec![sink.clone().into()])
        .unwrap();
    let pipeline = builder.build().unwrap();

    let result = PipelineExecutor::new()
        .execute(&pipeline, &CancellationToken::new())
        .await;

    assert!(!result.success());
    assert!(result.nodes().is_empty(), "no node executed");

    match result.error().unwrap() {
        PipelineError::ValidationError { failures } => {
            assert_eq!(failures.len(), 1);
            assert_eq!(failures[0].key().as_str(), "C");
            match failures[0].verdict() {
                InspectionVerdict::SampleRowFailed { index, reason } => {
                    assert_eq!(*index, 1);
                    assert!(!reason.is_empty());
                }
                other => panic!("expected SampleRowFailed, got {:?}", other),
            }
        }
        other => panic!("expected ValidationError, got {:?}", other),
    }

    assert!(sink.load().await.is_err(), "no output entry was written");
}

#[tokio::test]
async fn shallow_inspection_passes_when_bad_row_is_beyond_sample() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("people.csv");
    tokio::fs::write(&path, "id,name\n1,ada\n2,grace\nbad,edsger\n")
        .await
        .unwrap();

    let source = DatasetEntry::readable(
        "C",
        CsvDataset::<Person>::new(&path).with_sample_size(2),
    )
    .unwrap()
    .with_inspection(InspectionLevel::Shallow);
    let sink = DatasetEntry::read_write("clean", MemoryDataset::<Person>::new()).unwrap();

    let mut builder = PipelineBuilder::new("shallow");
    builder
        .add_node("pass", PassPeople, vec![source.into()], vec![sink.into()])
        .unwrap();
    let pipeline = builder.build().unwrap();

    let result = PipelineExecutor::new()
        .execute(&pipeline, &CancellationToken::new())
        .await;

    // Shallow inspection misses the tail row; the failure then surfaces at
    // load time instead, attributed to the node.
    assert!(!result.success());
    assert_eq!(result.nodes().len(), 1);
    assert_eq!(result.error().unwrap().category(), "codec");
}

#[tokio::test]
async fn produced_entries_are_not_inspected() {
    let dir = TempDir::new().unwrap();
    let good = dir.path().join("good.csv");
    tokio::fs::write(&good, "id,name\n1,ada\n").await.unwrap();

    let source = DatasetEntry::readable("raw", CsvDataset::<Person>::new(&good))
        .unwrap()
        .with_inspection(InspectionLevel::Deep);
    // Intermediate entry also declares a level; it must not be inspected
    // because a node produces it (it does not exist before the run).
    let middle = DatasetEntry::read_write(
        "middle",
        CsvDataset::<Person>::new(dir.path().join("middle.csv")),
    )
    .unwrap()
    .with_inspection(InspectionLevel::Deep);
    let sink = DatasetEntry::read_write("out", MemoryDataset::<Person>::new()).unwrap();

    let mut builder = PipelineBuilder::new("staged");
    builder
        .add_node("first", PassPeople, vec![source.into()], vec![middle.clone().into()])
        .unwrap();
    builder
        .add_node("second", PassPeople, vec![middle.into()], vec![sink.into()])
        .unwrap();
    let pipeline = builder.build().unwrap();

    let result = PipelineExecutor::new()
        .execute(&pipeline, &CancellationToken::new())
        .await;

    assert!(result.success(), "run succeeded: {:?}", result.error());
}
