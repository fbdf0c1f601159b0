// /////////////////////////////////////////////////////////////////////////////
// Flowlane
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Linear Pipeline Tests
//!
//! End-to-end coverage of the simplest shape: one external dataset, one
//! transformation, one in-memory result. Also covers the missing external
//! input failure and the file-backed variant through the CSV codec.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tempfile::TempDir;

use flowlane::infrastructure::codecs::{CsvDataset, MemoryDataset};
use flowlane::infrastructure::runtime::PipelineExecutor;
use flowlane_bootstrap::CancellationToken;
use flowlane_domain::{DatasetEntry, Node, PipelineBuilder, PipelineError};

struct Double;

#[async_trait]
impl Node for Double {
    type Input = i64;
    type Output = i64;
    type Params = ();

    async fn transform(&self, inputs: Vec<i64>) -> Result<Vec<i64>, PipelineError> {
        Ok(inputs.into_iter().map(|v| v * 2).collect())
    }
}

#[tokio::test]
async fn two_node_linear_scenario() {
    // Catalog: A (external dataset of int, [1,2,3]), B (in-memory)
    let a = DatasetEntry::read_write("A", MemoryDataset::seeded(vec![1i64, 2, 3])).unwrap();
    let b = DatasetEntry::read_write("B", MemoryDataset::<i64>::new()).unwrap();

    let mut builder = PipelineBuilder::new("linear");
    builder
        .add_node("Double", Double, vec![a.into()], vec![b.clone().into()])
        .unwrap();
    let pipeline = builder.build().unwrap();

    assert_eq!(pipeline.layer_count(), 1);

    let result = PipelineExecutor::new()
        .execute(&pipeline, &CancellationToken::new())
        .await;

    assert!(result.success());
    assert_eq!(b.load().await.unwrap(), vec![2, 4, 6]);

    let record = &result.nodes()[0];
    assert_eq!(record.name(), "Double");
    assert_eq!(record.input_count(), 3);
    assert_eq!(record.output_count(), 3);
}

#[tokio::test]
async fn missing_external_input_names_the_entry() {
    let dir = TempDir::new().unwrap();
    let a = DatasetEntry::readable("A", CsvDataset::<Row>::new(dir.path().join("gone.csv"))).unwrap();
    let b = DatasetEntry::read_write("B", MemoryDataset::<Row>::new()).unwrap();

    let mut builder = PipelineBuilder::new("missing-input");
    builder
        .add_node("pass", PassRows, vec![a.into()], vec![b.into()])
        .unwrap();
    let pipeline = builder.build().unwrap();

    let result = PipelineExecutor::new()
        .execute(&pipeline, &CancellationToken::new())
        .await;

    assert!(!result.success());
    let error = result.error().unwrap();
    assert_eq!(error.category(), "missing-data");
    assert!(error.to_string().contains("'A'"), "error names the entry key: {}", error);
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Row {
    id: i64,
    name: String,
}

struct PassRows;

#[async_trait]
impl Node for PassRows {
    type Input = Row;
    type Output = Row;
    type Params = ();

    async fn transform(&self, inputs: Vec<Row>) -> Result<Vec<Row>, PipelineError> {
        Ok(inputs)
    }
}

#[tokio::test]
async fn csv_to_csv_run_with_atomic_outputs() {
    let dir = TempDir::new().unwrap();
    let in_path = dir.path().join("in.csv");
    let out_path = dir.path().join("nested/out.csv");
    tokio::fs::write(&in_path, "id,name\n1,alpha\n2,beta\n")
        .await
        .unwrap();

    let a = DatasetEntry::readable("raw", CsvDataset::<Row>::new(&in_path)).unwrap();
    let b = DatasetEntry::read_write("copied", CsvDataset::<Row>::new(&out_path)).unwrap();

    let mut builder = PipelineBuilder::new("csv-copy");
    builder
        .add_node("copy", PassRows, vec![a.into()], vec![b.clone().into()])
        .unwrap();
    let pipeline = builder.build().unwrap();

    let result = PipelineExecutor::new()
        .execute(&pipeline, &CancellationToken::new())
        .await;

    assert!(result.success());
    assert!(out_path.exists(), "parent directory was created lazily");
    let rows = b.load().await.unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[1].name, "beta");
}

/// Counts save calls while delegating to an inner in-memory slot.
struct CountingSink {
    inner: MemoryDataset<i64>,
    saves: std::sync::atomic::AtomicU64,
}

impl CountingSink {
    fn new() -> Self {
        Self {
            inner: MemoryDataset::new(),
            saves: std::sync::atomic::AtomicU64::new(0),
        }
    }
}

#[async_trait]
impl flowlane_domain::services::DatasetSource<i64> for CountingSink {
    async fn load(&self) -> Result<Vec<i64>, PipelineError> {
        flowlane_domain::services::DatasetSource::load(&self.inner).await
    }

    async fn exists(&self) -> bool {
        flowlane_domain::services::DatasetSource::exists(&self.inner).await
    }
}

#[async_trait]
impl flowlane_domain::services::DatasetSink<i64> for CountingSink {
    async fn save(&self, rows: Vec<i64>) -> Result<(), PipelineError> {
        self.saves.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        flowlane_domain::services::DatasetSink::save(&self.inner, rows).await
    }
}

#[tokio::test]
async fn every_output_entry_is_written_exactly_once() {
    let counted_mid = std::sync::Arc::new(CountingSink::new());
    let counted_end = std::sync::Arc::new(CountingSink::new());
    // Share the counters with the entries through clones of the Arc
    struct Shared(std::sync::Arc<CountingSink>);

    #[async_trait]
    impl flowlane_domain::services::DatasetSource<i64> for Shared {
        async fn load(&self) -> Result<Vec<i64>, PipelineError> {
            flowlane_domain::services::DatasetSource::load(self.0.as_ref()).await
        }

        async fn exists(&self) -> bool {
            flowlane_domain::services::DatasetSource::exists(self.0.as_ref()).await
        }
    }

    #[async_trait]
    impl flowlane_domain::services::DatasetSink<i64> for Shared {
        async fn save(&self, rows: Vec<i64>) -> Result<(), PipelineError> {
            flowlane_domain::services::DatasetSink::save(self.0.as_ref(), rows).await
        }
    }

    let a = DatasetEntry::read_write("a", MemoryDataset::seeded(vec![1i64, 2])).unwrap();
    let b = DatasetEntry::read_write("b", Shared(counted_mid.clone())).unwrap();
    let c = DatasetEntry::read_write("c", Shared(counted_end.clone())).unwrap();

    let mut builder = PipelineBuilder::new("write-once");
    builder
        .add_node("first", Double, vec![a.into()], vec![b.clone().into()])
        .unwrap();
    builder
        .add_node("second", Double, vec![b.into()], vec![c.into()])
        .unwrap();
    let pipeline = builder.build().unwrap();

    let result = PipelineExecutor::new()
        .execute(&pipeline, &CancellationToken::new())
        .await;

    assert!(result.success());
    assert_eq!(counted_mid.saves.load(std::sync::atomic::Ordering::SeqCst), 1);
    assert_eq!(counted_end.saves.load(std::sync::atomic::Ordering::SeqCst), 1);
}

#[tokio::test]
async fn run_against_same_catalog_twice_overwrites_outputs() {
    let a = DatasetEntry::read_write("A", MemoryDataset::seeded(vec![5i64])).unwrap();
    let b = DatasetEntry::read_write("B", MemoryDataset::<i64>::new()).unwrap();

    let mut builder = PipelineBuilder::new("repeat");
    builder
        .add_node("Double", Double, vec![a.into()], vec![b.clone().into()])
        .unwrap();
    let pipeline = builder.build().unwrap();

    let executor = PipelineExecutor::new();
    assert!(executor.execute(&pipeline, &CancellationToken::new()).await.success());
    assert!(executor.execute(&pipeline, &CancellationToken::new()).await.success());
    assert_eq!(b.load().await.unwrap(), vec![10]);
}
