// /////////////////////////////////////////////////////////////////////////////
// Flowlane
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Cancellation Tests
//!
//! Cancellation is cooperative and observed at suspension points. A run
//! cancelled mid-flight keeps the success records of nodes that already
//! completed, attributes the cancellation to the point it was observed,
//! and never attempts later layers.

use async_trait::async_trait;

use flowlane::infrastructure::codecs::MemoryDataset;
use flowlane::infrastructure::runtime::PipelineExecutor;
use flowlane_bootstrap::CancellationToken;
use flowlane_domain::{DatasetEntry, Node, PipelineBuilder, PipelineError};

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

/// Cancels the shared token from inside its own transform.
struct CancelsRun {
    token: CancellationToken,
}

#[async_trait]
impl Node for CancelsRun {
    type Input = i64;
    type Output = i64;
    type Params = ();

    async fn transform(&self, inputs: Vec<i64>) -> Result<Vec<i64>, PipelineError> {
        self.token.cancel();
        Ok(inputs)
    }
}

#[tokio::test]
async fn mid_run_cancellation_keeps_completed_records() {
    let a = DatasetEntry::read_write("a", MemoryDataset::seeded(vec![1i64])).unwrap();
    let b = DatasetEntry::read_write("b", MemoryDataset::<i64>::new()).unwrap();
    let c = DatasetEntry::read_write("c", MemoryDataset::<i64>::new()).unwrap();
    let d = DatasetEntry::read_write("d", MemoryDataset::<i64>::new()).unwrap();

    let token = CancellationToken::new();

    let mut builder = PipelineBuilder::new("interrupted");
    builder
        .add_node("first", Identity, vec![a.into()], vec![b.clone().into()])
        .unwrap();
    builder
        .add_node(
            "second",
            CancelsRun { token: token.clone() },
            vec![b.into()],
            vec![c.clone().into()],
        )
        .unwrap();
    builder
        .add_node("third", Identity, vec![c.into()], vec![d.clone().into()])
        .unwrap();
    let pipeline = builder.build().unwrap();

    let result = PipelineExecutor::new().execute(&pipeline, &token).await;

    assert!(!result.success());
    assert_eq!(result.error().unwrap().category(), "cancellation");

    // The first node's success record survives
    assert_eq!(result.nodes()[0].name(), "first");
    assert!(result.nodes()[0].success());

    // The cancelling node observed the cancellation at a suspension point
    assert_eq!(result.nodes()[1].name(), "second");
    assert!(!result.nodes()[1].success());

    // The third node was never attempted
    assert_eq!(result.nodes().len(), 2);
    assert!(d.load().await.is_err());
}

#[tokio::test]
async fn uncancelled_token_does_not_interfere() {
    let a = DatasetEntry::read_write("a", MemoryDataset::seeded(vec![7i64])).unwrap();
    let b = DatasetEntry::read_write("b", MemoryDataset::<i64>::new()).unwrap();

    let mut builder = PipelineBuilder::new("calm");
    builder
        .add_node("only", Identity, vec![a.into()], vec![b.into()])
        .unwrap();
    let pipeline = builder.build().unwrap();

    let result = PipelineExecutor::new()
        .execute(&pipeline, &CancellationToken::new())
        .await;
    assert!(result.success());
}
