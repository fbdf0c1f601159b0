// /////////////////////////////////////////////////////////////////////////////
// Flowlane
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Mapped Schema Tests
//!
//! The two multi-field shapes: a two-input join through a mapped input
//! schema (the node observes exactly one synthesized instance), and a
//! multi-output split through a mapped output schema (each field lands in
//! its own entry). Also covers parameter bindings feeding literals into
//! the input schema.

use async_trait::async_trait;

use flowlane::infrastructure::codecs::MemoryDataset;
use flowlane::infrastructure::runtime::PipelineExecutor;
use flowlane_bootstrap::CancellationToken;
use flowlane_domain::services::dag_metadata::DagSnapshot;
use flowlane_domain::value_objects::FieldSpec;
use flowlane_domain::{
    CatalogMap, DatasetEntry, MappedSchema, Node, PipelineBuilder, PipelineError, SchemaField,
};

#[derive(Debug, Clone, PartialEq)]
struct LeftRow {
    k: i64,
    v: String,
}

#[derive(Debug, Clone, PartialEq)]
struct RightRow {
    k: i64,
    w: i64,
}

#[derive(Debug, Clone, PartialEq)]
struct JoinedRow {
    k: i64,
    v: String,
    w: i64,
}

#[derive(Default)]
struct JoinIn {
    left: Vec<LeftRow>,
    right: Vec<RightRow>,
}

impl JoinIn {
    const LEFT: SchemaField<Self, Vec<LeftRow>> =
        SchemaField::new("left", |s| Some(s.left.clone()), |s, v| s.left = v);
    const RIGHT: SchemaField<Self, Vec<RightRow>> =
        SchemaField::new("right", |s| Some(s.right.clone()), |s, v| s.right = v);
}

impl MappedSchema for JoinIn {
    fn schema_name() -> &'static str {
        "JoinIn"
    }

    fn fields() -> Vec<FieldSpec> {
        vec![
            FieldSpec::required("left", "Vec<LeftRow>"),
            FieldSpec::required("right", "Vec<RightRow>"),
        ]
    }
}

struct Join;

#[async_trait]
impl Node for Join {
    type Input = JoinIn;
    type Output = JoinedRow;
    type Params = ();

    async fn transform(&self, inputs: Vec<JoinIn>) -> Result<Vec<JoinedRow>, PipelineError> {
        // Mapped inputs arrive as a singleton sequence
        assert_eq!(inputs.len(), 1);
        let JoinIn { left, right } = inputs.into_iter().next().expect("singleton input");

        let joined = left
            .into_iter()
            .filter_map(|l| {
                right
                    .iter()
                    .find(|r| r.k == l.k)
                    .map(|r| JoinedRow { k: l.k, v: l.v, w: r.w })
            })
            .collect();
        Ok(joined)
    }
}

#[tokio::test]
async fn two_input_join_via_mapped_schema() {
    let left = DatasetEntry::read_write(
        "L",
        MemoryDataset::seeded(vec![
            LeftRow { k: 1, v: "a".into() },
            LeftRow { k: 2, v: "b".into() },
        ]),
    )
    .unwrap();
    let right = DatasetEntry::read_write(
        "R",
        MemoryDataset::seeded(vec![RightRow { k: 1, w: 10 }, RightRow { k: 2, w: 20 }]),
    )
    .unwrap();
    let out = DatasetEntry::read_write("Out", MemoryDataset::<JoinedRow>::new()).unwrap();

    let mut join_in = CatalogMap::<JoinIn>::mapped();
    join_in.bind(JoinIn::LEFT, left).unwrap();
    join_in.bind(JoinIn::RIGHT, right).unwrap();

    let mut builder = PipelineBuilder::new("join");
    builder
        .add_node("Join", Join, vec![join_in], vec![out.clone().into()])
        .unwrap();
    let pipeline = builder.build().unwrap();

    assert_eq!(pipeline.layer_count(), 1, "both inputs are external");

    let result = PipelineExecutor::new()
        .execute(&pipeline, &CancellationToken::new())
        .await;

    assert!(result.success());
    assert_eq!(
        out.load().await.unwrap(),
        vec![
            JoinedRow { k: 1, v: "a".into(), w: 10 },
            JoinedRow { k: 2, v: "b".into(), w: 20 },
        ]
    );
    // Mapped input synthesizes one instance
    assert_eq!(result.nodes()[0].input_count(), 1);
}

#[derive(Default, Clone)]
struct SplitOut {
    even: Vec<i64>,
    odd: Vec<i64>,
}

impl SplitOut {
    const EVEN: SchemaField<Self, Vec<i64>> =
        SchemaField::new("even", |s| Some(s.even.clone()), |s, v| s.even = v);
    const ODD: SchemaField<Self, Vec<i64>> =
        SchemaField::new("odd", |s| Some(s.odd.clone()), |s, v| s.odd = v);
}

impl MappedSchema for SplitOut {
    fn schema_name() -> &'static str {
        "SplitOut"
    }

    fn fields() -> Vec<FieldSpec> {
        vec![
            FieldSpec::required("even", "Vec<i64>"),
            FieldSpec::required("odd", "Vec<i64>"),
        ]
    }
}

struct Split;

#[async_trait]
impl Node for Split {
    type Input = i64;
    type Output = SplitOut;
    type Params = ();

    async fn transform(&self, inputs: Vec<i64>) -> Result<Vec<SplitOut>, PipelineError> {
        let (even, odd) = inputs.into_iter().partition(|v| v % 2 == 0);
        Ok(vec![SplitOut { even, odd }])
    }
}

#[tokio::test]
async fn multi_output_split_via_mapped_schema() {
    let source = DatasetEntry::read_write("numbers", MemoryDataset::seeded(vec![1i64, 2, 3, 4])).unwrap();
    let evens = DatasetEntry::read_write("E", MemoryDataset::<i64>::new()).unwrap();
    let odds = DatasetEntry::read_write("O", MemoryDataset::<i64>::new()).unwrap();

    let mut split_out = CatalogMap::<SplitOut>::mapped();
    split_out.bind(SplitOut::EVEN, evens.clone()).unwrap();
    split_out.bind(SplitOut::ODD, odds.clone()).unwrap();

    let mut builder = PipelineBuilder::new("split");
    builder
        .add_node("Split", Split, vec![source.into()], vec![split_out])
        .unwrap();
    let pipeline = builder.build().unwrap();

    let result = PipelineExecutor::new()
        .execute(&pipeline, &CancellationToken::new())
        .await;

    assert!(result.success());
    assert_eq!(evens.load().await.unwrap(), vec![2, 4]);
    assert_eq!(odds.load().await.unwrap(), vec![1, 3]);
    assert_eq!(result.nodes()[0].output_count(), 4, "two rows per bound entry");

    // DAG metadata shows both entries produced by Split
    let snapshot = DagSnapshot::from_pipeline(&pipeline);
    for key in ["E", "O"] {
        let entry = snapshot.catalog_entries.iter().find(|e| e.key == key).unwrap();
        assert_eq!(entry.producer.as_deref(), Some("Split"));
    }
}

#[derive(Default)]
struct ScaleIn {
    values: Vec<i64>,
    factor: i64,
}

impl ScaleIn {
    const VALUES: SchemaField<Self, Vec<i64>> =
        SchemaField::new("values", |s| Some(s.values.clone()), |s, v| s.values = v);
    const FACTOR: SchemaField<Self, i64> =
        SchemaField::new("factor", |s| Some(s.factor), |s, v| s.factor = v);
}

impl MappedSchema for ScaleIn {
    fn schema_name() -> &'static str {
        "ScaleIn"
    }

    fn fields() -> Vec<FieldSpec> {
        vec![
            FieldSpec::required("values", "Vec<i64>"),
            FieldSpec::optional("factor", "i64"),
        ]
    }
}

struct Scale;

#[async_trait]
impl Node for Scale {
    type Input = ScaleIn;
    type Output = i64;
    type Params = ();

    async fn transform(&self, inputs: Vec<ScaleIn>) -> Result<Vec<i64>, PipelineError> {
        let input = inputs.into_iter().next().expect("singleton input");
        Ok(input.values.into_iter().map(|v| v * input.factor).collect())
    }
}

#[tokio::test]
async fn parameter_binding_feeds_literal_value() {
    let values = DatasetEntry::read_write("values", MemoryDataset::seeded(vec![1i64, 2, 3])).unwrap();
    let scaled = DatasetEntry::read_write("scaled", MemoryDataset::<i64>::new()).unwrap();

    let mut scale_in = CatalogMap::<ScaleIn>::mapped();
    scale_in.bind(ScaleIn::VALUES, values).unwrap();
    scale_in.bind_value(ScaleIn::FACTOR, 10).unwrap();

    let mut builder = PipelineBuilder::new("scaled");
    builder
        .add_node("Scale", Scale, vec![scale_in], vec![scaled.clone().into()])
        .unwrap();
    let pipeline = builder.build().unwrap();

    let result = PipelineExecutor::new()
        .execute(&pipeline, &CancellationToken::new())
        .await;

    assert!(result.success());
    assert_eq!(scaled.load().await.unwrap(), vec![10, 20, 30]);
}
