// /////////////////////////////////////////////////////////////////////////////
// Flowlane
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Build Failure Tests
//!
//! Structural defects must surface at build time, before anything runs:
//! cycles name every stuck node, producer conflicts name the entry and
//! both writers, incomplete mappings list the missing fields, and
//! read-only entries cannot be wired as outputs.

use async_trait::async_trait;

use flowlane::infrastructure::codecs::MemoryDataset;
use flowlane_domain::value_objects::FieldSpec;
use flowlane_domain::{
    CatalogMap, DatasetEntry, MappedSchema, Node, PipelineBuilder, PipelineError, SchemaField,
};

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

fn entry(key: &str) -> DatasetEntry<i64> {
    DatasetEntry::read_write(key, MemoryDataset::new()).unwrap()
}

#[test]
fn cycle_detection_names_both_nodes() {
    let (a, b) = (entry("A"), entry("B"));

    let mut builder = PipelineBuilder::new("cyclic");
    builder
        .add_node("N1", Identity, vec![a.clone().into()], vec![b.clone().into()])
        .unwrap();
    builder
        .add_node("N2", Identity, vec![b.into()], vec![a.into()])
        .unwrap();

    let err = builder.build().unwrap_err();
    assert_eq!(err.category(), "build");
    let text = err.to_string();
    assert!(text.contains("N1"));
    assert!(text.contains("N2"));
}

#[test]
fn multiple_producer_rejection_names_entry_and_nodes() {
    let (x, z, y) = (entry("X"), entry("Z"), entry("Y"));

    let mut builder = PipelineBuilder::new("conflicted");
    builder
        .add_node("N1", Identity, vec![x.into()], vec![y.clone().into()])
        .unwrap();
    builder
        .add_node("N2", Identity, vec![z.into()], vec![y.into()])
        .unwrap();

    let err = builder.build().unwrap_err();
    let text = err.to_string();
    assert!(text.contains("'Y'"));
    assert!(text.contains("N1"));
    assert!(text.contains("N2"));
}

#[derive(Default)]
struct Wide {
    first: Vec<i64>,
    second: Vec<i64>,
}

impl Wide {
    #[allow(dead_code)]
    const FIRST: SchemaField<Self, Vec<i64>> =
        SchemaField::new("first", |s| Some(s.first.clone()), |s, v| s.first = v);
    #[allow(dead_code)]
    const SECOND: SchemaField<Self, Vec<i64>> =
        SchemaField::new("second", |s| Some(s.second.clone()), |s, v| s.second = v);
}

impl MappedSchema for Wide {
    fn schema_name() -> &'static str {
        "Wide"
    }

    fn fields() -> Vec<FieldSpec> {
        vec![
            FieldSpec::required("first", "Vec<i64>"),
            FieldSpec::required("second", "Vec<i64>"),
        ]
    }
}

struct Consume;

#[async_trait]
impl Node for Consume {
    type Input = Wide;
    type Output = i64;
    type Params = ();

    async fn transform(&self, _inputs: Vec<Wide>) -> Result<Vec<i64>, PipelineError> {
        Ok(Vec::new())
    }
}

#[test]
fn incomplete_mapping_lists_every_unmapped_required_field() {
    let out = entry("out");
    let unbound = CatalogMap::<Wide>::mapped();

    let mut builder = PipelineBuilder::new("incomplete");
    let err = builder
        .add_node("Consume", Consume, vec![unbound], vec![out.into()])
        .unwrap_err();

    let text = err.to_string();
    assert!(text.contains("first"));
    assert!(text.contains("second"));
}

#[test]
fn read_only_entry_cannot_be_an_output() {
    let a = entry("A");
    let locked = DatasetEntry::readable("locked", MemoryDataset::<i64>::seeded(vec![])).unwrap();

    let mut builder = PipelineBuilder::new("locked-output");
    let err = builder
        .add_node("step", Identity, vec![a.into()], vec![locked.into()])
        .unwrap_err();

    assert_eq!(err.category(), "build");
    assert!(err.to_string().contains("read-only"));
}

#[test]
fn duplicate_node_names_are_rejected() {
    let (a, b, c) = (entry("A"), entry("B"), entry("C"));

    let mut builder = PipelineBuilder::new("duplicated");
    builder
        .add_node("step", Identity, vec![a.into()], vec![b.clone().into()])
        .unwrap();
    let err = builder
        .add_node("step", Identity, vec![b.into()], vec![c.into()])
        .unwrap_err();

    assert!(err.to_string().contains("already registered"));
}
