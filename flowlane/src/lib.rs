// /////////////////////////////////////////////////////////////////////////////
// Flowlane
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

// Production code safety enforced via CI and `make lint-strict`
// (lib/bins checked separately from tests - tests may use unwrap/expect)

//! # Flowlane
//!
//! Application and infrastructure layers of the flowlane data-pipeline
//! engine. The domain crate owns the model (catalog, nodes, maps, DAG
//! analysis); this crate supplies everything that touches a runtime:
//!
//! - **Codecs** - in-memory slots, CSV files, JSON documents, all
//!   implementing the domain's codec contract with atomic writes and
//!   inspection support
//! - **Runtime** - the layered sequential executor and the pre-execution
//!   input inspector
//! - **Export** - DAG metadata as JSON artifacts and Mermaid diagrams
//! - **Reporting** - console and JSON execution reporters
//! - **Registry** - label-indexed pipeline factories for the CLI wrapper
//!
//! ## Quick Start
//!
//! ```
//! use async_trait::async_trait;
//! use flowlane::infrastructure::codecs::MemoryDataset;
//! use flowlane::infrastructure::runtime::PipelineExecutor;
//! use flowlane_bootstrap::CancellationToken;
//! use flowlane_domain::{DatasetEntry, Node, PipelineBuilder, PipelineError};
//!
//! struct Double;
//!
//! #[async_trait]
//! impl Node for Double {
//!     type Input = i64;
//!     type Output = i64;
//!     type Params = ();
//!
//!     async fn transform(&self, inputs: Vec<i64>) -> Result<Vec<i64>, PipelineError> {
//!         Ok(inputs.into_iter().map(|v| v * 2).collect())
//!     }
//! }
//!
//! # async fn example() -> Result<(), PipelineError> {
//! let source = DatasetEntry::read_write("numbers", MemoryDataset::seeded(vec![1, 2, 3]))?;
//! let doubled = DatasetEntry::read_write("doubled", MemoryDataset::<i64>::new())?;
//!
//! let mut builder = PipelineBuilder::new("demo");
//! builder.add_node("double", Double, vec![source.into()], vec![doubled.clone().into()])?;
//! let pipeline = builder.build()?;
//!
//! let result = PipelineExecutor::new()
//!     .execute(&pipeline, &CancellationToken::new())
//!     .await;
//! assert!(result.success());
//! assert_eq!(doubled.load().await?, vec![2, 4, 6]);
//! # Ok(())
//! # }
//! ```

pub mod application;
pub mod infrastructure;

pub use application::{ConsoleReporter, ExecutionReporter, JsonReporter, PipelineRegistry};
pub use infrastructure::export::DagExporter;
pub use infrastructure::runtime::{InputInspector, PipelineExecutor};
