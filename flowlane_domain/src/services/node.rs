// /////////////////////////////////////////////////////////////////////////////
// Flowlane
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Node Abstraction
//!
//! A node is a pure transformation from a sequence of its input type to a
//! sequence of its output type. The scheduler always calls a node with one
//! materialized sequence:
//!
//! - for **pass-through** inputs, the sequence is the dataset loaded from
//!   the bound entry;
//! - for **mapped** inputs, the sequence contains exactly one synthesized
//!   schema instance (the singleton convention - coordination objects are
//!   not bulk data).
//!
//! ## Contract
//!
//! `transform` is stateless across invocations: it reads only its inputs
//! and its parameters, and logs through the ambient `tracing` macros (the
//! scheduler opens a span named after the node, so log lines are already
//! attributed). A node signals failure by returning an error; the
//! scheduler records it, stops the run, and reports the failing node. No
//! automatic retry.
//!
//! ## Type Discovery
//!
//! The source system discovered a node's input/output/parameter types by
//! walking generic arguments reflectively. Rust has no runtime generics,
//! so the types are associated types on the trait and the pipeline builder
//! reads them statically.
//!
//! ## Example
//!
//! ```
//! use async_trait::async_trait;
//! use flowlane_domain::services::Node;
//! use flowlane_domain::PipelineError;
//!
//! #[derive(Default)]
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
//! ```

use async_trait::async_trait;

use crate::PipelineError;

/// A pure, typed transformation registered into a pipeline.
#[async_trait]
pub trait Node: Send + Sync + 'static {
    /// Element type of the input sequence.
    type Input: Send + Sync + 'static;

    /// Element type of the output sequence.
    ///
    /// `Clone` because a node may feed several output maps.
    type Output: Clone + Send + Sync + 'static;

    /// Parameter type; `()` when the node takes none.
    type Params: Send + Sync + 'static;

    /// Injects parameters before execution.
    ///
    /// The default ignores them; parameterless nodes need not override.
    fn set_params(&mut self, _params: Self::Params) {}

    /// Transforms the input sequence into the output sequence.
    ///
    /// May suspend for I/O or CPU handoff; cancellation is cooperative at
    /// await points.
    ///
    /// # Errors
    ///
    /// Any error halts the pipeline and is attributed to this node.
    async fn transform(&self, inputs: Vec<Self::Input>) -> Result<Vec<Self::Output>, PipelineError>;
}
