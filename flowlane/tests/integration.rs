//! Integration Tests
//!
//! This module aggregates all integration tests for the flowlane engine.

#[path = "integration/linear_pipeline_test.rs"]
mod linear_pipeline_test;

#[path = "integration/mapped_schema_test.rs"]
mod mapped_schema_test;

#[path = "integration/build_failure_test.rs"]
mod build_failure_test;

#[path = "integration/validation_gate_test.rs"]
mod validation_gate_test;

#[path = "integration/metadata_export_test.rs"]
mod metadata_export_test;

#[path = "integration/cancellation_test.rs"]
mod cancellation_test;
