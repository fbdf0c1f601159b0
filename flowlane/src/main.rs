// /////////////////////////////////////////////////////////////////////////////
// Flowlane
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Flowlane Binary
//!
//! Thin CLI wrapper around the engine: parses arguments, installs
//! logging, selects a pipeline by label from the registry, runs it, and
//! maps the outcome to an exit code. A small built-in demonstration
//! pipeline is registered so `run`, `export`, and `list` work out of the
//! box; applications embedding the engine populate their own registry.

use async_trait::async_trait;

use flowlane::application::{ConsoleReporter, ExecutionReporter, PipelineRegistry};
use flowlane::infrastructure::codecs::MemoryDataset;
use flowlane::infrastructure::export::DagExporter;
use flowlane::infrastructure::logging::init_tracing;
use flowlane::infrastructure::runtime::PipelineExecutor;
use flowlane_bootstrap::{
    parse_cli, BootstrapLogger, Cli, Commands, ConsoleLogger, ShutdownCoordinator, EXIT_CANCELLED,
    EXIT_FAILURE, EXIT_SUCCESS,
};
use flowlane_domain::services::dag_metadata::DagSnapshot;
use flowlane_domain::{Catalog, DatasetEntry, Node, Pipeline, PipelineBuilder, PipelineError};

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

struct Total;

#[async_trait]
impl Node for Total {
    type Input = i64;
    type Output = i64;
    type Params = ();

    async fn transform(&self, inputs: Vec<i64>) -> Result<Vec<i64>, PipelineError> {
        Ok(vec![inputs.into_iter().sum()])
    }
}

fn build_demo_pipeline() -> Result<Pipeline, PipelineError> {
    let mut catalog = Catalog::new();
    catalog.add_dataset(DatasetEntry::read_write(
        "numbers",
        MemoryDataset::seeded(vec![1i64, 2, 3, 4, 5]),
    )?)?;
    catalog.add_dataset(DatasetEntry::read_write("doubled", MemoryDataset::<i64>::new())?)?;
    catalog.add_dataset(DatasetEntry::read_write("total", MemoryDataset::<i64>::new())?)?;

    let mut builder = PipelineBuilder::new("demo").description("Built-in demonstration pipeline");
    builder.add_node(
        "double",
        Double,
        vec![catalog.dataset::<i64>("numbers")?.into()],
        vec![catalog.dataset::<i64>("doubled")?.into()],
    )?;
    builder.add_node(
        "total",
        Total,
        vec![catalog.dataset::<i64>("doubled")?.into()],
        vec![catalog.dataset::<i64>("total")?.into()],
    )?;
    builder.build()
}

fn builtin_registry() -> PipelineRegistry {
    let mut registry = PipelineRegistry::new();
    // The only failure mode is a duplicate label, impossible here.
    let _ = registry.register("demo", build_demo_pipeline);
    registry
}

async fn run_command(cli: Cli, registry: &PipelineRegistry, logger: &dyn BootstrapLogger) -> i32 {
    match cli.command {
        Commands::List => {
            for label in registry.labels() {
                logger.info(label);
            }
            EXIT_SUCCESS
        }

        Commands::Export {
            pipeline,
            output_dir,
            diagram,
        } => {
            let pipeline = match registry.build(&pipeline) {
                Ok(pipeline) => pipeline,
                Err(e) => {
                    logger.error(&e.to_string());
                    return EXIT_FAILURE;
                }
            };
            let snapshot = DagSnapshot::from_pipeline(&pipeline);
            let exporter = DagExporter::new(output_dir);
            let written = exporter.export_json(&snapshot);
            if diagram {
                exporter.export_diagram(&snapshot);
            }
            if written.is_some() {
                EXIT_SUCCESS
            } else {
                EXIT_FAILURE
            }
        }

        Commands::Run {
            pipeline,
            export_dir,
            diagram,
            skip_inspection,
        } => {
            let pipeline = match registry.build(&pipeline) {
                Ok(pipeline) => pipeline,
                Err(e) => {
                    logger.error(&e.to_string());
                    return EXIT_FAILURE;
                }
            };

            let coordinator = ShutdownCoordinator::default();
            coordinator.listen_for_signals();

            let executor = if skip_inspection {
                PipelineExecutor::new().without_inspection()
            } else {
                PipelineExecutor::new()
            };
            let result = executor.execute(&pipeline, &coordinator.token()).await;

            ConsoleReporter::new().report(&result, logger);

            if let Some(dir) = export_dir {
                let snapshot = DagSnapshot::from_pipeline(&pipeline);
                let exporter = DagExporter::new(dir);
                exporter.export_json(&snapshot);
                if diagram {
                    exporter.export_diagram(&snapshot);
                }
            }

            match result.error() {
                None => EXIT_SUCCESS,
                Some(PipelineError::Cancelled(_)) => EXIT_CANCELLED,
                Some(_) => EXIT_FAILURE,
            }
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = parse_cli();
    let logger = ConsoleLogger::new();

    if let Err(e) = init_tracing(&cli.log_level) {
        logger.error(&format!("failed to initialize logging: {}", e));
        std::process::exit(EXIT_FAILURE);
    }

    let registry = builtin_registry();
    let code = run_command(cli, &registry, &logger).await;
    std::process::exit(code);
}
