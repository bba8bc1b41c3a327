//! Payload processing pipeline between consensus and execution.
//!
//! The pipeline receives execution payloads, runs them through a
//! [`PayloadValidator`](volta_payload_validator::PayloadValidator) and hands
//! the materialized blocks to a [`BlockExecutor`], reporting the outcome of
//! each payload as a [`PayloadStatus`](volta_payload_primitives::PayloadStatus).

#![cfg_attr(not(test), warn(unused_crate_dependencies))]

mod executor;
mod pipeline;

pub use executor::{BlockExecutionError, BlockExecutor, ExecutionOutcome};
pub use pipeline::{PayloadPipeline, PipelineConfig, PipelineStage};
