//! Payload validation and block materialization.
//!
//! A received [`ExecutionPayload`](volta_payload_primitives::ExecutionPayload)
//! is wrapped in a [`BlockHelper`] that exposes header-level data immediately
//! and decodes transactions lazily. A [`PayloadValidator`] runs the chain
//! spec checks on the helper and, when they pass, materializes the sealed
//! block, verifying the hash the proposer committed to.

#![cfg_attr(not(test), warn(unused_crate_dependencies))]

mod error;
mod helper;
mod rollup;
mod validator;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use error::{
    MaterializationError, NewPayloadError, TransactionDecodeError, ValidationError,
};
pub use helper::{BlockHelper, PayloadBlockHelper};
pub use rollup::{RollupPayloadValidator, RollupTransaction};
pub use validator::{PayloadValidator, VoltaPayloadValidator};
