//! Execution payload types.
//!
//! The payload is the network-facing encoding of a block: header fields plus
//! the ordered, still-encoded transaction list. It is immutable once received
//! and consumed by exactly one block helper during validation.

#![cfg_attr(not(test), warn(unused_crate_dependencies))]

mod error;
mod payload;
mod status;

pub use error::PayloadError;
pub use payload::{ExecutionPayload, ExecutionPayloadV1, ExecutionPayloadV2};
pub use status::{PayloadStatus, PayloadStatusEnum};
