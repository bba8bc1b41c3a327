//! Commonly used types for volta.
//!
//! This crate contains the canonical block primitives: headers, signed
//! transactions, block bodies, withdrawals, the root calculations that tie
//! them together, and the per-chain configuration chosen at node startup.

#![cfg_attr(not(test), warn(unused_crate_dependencies))]

mod block;
mod chainspec;
pub mod constants;
mod header;
pub mod proofs;
mod transaction;
mod withdrawal;

pub use block::{Block, BlockBody, SealedBlock};
pub use chainspec::{Chain, ChainSpec};
pub use header::{Header, SealedHeader};
pub use transaction::{SignedTransaction, TransactionSigned, TxEip1559, TxLegacy, TxType};
pub use withdrawal::Withdrawal;

pub use alloy_primitives::{self, Address, Bloom, Bytes, B256, B64, U256};
