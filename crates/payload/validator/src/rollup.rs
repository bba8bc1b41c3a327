//! Rollup variant of the validator.
//!
//! The rollup settles against a data availability layer whose inclusion
//! proofs cover the transaction bytes exactly as they appeared in the batch.
//! Its transaction type therefore keeps the original envelope bytes alongside
//! the decoded form, so re-encoding a materialized block reproduces the
//! payload byte for byte even for envelopes the canonical encoder would
//! serialize differently.

use crate::{
    error::ValidationError,
    helper::{BlockHelper, PayloadBlockHelper},
    validator::{validate_header_level, validate_sealed_block, PayloadValidator},
};
use alloy_primitives::Bytes;
use alloy_rlp::BufMut;
use std::{ops::Deref, sync::Arc};
use volta_payload_primitives::{ExecutionPayload, PayloadError};
use volta_primitives::{ChainSpec, SealedBlock, SignedTransaction, TransactionSigned, TxType};

/// A signed transaction that remembers its original envelope bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RollupTransaction {
    /// Decoded transaction.
    inner: TransactionSigned,
    /// The envelope bytes `inner` was decoded from.
    encoded: Bytes,
}

impl RollupTransaction {
    /// The decoded transaction.
    pub const fn inner(&self) -> &TransactionSigned {
        &self.inner
    }

    /// The original envelope bytes.
    pub const fn encoded(&self) -> &Bytes {
        &self.encoded
    }
}

impl Deref for RollupTransaction {
    type Target = TransactionSigned;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl From<TransactionSigned> for RollupTransaction {
    fn from(inner: TransactionSigned) -> Self {
        let encoded = inner.encoded_2718();
        Self { inner, encoded }
    }
}

impl SignedTransaction for RollupTransaction {
    fn tx_type(&self) -> TxType {
        self.inner.tx_type()
    }

    fn nonce(&self) -> u64 {
        self.inner.nonce()
    }

    fn gas_limit(&self) -> u64 {
        self.inner.gas_limit()
    }

    /// Emits the stored envelope bytes verbatim instead of re-serializing.
    fn encode_2718(&self, out: &mut dyn BufMut) {
        out.put_slice(&self.encoded);
    }

    fn decode_2718(buf: &mut &[u8]) -> alloy_rlp::Result<Self> {
        let original = *buf;
        let inner = TransactionSigned::decode_2718(buf)?;
        let consumed = original.len() - buf.len();
        Ok(Self { inner, encoded: Bytes::copy_from_slice(&original[..consumed]) })
    }
}

/// Validator of the rollup variant.
///
/// On top of the shared header-level checks, rollup blocks must carry at
/// least one transaction, the batch commitment posted by the sequencer.
#[derive(Debug, Clone)]
pub struct RollupPayloadValidator {
    chain_spec: Arc<ChainSpec>,
}

impl RollupPayloadValidator {
    /// Creates a new validator for the given chain spec.
    pub const fn new(chain_spec: Arc<ChainSpec>) -> Self {
        Self { chain_spec }
    }
}

impl PayloadValidator for RollupPayloadValidator {
    type Transaction = RollupTransaction;
    type Helper = PayloadBlockHelper<RollupTransaction>;

    fn chain_spec(&self) -> &ChainSpec {
        &self.chain_spec
    }

    fn payload_to_helper(&self, payload: ExecutionPayload) -> Result<Self::Helper, PayloadError> {
        PayloadBlockHelper::from_payload(payload)
    }

    fn validate_helper(&self, helper: &Self::Helper) -> Result<(), ValidationError> {
        if helper.transaction_count() == 0 {
            return Err(ValidationError::EmptyRollupBlock)
        }
        validate_header_level(
            self.chain_spec(),
            helper.gas_limit(),
            helper.gas_used(),
            helper.timestamp(),
            helper.transaction_count(),
            helper.withdrawals(),
        )
    }

    fn validate_block(
        &self,
        block: &SealedBlock<RollupTransaction>,
    ) -> Result<(), ValidationError> {
        if block.transaction_count() == 0 {
            return Err(ValidationError::EmptyRollupBlock)
        }
        validate_sealed_block(self.chain_spec(), block)
    }
}
