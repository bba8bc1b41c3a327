use serde::{Deserialize, Serialize};
use volta_primitives::{Address, Bloom, Bytes, SealedBlock, SignedTransaction, Withdrawal, B256};

/// The payload of a block before the withdrawals activation: header fields
/// plus the ordered list of enveloped transaction bytes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionPayloadV1 {
    /// Hash of the parent block's header.
    pub parent_hash: B256,
    /// Address that receives the priority fees of the block.
    pub fee_recipient: Address,
    /// State root after executing the block.
    pub state_root: B256,
    /// Receipts root of the block.
    pub receipts_root: B256,
    /// Bloom filter over the block's logs.
    pub logs_bloom: Bloom,
    /// Randomness beacon value of the proposing slot.
    pub prev_randao: B256,
    /// Number of the block.
    pub block_number: u64,
    /// Gas limit of the block.
    pub gas_limit: u64,
    /// Total gas used by the block's transactions.
    pub gas_used: u64,
    /// Timestamp of the block.
    pub timestamp: u64,
    /// Extra data of the block, at most 32 bytes.
    pub extra_data: Bytes,
    /// Base fee of the block.
    pub base_fee_per_gas: u64,
    /// Hash the proposer committed to for this block. Checked against the
    /// locally computed hash during materialization.
    pub block_hash: B256,
    /// Enveloped transactions exactly as broadcast.
    pub transactions: Vec<Bytes>,
}

/// The payload of a block after the withdrawals activation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionPayloadV2 {
    /// Inner V1 payload.
    #[serde(flatten)]
    pub payload_inner: ExecutionPayloadV1,
    /// Withdrawals enabled with V2.
    pub withdrawals: Vec<Withdrawal>,
}

/// An execution payload, either [`ExecutionPayloadV1`] or [`ExecutionPayloadV2`].
///
/// The most specific variant is listed first so untagged deserialization
/// prefers it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ExecutionPayload {
    /// V2 payload, with withdrawals.
    V2(ExecutionPayloadV2),
    /// V1 payload, before the withdrawals activation.
    V1(ExecutionPayloadV1),
}

impl ExecutionPayload {
    /// Re-encodes a sealed block into its payload representation.
    ///
    /// This is the inverse of materialization, used when handing locally built
    /// blocks back to the consensus layer.
    pub fn from_block<T: SignedTransaction>(block: &SealedBlock<T>) -> Self {
        let transactions =
            block.body.transactions.iter().map(SignedTransaction::encoded_2718).collect();
        let v1 = ExecutionPayloadV1 {
            parent_hash: block.parent_hash,
            fee_recipient: block.beneficiary,
            state_root: block.state_root,
            receipts_root: block.receipts_root,
            logs_bloom: block.logs_bloom,
            prev_randao: block.mix_hash,
            block_number: block.number,
            gas_limit: block.gas_limit,
            gas_used: block.gas_used,
            timestamp: block.timestamp,
            extra_data: block.extra_data.clone(),
            base_fee_per_gas: block.base_fee_per_gas,
            block_hash: block.hash(),
            transactions,
        };
        match &block.body.withdrawals {
            Some(withdrawals) => {
                Self::V2(ExecutionPayloadV2 { payload_inner: v1, withdrawals: withdrawals.clone() })
            }
            None => Self::V1(v1),
        }
    }

    /// Returns a reference to the V1 fields shared by all versions.
    pub const fn as_v1(&self) -> &ExecutionPayloadV1 {
        match self {
            Self::V1(payload) => payload,
            Self::V2(payload) => &payload.payload_inner,
        }
    }

    /// Returns the block hash the proposer committed to.
    pub const fn block_hash(&self) -> B256 {
        self.as_v1().block_hash
    }

    /// Returns the parent hash of the payload.
    pub const fn parent_hash(&self) -> B256 {
        self.as_v1().parent_hash
    }

    /// Returns the block number of the payload.
    pub const fn block_number(&self) -> u64 {
        self.as_v1().block_number
    }

    /// Returns the timestamp of the payload.
    pub const fn timestamp(&self) -> u64 {
        self.as_v1().timestamp
    }

    /// Returns the gas limit of the payload.
    pub const fn gas_limit(&self) -> u64 {
        self.as_v1().gas_limit
    }

    /// Returns the gas used by the payload.
    pub const fn gas_used(&self) -> u64 {
        self.as_v1().gas_used
    }

    /// Returns the base fee of the payload.
    pub const fn base_fee_per_gas(&self) -> u64 {
        self.as_v1().base_fee_per_gas
    }

    /// Returns the extra data of the payload.
    pub const fn extra_data(&self) -> &Bytes {
        &self.as_v1().extra_data
    }

    /// Returns the enveloped transaction bytes of the payload.
    pub fn transactions(&self) -> &[Bytes] {
        &self.as_v1().transactions
    }

    /// Returns the withdrawals of the payload, if this version carries them.
    pub fn withdrawals(&self) -> Option<&[Withdrawal]> {
        match self {
            Self::V1(_) => None,
            Self::V2(payload) => Some(&payload.withdrawals),
        }
    }
}

impl From<ExecutionPayloadV1> for ExecutionPayload {
    fn from(payload: ExecutionPayloadV1) -> Self {
        Self::V1(payload)
    }
}

impl From<ExecutionPayloadV2> for ExecutionPayload {
    fn from(payload: ExecutionPayloadV2) -> Self {
        Self::V2(payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use volta_primitives::{Block, BlockBody, Header};

    fn sealed_block(withdrawals: Option<Vec<Withdrawal>>) -> SealedBlock {
        let body = BlockBody { transactions: Vec::new(), ommers: Vec::new(), withdrawals };
        let header = Header {
            number: 3,
            gas_limit: 30_000_000,
            base_fee_per_gas: 7,
            withdrawals_root: body.calculate_withdrawals_root(),
            ..Default::default()
        };
        Block { header, body }.seal_slow()
    }

    #[test]
    fn from_block_picks_version_by_withdrawals() {
        let pre = ExecutionPayload::from_block(&sealed_block(None));
        assert!(matches!(pre, ExecutionPayload::V1(_)));
        assert_eq!(pre.withdrawals(), None);

        let post = ExecutionPayload::from_block(&sealed_block(Some(Vec::new())));
        assert!(matches!(post, ExecutionPayload::V2(_)));
        assert_eq!(post.withdrawals(), Some(&[][..]));
    }

    #[test]
    fn from_block_commits_to_sealed_hash() {
        let block = sealed_block(None);
        let payload = ExecutionPayload::from_block(&block);
        assert_eq!(payload.block_hash(), block.hash());
        assert_eq!(payload.parent_hash(), block.parent_hash);
        assert_eq!(payload.block_number(), 3);
    }

    #[test]
    fn untagged_serde_distinguishes_versions() {
        let v2 = ExecutionPayload::from_block(&sealed_block(Some(Vec::new())));
        let json = serde_json::to_string(&v2).unwrap();
        let decoded: ExecutionPayload = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, v2);

        let v1 = ExecutionPayload::from_block(&sealed_block(None));
        let json = serde_json::to_string(&v1).unwrap();
        let decoded: ExecutionPayload = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, v1);
    }
}
