use alloy_primitives::B256;
use volta_payload_primitives::PayloadError;

/// Failure to decode one enveloped transaction of a payload.
///
/// Carries the position of the offending entry so the rejection can name it.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("failed to decode transaction {index}: {source}")]
pub struct TransactionDecodeError {
    /// Position of the transaction in the payload's transaction list.
    pub index: usize,
    /// The underlying RLP error.
    #[source]
    pub source: alloy_rlp::Error,
}

/// Semantic validation failures, checked against the chain spec after the
/// payload's structure has already been accepted.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The block reports more gas used than its gas limit allows.
    #[error("block gas used {gas_used} exceeds gas limit {gas_limit}")]
    GasUsedExceedsGasLimit {
        /// Gas used by the block.
        gas_used: u64,
        /// Gas limit of the block.
        gas_limit: u64,
    },
    /// More transactions than could each pay the intrinsic gas cost.
    #[error("transaction count {count} cannot fit in gas limit {gas_limit}")]
    TransactionCountTooHigh {
        /// Number of transactions in the payload.
        count: usize,
        /// Gas limit of the block.
        gas_limit: u64,
    },
    /// Withdrawals are active at the block's timestamp but the payload
    /// carries none.
    #[error("missing withdrawals list, active at timestamp {timestamp}")]
    MissingWithdrawals {
        /// Timestamp of the block.
        timestamp: u64,
    },
    /// The payload carries withdrawals before they activate.
    #[error("unexpected withdrawals list at timestamp {timestamp}")]
    UnexpectedWithdrawals {
        /// Timestamp of the block.
        timestamp: u64,
    },
    /// Withdrawal indices must increase strictly within a block.
    #[error("withdrawal index {index} does not increase past {prev}")]
    NonMonotonicWithdrawalIndex {
        /// The offending index.
        index: u64,
        /// The index preceding it.
        prev: u64,
    },
    /// Rollup blocks must carry at least one transaction, the batch
    /// commitment.
    #[error("rollup block carries no transactions")]
    EmptyRollupBlock,
    /// The header's transactions root does not match the block body.
    #[error("transactions root mismatch: header {header} computed {computed}")]
    TransactionsRootMismatch {
        /// Root claimed by the header.
        header: B256,
        /// Root computed from the body.
        computed: B256,
    },
    /// The header's withdrawals root does not match the block body.
    #[error("withdrawals root mismatch: header {header:?} computed {computed:?}")]
    WithdrawalsRootMismatch {
        /// Root claimed by the header.
        header: Option<B256>,
        /// Root computed from the body.
        computed: Option<B256>,
    },
    /// The header's ommers hash does not match the block body.
    #[error("ommers hash mismatch: header {header} computed {computed}")]
    OmmersHashMismatch {
        /// Hash claimed by the header.
        header: B256,
        /// Hash computed from the body.
        computed: B256,
    },
}

/// Failure to materialize a payload into a sealed block.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum MaterializationError {
    /// A transaction in the payload could not be decoded.
    #[error(transparent)]
    Decode(#[from] TransactionDecodeError),
    /// The hash of the materialized block does not match the hash the
    /// proposer committed to.
    #[error("block hash mismatch: execution {execution} consensus {consensus}")]
    BlockHash {
        /// The locally computed header hash.
        execution: B256,
        /// The hash carried by the payload.
        consensus: B256,
    },
}

/// Any failure a payload can hit on its way to a sealed block.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum NewPayloadError {
    /// The payload failed structural checks.
    #[error(transparent)]
    Payload(#[from] PayloadError),
    /// The payload failed semantic validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// The payload could not be materialized into a block.
    #[error(transparent)]
    Materialization(#[from] MaterializationError),
}

impl From<TransactionDecodeError> for NewPayloadError {
    fn from(err: TransactionDecodeError) -> Self {
        Self::Materialization(err.into())
    }
}
