use volta_primitives::{SealedBlock, SignedTransaction, B256};

/// Outcome of handing a block to the execution layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionOutcome {
    /// The block executed, producing the given state commitment.
    Executed {
        /// State root after applying the block.
        state_root: B256,
    },
    /// The node is missing the block's ancestors and cannot execute it yet.
    Syncing,
}

/// Errors the execution layer can surface for a block.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum BlockExecutionError {
    /// A transaction in the block failed to apply.
    #[error("transaction {hash} failed: {message}")]
    TransactionFailed {
        /// Hash of the failing transaction.
        hash: B256,
        /// Reason reported by the execution layer.
        message: String,
    },
    /// The block as a whole is not executable against the current state.
    #[error("block execution failed: {0}")]
    Other(String),
}

/// Executes sealed blocks against the node's state.
///
/// The pipeline only needs to hand a block over and learn the resulting
/// state commitment, so this is the entire execution surface it sees.
#[auto_impl::auto_impl(&, Arc)]
pub trait BlockExecutor<T: SignedTransaction>: Send + Sync {
    /// Executes the block and returns the outcome.
    fn execute(&self, block: SealedBlock<T>) -> Result<ExecutionOutcome, BlockExecutionError>;
}
