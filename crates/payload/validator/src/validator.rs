use crate::{
    error::{NewPayloadError, ValidationError},
    helper::{BlockHelper, PayloadBlockHelper},
};
use std::sync::Arc;
use volta_payload_primitives::{ExecutionPayload, PayloadError};
use volta_primitives::{
    constants::MIN_TRANSACTION_GAS, ChainSpec, SealedBlock, SignedTransaction, TransactionSigned,
    Withdrawal,
};

/// Header-level checks shared by every validator: gas accounting, withdrawals
/// activation and withdrawal index monotonicity. None of them require decoded
/// transactions.
pub(crate) fn validate_header_level(
    chain_spec: &ChainSpec,
    gas_limit: u64,
    gas_used: u64,
    timestamp: u64,
    transaction_count: usize,
    withdrawals: Option<&[Withdrawal]>,
) -> Result<(), ValidationError> {
    if gas_used > gas_limit {
        return Err(ValidationError::GasUsedExceedsGasLimit { gas_used, gas_limit })
    }

    let intrinsic = (transaction_count as u64).checked_mul(MIN_TRANSACTION_GAS);
    if intrinsic.is_none_or(|gas| gas > gas_limit) {
        return Err(ValidationError::TransactionCountTooHigh {
            count: transaction_count,
            gas_limit,
        })
    }

    let withdrawals_active = chain_spec.is_withdrawals_active_at_timestamp(timestamp);
    match withdrawals {
        None if withdrawals_active => {
            return Err(ValidationError::MissingWithdrawals { timestamp })
        }
        Some(_) if !withdrawals_active => {
            return Err(ValidationError::UnexpectedWithdrawals { timestamp })
        }
        Some(withdrawals) => {
            for pair in withdrawals.windows(2) {
                if pair[1].index <= pair[0].index {
                    return Err(ValidationError::NonMonotonicWithdrawalIndex {
                        index: pair[1].index,
                        prev: pair[0].index,
                    })
                }
            }
        }
        None => {}
    }

    Ok(())
}

/// Chain-specific payload validation.
///
/// A validator turns payloads into helpers, decides whether a helper is
/// acceptable under its chain spec, and can re-check fully materialized
/// blocks. The pipeline is generic over this trait so chain variants plug in
/// their own transaction representation.
pub trait PayloadValidator {
    /// The transaction representation blocks of this chain carry.
    type Transaction: SignedTransaction;
    /// The helper this validator operates on.
    type Helper: BlockHelper<Self::Transaction>;

    /// The chain spec this validator enforces.
    fn chain_spec(&self) -> &ChainSpec;

    /// Wraps a payload into a helper, running the structural checks.
    fn payload_to_helper(&self, payload: ExecutionPayload) -> Result<Self::Helper, PayloadError>;

    /// Validates a helper against the chain spec.
    fn validate_helper(&self, helper: &Self::Helper) -> Result<(), ValidationError>;

    /// Validates a payload and materializes it into a sealed block.
    fn validate_and_convert(
        &self,
        payload: ExecutionPayload,
    ) -> Result<SealedBlock<Self::Transaction>, NewPayloadError> {
        let helper = self.payload_to_helper(payload)?;
        self.validate_helper(&helper)?;
        Ok(helper.into_block()?)
    }

    /// Re-checks a materialized block, including the body commitments the
    /// header claims. Slower than [`Self::validate_helper`] because it hashes
    /// the full body.
    ///
    /// Implementations adding checks in [`Self::validate_helper`] must add
    /// them here too, this entry point may not accept blocks the fast path
    /// rejects.
    fn validate_block(
        &self,
        block: &SealedBlock<Self::Transaction>,
    ) -> Result<(), ValidationError> {
        validate_sealed_block(self.chain_spec(), block)
    }
}

/// Header-level checks plus the body commitments the header claims. The
/// default [`PayloadValidator::validate_block`] path.
pub(crate) fn validate_sealed_block<T: SignedTransaction>(
    chain_spec: &ChainSpec,
    block: &SealedBlock<T>,
) -> Result<(), ValidationError> {
    validate_header_level(
        chain_spec,
        block.gas_limit,
        block.gas_used,
        block.timestamp,
        block.transaction_count(),
        block.body.withdrawals.as_deref(),
    )?;

    let transactions_root = block.body.calculate_tx_root();
    if block.transactions_root != transactions_root {
        return Err(ValidationError::TransactionsRootMismatch {
            header: block.transactions_root,
            computed: transactions_root,
        })
    }

    let withdrawals_root = block.body.calculate_withdrawals_root();
    if block.withdrawals_root != withdrawals_root {
        return Err(ValidationError::WithdrawalsRootMismatch {
            header: block.withdrawals_root,
            computed: withdrawals_root,
        })
    }

    let ommers_hash = block.body.calculate_ommers_root();
    if block.ommers_hash != ommers_hash {
        return Err(ValidationError::OmmersHashMismatch {
            header: block.ommers_hash,
            computed: ommers_hash,
        })
    }

    Ok(())
}

/// Validator of the baseline chain.
///
/// Works entirely on header-level data; transactions stay undecoded until
/// materialization asks for them.
#[derive(Debug, Clone)]
pub struct VoltaPayloadValidator {
    chain_spec: Arc<ChainSpec>,
}

impl VoltaPayloadValidator {
    /// Creates a new validator for the given chain spec.
    pub const fn new(chain_spec: Arc<ChainSpec>) -> Self {
        Self { chain_spec }
    }
}

impl PayloadValidator for VoltaPayloadValidator {
    type Transaction = TransactionSigned;
    type Helper = PayloadBlockHelper;

    fn chain_spec(&self) -> &ChainSpec {
        &self.chain_spec
    }

    fn payload_to_helper(&self, payload: ExecutionPayload) -> Result<Self::Helper, PayloadError> {
        PayloadBlockHelper::from_payload(payload)
    }

    fn validate_helper(&self, helper: &Self::Helper) -> Result<(), ValidationError> {
        validate_header_level(
            self.chain_spec(),
            helper.gas_limit(),
            helper.gas_used(),
            helper.timestamp(),
            helper.transaction_count(),
            helper.withdrawals(),
        )
    }
}
