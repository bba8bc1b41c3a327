//! Builders for payloads and blocks used in validator and pipeline tests.

use alloy_primitives::{address, Address, Bytes, TxKind, U256};
use volta_payload_primitives::ExecutionPayload;
use volta_primitives::{
    constants::MIN_TRANSACTION_GAS, Block, BlockBody, Header, SealedBlock, SignedTransaction,
    TransactionSigned, TxLegacy, Withdrawal,
};

/// A legacy transaction with the given nonce and fixed signature values.
pub fn transaction(nonce: u64) -> TransactionSigned {
    TransactionSigned::Legacy(TxLegacy {
        nonce,
        gas_price: 1_000_000_000,
        gas_limit: MIN_TRANSACTION_GAS,
        to: TxKind::Call(address!("658bdf435d810c91414ec09147daa6db62406379")),
        value: U256::from(100u64),
        input: Bytes::default(),
        v: 27,
        r: U256::from(1u64),
        s: U256::from(2u64),
    })
}

/// A withdrawal with the given index.
pub fn withdrawal(index: u64) -> Withdrawal {
    Withdrawal { index, validator_index: index, address: Address::ZERO, amount: 32 }
}

/// A sealed block over the given transactions with consistent header
/// commitments, withdrawals enabled and gas accounted at the intrinsic cost
/// per transaction.
pub fn sealed_block<T: SignedTransaction>(transactions: Vec<T>) -> SealedBlock<T> {
    sealed_block_with_withdrawals(transactions, Some(Vec::new()))
}

/// Like [`sealed_block`] with explicit withdrawals.
pub fn sealed_block_with_withdrawals<T: SignedTransaction>(
    transactions: Vec<T>,
    withdrawals: Option<Vec<Withdrawal>>,
) -> SealedBlock<T> {
    let body = BlockBody { transactions, ommers: Vec::new(), withdrawals };
    let header = Header {
        transactions_root: body.calculate_tx_root(),
        withdrawals_root: body.calculate_withdrawals_root(),
        number: 1,
        gas_limit: 30_000_000,
        gas_used: body.transactions.len() as u64 * MIN_TRANSACTION_GAS,
        timestamp: 1,
        base_fee_per_gas: 7,
        ..Default::default()
    };
    Block { header, body }.seal_slow()
}

/// The payload encoding of a consistent block over the given transactions.
pub fn payload<T: SignedTransaction>(transactions: Vec<T>) -> ExecutionPayload {
    ExecutionPayload::from_block(&sealed_block(transactions))
}
