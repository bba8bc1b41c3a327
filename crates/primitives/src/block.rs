use crate::{proofs, Header, SealedHeader, SignedTransaction, TransactionSigned, Withdrawal};
use alloy_primitives::B256;
use std::ops::Deref;

/// A full block: header plus body.
///
/// Generic over the signed transaction representation so chain variants that
/// must preserve original envelope bytes can carry them through the block.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Block<T = TransactionSigned> {
    /// Block header.
    pub header: Header,
    /// Block body.
    pub body: BlockBody<T>,
}

impl<T: SignedTransaction> Block<T> {
    /// Seal the block with a known hash.
    ///
    /// WARNING: This method does not verify that the hash is correct.
    pub fn seal(self, hash: B256) -> SealedBlock<T> {
        SealedBlock { header: self.header.seal(hash), body: self.body }
    }

    /// Calculate the header hash and seal the block so that it can't be changed.
    pub fn seal_slow(self) -> SealedBlock<T> {
        SealedBlock { header: self.header.seal_slow(), body: self.body }
    }
}

impl<T> Deref for Block<T> {
    type Target = Header;

    fn deref(&self) -> &Self::Target {
        &self.header
    }
}

/// A block body: the transactions, ommers and withdrawals committed in a block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockBody<T = TransactionSigned> {
    /// Transactions in the block.
    pub transactions: Vec<T>,
    /// Ommer/uncle headers.
    pub ommers: Vec<Header>,
    /// Block withdrawals, `None` before the withdrawals activation of the chain.
    pub withdrawals: Option<Vec<Withdrawal>>,
}

impl<T: SignedTransaction> BlockBody<T> {
    /// Calculate the transaction root for the block body.
    pub fn calculate_tx_root(&self) -> B256 {
        proofs::calculate_transaction_root(&self.transactions)
    }

    /// Calculate the ommers root for the block body.
    pub fn calculate_ommers_root(&self) -> B256 {
        proofs::calculate_ommers_root(&self.ommers)
    }

    /// Calculate the withdrawals root for the block body, if withdrawals exist.
    pub fn calculate_withdrawals_root(&self) -> Option<B256> {
        self.withdrawals.as_deref().map(proofs::calculate_withdrawals_root)
    }
}

impl<T> Default for BlockBody<T> {
    fn default() -> Self {
        Self { transactions: Vec::new(), ommers: Vec::new(), withdrawals: None }
    }
}

/// A block with a sealed header, ready for execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SealedBlock<T = TransactionSigned> {
    /// Locked block header.
    pub header: SealedHeader,
    /// Block body.
    pub body: BlockBody<T>,
}

impl<T: SignedTransaction> SealedBlock<T> {
    /// Header hash.
    #[inline]
    pub const fn hash(&self) -> B256 {
        self.header.hash()
    }

    /// Returns the number of transactions in the block.
    pub fn transaction_count(&self) -> usize {
        self.body.transactions.len()
    }

    /// Unseal the block, allowing the header to be modified again.
    pub fn unseal(self) -> Block<T> {
        Block { header: self.header.unseal(), body: self.body }
    }
}

impl<T> Deref for SealedBlock<T> {
    type Target = SealedHeader;

    fn deref(&self) -> &Self::Target {
        &self.header
    }
}
