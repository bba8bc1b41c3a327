//! Helper functions for calculating Merkle proofs and hashes.

use crate::{Header, SignedTransaction, Withdrawal};
use alloy_primitives::{keccak256, B256};
use alloy_rlp::Encodable;
use alloy_trie::{HashBuilder, Nibbles};
use bytes::{BufMut, BytesMut};

/// Adjust the index of an item for rlp encoding.
pub const fn adjust_index_for_rlp(i: usize, len: usize) -> usize {
    if i > 0x7f {
        i
    } else if i == 0x7f || i + 1 == len {
        0
    } else {
        i + 1
    }
}

/// Compute a trie root of the collection of rlp encodable items.
pub fn ordered_trie_root<T: Encodable>(items: &[T]) -> B256 {
    ordered_trie_root_with_encoder(items, |item, buf| item.encode(buf))
}

/// Compute a trie root of the collection of items with a custom encoder.
pub fn ordered_trie_root_with_encoder<T, F>(items: &[T], mut encode: F) -> B256
where
    F: FnMut(&T, &mut dyn BufMut),
{
    let mut index_buffer = BytesMut::new();
    let mut value_buffer = BytesMut::new();

    let mut hb = HashBuilder::default();
    let items_len = items.len();
    for i in 0..items_len {
        let index = adjust_index_for_rlp(i, items_len);

        index_buffer.clear();
        index.encode(&mut index_buffer);

        value_buffer.clear();
        encode(&items[index], &mut value_buffer);

        hb.add_leaf(Nibbles::unpack(&index_buffer), &value_buffer);
    }

    hb.root()
}

/// Calculate a transaction root.
///
/// `(rlp(index), envelope(tx))` pairs.
pub fn calculate_transaction_root<T: SignedTransaction>(transactions: &[T]) -> B256 {
    ordered_trie_root_with_encoder(transactions, |tx, buf| tx.encode_2718(buf))
}

/// Calculates the root hash of the withdrawals.
pub fn calculate_withdrawals_root(withdrawals: &[Withdrawal]) -> B256 {
    ordered_trie_root(withdrawals)
}

/// Calculates the root hash for ommer/uncle headers.
pub fn calculate_ommers_root(ommers: &[Header]) -> B256 {
    let mut ommers_rlp = Vec::new();
    alloy_rlp::encode_list(ommers, &mut ommers_rlp);
    keccak256(ommers_rlp)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        constants::{EMPTY_OMMER_ROOT_HASH, EMPTY_ROOT_HASH},
        TransactionSigned, TxLegacy,
    };

    #[test]
    fn empty_roots_match_known_constants() {
        assert_eq!(calculate_transaction_root::<TransactionSigned>(&[]), EMPTY_ROOT_HASH);
        assert_eq!(calculate_withdrawals_root(&[]), EMPTY_ROOT_HASH);
        assert_eq!(calculate_ommers_root(&[]), EMPTY_OMMER_ROOT_HASH);
    }

    #[test]
    fn transaction_root_is_order_sensitive() {
        let txs: Vec<TransactionSigned> = (0..3)
            .map(|nonce| TransactionSigned::Legacy(TxLegacy { nonce, ..Default::default() }))
            .collect();
        let root = calculate_transaction_root(&txs);

        let mut reversed = txs;
        reversed.reverse();
        assert_ne!(calculate_transaction_root(&reversed), root);
    }

    #[test]
    fn withdrawals_root_changes_with_amount() {
        let withdrawal = Withdrawal { index: 0, validator_index: 0, amount: 1, ..Default::default() };
        let root = calculate_withdrawals_root(std::slice::from_ref(&withdrawal));

        let other = Withdrawal { amount: 2, ..withdrawal };
        assert_ne!(calculate_withdrawals_root(&[other]), root);
    }
}
