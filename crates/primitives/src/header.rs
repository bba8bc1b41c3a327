use crate::constants::{EMPTY_OMMER_ROOT_HASH, EMPTY_ROOT_HASH};
use alloy_primitives::{keccak256, Address, Bloom, Bytes, B256, B64, U256};
use alloy_rlp::{length_of_length, Encodable};
use bytes::BufMut;
use std::ops::Deref;

/// Block header.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Header {
    /// The Keccak 256-bit hash of the parent block's header, in its entirety.
    pub parent_hash: B256,
    /// The Keccak 256-bit hash of the ommers list portion of this block.
    pub ommers_hash: B256,
    /// The 160-bit address to which priority fees from this block are transferred.
    pub beneficiary: Address,
    /// The Keccak 256-bit hash of the root node of the state trie, after all transactions are
    /// executed and finalisations applied.
    pub state_root: B256,
    /// The Keccak 256-bit hash of the root node of the trie structure populated with each
    /// transaction in the transactions list portion of the block.
    pub transactions_root: B256,
    /// The Keccak 256-bit hash of the root node of the trie structure populated with the receipts
    /// of each transaction in the transactions list portion of the block.
    pub receipts_root: B256,
    /// The Keccak 256-bit hash of the withdrawals list portion of this block.
    ///
    /// `None` before the withdrawals activation of the chain.
    pub withdrawals_root: Option<B256>,
    /// The Bloom filter composed from indexable information contained in each log entry from the
    /// receipt of each transaction in the transactions list.
    pub logs_bloom: Bloom,
    /// A scalar value corresponding to the difficulty level of this block. Zero on every
    /// consensus-driven chain.
    pub difficulty: U256,
    /// A scalar value equal to the number of ancestor blocks. The genesis block has a number of
    /// zero.
    pub number: u64,
    /// A scalar value equal to the current limit of gas expenditure per block.
    pub gas_limit: u64,
    /// A scalar value equal to the total gas used in transactions in this block.
    pub gas_used: u64,
    /// A scalar value equal to the reasonable output of Unix's time() at this block's inception.
    pub timestamp: u64,
    /// The randomness beacon value of the slot this block was proposed in.
    pub mix_hash: B256,
    /// A 64-bit value that is always zero post-merge; retained for header compatibility.
    pub nonce: B64,
    /// A scalar representing the EIP-1559 base fee of this block, moving up or down according to
    /// the gas used by the parent block.
    pub base_fee_per_gas: u64,
    /// An arbitrary byte array containing data relevant to this block. This must be 32 bytes or
    /// fewer.
    pub extra_data: Bytes,
}

impl Default for Header {
    fn default() -> Self {
        Self {
            parent_hash: Default::default(),
            ommers_hash: EMPTY_OMMER_ROOT_HASH,
            beneficiary: Default::default(),
            state_root: EMPTY_ROOT_HASH,
            transactions_root: EMPTY_ROOT_HASH,
            receipts_root: EMPTY_ROOT_HASH,
            withdrawals_root: None,
            logs_bloom: Default::default(),
            difficulty: Default::default(),
            number: 0,
            gas_limit: 0,
            gas_used: 0,
            timestamp: 0,
            mix_hash: Default::default(),
            nonce: B64::ZERO,
            base_fee_per_gas: 0,
            extra_data: Default::default(),
        }
    }
}

impl Header {
    /// Heavy function that will calculate the hash of the fully encoded header.
    ///
    /// Use [`Header::seal_slow`] and [`SealedHeader`] if the hash should stick to the header.
    pub fn hash_slow(&self) -> B256 {
        keccak256(alloy_rlp::encode(self))
    }

    /// Seal the header with a known hash.
    ///
    /// WARNING: This method does not verify that the hash is correct.
    #[inline]
    pub const fn seal(self, hash: B256) -> SealedHeader {
        SealedHeader { header: self, hash }
    }

    /// Calculate the hash and seal the header so that it can't be changed.
    #[inline]
    pub fn seal_slow(self) -> SealedHeader {
        let hash = self.hash_slow();
        self.seal(hash)
    }

    /// Check if the ommers hash equals the hash of an empty list.
    pub fn ommers_hash_is_empty(&self) -> bool {
        self.ommers_hash == EMPTY_OMMER_ROOT_HASH
    }

    /// Check if the transactions root equals the empty trie root.
    pub fn transaction_root_is_empty(&self) -> bool {
        self.transactions_root == EMPTY_ROOT_HASH
    }

    fn header_payload_length(&self) -> usize {
        let mut length = 0;
        length += self.parent_hash.length();
        length += self.ommers_hash.length();
        length += self.beneficiary.length();
        length += self.state_root.length();
        length += self.transactions_root.length();
        length += self.receipts_root.length();
        length += self.logs_bloom.length();
        length += self.difficulty.length();
        length += self.number.length();
        length += self.gas_limit.length();
        length += self.gas_used.length();
        length += self.timestamp.length();
        length += self.extra_data.length();
        length += self.mix_hash.length();
        length += self.nonce.length();
        length += self.base_fee_per_gas.length();
        if let Some(root) = self.withdrawals_root {
            length += root.length();
        }
        length
    }
}

impl Encodable for Header {
    fn encode(&self, out: &mut dyn BufMut) {
        let list_header =
            alloy_rlp::Header { list: true, payload_length: self.header_payload_length() };
        list_header.encode(out);
        self.parent_hash.encode(out);
        self.ommers_hash.encode(out);
        self.beneficiary.encode(out);
        self.state_root.encode(out);
        self.transactions_root.encode(out);
        self.receipts_root.encode(out);
        self.logs_bloom.encode(out);
        self.difficulty.encode(out);
        self.number.encode(out);
        self.gas_limit.encode(out);
        self.gas_used.encode(out);
        self.timestamp.encode(out);
        self.extra_data.encode(out);
        self.mix_hash.encode(out);
        self.nonce.encode(out);
        self.base_fee_per_gas.encode(out);
        // Trailing optional field, omitted entirely before activation.
        if let Some(root) = self.withdrawals_root {
            root.encode(out);
        }
    }

    fn length(&self) -> usize {
        let payload_length = self.header_payload_length();
        payload_length + length_of_length(payload_length)
    }
}

/// A [`Header`] that is sealed at a precalculated hash, use [`SealedHeader::unseal`] if you want
/// to modify the header.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SealedHeader {
    /// Locked header fields.
    header: Header,
    /// Locked header hash.
    hash: B256,
}

impl SealedHeader {
    /// Creates a sealed header from a precalculated hash.
    pub const fn new(header: Header, hash: B256) -> Self {
        Self { header, hash }
    }

    /// Returns the sealed header hash.
    #[inline]
    pub const fn hash(&self) -> B256 {
        self.hash
    }

    /// Returns a reference to the sealed header fields.
    #[inline]
    pub const fn header(&self) -> &Header {
        &self.header
    }

    /// Extract the raw header, allowing it to be modified again.
    pub fn unseal(self) -> Header {
        self.header
    }
}

impl Deref for SealedHeader {
    type Target = Header;

    fn deref(&self) -> &Self::Target {
        &self.header
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_slow_matches_sealed_hash() {
        let header = Header { number: 100, gas_limit: 30_000_000, ..Default::default() };
        let expected = keccak256(alloy_rlp::encode(&header));
        let sealed = header.seal_slow();
        assert_eq!(sealed.hash(), expected);
        assert_eq!(sealed.header().number, 100);
        assert_eq!(sealed.unseal().hash_slow(), expected);
    }

    #[test]
    fn default_header_commits_to_empty_body() {
        let header = Header::default();
        assert!(header.ommers_hash_is_empty());
        assert!(header.transaction_root_is_empty());

        let full = Header { transactions_root: B256::ZERO, ..Default::default() };
        assert!(!full.transaction_root_is_empty());
    }

    #[test]
    fn withdrawals_root_is_trailing_optional() {
        let without = Header::default();
        let with = Header { withdrawals_root: Some(EMPTY_ROOT_HASH), ..Default::default() };

        let encoded_without = alloy_rlp::encode(&without);
        let encoded_with = alloy_rlp::encode(&with);

        // A present root adds exactly one 32-byte string item.
        assert_eq!(encoded_with.len(), encoded_without.len() + 33);
        assert_ne!(without.hash_slow(), with.hash_slow());
    }

    #[test]
    fn declared_length_matches_encoding() {
        let header = Header {
            number: 1,
            gas_limit: 30_000_000,
            gas_used: 21_000,
            base_fee_per_gas: 7,
            withdrawals_root: Some(EMPTY_ROOT_HASH),
            extra_data: Bytes::from_static(b"volta"),
            ..Default::default()
        };
        assert_eq!(header.length(), alloy_rlp::encode(&header).len());
    }
}
