//! Protocol constants.

use alloy_primitives::{b256, B256};

/// Keccak-256 hash of the RLP of an empty list, KEC("\xc0").
///
/// This is the `ommers_hash` of every post-merge block.
pub const EMPTY_OMMER_ROOT_HASH: B256 =
    b256!("1dcc4de8dec75d7aab85b567b6ccd41ad312451b948a7413f0a142fd40d49347");

/// Root hash of an empty trie.
pub const EMPTY_ROOT_HASH: B256 =
    b256!("56e81f171bcc55a6ff8345e692c0f86e5b48e01b996cadc001622fb5e363b421");

/// Maximum size of the `extra_data` header field in bytes.
pub const MAXIMUM_EXTRA_DATA_SIZE: usize = 32;

/// Minimum base fee allowed by the protocol.
pub const MIN_PROTOCOL_BASE_FEE: u64 = 7;

/// The minimum amount of gas any transaction consumes. Used to bound the
/// number of transactions that can fit into a block without decoding them.
pub const MIN_TRANSACTION_GAS: u64 = 21_000;
