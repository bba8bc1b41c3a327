use alloy_primitives::{keccak256, Bytes, TxKind, B256, U256};
use alloy_rlp::{BufMut, Decodable, Encodable, RlpDecodable, RlpEncodable};
use std::fmt;

/// Transaction type identifier as it appears on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TxType {
    /// Legacy transaction, encoded as a plain RLP list.
    Legacy = 0,
    /// EIP-1559 dynamic fee transaction, encoded as `0x02 || rlp(fields)`.
    Eip1559 = 2,
}

/// A signed transaction as committed in a block.
///
/// The trait is the seam between the shared block machinery and a chain
/// variant's transaction representation: implementations decide how envelope
/// bytes map to the in-memory value and, crucially, whether re-encoding
/// reproduces the original bytes or a canonical re-serialization.
pub trait SignedTransaction:
    Clone + fmt::Debug + PartialEq + Eq + Send + Sync + Unpin + 'static
{
    /// Returns the transaction type.
    fn tx_type(&self) -> TxType;

    /// Returns the transaction nonce.
    fn nonce(&self) -> u64;

    /// Returns the gas limit of the transaction.
    fn gas_limit(&self) -> u64;

    /// Encodes the transaction into its EIP-2718 envelope representation.
    fn encode_2718(&self, out: &mut dyn BufMut);

    /// Returns the EIP-2718 envelope bytes of this transaction.
    fn encoded_2718(&self) -> Bytes {
        let mut out = Vec::new();
        self.encode_2718(&mut out);
        out.into()
    }

    /// Decodes a transaction from its EIP-2718 envelope representation,
    /// advancing the buffer past the consumed bytes.
    fn decode_2718(buf: &mut &[u8]) -> alloy_rlp::Result<Self>;

    /// Hash of the envelope bytes, uniquely identifying the transaction.
    fn tx_hash(&self) -> B256 {
        keccak256(self.encoded_2718())
    }
}

/// Legacy transaction with its signature values.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, RlpEncodable, RlpDecodable)]
pub struct TxLegacy {
    /// Nonce of the transaction.
    pub nonce: u64,
    /// Gas price the sender is willing to pay.
    pub gas_price: u128,
    /// Gas limit of the transaction.
    pub gas_limit: u64,
    /// Recipient, or create when [`TxKind::Create`].
    pub to: TxKind,
    /// Value transferred.
    pub value: U256,
    /// Input data.
    pub input: Bytes,
    /// Signature recovery value.
    pub v: u64,
    /// Signature r value.
    pub r: U256,
    /// Signature s value.
    pub s: U256,
}

/// EIP-1559 dynamic fee transaction with its signature values.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, RlpEncodable, RlpDecodable)]
pub struct TxEip1559 {
    /// Chain id of the chain the transaction is valid on.
    pub chain_id: u64,
    /// Nonce of the transaction.
    pub nonce: u64,
    /// Maximum priority fee per gas.
    pub max_priority_fee_per_gas: u128,
    /// Maximum total fee per gas.
    pub max_fee_per_gas: u128,
    /// Gas limit of the transaction.
    pub gas_limit: u64,
    /// Recipient, or create when [`TxKind::Create`].
    pub to: TxKind,
    /// Value transferred.
    pub value: U256,
    /// Input data.
    pub input: Bytes,
    /// Signature parity bit.
    pub y_parity: bool,
    /// Signature r value.
    pub r: U256,
    /// Signature s value.
    pub s: U256,
}

/// The canonical signed transaction of the baseline chain.
///
/// Decoding always yields the canonical representation; re-encoding a decoded
/// transaction produces canonical bytes, which for well-formed input are the
/// bytes that were decoded.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TransactionSigned {
    /// Legacy transaction.
    Legacy(TxLegacy),
    /// EIP-1559 dynamic fee transaction.
    Eip1559(TxEip1559),
}

impl TransactionSigned {
    /// Encodes the transaction into the buffer, prefixing typed transactions
    /// with their type byte.
    pub fn encode_enveloped(&self, out: &mut dyn BufMut) {
        match self {
            Self::Legacy(tx) => tx.encode(out),
            Self::Eip1559(tx) => {
                out.put_u8(TxType::Eip1559 as u8);
                tx.encode(out);
            }
        }
    }

    /// Decodes a transaction from envelope bytes, advancing the buffer.
    ///
    /// Legacy transactions are detected by the RLP list prefix; any other
    /// leading byte must be a supported transaction type.
    pub fn decode_enveloped(buf: &mut &[u8]) -> alloy_rlp::Result<Self> {
        let first = *buf.first().ok_or(alloy_rlp::Error::InputTooShort)?;
        if first >= 0xc0 {
            return Ok(Self::Legacy(TxLegacy::decode(buf)?))
        }
        if first == TxType::Eip1559 as u8 {
            *buf = &buf[1..];
            return Ok(Self::Eip1559(TxEip1559::decode(buf)?))
        }
        Err(alloy_rlp::Error::Custom("unsupported transaction type"))
    }
}

impl SignedTransaction for TransactionSigned {
    fn tx_type(&self) -> TxType {
        match self {
            Self::Legacy(_) => TxType::Legacy,
            Self::Eip1559(_) => TxType::Eip1559,
        }
    }

    fn nonce(&self) -> u64 {
        match self {
            Self::Legacy(tx) => tx.nonce,
            Self::Eip1559(tx) => tx.nonce,
        }
    }

    fn gas_limit(&self) -> u64 {
        match self {
            Self::Legacy(tx) => tx.gas_limit,
            Self::Eip1559(tx) => tx.gas_limit,
        }
    }

    fn encode_2718(&self, out: &mut dyn BufMut) {
        self.encode_enveloped(out)
    }

    fn decode_2718(buf: &mut &[u8]) -> alloy_rlp::Result<Self> {
        Self::decode_enveloped(buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::address;
    use assert_matches::assert_matches;

    fn legacy_tx(nonce: u64) -> TransactionSigned {
        TransactionSigned::Legacy(TxLegacy {
            nonce,
            gas_price: 1_000_000_000,
            gas_limit: 21_000,
            to: TxKind::Call(address!("658bdf435d810c91414ec09147daa6db62406379")),
            value: U256::from(1000u64),
            input: Bytes::default(),
            v: 27,
            r: U256::from(1u64),
            s: U256::from(2u64),
        })
    }

    fn dynamic_fee_tx(nonce: u64) -> TransactionSigned {
        TransactionSigned::Eip1559(TxEip1559 {
            chain_id: 7077,
            nonce,
            max_priority_fee_per_gas: 1_000_000,
            max_fee_per_gas: 50_000_000_000,
            gas_limit: 100_000,
            to: TxKind::Create,
            value: U256::ZERO,
            input: Bytes::from_static(&[0xca, 0xfe]),
            y_parity: true,
            r: U256::from(3u64),
            s: U256::from(4u64),
        })
    }

    #[test]
    fn legacy_envelope_roundtrip() {
        let tx = legacy_tx(0);
        let encoded = tx.encoded_2718();
        // legacy envelopes are plain RLP lists
        assert!(encoded[0] >= 0xc0);

        let mut buf = encoded.as_ref();
        let decoded = TransactionSigned::decode_2718(&mut buf).unwrap();
        assert!(buf.is_empty());
        assert_eq!(decoded, tx);
        assert_eq!(decoded.encoded_2718(), encoded);
    }

    #[test]
    fn eip1559_envelope_roundtrip() {
        let tx = dynamic_fee_tx(9);
        let encoded = tx.encoded_2718();
        assert_eq!(encoded[0], TxType::Eip1559 as u8);

        let mut buf = encoded.as_ref();
        let decoded = TransactionSigned::decode_2718(&mut buf).unwrap();
        assert!(buf.is_empty());
        assert_eq!(decoded, tx);
        assert_eq!(decoded.tx_hash(), keccak256(&encoded));
    }

    #[test]
    fn rejects_unknown_type_byte() {
        let bytes = [0x03u8, 0x01, 0x02];
        assert_matches!(
            TransactionSigned::decode_2718(&mut &bytes[..]),
            Err(alloy_rlp::Error::Custom(_))
        );
    }

    #[test]
    fn rejects_empty_input() {
        assert_matches!(
            TransactionSigned::decode_2718(&mut &[][..]),
            Err(alloy_rlp::Error::InputTooShort)
        );
    }

    #[test]
    fn truncated_envelope_fails() {
        let encoded = legacy_tx(1).encoded_2718();
        let truncated = &encoded[..encoded.len() - 2];
        assert!(TransactionSigned::decode_2718(&mut &truncated[..]).is_err());
    }
}
