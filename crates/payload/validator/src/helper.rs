use crate::error::{MaterializationError, TransactionDecodeError};
use std::cell::OnceCell;
use volta_payload_primitives::{ExecutionPayload, PayloadError};
use volta_primitives::{
    constants::{EMPTY_OMMER_ROOT_HASH, MAXIMUM_EXTRA_DATA_SIZE, MIN_PROTOCOL_BASE_FEE},
    Block, BlockBody, Header, SealedBlock, SignedTransaction, TransactionSigned, Withdrawal, B256,
    B64, U256,
};

/// Read access to a block under validation, independent of whether it arrived
/// as a payload from the network or as a locally built block.
///
/// Header fields are always available without decoding anything. Transaction
/// access may decode on demand and is therefore fallible per index.
pub trait BlockHelper<T: SignedTransaction> {
    /// Hash the block is committed under.
    fn block_hash(&self) -> B256;

    /// Number of the block.
    fn block_number(&self) -> u64;

    /// Timestamp of the block.
    fn timestamp(&self) -> u64;

    /// Gas limit of the block.
    fn gas_limit(&self) -> u64;

    /// Gas used by the block.
    fn gas_used(&self) -> u64;

    /// Number of transactions committed in the block.
    fn transaction_count(&self) -> usize;

    /// Withdrawals committed in the block, `None` before the withdrawals
    /// activation.
    fn withdrawals(&self) -> Option<&[Withdrawal]>;

    /// The payload this helper was built from, `None` if it wraps an already
    /// materialized block.
    fn encoded_payload(&self) -> Option<&ExecutionPayload>;

    /// Returns the decoded transaction at `index`, decoding it on first
    /// access. `None` if the index is out of range.
    fn transaction(&self, index: usize) -> Option<Result<&T, TransactionDecodeError>>;

    /// Returns all decoded transactions in payload order, failing on the
    /// first transaction that does not decode.
    fn transactions(&self) -> Result<Vec<&T>, TransactionDecodeError> {
        (0..self.transaction_count())
            .map(|index| {
                self.transaction(index).expect("index bounded by transaction_count")
            })
            .collect()
    }

    /// Materializes the sealed block, decoding any transactions not yet
    /// decoded and verifying the committed block hash.
    fn into_block(self) -> Result<SealedBlock<T>, MaterializationError>;
}

/// Decodes one enveloped transaction, rejecting trailing bytes.
fn decode_envelope<T: SignedTransaction>(
    bytes: &[u8],
    index: usize,
) -> Result<T, TransactionDecodeError> {
    let mut buf = bytes;
    let tx = T::decode_2718(&mut buf)
        .map_err(|source| TransactionDecodeError { index, source })?;
    if !buf.is_empty() {
        return Err(TransactionDecodeError { index, source: alloy_rlp::Error::UnexpectedLength })
    }
    Ok(tx)
}

#[derive(Debug)]
enum HelperOrigin<T> {
    /// Wraps a received payload; transactions decode lazily into the cells.
    Payload { payload: ExecutionPayload, decoded: Vec<OnceCell<T>> },
    /// Wraps a block that already exists in decoded form.
    Block(SealedBlock<T>),
}

/// The canonical [`BlockHelper`], backed either by an [`ExecutionPayload`] or
/// by an already materialized [`SealedBlock`].
///
/// When payload-backed, each transaction is decoded at most once and only
/// when first asked for, so purely header-level validation never touches the
/// transaction bytes.
#[derive(Debug)]
pub struct PayloadBlockHelper<T = TransactionSigned> {
    origin: HelperOrigin<T>,
}

impl<T: SignedTransaction> PayloadBlockHelper<T> {
    /// Wraps a payload after checking its structure.
    ///
    /// Structural checks are version independent: oversized extra data, a
    /// base fee below the protocol minimum and empty transaction entries are
    /// invalid in every payload version.
    pub fn from_payload(payload: ExecutionPayload) -> Result<Self, PayloadError> {
        if payload.extra_data().len() > MAXIMUM_EXTRA_DATA_SIZE {
            return Err(PayloadError::ExtraData(payload.extra_data().clone()))
        }
        if payload.base_fee_per_gas() < MIN_PROTOCOL_BASE_FEE {
            return Err(PayloadError::BaseFee(payload.base_fee_per_gas()))
        }
        if let Some(index) = payload.transactions().iter().position(|tx| tx.is_empty()) {
            return Err(PayloadError::EmptyTransaction { index })
        }
        let decoded = (0..payload.transactions().len()).map(|_| OnceCell::new()).collect();
        Ok(Self { origin: HelperOrigin::Payload { payload, decoded } })
    }

    /// Wraps an already materialized block, e.g. one built locally.
    pub const fn from_block(block: SealedBlock<T>) -> Self {
        Self { origin: HelperOrigin::Block(block) }
    }

    /// Number of transactions decoded so far.
    pub fn decoded_transaction_count(&self) -> usize {
        match &self.origin {
            HelperOrigin::Payload { decoded, .. } => {
                decoded.iter().filter(|cell| cell.get().is_some()).count()
            }
            HelperOrigin::Block(block) => block.transaction_count(),
        }
    }
}

impl<T: SignedTransaction> BlockHelper<T> for PayloadBlockHelper<T> {
    fn block_hash(&self) -> B256 {
        match &self.origin {
            HelperOrigin::Payload { payload, .. } => payload.block_hash(),
            HelperOrigin::Block(block) => block.hash(),
        }
    }

    fn block_number(&self) -> u64 {
        match &self.origin {
            HelperOrigin::Payload { payload, .. } => payload.block_number(),
            HelperOrigin::Block(block) => block.number,
        }
    }

    fn timestamp(&self) -> u64 {
        match &self.origin {
            HelperOrigin::Payload { payload, .. } => payload.timestamp(),
            HelperOrigin::Block(block) => block.timestamp,
        }
    }

    fn gas_limit(&self) -> u64 {
        match &self.origin {
            HelperOrigin::Payload { payload, .. } => payload.gas_limit(),
            HelperOrigin::Block(block) => block.gas_limit,
        }
    }

    fn gas_used(&self) -> u64 {
        match &self.origin {
            HelperOrigin::Payload { payload, .. } => payload.gas_used(),
            HelperOrigin::Block(block) => block.gas_used,
        }
    }

    fn transaction_count(&self) -> usize {
        match &self.origin {
            HelperOrigin::Payload { payload, .. } => payload.transactions().len(),
            HelperOrigin::Block(block) => block.transaction_count(),
        }
    }

    fn withdrawals(&self) -> Option<&[Withdrawal]> {
        match &self.origin {
            HelperOrigin::Payload { payload, .. } => payload.withdrawals(),
            HelperOrigin::Block(block) => block.body.withdrawals.as_deref(),
        }
    }

    fn encoded_payload(&self) -> Option<&ExecutionPayload> {
        match &self.origin {
            HelperOrigin::Payload { payload, .. } => Some(payload),
            HelperOrigin::Block(_) => None,
        }
    }

    fn transaction(&self, index: usize) -> Option<Result<&T, TransactionDecodeError>> {
        match &self.origin {
            HelperOrigin::Payload { payload, decoded } => {
                let cell = decoded.get(index)?;
                if cell.get().is_none() {
                    match decode_envelope(&payload.transactions()[index], index) {
                        Ok(tx) => {
                            let _ = cell.set(tx);
                        }
                        Err(err) => return Some(Err(err)),
                    }
                }
                Some(Ok(cell.get().expect("cell initialized above")))
            }
            HelperOrigin::Block(block) => block.body.transactions.get(index).map(Ok),
        }
    }

    fn into_block(self) -> Result<SealedBlock<T>, MaterializationError> {
        let (payload, decoded) = match self.origin {
            HelperOrigin::Payload { payload, decoded } => (payload, decoded),
            HelperOrigin::Block(block) => return Ok(block),
        };

        let mut transactions = Vec::with_capacity(payload.transactions().len());
        for (index, (bytes, cell)) in
            payload.transactions().iter().zip(decoded).enumerate()
        {
            let tx = match cell.into_inner() {
                Some(tx) => tx,
                None => decode_envelope(bytes, index)?,
            };
            transactions.push(tx);
        }

        let body = BlockBody {
            transactions,
            ommers: Vec::new(),
            withdrawals: payload.withdrawals().map(<[Withdrawal]>::to_vec),
        };
        let inner = payload.as_v1();
        let header = Header {
            parent_hash: inner.parent_hash,
            ommers_hash: EMPTY_OMMER_ROOT_HASH,
            beneficiary: inner.fee_recipient,
            state_root: inner.state_root,
            transactions_root: body.calculate_tx_root(),
            receipts_root: inner.receipts_root,
            withdrawals_root: body.calculate_withdrawals_root(),
            logs_bloom: inner.logs_bloom,
            difficulty: U256::ZERO,
            number: inner.block_number,
            gas_limit: inner.gas_limit,
            gas_used: inner.gas_used,
            timestamp: inner.timestamp,
            mix_hash: inner.prev_randao,
            nonce: B64::ZERO,
            base_fee_per_gas: inner.base_fee_per_gas,
            extra_data: inner.extra_data.clone(),
        };

        let block = Block { header, body }.seal_slow();
        if block.hash() != payload.block_hash() {
            return Err(MaterializationError::BlockHash {
                execution: block.hash(),
                consensus: payload.block_hash(),
            })
        }
        Ok(block)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{payload, sealed_block, transaction};
    use alloy_primitives::Bytes;
    use assert_matches::assert_matches;

    fn corrupt_transaction(payload: &mut ExecutionPayload, index: usize, bytes: Bytes) {
        match payload {
            ExecutionPayload::V1(p) => p.transactions[index] = bytes,
            ExecutionPayload::V2(p) => p.payload_inner.transactions[index] = bytes,
        }
    }

    #[test]
    fn rejects_oversized_extra_data() {
        let mut p = payload(vec![transaction(0)]);
        match &mut p {
            ExecutionPayload::V2(p) => {
                p.payload_inner.extra_data = Bytes::from(vec![0u8; 33]);
            }
            ExecutionPayload::V1(_) => unreachable!("builder enables withdrawals"),
        }
        assert_matches!(
            PayloadBlockHelper::<TransactionSigned>::from_payload(p),
            Err(PayloadError::ExtraData(_))
        );
    }

    #[test]
    fn rejects_sub_minimum_base_fee() {
        let mut p = payload::<TransactionSigned>(Vec::new());
        match &mut p {
            ExecutionPayload::V2(p) => p.payload_inner.base_fee_per_gas = 6,
            ExecutionPayload::V1(_) => unreachable!("builder enables withdrawals"),
        }
        assert_matches!(
            PayloadBlockHelper::<TransactionSigned>::from_payload(p),
            Err(PayloadError::BaseFee(6))
        );
    }

    #[test]
    fn rejects_empty_transaction_entry() {
        let mut p = payload(vec![transaction(0), transaction(1)]);
        corrupt_transaction(&mut p, 1, Bytes::new());
        assert_matches!(
            PayloadBlockHelper::<TransactionSigned>::from_payload(p),
            Err(PayloadError::EmptyTransaction { index: 1 })
        );
    }

    #[test]
    fn decodes_lazily_and_once() {
        let helper: PayloadBlockHelper =
            PayloadBlockHelper::from_payload(payload(vec![transaction(0), transaction(1)]))
                .unwrap();
        assert_eq!(helper.decoded_transaction_count(), 0);

        let first = helper.transaction(0).unwrap().unwrap().clone();
        assert_eq!(helper.decoded_transaction_count(), 1);

        // repeated access reuses the cached decode
        assert_eq!(helper.transaction(0).unwrap().unwrap(), &first);
        assert_eq!(helper.decoded_transaction_count(), 1);

        assert_eq!(helper.transactions().unwrap().len(), 2);
        assert_eq!(helper.decoded_transaction_count(), 2);
    }

    #[test]
    fn out_of_range_index_is_none() {
        let helper: PayloadBlockHelper =
            PayloadBlockHelper::from_payload(payload(vec![transaction(0)])).unwrap();
        assert!(helper.transaction(1).is_none());
    }

    #[test]
    fn corrupt_entry_fails_without_poisoning_neighbors() {
        let mut p = payload(vec![transaction(0), transaction(1), transaction(2)]);
        corrupt_transaction(&mut p, 1, Bytes::from_static(&[0x03, 0x01]));

        let helper: PayloadBlockHelper = PayloadBlockHelper::from_payload(p).unwrap();
        assert!(helper.transaction(0).unwrap().is_ok());
        assert!(helper.transaction(2).unwrap().is_ok());

        let err = helper.transaction(1).unwrap().unwrap_err();
        assert_eq!(err.index, 1);

        // the error is not cached as a decode
        assert_eq!(helper.decoded_transaction_count(), 2);
        assert_matches!(
            helper.transactions(),
            Err(TransactionDecodeError { index: 1, .. })
        );
    }

    #[test]
    fn rejects_trailing_bytes_in_envelope() {
        let mut padded = transaction(0).encoded_2718().to_vec();
        padded.push(0x00);
        let mut p = payload(vec![transaction(0)]);
        corrupt_transaction(&mut p, 0, padded.into());

        let helper: PayloadBlockHelper = PayloadBlockHelper::from_payload(p).unwrap();
        let err = helper.transaction(0).unwrap().unwrap_err();
        assert_eq!(err.source, alloy_rlp::Error::UnexpectedLength);
    }

    #[test]
    fn materializes_consistent_payload() {
        let block = sealed_block(vec![transaction(0), transaction(1)]);
        let p = ExecutionPayload::from_block(&block);

        let helper: PayloadBlockHelper = PayloadBlockHelper::from_payload(p).unwrap();
        assert_eq!(helper.block_hash(), block.hash());
        assert_eq!(helper.into_block().unwrap(), block);
    }

    #[test]
    fn detects_block_hash_mismatch() {
        let mut p = payload(vec![transaction(0)]);
        match &mut p {
            ExecutionPayload::V2(p) => p.payload_inner.block_hash = B256::ZERO,
            ExecutionPayload::V1(_) => unreachable!("builder enables withdrawals"),
        }
        let helper: PayloadBlockHelper = PayloadBlockHelper::from_payload(p).unwrap();
        assert_matches!(
            helper.into_block(),
            Err(MaterializationError::BlockHash { consensus, .. }) if consensus == B256::ZERO
        );
    }

    #[test]
    fn block_origin_has_no_encoded_payload() {
        let block = sealed_block(vec![transaction(0)]);
        let helper = PayloadBlockHelper::from_block(block.clone());
        assert!(helper.encoded_payload().is_none());
        assert_eq!(helper.decoded_transaction_count(), 1);
        assert_eq!(helper.transaction_count(), 1);
        assert_eq!(helper.into_block().unwrap(), block);

        let from_payload: PayloadBlockHelper =
            PayloadBlockHelper::from_payload(ExecutionPayload::from_block(&block)).unwrap();
        assert!(from_payload.encoded_payload().is_some());
    }

    #[test]
    fn empty_payload_materializes_empty_block() {
        let p = payload::<TransactionSigned>(Vec::new());
        let helper: PayloadBlockHelper = PayloadBlockHelper::from_payload(p).unwrap();
        assert_eq!(helper.transaction_count(), 0);
        let block = helper.into_block().unwrap();
        assert_eq!(block.transaction_count(), 0);
        assert_eq!(block.body.withdrawals, Some(Vec::new()));
    }
}
