use alloy_primitives::Bytes;

/// Structural payload errors, detected before any transaction is decoded.
///
/// A payload that trips one of these can never materialize into a block, so
/// the checks run up front when the helper is built.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PayloadError {
    /// Invalid payload extra data.
    #[error("invalid payload extra data: {0}")]
    ExtraData(Bytes),
    /// Invalid payload base fee.
    #[error("invalid payload base fee: {0}")]
    BaseFee(u64),
    /// A transaction entry in the payload is empty.
    #[error("transaction {index} is empty")]
    EmptyTransaction {
        /// Position of the empty entry in the payload's transaction list.
        index: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_the_offender() {
        let err = PayloadError::ExtraData(Bytes::from_static(&[0xaa; 3]));
        assert_eq!(err.to_string(), "invalid payload extra data: 0xaaaaaa");

        let err = PayloadError::EmptyTransaction { index: 2 };
        assert_eq!(err.to_string(), "transaction 2 is empty");
    }
}
