use alloy_primitives::Address;
use alloy_rlp::{RlpDecodable, RlpEncodable};
use serde::{Deserialize, Serialize};

/// Withdrawal represents a validator withdrawal from the consensus layer.
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    RlpEncodable,
    RlpDecodable,
)]
#[serde(rename_all = "camelCase")]
pub struct Withdrawal {
    /// Monotonically increasing identifier issued by the consensus layer.
    pub index: u64,
    /// Index of the validator associated with the withdrawal.
    pub validator_index: u64,
    /// Target address for the withdrawn funds.
    pub address: Address,
    /// Value of the withdrawal in gwei.
    pub amount: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::address;

    #[test]
    fn withdrawal_serde_roundtrip() {
        let input = r#"{"index":5,"validatorIndex":7,"address":"0x6295ee1b4f6dd65047762f924ecd367c17eabf8f","amount":12345}"#;
        let withdrawal: Withdrawal = serde_json::from_str(input).unwrap();
        assert_eq!(withdrawal.address, address!("6295ee1b4f6dd65047762f924ecd367c17eabf8f"));
        assert_eq!(serde_json::to_string(&withdrawal).unwrap(), input);
    }

    #[test]
    fn withdrawal_rlp_roundtrip() {
        let withdrawal = Withdrawal {
            index: 1,
            validator_index: 2,
            address: address!("658bdf435d810c91414ec09147daa6db62406379"),
            amount: 1_000_000,
        };
        let encoded = alloy_rlp::encode(&withdrawal);
        let decoded: Withdrawal = alloy_rlp::decode_exact(&encoded).unwrap();
        assert_eq!(decoded, withdrawal);
    }
}
