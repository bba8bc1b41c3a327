use alloy_primitives::B256;
use serde::{ser::SerializeMap, Deserialize, Serialize, Serializer};
use std::fmt;

/// The outcome the pipeline reports for a processed payload.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayloadStatus {
    /// The status of the payload.
    #[serde(flatten)]
    pub status: PayloadStatusEnum,
    /// Hash of the most recent valid block in the branch defined by payload
    /// and its ancestors.
    pub latest_valid_hash: Option<B256>,
    /// State commitment produced by executing the payload, only present for
    /// valid payloads.
    #[serde(default)]
    pub state_root: Option<B256>,
}

impl PayloadStatus {
    /// Creates a new payload status with the given latest valid hash.
    pub const fn new(status: PayloadStatusEnum, latest_valid_hash: Option<B256>) -> Self {
        Self { status, latest_valid_hash, state_root: None }
    }

    /// Creates a new payload status without a latest valid hash.
    pub const fn from_status(status: PayloadStatusEnum) -> Self {
        Self { status, latest_valid_hash: None, state_root: None }
    }

    /// Sets the latest valid hash.
    pub const fn with_latest_valid_hash(mut self, latest_valid_hash: B256) -> Self {
        self.latest_valid_hash = Some(latest_valid_hash);
        self
    }

    /// Sets the state root produced by execution.
    pub const fn with_state_root(mut self, state_root: B256) -> Self {
        self.state_root = Some(state_root);
        self
    }

    /// Returns `true` if the payload was accepted as valid.
    pub const fn is_valid(&self) -> bool {
        self.status.is_valid()
    }

    /// Returns `true` if the payload was rejected.
    pub const fn is_invalid(&self) -> bool {
        self.status.is_invalid()
    }

    /// Returns `true` if the node is still syncing and deferred the payload.
    pub const fn is_syncing(&self) -> bool {
        self.status.is_syncing()
    }
}

impl fmt::Display for PayloadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "PayloadStatus {{ status: {}, latestValidHash: {:?}, stateRoot: {:?} }}",
            self.status, self.latest_valid_hash, self.state_root
        )
    }
}

impl Serialize for PayloadStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("status", self.status.as_str())?;
        map.serialize_entry("latestValidHash", &self.latest_valid_hash)?;
        map.serialize_entry("validationError", &self.status.validation_error())?;
        if self.state_root.is_some() {
            map.serialize_entry("stateRoot", &self.state_root)?;
        }
        map.end()
    }
}

/// The per-payload verdict, with the rejection reason attached to the invalid
/// variant.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PayloadStatusEnum {
    /// The payload validated, materialized and executed successfully.
    Valid,
    /// The payload failed at some stage of the pipeline.
    Invalid {
        /// Stage-tagged description of the failure.
        #[serde(rename = "validationError")]
        validation_error: String,
    },
    /// The node is syncing and cannot yet execute the payload.
    Syncing,
    /// The payload passed structural checks and was stashed for later
    /// processing without being executed.
    Accepted,
}

impl PayloadStatusEnum {
    /// Returns the string representation of the status.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Valid => "VALID",
            Self::Invalid { .. } => "INVALID",
            Self::Syncing => "SYNCING",
            Self::Accepted => "ACCEPTED",
        }
    }

    /// Returns the validation error if the status is invalid.
    pub fn validation_error(&self) -> Option<&str> {
        match self {
            Self::Invalid { validation_error } => Some(validation_error),
            _ => None,
        }
    }

    /// Returns `true` if the status is valid.
    pub const fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }

    /// Returns `true` if the status is invalid.
    pub const fn is_invalid(&self) -> bool {
        matches!(self, Self::Invalid { .. })
    }

    /// Returns `true` if the status is syncing.
    pub const fn is_syncing(&self) -> bool {
        matches!(self, Self::Syncing)
    }

    /// Returns `true` if the status is accepted.
    pub const fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted)
    }
}

impl fmt::Display for PayloadStatusEnum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())?;
        if let Some(validation_error) = self.validation_error() {
            write!(f, ": {validation_error}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::b256;

    #[test]
    fn serde_payload_status() {
        let hash = b256!("dede5f6f59f86521aa1cbbf3b981fa08f794302c6e76a4b02b8011cb2bbe5e68");
        let status = PayloadStatus::new(PayloadStatusEnum::Valid, Some(hash));
        let json = serde_json::to_string(&status).unwrap();
        assert_eq!(
            json,
            r#"{"status":"VALID","latestValidHash":"0xdede5f6f59f86521aa1cbbf3b981fa08f794302c6e76a4b02b8011cb2bbe5e68","validationError":null}"#
        );
        assert_eq!(serde_json::from_str::<PayloadStatus>(&json).unwrap(), status);
    }

    #[test]
    fn serde_payload_status_error_deserialize() {
        let s = r#"{"status":"INVALID","latestValidHash":null,"validationError":"rejected at validation: block gas used 22000 exceeds gas limit 21000"}"#;
        let q = PayloadStatus {
            latest_valid_hash: None,
            state_root: None,
            status: PayloadStatusEnum::Invalid {
                validation_error:
                    "rejected at validation: block gas used 22000 exceeds gas limit 21000".into(),
            },
        };
        assert_eq!(q, serde_json::from_str(s).unwrap());
    }

    #[test]
    fn serde_payload_status_state_root() {
        let root = b256!("56e81f171bcc55a6ff8345e692c0f86e5b48e01b996cadc001622fb5e363b421");
        let status = PayloadStatus::from_status(PayloadStatusEnum::Valid).with_state_root(root);
        let json = serde_json::to_string(&status).unwrap();
        assert_eq!(
            json,
            r#"{"status":"VALID","latestValidHash":null,"validationError":null,"stateRoot":"0x56e81f171bcc55a6ff8345e692c0f86e5b48e01b996cadc001622fb5e363b421"}"#
        );
        assert_eq!(serde_json::from_str::<PayloadStatus>(&json).unwrap(), status);
    }

    #[test]
    fn status_display() {
        let status = PayloadStatusEnum::Invalid { validation_error: "oops".into() };
        assert_eq!(status.to_string(), "INVALID: oops");
        assert_eq!(PayloadStatusEnum::Syncing.to_string(), "SYNCING");
    }

    #[test]
    fn status_predicates() {
        assert!(PayloadStatusEnum::Accepted.is_accepted());
        assert!(!PayloadStatusEnum::Valid.is_accepted());
        assert!(PayloadStatus::from_status(PayloadStatusEnum::Accepted).status.is_accepted());
    }
}
