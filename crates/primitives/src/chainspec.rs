use std::fmt;

/// The chain variants this node can run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Chain {
    /// The baseline chain, operating on canonically re-encoded transactions.
    Volta,
    /// The rollup variant, which must preserve original transaction bytes so
    /// that batch inclusion proofs stay byte-exact.
    Rollup,
}

impl fmt::Display for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Volta => f.write_str("volta"),
            Self::Rollup => f.write_str("volta-rollup"),
        }
    }
}

/// Per-chain policy, chosen once at node startup and never mutated afterwards.
///
/// Shared behind an `Arc` by every component that needs it; read-only access
/// requires no synchronization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainSpec {
    /// The chain this spec describes.
    pub chain: Chain,
    /// Timestamp at which withdrawals activate, `None` if the chain never
    /// enables them.
    pub withdrawals_activation: Option<u64>,
}

impl ChainSpec {
    /// Creates a chain spec with the given withdrawals activation.
    pub const fn new(chain: Chain, withdrawals_activation: Option<u64>) -> Self {
        Self { chain, withdrawals_activation }
    }

    /// The baseline chain, withdrawals enabled from genesis.
    pub const fn volta() -> Self {
        Self::new(Chain::Volta, Some(0))
    }

    /// The rollup variant, withdrawals enabled from genesis.
    pub const fn rollup() -> Self {
        Self::new(Chain::Rollup, Some(0))
    }

    /// Returns `true` if withdrawals are active at the given block timestamp.
    pub const fn is_withdrawals_active_at_timestamp(&self, timestamp: u64) -> bool {
        match self.withdrawals_activation {
            Some(activation) => timestamp >= activation,
            None => false,
        }
    }
}
