use crate::executor::{BlockExecutor, ExecutionOutcome};
use std::fmt;
use tracing::{debug, warn};
use volta_payload_primitives::{ExecutionPayload, PayloadStatus, PayloadStatusEnum};
use volta_payload_validator::{BlockHelper, PayloadValidator};
use volta_primitives::{SealedBlock, B256};

/// The stage a payload fails at, named in its rejection diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    /// Structural payload checks, before any decoding.
    Structural,
    /// Chain spec validation of the helper.
    Validation,
    /// Materialization into a sealed block.
    Materialization,
    /// Execution against the node's state.
    Execution,
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Structural => "structure",
            Self::Validation => "validation",
            Self::Materialization => "materialization",
            Self::Execution => "execution",
        })
    }
}

/// Pipeline behavior toggles.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PipelineConfig {
    /// Re-validate blocks this node built itself before executing them.
    ///
    /// Off by default: local block building already validates, so the
    /// re-check only pays off when hunting builder bugs.
    pub validate_locally_built: bool,
}

/// Drives a payload from receipt to execution.
///
/// Each payload moves through structural checks, chain spec validation,
/// materialization and execution, in that order. The first failing stage
/// rejects the payload with a diagnostic naming the stage, and later stages
/// never run for it.
#[derive(Debug)]
pub struct PayloadPipeline<V, E> {
    validator: V,
    executor: E,
    config: PipelineConfig,
}

impl<V, E> PayloadPipeline<V, E>
where
    V: PayloadValidator,
    E: BlockExecutor<V::Transaction>,
{
    /// Creates a pipeline with the default configuration.
    pub fn new(validator: V, executor: E) -> Self {
        Self::with_config(validator, executor, PipelineConfig::default())
    }

    /// Creates a pipeline with the given configuration.
    pub const fn with_config(validator: V, executor: E, config: PipelineConfig) -> Self {
        Self { validator, executor, config }
    }

    /// The validator this pipeline runs payloads through.
    pub const fn validator(&self) -> &V {
        &self.validator
    }

    /// Validates a payload without materializing or executing it.
    ///
    /// Used when the payload is only stashed for later, e.g. while its branch
    /// is still syncing. Runs the structural and chain spec checks but never
    /// decodes a transaction.
    pub fn accept(&self, payload: ExecutionPayload) -> PayloadStatus {
        let block_hash = payload.block_hash();
        let helper = match self.validator.payload_to_helper(payload) {
            Ok(helper) => helper,
            Err(err) => return self.reject(block_hash, PipelineStage::Structural, &err),
        };
        if let Err(err) = self.validator.validate_helper(&helper) {
            return self.reject(block_hash, PipelineStage::Validation, &err)
        }
        PayloadStatus::from_status(PayloadStatusEnum::Accepted)
    }

    /// Processes a payload received from the consensus layer.
    pub fn process(&self, payload: ExecutionPayload) -> PayloadStatus {
        let block_hash = payload.block_hash();

        let helper = match self.validator.payload_to_helper(payload) {
            Ok(helper) => helper,
            Err(err) => return self.reject(block_hash, PipelineStage::Structural, &err),
        };

        if let Err(err) = self.validator.validate_helper(&helper) {
            return self.reject(block_hash, PipelineStage::Validation, &err)
        }

        let block = match helper.into_block() {
            Ok(block) => block,
            Err(err) => return self.reject(block_hash, PipelineStage::Materialization, &err),
        };

        self.execute(block)
    }

    /// Processes a block this node built itself, skipping payload decoding.
    ///
    /// Validation is optional here, see
    /// [`PipelineConfig::validate_locally_built`].
    pub fn process_block(&self, block: SealedBlock<V::Transaction>) -> PayloadStatus {
        if self.config.validate_locally_built {
            if let Err(err) = self.validator.validate_block(&block) {
                return self.reject(block.hash(), PipelineStage::Validation, &err)
            }
        }
        self.execute(block)
    }

    fn execute(&self, block: SealedBlock<V::Transaction>) -> PayloadStatus {
        let block_hash = block.hash();
        match self.executor.execute(block) {
            Ok(ExecutionOutcome::Executed { state_root }) => {
                debug!(target: "engine", %block_hash, %state_root, "Block executed");
                PayloadStatus::from_status(PayloadStatusEnum::Valid)
                    .with_latest_valid_hash(block_hash)
                    .with_state_root(state_root)
            }
            Ok(ExecutionOutcome::Syncing) => {
                debug!(target: "engine", %block_hash, "Deferring block until sync completes");
                PayloadStatus::from_status(PayloadStatusEnum::Syncing)
            }
            Err(err) => self.reject(block_hash, PipelineStage::Execution, &err),
        }
    }

    fn reject(
        &self,
        block_hash: B256,
        stage: PipelineStage,
        err: &dyn fmt::Display,
    ) -> PayloadStatus {
        warn!(target: "engine", %block_hash, %stage, %err, "Rejecting payload");
        PayloadStatus::from_status(PayloadStatusEnum::Invalid {
            validation_error: format!("rejected at {stage}: {err}"),
        })
    }
}
