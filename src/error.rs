use ethers::types::TxHash;
use std::fmt;
use thiserror::Error;

use crate::types::BlockNumber;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptStage {
    EstimateGas,
    Submit,
}

impl fmt::Display for AttemptStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttemptStage::EstimateGas => write!(f, "gas estimation"),
            AttemptStage::Submit => write!(f, "submission"),
        }
    }
}

/// One execution path that could not get a transaction on-chain. These are
/// absorbed by the orchestrator and only surface inside `AllPathsExhausted`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathAttemptFailure {
    pub path: String,
    pub stage: AttemptStage,
    pub reason: String,
}

impl fmt::Display for PathAttemptFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} failed during {}: {}", self.path, self.stage, self.reason)
    }
}

#[derive(Debug, Error)]
pub enum SwapError {
    #[error("invalid {field}: {reason}")]
    InvalidInput { field: &'static str, reason: String },

    #[error(
        "all {} swap attempts failed: no available pool or all transactions reverted",
        .failures.len()
    )]
    AllPathsExhausted { failures: Vec<PathAttemptFailure> },

    #[error("transaction {tx_hash:#x} failed or was reverted")]
    TransactionReverted {
        tx_hash: TxHash,
        block_number: Option<BlockNumber>,
    },

    #[error("could not confirm transaction {tx_hash:#x}: {reason}")]
    ConfirmationFailed { tx_hash: TxHash, reason: String },

    #[error("transaction {tx_hash:#x} confirmed but the token balance could not be read: {reason}")]
    BalanceUnavailable {
        tx_hash: TxHash,
        block_number: Option<BlockNumber>,
        reason: String,
    },
}

impl SwapError {
    pub fn invalid_input(field: &'static str, reason: impl Into<String>) -> Self {
        SwapError::InvalidInput {
            field,
            reason: reason.into(),
        }
    }

    /// The hash of the transaction that made it on-chain, if any.
    pub fn tx_hash(&self) -> Option<TxHash> {
        match self {
            SwapError::TransactionReverted { tx_hash, .. }
            | SwapError::ConfirmationFailed { tx_hash, .. }
            | SwapError::BalanceUnavailable { tx_hash, .. } => Some(*tx_hash),
            SwapError::InvalidInput { .. } | SwapError::AllPathsExhausted { .. } => None,
        }
    }

    /// Block the transaction landed in, when it is known.
    pub fn block_number(&self) -> Option<BlockNumber> {
        match self {
            SwapError::TransactionReverted { block_number, .. }
            | SwapError::BalanceUnavailable { block_number, .. } => *block_number,
            _ => None,
        }
    }
}
