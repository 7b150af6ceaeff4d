//! Staking workflow error taxonomy.

use thiserror::Error;

use crate::blockchain::BlockchainError;

/// Message used when the API fails without saying why.
pub const UNKNOWN_API_ERROR: &str = "Unknown API error";

/// Errors surfaced by the staking workflow.
#[derive(Debug, Error)]
pub enum StakingError {
    /// The client was used out of order (e.g. no open session).
    #[error("Usage error: {0}")]
    Usage(String),

    /// The staking API answered with a non-success status.
    #[error("API Error: {message}")]
    Api { status: u16, message: String },

    /// The staking API answered successfully but the body was not usable.
    #[error("Malformed API response: {0}")]
    MalformedResponse(String),

    /// Transport failure talking to the staking API.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Wallet balance is below the configured minimum.
    #[error("Insufficient balance. Need at least {required_sol} SOL (have {balance_sol} SOL)")]
    InsufficientBalance { balance_sol: f64, required_sol: f64 },

    /// RPC, wallet or transaction handling failed before or during submission.
    #[error(transparent)]
    Blockchain(#[from] BlockchainError),

    /// The transaction landed but its execution failed.
    #[error("Transaction {signature} failed: {reason}")]
    TransactionFailed { signature: String, reason: String },

    /// The transaction was submitted but its confirmation could not be observed.
    /// It may still land; look the signature up before retrying.
    #[error("Transaction {signature} submitted but not confirmed: {reason}")]
    Unconfirmed { signature: String, reason: String },
}

/// Result type for staking operations.
pub type StakingResult<T> = Result<T, StakingError>;
