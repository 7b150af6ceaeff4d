//! Blockchain integration subsystem.
//!
//! # Data Flow
//! ```text
//! Environment Variables (private key, RPC URL)
//!     → wallet.rs (key loading, signing key)
//!     → client.rs (RPC connection with timeouts)
//!     → transaction.rs (decode, sign, confirm)
//! ```
//!
//! # Security Constraints
//! - Private keys ONLY from environment variables
//! - Never log private keys or sensitive data
//! - All RPC calls have configurable timeouts

pub mod client;
pub mod transaction;
pub mod types;
pub mod wallet;

pub use client::{ChainRpc, SolanaRpcClient};
pub use types::{lamports_to_sol, sol_to_lamports, BlockchainConfig, BlockchainError, ConfirmationStatus};
pub use wallet::Wallet;
