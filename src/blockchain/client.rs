//! Blockchain RPC client with timeout and error handling.
//!
//! # Responsibilities
//! - Connect to the Solana JSON-RPC endpoint
//! - Query balances, submit transactions, poll signature status
//! - Handle timeouts and network errors

use async_trait::async_trait;
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_sdk::commitment_config::CommitmentConfig;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::Signature;
use solana_sdk::transaction::{Transaction, TransactionError};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;

use crate::blockchain::types::{BlockchainConfig, BlockchainError, BlockchainResult};

/// RPC operations the staking workflow needs from the chain.
#[async_trait]
pub trait ChainRpc: Send + Sync {
    /// Balance of an account in lamports.
    async fn get_balance(&self, pubkey: &Pubkey) -> BlockchainResult<u64>;

    /// Submit a fully signed transaction.
    async fn send_transaction(&self, transaction: &Transaction) -> BlockchainResult<Signature>;

    /// Status of a submitted transaction at the client's commitment level.
    ///
    /// `None` while the transaction has not been observed yet.
    async fn get_signature_status(
        &self,
        signature: &Signature,
    ) -> BlockchainResult<Option<Result<(), TransactionError>>>;
}

/// Solana RPC client wrapper.
#[derive(Clone)]
pub struct SolanaRpcClient {
    rpc: Arc<RpcClient>,
    config: BlockchainConfig,
    commitment: CommitmentConfig,
    timeout_duration: Duration,
}

impl SolanaRpcClient {
    /// Create a new client. No network traffic happens until the first call.
    pub fn new(config: BlockchainConfig) -> Self {
        let timeout_duration = Duration::from_secs(config.rpc_timeout_secs);
        let commitment = parse_commitment(&config.commitment);
        let rpc = RpcClient::new_with_timeout_and_commitment(
            config.rpc_url.clone(),
            timeout_duration,
            commitment,
        );

        tracing::info!(
            rpc_url = %config.rpc_url,
            commitment = %config.commitment,
            "Blockchain client initialized"
        );

        Self {
            rpc: Arc::new(rpc),
            config,
            commitment,
            timeout_duration,
        }
    }

    /// Get the configuration.
    pub fn config(&self) -> &BlockchainConfig {
        &self.config
    }

    async fn call<T, E, F>(&self, op: &'static str, fut: F) -> BlockchainResult<T>
    where
        F: Future<Output = Result<T, E>>,
        E: std::fmt::Display,
    {
        match timeout(self.timeout_duration, fut).await {
            Ok(Ok(result)) => Ok(result),
            Ok(Err(e)) => {
                tracing::warn!(op, error = %e, "RPC error");
                Err(BlockchainError::Rpc(format!("{} failed: {}", op, e)))
            }
            Err(_) => {
                tracing::warn!(op, "RPC timeout");
                Err(BlockchainError::Timeout(self.config.rpc_timeout_secs))
            }
        }
    }
}

#[async_trait]
impl ChainRpc for SolanaRpcClient {
    async fn get_balance(&self, pubkey: &Pubkey) -> BlockchainResult<u64> {
        self.call("getBalance", self.rpc.get_balance(pubkey)).await
    }

    async fn send_transaction(&self, transaction: &Transaction) -> BlockchainResult<Signature> {
        self.call("sendTransaction", self.rpc.send_transaction(transaction))
            .await
    }

    async fn get_signature_status(
        &self,
        signature: &Signature,
    ) -> BlockchainResult<Option<Result<(), TransactionError>>> {
        self.call(
            "getSignatureStatuses",
            self.rpc
                .get_signature_status_with_commitment(signature, self.commitment),
        )
        .await
    }
}

impl std::fmt::Debug for SolanaRpcClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SolanaRpcClient")
            .field("rpc_url", &self.config.rpc_url)
            .field("commitment", &self.config.commitment)
            .field("timeout_secs", &self.config.rpc_timeout_secs)
            .finish()
    }
}

/// Map a validated commitment name onto the SDK type.
fn parse_commitment(level: &str) -> CommitmentConfig {
    match level {
        "processed" => CommitmentConfig::processed(),
        "finalized" => CommitmentConfig::finalized(),
        _ => CommitmentConfig::confirmed(),
    }
}
