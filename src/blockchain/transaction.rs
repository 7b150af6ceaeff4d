//! Transaction decoding, signing, and confirmation monitoring.
//!
//! # Responsibilities
//! - Decode the base64/bincode transaction returned by the staking API
//! - Sign it with the agent wallet without altering the message
//! - Poll signature status until confirmed, failed or timed out

use base64::{engine::general_purpose, Engine as _};
use solana_sdk::signature::Signature;
use solana_sdk::transaction::Transaction;
use std::time::Duration;
use tokio::time::{interval, timeout};

use crate::blockchain::client::ChainRpc;
use crate::blockchain::types::{BlockchainError, BlockchainResult, ConfirmationStatus};
use crate::blockchain::wallet::Wallet;

const MIN_POLL_INTERVAL: Duration = Duration::from_millis(1);

/// Decode a base64-encoded, bincode-serialized legacy transaction.
pub fn decode_transaction(serialized: &str) -> BlockchainResult<Transaction> {
    let bytes = general_purpose::STANDARD
        .decode(serialized.trim())
        .map_err(|e| BlockchainError::Decode(format!("invalid base64: {}", e)))?;

    let transaction = bincode::deserialize::<Transaction>(&bytes)
        .map_err(|e| BlockchainError::Decode(format!("invalid transaction bytes: {}", e)))?;

    let required = transaction.message.header.num_required_signatures as usize;
    if transaction.signatures.len() != required {
        return Err(BlockchainError::Decode(format!(
            "expected {} signature slot(s), found {}",
            required,
            transaction.signatures.len()
        )));
    }

    Ok(transaction)
}

/// Sign a transaction built by the staking API with the agent wallet.
///
/// The wallet must be one of the transaction's required signers. Signing uses
/// the message's own recent blockhash so the message is never rewritten, and
/// signatures already present (e.g. the new stake account's) are kept.
pub fn sign_transaction(transaction: &mut Transaction, wallet: &Wallet) -> BlockchainResult<()> {
    let agent = wallet.pubkey();
    let message = &transaction.message;
    let required = message.header.num_required_signatures as usize;

    let is_signer = message
        .account_keys
        .iter()
        .take(required)
        .any(|key| *key == agent);
    if !is_signer {
        return Err(BlockchainError::InvalidTransaction(format!(
            "wallet {} is not a required signer",
            agent
        )));
    }

    let blockhash = message.recent_blockhash;
    transaction
        .try_partial_sign(&[wallet.keypair()], blockhash)
        .map_err(|e| BlockchainError::Wallet(format!("Signing failed: {}", e)))?;

    if !transaction.is_signed() {
        let missing = transaction
            .signatures
            .iter()
            .filter(|sig| **sig == Signature::default())
            .count();
        return Err(BlockchainError::InvalidTransaction(format!(
            "{} required signature(s) still missing",
            missing
        )));
    }

    tracing::debug!(
        fee_payer = %transaction.message.account_keys[0],
        signatures = transaction.signatures.len(),
        "Transaction signed"
    );

    Ok(())
}

/// Wait for a submitted transaction to be confirmed.
///
/// # Arguments
/// * `rpc` - Chain client used for status polling
/// * `signature` - Signature returned by submission
/// * `timeout_secs` - Maximum time to wait for confirmation
/// * `poll_interval` - Delay between status queries (at least 1ms)
pub async fn wait_for_confirmation<R>(
    rpc: &R,
    signature: &Signature,
    timeout_secs: u64,
    poll_interval: Duration,
) -> BlockchainResult<ConfirmationStatus>
where
    R: ChainRpc + ?Sized,
{
    let result = timeout(Duration::from_secs(timeout_secs), async {
        let mut ticker = interval(poll_interval.max(MIN_POLL_INTERVAL));

        loop {
            ticker.tick().await;

            match rpc.get_signature_status(signature).await? {
                None => {
                    tracing::debug!(signature = %signature, "Transaction pending");
                }
                Some(Ok(())) => return Ok(ConfirmationStatus::Confirmed),
                Some(Err(e)) => return Ok(ConfirmationStatus::Failed(e.to_string())),
            }
        }
    })
    .await;

    match result {
        Ok(status) => status,
        Err(_) => Err(BlockchainError::ConfirmationTimeout(timeout_secs)),
    }
}
