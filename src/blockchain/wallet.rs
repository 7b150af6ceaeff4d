//! Agent wallet and transaction signing key.
//!
//! # Security
//! - Private keys are loaded ONLY from environment variables
//! - Keys are never logged or serialized

use base64::{engine::general_purpose, Engine as _};
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::{Keypair, Signer};

use crate::blockchain::types::{BlockchainError, BlockchainResult};

/// Environment variable name for the private key.
pub const PRIVATE_KEY_ENV_VAR: &str = "AGENT_PRIVATE_KEY";

/// Wallet holding the agent's signing keypair.
pub struct Wallet {
    keypair: Keypair,
}

impl Wallet {
    /// Create a wallet from a base64-encoded 64-byte keypair.
    ///
    /// # Security
    /// The decoded bytes are only held inside the keypair. They are never logged.
    pub fn from_base64(encoded: &str) -> BlockchainResult<Self> {
        let bytes = general_purpose::STANDARD
            .decode(encoded.trim())
            .map_err(|e| BlockchainError::Wallet(format!("Invalid base64 private key: {}", e)))?;

        let keypair = Keypair::from_bytes(bytes.as_slice())
            .map_err(|e| BlockchainError::Wallet(format!("Invalid private key: {}", e)))?;

        tracing::info!(address = %keypair.pubkey(), "Wallet initialized");

        Ok(Self { keypair })
    }

    /// Load wallet from environment variable.
    ///
    /// Reads `AGENT_PRIVATE_KEY` from environment.
    pub fn from_env() -> BlockchainResult<Self> {
        let private_key = std::env::var(PRIVATE_KEY_ENV_VAR).map_err(|_| {
            BlockchainError::Wallet(format!(
                "Environment variable {} not set",
                PRIVATE_KEY_ENV_VAR
            ))
        })?;

        Self::from_base64(&private_key)
    }

    /// Wrap an existing keypair.
    pub fn from_keypair(keypair: Keypair) -> Self {
        Self { keypair }
    }

    /// The wallet's public key.
    pub fn pubkey(&self) -> Pubkey {
        self.keypair.pubkey()
    }

    pub(crate) fn keypair(&self) -> &Keypair {
        &self.keypair
    }
}

impl std::fmt::Debug for Wallet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Wallet")
            .field("pubkey", &self.pubkey())
            .finish_non_exhaustive()
    }
}
