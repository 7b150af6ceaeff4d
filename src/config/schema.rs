//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the staking agent.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the staking agent.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct StakingConfig {
    /// Phase staking API settings.
    pub api: ApiConfig,

    /// Solana RPC settings.
    pub blockchain: BlockchainConfig,

    /// Stake amount and balance policy.
    pub workflow: WorkflowConfig,

    /// Logging settings.
    pub observability: ObservabilityConfig,
}

/// Bearer token for the staking API.
///
/// Never printed: `Debug` is redacted.
#[derive(Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl std::fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_empty() {
            f.write_str("ApiKey(<unset>)")
        } else {
            f.write_str("ApiKey(<redacted>)")
        }
    }
}

/// Staking API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL of the staking API (e.g., "https://staking-api.phase.com").
    pub base_url: String,

    /// API key sent as a bearer token. Usually supplied via `PHASE_API_KEY`.
    pub api_key: ApiKey,

    /// Per-request timeout in seconds.
    pub timeout_secs: u64,

    /// Honor HTTP(S)_PROXY environment variables.
    pub use_system_proxy: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://staking-api.phase.com".to_string(),
            api_key: ApiKey::default(),
            timeout_secs: 30,
            use_system_proxy: true,
        }
    }
}

/// Solana RPC configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BlockchainConfig {
    /// JSON-RPC endpoint URL.
    pub rpc_url: String,

    /// Commitment level: "processed", "confirmed" or "finalized".
    pub commitment: String,

    /// RPC request timeout in seconds.
    pub rpc_timeout_secs: u64,

    /// Maximum time to wait for a submitted transaction to confirm.
    pub confirmation_timeout_secs: u64,

    /// Interval between signature status polls.
    pub poll_interval_ms: u64,

    /// Block explorer used for links in progress output.
    pub explorer_url: String,
}

impl Default for BlockchainConfig {
    fn default() -> Self {
        Self {
            rpc_url: "https://api.mainnet-beta.solana.com".to_string(),
            commitment: "confirmed".to_string(),
            rpc_timeout_secs: 30,
            confirmation_timeout_secs: 60,
            poll_interval_ms: 500,
            explorer_url: "https://explorer.solana.com".to_string(),
        }
    }
}

/// Workflow policy.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct WorkflowConfig {
    /// Amount of SOL to stake.
    pub stake_amount_sol: f64,

    /// Minimum wallet balance (stake plus fee headroom) required to start.
    pub min_balance_sol: f64,

    /// Optional validator vote account (base58). The API picks one if unset.
    pub validator_vote_account: Option<String>,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            stake_amount_sol: 1.0,
            min_balance_sol: 1.1,
            validator_vote_account: None,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Default filter directive when `RUST_LOG` is unset.
    pub log_filter: String,

    /// Log format: "pretty" or "json".
    pub log_format: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_filter: "phase_staking=info,staking_cli=info".to_string(),
            log_format: "pretty".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = StakingConfig::default();
        assert_eq!(config.api.base_url, "https://staking-api.phase.com");
        assert!(config.api.api_key.is_empty());
        assert_eq!(config.blockchain.rpc_url, "https://api.mainnet-beta.solana.com");
        assert_eq!(config.blockchain.commitment, "confirmed");
        assert_eq!(config.workflow.stake_amount_sol, 1.0);
        assert_eq!(config.workflow.min_balance_sol, 1.1);
        assert!(config.workflow.validator_vote_account.is_none());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: StakingConfig = toml::from_str(
            r#"
            [workflow]
            stake_amount_sol = 2.5

            [blockchain]
            commitment = "finalized"
            "#,
        )
        .unwrap();

        assert_eq!(config.workflow.stake_amount_sol, 2.5);
        assert_eq!(config.workflow.min_balance_sol, 1.1);
        assert_eq!(config.blockchain.commitment, "finalized");
        assert_eq!(config.blockchain.rpc_timeout_secs, 30);
    }

    #[test]
    fn test_api_key_debug_is_redacted() {
        let key = ApiKey::new("sk_live_secret");
        let printed = format!("{:?}", key);
        assert!(!printed.contains("sk_live_secret"));
        assert_eq!(printed, "ApiKey(<redacted>)");
        assert_eq!(key.expose(), "sk_live_secret");
    }
}
