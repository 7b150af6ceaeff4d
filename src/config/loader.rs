//! Configuration loading from disk and environment.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::{ApiKey, StakingConfig};
use crate::config::validation::{validate_config, ValidationError};

/// Environment variable holding the staking API key.
pub const API_KEY_ENV_VAR: &str = "PHASE_API_KEY";
/// Environment variable overriding the staking API base URL.
pub const API_URL_ENV_VAR: &str = "PHASE_API_URL";
/// Environment variable overriding the Solana RPC endpoint.
pub const RPC_URL_ENV_VAR: &str = "SOLANA_RPC_URL";
/// Environment variable selecting a validator vote account.
pub const VALIDATOR_ENV_VAR: &str = "PHASE_VALIDATOR_VOTE_ACCOUNT";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load configuration: optional TOML file, then environment overrides, then validation.
pub fn load_config(path: Option<&Path>) -> Result<StakingConfig, ConfigError> {
    let config = match path {
        Some(path) => {
            let content = fs::read_to_string(path)?;
            toml::from_str(&content)?
        }
        None => StakingConfig::default(),
    };

    let config = apply_env_overrides(config, |name| std::env::var(name).ok());
    validate_config(&config).map_err(ConfigError::Validation)?;

    tracing::debug!(
        api_url = %config.api.base_url,
        rpc_url = %config.blockchain.rpc_url,
        "Configuration loaded"
    );

    Ok(config)
}

/// Overlay environment values on top of a config.
///
/// `lookup` abstracts `std::env::var` so tests don't touch process state.
/// Empty values are ignored.
pub fn apply_env_overrides<F>(mut config: StakingConfig, lookup: F) -> StakingConfig
where
    F: Fn(&str) -> Option<String>,
{
    let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

    if let Some(key) = get(API_KEY_ENV_VAR) {
        config.api.api_key = ApiKey::new(key);
    }
    if let Some(url) = get(API_URL_ENV_VAR) {
        config.api.base_url = url;
    }
    if let Some(url) = get(RPC_URL_ENV_VAR) {
        config.blockchain.rpc_url = url;
    }
    if let Some(validator) = get(VALIDATOR_ENV_VAR) {
        config.workflow.validator_vote_account = Some(validator);
    }

    config.api.base_url = config.api.base_url.trim_end_matches('/').to_string();
    config
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_env_overrides() {
        let config = apply_env_overrides(
            StakingConfig::default(),
            env(&[
                (API_KEY_ENV_VAR, "key-123"),
                (RPC_URL_ENV_VAR, "https://api.devnet.solana.com"),
                (API_URL_ENV_VAR, "http://localhost:3000/"),
            ]),
        );

        assert_eq!(config.api.api_key.expose(), "key-123");
        assert_eq!(config.blockchain.rpc_url, "https://api.devnet.solana.com");
        assert_eq!(config.api.base_url, "http://localhost:3000");
    }

    #[test]
    fn test_empty_env_values_ignored() {
        let config = apply_env_overrides(
            StakingConfig::default(),
            env(&[(RPC_URL_ENV_VAR, "  "), (VALIDATOR_ENV_VAR, "")]),
        );
        assert_eq!(config.blockchain.rpc_url, "https://api.mainnet-beta.solana.com");
        assert!(config.workflow.validator_vote_account.is_none());
    }

    #[test]
    fn test_load_config_from_file() {
        let path = std::env::temp_dir().join(format!("phase-staking-{}.toml", uuid::Uuid::new_v4()));
        let mut file = fs::File::create(&path).unwrap();
        writeln!(
            file,
            "[api]\napi_key = \"file-key\"\n\n[workflow]\nstake_amount_sol = 0.5\nmin_balance_sol = 0.6"
        )
        .unwrap();

        let config = load_config(Some(&path)).unwrap();
        fs::remove_file(&path).unwrap();

        assert_eq!(config.workflow.stake_amount_sol, 0.5);
        assert!(!config.api.api_key.is_empty());
    }

    #[test]
    fn test_load_config_missing_file() {
        let result = load_config(Some(Path::new("/nonexistent/phase-staking.toml")));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_validation_error_display() {
        let err = ConfigError::Validation(vec![
            ValidationError {
                field: "api.api_key",
                message: "must be set".into(),
            },
            ValidationError {
                field: "api.timeout_secs",
                message: "must be greater than 0".into(),
            },
        ]);
        assert_eq!(
            err.to_string(),
            "Validation failed: api.api_key: must be set, api.timeout_secs: must be greater than 0"
        );
    }
}
