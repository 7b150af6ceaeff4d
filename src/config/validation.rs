//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, amounts positive)
//! - Check URLs, commitment level and validator key parse
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: StakingConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::str::FromStr;

use solana_sdk::pubkey::Pubkey;
use thiserror::Error;
use url::Url;

use crate::config::schema::StakingConfig;

/// Commitment levels accepted by the RPC client.
pub const COMMITMENT_LEVELS: [&str; 3] = ["processed", "confirmed", "finalized"];

/// A single semantic problem with the configuration.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Validate a loaded configuration.
pub fn validate_config(config: &StakingConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.api.api_key.is_empty() {
        errors.push(ValidationError::new(
            "api.api_key",
            "must be set (PHASE_API_KEY)",
        ));
    }
    check_http_url(&mut errors, "api.base_url", &config.api.base_url);
    check_http_url(&mut errors, "blockchain.rpc_url", &config.blockchain.rpc_url);
    check_http_url(&mut errors, "blockchain.explorer_url", &config.blockchain.explorer_url);

    if config.api.timeout_secs == 0 {
        errors.push(ValidationError::new("api.timeout_secs", "must be greater than 0"));
    }
    if config.blockchain.rpc_timeout_secs == 0 {
        errors.push(ValidationError::new(
            "blockchain.rpc_timeout_secs",
            "must be greater than 0",
        ));
    }
    if config.blockchain.confirmation_timeout_secs == 0 {
        errors.push(ValidationError::new(
            "blockchain.confirmation_timeout_secs",
            "must be greater than 0",
        ));
    }
    if config.blockchain.poll_interval_ms == 0 {
        errors.push(ValidationError::new(
            "blockchain.poll_interval_ms",
            "must be greater than 0",
        ));
    }
    if !COMMITMENT_LEVELS.contains(&config.blockchain.commitment.as_str()) {
        errors.push(ValidationError::new(
            "blockchain.commitment",
            format!(
                "'{}' is not one of {}",
                config.blockchain.commitment,
                COMMITMENT_LEVELS.join(", ")
            ),
        ));
    }

    let workflow = &config.workflow;
    if !(workflow.stake_amount_sol.is_finite() && workflow.stake_amount_sol > 0.0) {
        errors.push(ValidationError::new(
            "workflow.stake_amount_sol",
            "must be a positive amount",
        ));
    }
    if !workflow.min_balance_sol.is_finite() || workflow.min_balance_sol < workflow.stake_amount_sol {
        errors.push(ValidationError::new(
            "workflow.min_balance_sol",
            "must be at least the stake amount",
        ));
    }
    if let Some(validator) = &workflow.validator_vote_account {
        if Pubkey::from_str(validator).is_err() {
            errors.push(ValidationError::new(
                "workflow.validator_vote_account",
                format!("'{}' is not a valid public key", validator),
            ));
        }
    }

    if !matches!(config.observability.log_format.as_str(), "pretty" | "json") {
        errors.push(ValidationError::new(
            "observability.log_format",
            "must be \"pretty\" or \"json\"",
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_http_url(errors: &mut Vec<ValidationError>, field: &'static str, value: &str) {
    match Url::parse(value) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => {}
        Ok(url) => errors.push(ValidationError::new(
            field,
            format!("unsupported scheme '{}'", url.scheme()),
        )),
        Err(e) => errors.push(ValidationError::new(field, format!("invalid URL: {}", e))),
    }
}
