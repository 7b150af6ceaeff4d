//! Workflow stages and the record of a completed run.

use serde::Serialize;

use crate::api::StakeMetadata;

/// Linear progression of one staking run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum WorkflowStage {
    Uninitialized,
    SessionOpen,
    TransactionBuilt,
    Signed,
    Submitted,
    Confirmed,
}

impl WorkflowStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkflowStage::Uninitialized => "uninitialized",
            WorkflowStage::SessionOpen => "session_open",
            WorkflowStage::TransactionBuilt => "transaction_built",
            WorkflowStage::Signed => "signed",
            WorkflowStage::Submitted => "submitted",
            WorkflowStage::Confirmed => "confirmed",
        }
    }
}

impl std::fmt::Display for WorkflowStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of a confirmed staking run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StakingOutcome {
    signature: String,
    stake_account: String,
    validator: String,
    estimated_apy: f64,
}

impl StakingOutcome {
    pub(crate) fn new(signature: String, metadata: &StakeMetadata) -> Self {
        Self {
            signature,
            stake_account: metadata.stake_account.clone(),
            validator: metadata.validator.clone(),
            estimated_apy: metadata.estimated_apy,
        }
    }

    pub fn signature(&self) -> &str {
        &self.signature
    }

    pub fn stake_account(&self) -> &str {
        &self.stake_account
    }

    pub fn validator(&self) -> &str {
        &self.validator
    }

    pub fn estimated_apy(&self) -> f64 {
        self.estimated_apy
    }

    /// Explorer link for the staking transaction.
    pub fn transaction_url(&self, explorer_url: &str) -> String {
        format!("{}/tx/{}", explorer_url.trim_end_matches('/'), self.signature)
    }

    /// Explorer link for the new stake account.
    pub fn stake_account_url(&self, explorer_url: &str) -> String {
        format!("{}/address/{}", explorer_url.trim_end_matches('/'), self.stake_account)
    }
}
