//! Staking workflow orchestration.
//!
//! # Sequence
//! ```text
//! open session ─▶ health ─▶ balance ─▶ build ─▶ decode+sign ─▶ submit ─▶ confirm
//! ```
//!
//! Nothing is retried. Staking is not idempotent: once a transaction has been
//! submitted, a confirmation failure is reported as `StakingError::Unconfirmed`
//! with the signature so the caller can look it up instead of re-staking.

use solana_sdk::pubkey::Pubkey;
use std::str::FromStr;
use std::time::Duration;

use crate::api::{PhaseStakingClient, SessionGuard, StakeTransaction};
use crate::blockchain::transaction::{decode_transaction, sign_transaction, wait_for_confirmation};
use crate::blockchain::{lamports_to_sol, sol_to_lamports, ChainRpc, ConfirmationStatus, Wallet};
use crate::config::{BlockchainConfig, StakingConfig, WorkflowConfig};
use crate::error::{StakingError, StakingResult};
use crate::workflow::outcome::{StakingOutcome, WorkflowStage};

/// Drives one staking run against the Phase API and a chain RPC.
#[derive(Debug)]
pub struct StakingWorkflowRunner {
    client: PhaseStakingClient,
    workflow: WorkflowConfig,
    blockchain: BlockchainConfig,
}

impl StakingWorkflowRunner {
    pub fn new(config: &StakingConfig) -> Self {
        Self {
            client: PhaseStakingClient::new(config.api.clone()),
            workflow: config.workflow.clone(),
            blockchain: config.blockchain.clone(),
        }
    }

    pub fn client(&self) -> &PhaseStakingClient {
        &self.client
    }

    /// Open the API session for a sequence of calls.
    pub fn open_session(&self) -> StakingResult<SessionGuard<'_>> {
        self.client.open_session()
    }

    pub async fn check_health(&self) -> StakingResult<bool> {
        self.client.check_health().await
    }

    pub async fn build_stake_transaction(
        &self,
        agent_wallet: &Pubkey,
        stake_amount: f64,
        validator_vote_account: Option<&Pubkey>,
    ) -> StakingResult<StakeTransaction> {
        self.client
            .build_stake_transaction(agent_wallet, stake_amount, validator_vote_account)
            .await
    }

    /// Complete run: health, balance precondition, then `execute_staking`.
    ///
    /// The API session is scoped to this call and closed on every return path.
    pub async fn run<R>(&self, rpc: &R, wallet: &Wallet) -> StakingResult<StakingOutcome>
    where
        R: ChainRpc + ?Sized,
    {
        let _session = self.open_session()?;

        if !self.check_health().await? {
            tracing::warn!("Continuing although the staking API reports unhealthy");
        }

        let balance = rpc.get_balance(&wallet.pubkey()).await?;
        let balance_sol = lamports_to_sol(balance);
        tracing::info!(balance_sol, wallet = %wallet.pubkey(), "Agent balance");

        let required_sol = self.workflow.min_balance_sol;
        if balance < sol_to_lamports(required_sol) {
            tracing::error!(balance_sol, required_sol, "Insufficient balance");
            return Err(StakingError::InsufficientBalance {
                balance_sol,
                required_sol,
            });
        }

        let validator = self
            .workflow
            .validator_vote_account
            .as_deref()
            .map(|v| {
                Pubkey::from_str(v)
                    .map_err(|e| StakingError::Usage(format!("Invalid validator vote account '{}': {}", v, e)))
            })
            .transpose()?;

        self.execute_staking(rpc, wallet, self.workflow.stake_amount_sol, validator.as_ref())
            .await
    }

    /// Build, sign, submit and confirm a stake transaction.
    ///
    /// Requires an open session. Failures are logged with the stage reached and
    /// returned unchanged.
    pub async fn execute_staking<R>(
        &self,
        rpc: &R,
        wallet: &Wallet,
        stake_amount: f64,
        validator_vote_account: Option<&Pubkey>,
    ) -> StakingResult<StakingOutcome>
    where
        R: ChainRpc + ?Sized,
    {
        let mut stage = if self.client.is_open() {
            WorkflowStage::SessionOpen
        } else {
            WorkflowStage::Uninitialized
        };

        match self
            .stake(rpc, wallet, stake_amount, validator_vote_account, &mut stage)
            .await
        {
            Ok(outcome) => Ok(outcome),
            Err(e) => {
                tracing::error!(stage = %stage, error = %e, "Staking failed");
                Err(e)
            }
        }
    }

    async fn stake<R>(
        &self,
        rpc: &R,
        wallet: &Wallet,
        stake_amount: f64,
        validator_vote_account: Option<&Pubkey>,
        stage: &mut WorkflowStage,
    ) -> StakingResult<StakingOutcome>
    where
        R: ChainRpc + ?Sized,
    {
        if !(stake_amount.is_finite() && stake_amount > 0.0) {
            return Err(StakingError::Usage(format!(
                "Stake amount must be positive, got {}",
                stake_amount
            )));
        }

        tracing::info!(stake_amount, "Building stake transaction");
        let built = self
            .build_stake_transaction(&wallet.pubkey(), stake_amount, validator_vote_account)
            .await?;
        advance(stage, WorkflowStage::TransactionBuilt);

        let metadata = &built.metadata;
        tracing::info!(
            stake_account = %metadata.stake_account,
            validator = %metadata.validator,
            estimated_apy = metadata.estimated_apy,
            total_fees_lamports = metadata.fees.total(),
            "Transaction built"
        );

        let mut transaction = decode_transaction(&built.transaction.serialized)?;
        sign_transaction(&mut transaction, wallet)?;
        advance(stage, WorkflowStage::Signed);
        tracing::info!("Transaction signed, sending to network");

        let signature = rpc.send_transaction(&transaction).await?;
        advance(stage, WorkflowStage::Submitted);
        tracing::info!(signature = %signature, "Transaction submitted");

        let status = wait_for_confirmation(
            rpc,
            &signature,
            self.blockchain.confirmation_timeout_secs,
            Duration::from_millis(self.blockchain.poll_interval_ms),
        )
        .await;

        match status {
            Ok(ConfirmationStatus::Confirmed) => {}
            Ok(ConfirmationStatus::Failed(reason)) => {
                return Err(StakingError::TransactionFailed {
                    signature: signature.to_string(),
                    reason,
                })
            }
            Err(e) => {
                return Err(StakingError::Unconfirmed {
                    signature: signature.to_string(),
                    reason: e.to_string(),
                })
            }
        }
        advance(stage, WorkflowStage::Confirmed);

        let outcome = StakingOutcome::new(signature.to_string(), metadata);
        tracing::info!(
            transaction = %outcome.transaction_url(&self.blockchain.explorer_url),
            stake_account = %outcome.stake_account_url(&self.blockchain.explorer_url),
            "Staking successful"
        );

        Ok(outcome)
    }
}

fn advance(stage: &mut WorkflowStage, next: WorkflowStage) {
    tracing::debug!(from = %stage, to = %next, "Workflow stage");
    *stage = next;
}
