//! Phase staking API client.
//!
//! # Responsibilities
//! - Own the HTTP session and its scoped lifetime
//! - Probe `GET /health`
//! - Request unsigned stake transactions from `POST /stake/build`
//!
//! The client never signs or alters transactions; see `blockchain::transaction`.

use arc_swap::ArcSwapOption;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::Client;
use solana_sdk::pubkey::Pubkey;
use std::sync::Arc;
use std::time::Duration;
use tracing::Instrument;
use uuid::Uuid;

use crate::api::types::{error_message, ApiEnvelope, HealthStatus, StakeRequest, StakeTransaction};
use crate::config::ApiConfig;
use crate::error::{StakingError, StakingResult};

const REQUEST_ID_HEADER: &str = "x-request-id";

/// Client for the Phase staking API.
pub struct PhaseStakingClient {
    config: ApiConfig,
    session: ArcSwapOption<Client>,
}

impl PhaseStakingClient {
    pub fn new(config: ApiConfig) -> Self {
        Self {
            config: ApiConfig {
                base_url: config.base_url.trim_end_matches('/').to_string(),
                ..config
            },
            session: ArcSwapOption::empty(),
        }
    }

    /// Open the HTTP session. It stays open until the returned guard is dropped.
    pub fn open_session(&self) -> StakingResult<SessionGuard<'_>> {
        if self.is_open() {
            return Err(StakingError::Usage("Session already open".to_string()));
        }

        let mut builder = Client::builder().timeout(Duration::from_secs(self.config.timeout_secs));
        if !self.config.use_system_proxy {
            builder = builder.no_proxy();
        }
        let client = builder.build()?;
        self.session.store(Some(Arc::new(client)));

        tracing::debug!(base_url = %self.config.base_url, "Staking API session opened");
        Ok(SessionGuard { client: self })
    }

    pub fn is_open(&self) -> bool {
        self.session.load().is_some()
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    fn close(&self) {
        if self.session.swap(None).is_some() {
            tracing::debug!("Staking API session closed");
        }
    }

    fn session(&self) -> StakingResult<Arc<Client>> {
        self.session.load_full().ok_or_else(|| {
            StakingError::Usage("Client not initialized. Open a session first.".to_string())
        })
    }

    /// Check API health.
    ///
    /// Network failures and malformed responses count as unhealthy rather than
    /// errors; only a missing session is an error.
    pub async fn check_health(&self) -> StakingResult<bool> {
        let session = self.session()?;
        let url = format!("{}/health", self.config.base_url);

        let status = match session.get(&url).send().await {
            Ok(response) => {
                let http_ok = response.status().is_success();
                match response.text().await {
                    Ok(body) => HealthStatus::from_response(http_ok, &body),
                    Err(e) => HealthStatus::Unhealthy(format!("unreadable body: {}", e)),
                }
            }
            Err(e) => HealthStatus::Unhealthy(format!("request failed: {}", e)),
        };

        match &status {
            HealthStatus::Healthy { solana_latency_ms } => {
                tracing::info!(latency_ms = ?solana_latency_ms, "Phase Staking API is healthy");
            }
            HealthStatus::Unhealthy(reason) => {
                tracing::warn!(reason = %reason, "Phase Staking API is unhealthy");
            }
        }

        Ok(status.is_healthy())
    }

    /// Build an unsigned staking transaction for `agent_wallet`.
    ///
    /// # Arguments
    /// * `agent_wallet` - Wallet that will sign and pay
    /// * `stake_amount` - SOL to stake; the API enforces its own minimum
    /// * `validator_vote_account` - Optional validator to stake to
    pub async fn build_stake_transaction(
        &self,
        agent_wallet: &Pubkey,
        stake_amount: f64,
        validator_vote_account: Option<&Pubkey>,
    ) -> StakingResult<StakeTransaction> {
        let session = self.session()?;
        let url = format!("{}/stake/build", self.config.base_url);
        let request_id = Uuid::new_v4();

        let body = StakeRequest {
            agent_wallet: agent_wallet.to_string(),
            stake_amount,
            validator_vote_account: validator_vote_account.map(ToString::to_string),
        };

        let span = tracing::info_span!("stake_build", request_id = %request_id);

        async move {
            tracing::debug!(
                agent_wallet = %body.agent_wallet,
                stake_amount,
                "Requesting stake transaction"
            );

            let response = session
                .post(&url)
                .headers(self.auth_headers(request_id)?)
                .json(&body)
                .send()
                .await?;

            let status = response.status();
            if !status.is_success() {
                // An unreadable error body still yields the fallback message.
                let text = response.text().await.unwrap_or_default();
                let message = error_message(&text);
                tracing::warn!(
                    status = status.as_u16(),
                    message = %message,
                    "Stake build rejected"
                );
                return Err(StakingError::Api {
                    status: status.as_u16(),
                    message,
                });
            }

            let text = response.text().await?;
            let envelope: ApiEnvelope<StakeTransaction> = serde_json::from_str(&text)
                .map_err(|e| StakingError::MalformedResponse(e.to_string()))?;

            envelope
                .data
                .ok_or_else(|| StakingError::MalformedResponse("response has no data".to_string()))
        }
        .instrument(span)
        .await
    }

    fn auth_headers(&self, request_id: Uuid) -> StakingResult<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let bearer = HeaderValue::from_str(&format!("Bearer {}", self.config.api_key.expose()))
            .map_err(|_| StakingError::Usage("API key contains invalid characters".to_string()))?;
        headers.insert(AUTHORIZATION, bearer);

        if let Ok(value) = HeaderValue::from_str(&request_id.to_string()) {
            headers.insert(REQUEST_ID_HEADER, value);
        }

        Ok(headers)
    }
}

impl std::fmt::Debug for PhaseStakingClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PhaseStakingClient")
            .field("base_url", &self.config.base_url)
            .field("api_key", &self.config.api_key)
            .field("session_open", &self.is_open())
            .finish()
    }
}

/// Scoped staking API session. Dropping it closes the session.
#[derive(Debug)]
pub struct SessionGuard<'a> {
    client: &'a PhaseStakingClient,
}

impl std::ops::Deref for SessionGuard<'_> {
    type Target = PhaseStakingClient;

    fn deref(&self) -> &Self::Target {
        self.client
    }
}

impl Drop for SessionGuard<'_> {
    fn drop(&mut self) {
        self.client.close();
    }
}
