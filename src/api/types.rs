//! Staking API wire types.

use serde::{Deserialize, Serialize};

use crate::error::UNKNOWN_API_ERROR;

/// Body of `POST /stake/build`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StakeRequest {
    /// Agent wallet (base58 public key).
    pub agent_wallet: String,
    /// Amount of SOL to stake. The API enforces its own minimum.
    pub stake_amount: f64,
    /// Validator to delegate to; the API picks one when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validator_vote_account: Option<String>,
}

/// `data` of a successful build response.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct StakeTransaction {
    pub transaction: SerializedTransaction,
    pub metadata: StakeMetadata,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SerializedTransaction {
    /// Base64 of the bincode-serialized, unsigned transaction.
    pub serialized: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StakeMetadata {
    /// Stake account created by the transaction.
    pub stake_account: String,
    /// Validator vote account receiving the delegation.
    pub validator: String,
    /// Estimated APY in percent.
    pub estimated_apy: f64,
    pub fees: FeeBreakdown,
}

/// Fees in lamports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeeBreakdown {
    /// Network transaction fee.
    pub transaction_fee: u64,
    /// Service fee taken by the staking provider.
    pub rake_fee: u64,
}

impl FeeBreakdown {
    pub fn total(&self) -> u64 {
        self.transaction_fee.saturating_add(self.rake_fee)
    }
}

/// Common response envelope: `{success?, data?, error?}`.
#[derive(Debug, Deserialize)]
pub struct ApiEnvelope<T> {
    #[serde(default)]
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<ApiErrorBody>,
}

#[derive(Debug, Deserialize)]
pub struct ApiErrorBody {
    pub message: Option<String>,
}

/// `data` of `GET /health`.
#[derive(Debug, Clone, Deserialize)]
pub struct HealthData {
    pub status: String,
    #[serde(default)]
    pub checks: HealthChecks,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct HealthChecks {
    pub solana: Option<ComponentCheck>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ComponentCheck {
    /// Round-trip latency in milliseconds.
    pub latency: Option<f64>,
}

/// Health status reported by the API.
#[derive(Debug, Clone, PartialEq)]
pub enum HealthStatus {
    Healthy { solana_latency_ms: Option<f64> },
    Unhealthy(String),
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        matches!(self, HealthStatus::Healthy { .. })
    }

    /// Interpret a `/health` response. Anything but `success` plus
    /// `status == "healthy"` on a 2xx response is unhealthy.
    pub fn from_response(http_ok: bool, body: &str) -> Self {
        if !http_ok {
            return HealthStatus::Unhealthy("non-success HTTP status".to_string());
        }

        let envelope: ApiEnvelope<HealthData> = match serde_json::from_str(body) {
            Ok(envelope) => envelope,
            Err(e) => return HealthStatus::Unhealthy(format!("malformed response: {}", e)),
        };

        match envelope.data {
            Some(data) if envelope.success && data.status == "healthy" => HealthStatus::Healthy {
                solana_latency_ms: data.checks.solana.and_then(|check| check.latency),
            },
            Some(data) if envelope.success => {
                HealthStatus::Unhealthy(format!("status '{}'", data.status))
            }
            _ => HealthStatus::Unhealthy("success flag not set".to_string()),
        }
    }
}

/// Extract the server message from an error body, or the fallback.
pub fn error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| {
            value
                .get("error")?
                .get("message")?
                .as_str()
                .map(str::to_string)
        })
        .unwrap_or_else(|| UNKNOWN_API_ERROR.to_string())
}
