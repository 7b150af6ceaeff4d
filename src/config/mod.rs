//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize)
//!     → environment overrides (PHASE_API_KEY, SOLANA_RPC_URL, ...)
//!     → validation.rs (semantic checks)
//!     → StakingConfig (validated, immutable)
//!     → passed by reference to the workflow
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded
//! - All fields have defaults to allow minimal configs
//! - The signing key is never part of the config; see `blockchain::wallet`

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::{ApiConfig, ApiKey, BlockchainConfig, ObservabilityConfig, StakingConfig, WorkflowConfig};
