//! Phase staking agent library.
//!
//! Builds a stake transaction through the Phase staking API, signs it with the
//! agent wallet and submits it to Solana.

pub mod api;
pub mod blockchain;
pub mod config;
pub mod error;
pub mod observability;
pub mod workflow;

pub use config::StakingConfig;
pub use error::{StakingError, StakingResult};
pub use workflow::{StakingOutcome, StakingWorkflowRunner};
