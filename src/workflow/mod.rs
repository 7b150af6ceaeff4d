//! Staking workflow subsystem.
//!
//! # Data Flow
//! ```text
//! StakingConfig + Wallet + ChainRpc
//!     → runner.rs (sequence the network calls)
//!     → outcome.rs (stage tracking, final StakingOutcome)
//! ```

pub mod outcome;
pub mod runner;

pub use outcome::{StakingOutcome, WorkflowStage};
pub use runner::StakingWorkflowRunner;
