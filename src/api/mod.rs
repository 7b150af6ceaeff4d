//! Phase staking API subsystem.
//!
//! # Data Flow
//! ```text
//! open_session() → SessionGuard (closes on drop)
//!     → GET  /health       → bool
//!     → POST /stake/build  → StakeTransaction (unsigned, base64)
//! ```

pub mod client;
pub mod types;

pub use client::{PhaseStakingClient, SessionGuard};
pub use types::{FeeBreakdown, StakeMetadata, StakeRequest, StakeTransaction};
