//! Phase staking agent.
//!
//! Runs one native SOL staking workflow:
//!
//! ```text
//!   ┌──────────────┐  health, build   ┌───────────────────┐
//!   │   runner     │─────────────────▶│ Phase staking API │
//!   │              │◀─────────────────│                   │
//!   │  decode+sign │  unsigned tx     └───────────────────┘
//!   │   (wallet)   │
//!   │              │  balance, send,  ┌───────────────────┐
//!   │              │  confirm         │   Solana RPC      │
//!   │              │─────────────────▶│                   │
//!   └──────────────┘                  └───────────────────┘
//! ```
//!
//! Environment: `PHASE_API_KEY`, `AGENT_PRIVATE_KEY` (base64 keypair),
//! `SOLANA_RPC_URL` (optional), `PHASE_API_URL` (optional).

use std::path::PathBuf;

use clap::Parser;
use phase_staking::blockchain::{SolanaRpcClient, Wallet};
use phase_staking::config::load_config;
use phase_staking::observability::init_logging;
use phase_staking::StakingWorkflowRunner;

#[derive(Parser)]
#[command(name = "phase-staking")]
#[command(about = "Stake SOL through the Phase Agent Staking API", long_about = None)]
struct Args {
    /// Optional TOML configuration file; environment variables override it.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let config = load_config(args.config.as_deref())?;

    init_logging(&config.observability);
    tracing::info!("phase-staking v{} starting", env!("CARGO_PKG_VERSION"));

    let wallet = Wallet::from_env()?;
    let rpc = SolanaRpcClient::new(config.blockchain.clone());
    let runner = StakingWorkflowRunner::new(&config);

    match runner.run(&rpc, &wallet).await {
        Ok(outcome) => {
            tracing::info!("Staking complete");
            println!("{}", serde_json::to_string_pretty(&outcome)?);
            Ok(())
        }
        Err(e) => {
            tracing::error!(error = %e, "Staking run failed");
            Err(e.into())
        }
    }
}
