use std::path::PathBuf;
use std::str::FromStr;

use clap::{Parser, Subcommand};
use phase_staking::blockchain::{lamports_to_sol, ChainRpc, SolanaRpcClient, Wallet};
use phase_staking::config::load_config;
use phase_staking::observability::init_logging;
use phase_staking::{StakingError, StakingWorkflowRunner};
use solana_sdk::pubkey::Pubkey;

#[derive(Parser)]
#[command(name = "staking-cli")]
#[command(about = "Operator CLI for the Phase staking agent", long_about = None)]
struct Cli {
    /// Optional TOML configuration file; environment variables override it.
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check staking API health
    Health,
    /// Show the agent wallet balance
    Balance,
    /// Build a stake transaction without signing or sending it
    Build {
        /// SOL to stake (defaults to the configured amount)
        #[arg(short, long)]
        amount: Option<f64>,
        /// Validator vote account
        #[arg(short, long)]
        validator: Option<String>,
    },
    /// Build, sign, submit and confirm a stake transaction
    Stake {
        /// SOL to stake (defaults to the configured amount)
        #[arg(short, long)]
        amount: Option<f64>,
        /// Validator vote account
        #[arg(short, long)]
        validator: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;
    init_logging(&config.observability);

    let runner = StakingWorkflowRunner::new(&config);

    match cli.command {
        Commands::Health => {
            let _session = runner.open_session()?;
            let healthy = runner.check_health().await?;
            println!("{}", if healthy { "healthy" } else { "unhealthy" });
        }
        Commands::Balance => {
            let wallet = Wallet::from_env()?;
            let rpc = SolanaRpcClient::new(config.blockchain.clone());
            let lamports = rpc.get_balance(&wallet.pubkey()).await?;
            println!("{} SOL ({} lamports)", lamports_to_sol(lamports), lamports);
        }
        Commands::Build { amount, validator } => {
            let wallet = Wallet::from_env()?;
            let validator = parse_validator(validator.or(config.workflow.validator_vote_account.clone()))?;
            let _session = runner.open_session()?;
            let built = runner
                .build_stake_transaction(
                    &wallet.pubkey(),
                    amount.unwrap_or(config.workflow.stake_amount_sol),
                    validator.as_ref(),
                )
                .await?;
            println!("{}", serde_json::to_string_pretty(&built)?);
        }
        Commands::Stake { amount, validator } => {
            let wallet = Wallet::from_env()?;
            let validator = parse_validator(validator.or(config.workflow.validator_vote_account.clone()))?;
            let rpc = SolanaRpcClient::new(config.blockchain.clone());
            let _session = runner.open_session()?;
            let outcome = runner
                .execute_staking(
                    &rpc,
                    &wallet,
                    amount.unwrap_or(config.workflow.stake_amount_sol),
                    validator.as_ref(),
                )
                .await?;
            println!("{}", serde_json::to_string_pretty(&outcome)?);
        }
    }

    Ok(())
}

fn parse_validator(value: Option<String>) -> Result<Option<Pubkey>, StakingError> {
    value
        .map(|v| {
            Pubkey::from_str(&v)
                .map_err(|e| StakingError::Usage(format!("Invalid validator vote account '{}': {}", v, e)))
        })
        .transpose()
}
