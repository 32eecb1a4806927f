// Pairswap CLI: drive one configured ETH/token pair from the terminal.
//
// The pair comes from a TOML config file; the signing key from
// PAIRSWAP_PRIVATE_KEY. Logging is controlled by RUST_LOG (default: info).

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::{Parser, Subcommand};
use log::error;
use rust_decimal::Decimal;
use serde_json::json;

use pairswap::engine::to_base_units;
use pairswap::{
    credential_from_env, ApprovalOutcome, EthPair, GasSpeed, PairswapConfig, PairswapResult,
    TxOverrides,
};

#[derive(Parser, Debug)]
#[command(name = "pairswap", version, about = "Swap ETH against an ERC-20 token through Uniswap V2")]
struct Cli {
    /// Path to the pair config file
    #[arg(short, long, env = "PAIRSWAP_CONFIG", default_value = "pairswap.toml", global = true)]
    config: PathBuf,

    /// Gas limit for submitted transactions (overrides the config)
    #[arg(long, global = true)]
    gas: Option<u64>,

    /// Gas price in wei for submitted transactions (overrides the config)
    #[arg(long, global = true)]
    gas_price: Option<u64>,

    /// Nonce for the first submitted transaction (read from the chain by default)
    #[arg(long, global = true)]
    nonce: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// ETH and token balances of the account
    Balances,
    /// Price of one ETH in tokens and of one token in ETH
    Price,
    /// Pair contract and WETH addresses
    Pair,
    /// Whether the router may spend the given token amount (unlimited by default)
    Approved { amount: Option<Decimal> },
    /// Approve the router to spend the given token amount (unlimited by default)
    Approve { amount: Option<Decimal> },
    /// Swap ETH for tokens
    Swap {
        amount: Decimal,
        /// Wait for the transaction to be mined
        #[arg(long)]
        wait: bool,
    },
    /// Swap tokens for ETH
    Unswap {
        amount: Decimal,
        /// Wait for the transaction to be mined
        #[arg(long)]
        wait: bool,
    },
    /// Wait for a transaction to be mined
    Wait {
        hash: String,
        /// Seconds to wait before giving up
        #[arg(long, default_value_t = 3600)]
        timeout: u64,
    },
    /// Gas price suggestion in wei: fast, medium, slow or glacial
    GasPrice {
        #[arg(default_value = "medium")]
        speed: GasSpeed,
    },
}

fn print(value: serde_json::Value) {
    match serde_json::to_string_pretty(&value) {
        Ok(text) => println!("{}", text),
        Err(_) => println!("{}", value),
    }
}

async fn wait_and_print(pair: &EthPair, tx_hash: String, wait: bool) -> PairswapResult<()> {
    if !wait {
        print(json!({ "tx_hash": tx_hash }));
        return Ok(());
    }
    let receipt = pair
        .wait(&tx_hash, Some(pair.settings().transaction_timeout))
        .await?;
    print(json!({ "tx_hash": tx_hash, "receipt": &receipt }));
    receipt.ensure_success()?;
    Ok(())
}

async fn run(cli: Cli) -> PairswapResult<()> {
    let config = PairswapConfig::load(&cli.config)?;
    let credential = credential_from_env()?;
    let pair = EthPair::connect(&config, credential).await?;
    let overrides = TxOverrides {
        gas: cli.gas,
        gas_price: cli.gas_price,
        nonce: cli.nonce,
    };
    let decimals = pair.token().decimals;

    match cli.command {
        Command::Balances => print(pair.summary().await?),
        Command::Price => {
            let symbol = &pair.token().symbol;
            print(json!({
                (format!("ETH/{}", symbol)): pair.price().await?,
                (format!("{}/ETH", symbol)): pair.token_price().await?,
            }));
        }
        Command::Pair => print(json!({
            "pair": pair.pair_address().await?,
            "weth": pair.weth_address(),
            "token": pair.token(),
        })),
        Command::Approved { amount } => {
            let required = amount.map(|a| to_base_units(a, decimals)).transpose()?;
            print(json!({ "approved": pair.is_token_approved(required).await? }));
        }
        Command::Approve { amount } => {
            let amount = amount.map(|a| to_base_units(a, decimals)).transpose()?;
            match pair.approve_token(amount, overrides).await? {
                ApprovalOutcome::AlreadyApproved => print(json!({ "approved": true, "tx_hash": null })),
                ApprovalOutcome::Approved { tx_hash, nonce_visible, .. } => print(json!({
                    "approved": true,
                    "tx_hash": tx_hash,
                    "nonce_visible": nonce_visible,
                })),
            }
        }
        Command::Swap { amount, wait } => {
            let tx_hash = pair.swap_asset_for_token(amount, overrides).await?;
            wait_and_print(&pair, tx_hash, wait).await?;
        }
        Command::Unswap { amount, wait } => {
            let tx_hash = pair.swap_token_for_asset(amount, overrides).await?;
            wait_and_print(&pair, tx_hash, wait).await?;
        }
        Command::Wait { hash, timeout } => {
            let receipt = pair.wait(&hash, Some(Duration::from_secs(timeout))).await?;
            print(json!(receipt));
        }
        Command::GasPrice { speed } => {
            print(json!({ "speed": speed, "gas_price": pair.suggest_gas_price(speed).await? }));
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match run(Cli::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) if e.is_unknown_outcome() => {
            error!("{} (check the transaction before retrying)", e);
            ExitCode::from(3)
        }
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
