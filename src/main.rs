use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::{debug, info, warn};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod configuration;
use crate::configuration::Configuration;

mod constants;
use crate::constants::{DEFAULT_ETH_AMOUNT, DEFAULT_GAS_PRICE_GWEI};

mod error;
mod ethereum_client;
use crate::ethereum_client::EthereumClient;

mod orchestrator;
use crate::orchestrator::SwapOrchestrator;

mod registry;
use crate::registry::RouterRegistry;

mod reporter;
mod router;
use crate::router::{SwapRouter, UniswapRouter};

mod server;
mod types;
use crate::types::SwapRequest;

mod units;

#[cfg(test)]
mod test_support;

#[derive(Parser, Debug)]
#[command(version, about = "Buys Base tokens with ETH through Uniswap routers")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Buy a token once and exit; prompts for the token when it is omitted
    Buy {
        token: Option<String>,

        /// ETH to spend
        #[arg(long, default_value = DEFAULT_ETH_AMOUNT)]
        amount: String,

        /// Gas price in gwei
        #[arg(long, default_value = DEFAULT_GAS_PRICE_GWEI)]
        gas_gwei: String,
    },
    /// Serve `POST /api/swap` for the swap form
    Serve {
        /// Overrides `BIND_ADDRESS`
        #[arg(long)]
        bind: Option<String>,
    },
}

/// Every swap runs the same way: validate the request, walk the Uniswap v3
/// fee tiers and then the optional v4 fallback until one router accepts the
/// transaction, wait for it to be mined, and report the token balance.
#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    setup_logging();

    let args = Args::parse();
    let config = Configuration::get_from_environment()?;
    debug!("{:?}", config);

    let client = Arc::new(EthereumClient::new(&config)?);
    match client.get_latest_block_number().await {
        Ok(block_number) => info!("connected to chain {} at block {}", config.chain_id, block_number),
        Err(err) => warn!("could not reach the RPC endpoint yet: {:#}", err),
    }

    let signer_client = client.signer_client();
    let registry = RouterRegistry::from_configuration(&config, |address| {
        Arc::new(UniswapRouter::new(address, Arc::clone(&signer_client))) as Arc<dyn SwapRouter>
    })?;
    for path in registry.paths_in_priority_order() {
        debug!("execution path {} -> {:?}", path.label(), path.router.address());
    }

    let orchestrator = Arc::new(SwapOrchestrator::new(
        client,
        Arc::new(registry),
        config.weth_address,
    ));

    match args.command {
        Command::Buy {
            token,
            amount,
            gas_gwei,
        } => {
            let token_address = match token {
                Some(token) => token,
                None => prompt("Enter the token contract address to buy: ").await?,
            };
            let request = SwapRequest {
                token_address,
                eth_amount: amount,
                gas_gwei,
            };

            let outcome = orchestrator.execute_swap(&request).await;
            let text = reporter::render_text(&outcome, &request.eth_amount, &config.explorer_tx_url);
            if outcome.is_success() {
                println!("\n{}\n", text);
            } else {
                eprintln!("\n{}\n", text);
                std::process::exit(1);
            }
        }
        Command::Serve { bind } => {
            let bind = bind.unwrap_or(config.bind_address.clone());
            let allowed_origin = config
                .allowed_origin
                .as_deref()
                .map(axum::http::HeaderValue::from_str)
                .transpose()
                .context("`ALLOWED_ORIGIN` is not a valid header value")?;
            match &allowed_origin {
                Some(origin) => info!("accepting cross-origin requests from {:?}", origin),
                None => info!("accepting same-origin requests only"),
            }
            let app = server::router(
                server::AppState {
                    orchestrator,
                    explorer_tx_url: config.explorer_tx_url.clone(),
                },
                allowed_origin,
            );

            let listener = tokio::net::TcpListener::bind(&bind)
                .await
                .context(format!("failed to bind {}", bind))?;
            info!("listening on {}", bind);
            axum::serve(listener, app).await?;
        }
    }

    Ok(())
}

fn setup_logging() {
    let filter = EnvFilter::try_from_env("LOG_LEVEL").unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

async fn prompt(question: &str) -> Result<String> {
    let mut stdout = tokio::io::stdout();
    stdout.write_all(question.as_bytes()).await?;
    stdout.flush().await?;

    let mut answer = String::new();
    BufReader::new(tokio::io::stdin())
        .read_line(&mut answer)
        .await
        .context("failed to read the token address")?;
    Ok(answer.trim().to_string())
}
