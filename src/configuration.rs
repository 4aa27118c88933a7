use anyhow::{anyhow, Context, Result};
use ethers::types::Address;
use log::debug;
use std::env;
use std::fmt;
use url::Url;

use crate::constants::{
    BASE_CHAIN_ID, DEFAULT_BIND_ADDRESS, DEFAULT_EXPLORER_TX_URL, UNISWAP_V3_ROUTER_ADDRESS,
    UNISWAP_V4_ROUTER_ADDRESS, WETH_ADDRESS,
};

#[derive(Clone, PartialEq)]
pub struct Configuration {
    pub rpc_url: Url,
    pub private_key: String,
    pub chain_id: u64,
    pub weth_address: Address,
    pub v3_router_address: Address,
    pub v4_router_address: Address,
    pub enable_v4_fallback: bool,
    pub poll_interval_ms: u64,
    pub rpc_timeout_secs: u64,
    pub bind_address: String,
    /// Single cross-origin caller allowed to use the HTTP API; same-origin only when unset.
    pub allowed_origin: Option<String>,
    pub explorer_tx_url: String,
}

impl Configuration {
    pub fn get_from_environment() -> Result<Self> {
        let rpc_url = match collect_optional_environment_variable("RPC_URL")? {
            Some(url) => url,
            None => collect_required_environment_variable("ALCHEMY_BASE_RPC")
                .map_err(|_| anyhow!("either `RPC_URL` or `ALCHEMY_BASE_RPC` must be set"))?,
        };
        let rpc_url = Url::parse(&rpc_url).context("`RPC_URL` is not a valid url")?;
        let private_key = collect_required_environment_variable("PRIVATE_KEY")?;

        let chain_id = collect_optional_environment_variable("CHAIN_ID")?
            .map(|var| var.parse::<u64>())
            .transpose()
            .context("`CHAIN_ID` must be an integer")?
            .unwrap_or(BASE_CHAIN_ID);
        let weth_address = collect_optional_environment_variable("WETH_ADDRESS")?
            .unwrap_or(WETH_ADDRESS.to_string())
            .parse()
            .context("`WETH_ADDRESS` is not an address")?;
        let v3_router_address = collect_optional_environment_variable("UNISWAP_V3_ROUTER_ADDRESS")?
            .unwrap_or(UNISWAP_V3_ROUTER_ADDRESS.to_string())
            .parse()
            .context("`UNISWAP_V3_ROUTER_ADDRESS` is not an address")?;
        let v4_router_address = collect_optional_environment_variable("UNISWAP_V4_ROUTER_ADDRESS")?
            .unwrap_or(UNISWAP_V4_ROUTER_ADDRESS.to_string())
            .parse()
            .context("`UNISWAP_V4_ROUTER_ADDRESS` is not an address")?;
        let enable_v4_fallback = collect_optional_environment_variable("ENABLE_V4_FALLBACK")?
            .map(|var| parse_bool("ENABLE_V4_FALLBACK", &var))
            .transpose()?
            .unwrap_or(true);

        let poll_interval_ms = collect_optional_environment_variable("POLL_INTERVAL_MS")?
            .map(|var| var.parse::<u64>())
            .transpose()
            .context("`POLL_INTERVAL_MS` must be an integer")?
            .unwrap_or(2_000);
        let rpc_timeout_secs = collect_optional_environment_variable("RPC_TIMEOUT_SECS")?
            .map(|var| var.parse::<u64>())
            .transpose()
            .context("`RPC_TIMEOUT_SECS` must be an integer")?
            .unwrap_or(30);

        let bind_address = collect_optional_environment_variable("BIND_ADDRESS")?
            .unwrap_or(DEFAULT_BIND_ADDRESS.to_string());
        let allowed_origin = collect_optional_environment_variable("ALLOWED_ORIGIN")?
            .map(|origin| parse_origin(&origin))
            .transpose()?;
        let explorer_tx_url = collect_optional_environment_variable("EXPLORER_TX_URL")?
            .unwrap_or(DEFAULT_EXPLORER_TX_URL.to_string());

        Ok(Self {
            rpc_url,
            private_key,
            chain_id,
            weth_address,
            v3_router_address,
            v4_router_address,
            enable_v4_fallback,
            poll_interval_ms,
            rpc_timeout_secs,
            bind_address,
            allowed_origin,
            explorer_tx_url,
        })
    }
}

// keeps the key out of logs
impl fmt::Debug for Configuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Configuration")
            .field("rpc_url", &self.rpc_url.origin().ascii_serialization())
            .field("private_key", &"<redacted>")
            .field("chain_id", &self.chain_id)
            .field("weth_address", &self.weth_address)
            .field("v3_router_address", &self.v3_router_address)
            .field("v4_router_address", &self.v4_router_address)
            .field("enable_v4_fallback", &self.enable_v4_fallback)
            .field("poll_interval_ms", &self.poll_interval_ms)
            .field("rpc_timeout_secs", &self.rpc_timeout_secs)
            .field("bind_address", &self.bind_address)
            .field("allowed_origin", &self.allowed_origin)
            .field("explorer_tx_url", &self.explorer_tx_url)
            .finish()
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(anyhow!("`{}` must be a boolean, got {:?}", key, other)),
    }
}

/// An origin is a scheme and host with an optional port, nothing else.
fn parse_origin(value: &str) -> Result<String> {
    let url = Url::parse(value.trim()).context("`ALLOWED_ORIGIN` is not a valid origin")?;
    let origin = url.origin();
    if !origin.is_tuple() || url.path() != "/" || url.query().is_some() {
        return Err(anyhow!(
            "`ALLOWED_ORIGIN` must look like `https://host[:port]`, got {:?}",
            value
        ));
    }
    Ok(origin.ascii_serialization())
}

fn collect_required_environment_variable(key: &str) -> Result<String> {
    env::var(key).context(format!("required environment variable {} not set", key))
}

fn collect_optional_environment_variable(key: &str) -> Result<Option<String>> {
    match env::var(key) {
        Ok(value) => Ok(Some(value)),
        Err(_) => {
            debug!(
                "environment variable {} not set but it wasn't required",
                key
            );
            Ok(None)
        }
    }
}

#[cfg(test)]
impl Configuration {
    pub fn for_tests() -> Self {
        Self {
            rpc_url: Url::parse("http://localhost:8545").unwrap(),
            private_key: String::new(),
            chain_id: BASE_CHAIN_ID,
            weth_address: WETH_ADDRESS.parse().unwrap(),
            v3_router_address: UNISWAP_V3_ROUTER_ADDRESS.parse().unwrap(),
            v4_router_address: UNISWAP_V4_ROUTER_ADDRESS.parse().unwrap(),
            enable_v4_fallback: true,
            poll_interval_ms: 2_000,
            rpc_timeout_secs: 30,
            bind_address: DEFAULT_BIND_ADDRESS.to_string(),
            allowed_origin: None,
            explorer_tx_url: DEFAULT_EXPLORER_TX_URL.to_string(),
        }
    }
}
