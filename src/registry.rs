use anyhow::{anyhow, Result};
use ethers::types::{Address, U256};
use log::info;
use std::fmt;
use std::sync::Arc;

use crate::configuration::Configuration;
use crate::constants::{
    FALLBACK_GAS_LIMIT, GAS_HEADROOM_DENOMINATOR, GAS_HEADROOM_NUMERATOR, UNISWAP_V3_FEE_TIERS,
    UNISWAP_V4_FEE_TIERS,
};
use crate::router::SwapRouter;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Venue {
    Uniswap,
}

impl fmt::Display for Venue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Venue::Uniswap => write!(f, "uniswap"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProtocolVersion {
    V3,
    V4,
}

impl fmt::Display for ProtocolVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProtocolVersion::V3 => write!(f, "v3"),
            ProtocolVersion::V4 => write!(f, "v4"),
        }
    }
}

/// How the gas limit for a path is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GasPolicy {
    /// Use the node's estimate as is; a failed estimate fails the attempt.
    Strict,
    /// Scale a successful estimate by `numerator / denominator`, or use
    /// `fallback_limit` when estimation fails.
    Padded {
        numerator: u64,
        denominator: u64,
        fallback_limit: u64,
    },
}

impl GasPolicy {
    pub fn padded() -> Self {
        GasPolicy::Padded {
            numerator: GAS_HEADROOM_NUMERATOR,
            denominator: GAS_HEADROOM_DENOMINATOR,
            fallback_limit: FALLBACK_GAS_LIMIT,
        }
    }

    /// Gas limit for a successful estimate.
    pub fn apply_headroom(&self, estimate: U256) -> U256 {
        match self {
            GasPolicy::Strict => estimate,
            GasPolicy::Padded {
                numerator,
                denominator,
                ..
            } => estimate * U256::from(*numerator) / U256::from(*denominator),
        }
    }

    /// Gas limit to fall back on when estimation fails; `None` abandons the path.
    pub fn default_limit(&self) -> Option<U256> {
        match self {
            GasPolicy::Strict => None,
            GasPolicy::Padded { fallback_limit, .. } => Some(U256::from(*fallback_limit)),
        }
    }
}

/// One (venue, version, fee tier) route bound to a router contract.
#[derive(Clone)]
pub struct ExecutionPath {
    pub venue: Venue,
    pub version: ProtocolVersion,
    /// Pool fee in parts per million (500 = 0.05%).
    pub fee_tier: u32,
    pub gas_policy: GasPolicy,
    pub router: Arc<dyn SwapRouter>,
}

impl ExecutionPath {
    pub fn label(&self) -> String {
        format!(
            "{}-{} {}%",
            self.venue,
            self.version,
            f64::from(self.fee_tier) / 10_000.0
        )
    }
}

impl fmt::Debug for ExecutionPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExecutionPath")
            .field("venue", &self.venue)
            .field("version", &self.version)
            .field("fee_tier", &self.fee_tier)
            .field("gas_policy", &self.gas_policy)
            .field("router", &self.router.address())
            .finish()
    }
}

/// Execution paths in the order they are tried. Built once, never mutated.
#[derive(Debug, Clone)]
pub struct RouterRegistry {
    paths: Vec<ExecutionPath>,
}

impl RouterRegistry {
    pub fn new(paths: Vec<ExecutionPath>) -> Result<Self> {
        if paths.is_empty() {
            return Err(anyhow!("router registry needs at least one execution path"));
        }
        Ok(Self { paths })
    }

    /// Uniswap v3 on every fee tier first, then the optional v4 fallback.
    /// `make_router` binds a router contract at the given address.
    pub fn from_configuration<F>(config: &Configuration, make_router: F) -> Result<Self>
    where
        F: Fn(Address) -> Arc<dyn SwapRouter>,
    {
        let mut paths = Vec::new();

        let v3_router = make_router(config.v3_router_address);
        for fee_tier in UNISWAP_V3_FEE_TIERS {
            paths.push(ExecutionPath {
                venue: Venue::Uniswap,
                version: ProtocolVersion::V3,
                fee_tier,
                gas_policy: GasPolicy::Strict,
                router: Arc::clone(&v3_router),
            });
        }

        if config.enable_v4_fallback {
            let v4_router = make_router(config.v4_router_address);
            for fee_tier in UNISWAP_V4_FEE_TIERS {
                paths.push(ExecutionPath {
                    venue: Venue::Uniswap,
                    version: ProtocolVersion::V4,
                    fee_tier,
                    gas_policy: GasPolicy::padded(),
                    router: Arc::clone(&v4_router),
                });
            }
        } else {
            info!("uniswap v4 fallback disabled");
        }

        Self::new(paths)
    }

    pub fn paths_in_priority_order(&self) -> &[ExecutionPath] {
        &self.paths
    }
}
