// Base mainnet deployments
pub const BASE_CHAIN_ID: u64 = 8453;
pub const WETH_ADDRESS: &str = "0x4200000000000000000000000000000000000006";
pub const UNISWAP_V3_ROUTER_ADDRESS: &str = "0x2626664c2603336E57B271c5C0b26F421741e481"; // SwapRouter02

// The v4 "router" shares its address with what was recorded as the v4 factory and
// only has a v3-shaped ABI, so this venue may never execute on real infrastructure.
pub const UNISWAP_V4_ROUTER_ADDRESS: &str = "0x6fF5693b99212Da76ad316178A184AB56D299b43";

/// Fee tiers in parts per million, in the order they are tried.
pub const UNISWAP_V3_FEE_TIERS: [u32; 3] = [10_000, 100, 500];
pub const UNISWAP_V4_FEE_TIERS: [u32; 2] = [10_000, 100];

/// Gas limit used on padded paths when `eth_estimateGas` fails.
pub const FALLBACK_GAS_LIMIT: u64 = 600_000;
/// Headroom applied to a successful estimate on padded paths (12/10 = 1.2x).
pub const GAS_HEADROOM_NUMERATOR: u64 = 12;
pub const GAS_HEADROOM_DENOMINATOR: u64 = 10;

pub const DEFAULT_TOKEN_DECIMALS: u8 = 18;
pub const DEFAULT_TOKEN_SYMBOL: &str = "(token)";

pub const DEFAULT_EXPLORER_TX_URL: &str = "https://basescan.org/tx/";
pub const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1:3000";

// CLI defaults
pub const DEFAULT_ETH_AMOUNT: &str = "0.001";
pub const DEFAULT_GAS_PRICE_GWEI: &str = "0.1";
