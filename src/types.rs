use ethers::types::{Address, TxHash, U256};
use serde::Deserialize;

use crate::error::SwapError;

pub type BlockNumber = u64;

/// Minimum output accepted by every swap.
///
/// Zero means the swap accepts any amount of the output token, so a
/// sandwiched or illiquid pool can return next to nothing. This is kept on
/// purpose and is a real economic risk for whoever runs the bot.
pub const MINIMUM_AMOUNT_OUT: U256 = U256([0; 4]);

/// A buy order as it arrives from the CLI or the HTTP form, before validation.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapRequest {
    pub token_address: String,
    pub eth_amount: String,
    pub gas_gwei: String,
}

/// `SwapRequest` after address and fixed-point validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidatedSwap {
    pub token_out: Address,
    pub amount_in: U256,
    pub gas_price: U256,
}

/// Arguments of one `exactInputSingle` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwapAttemptParams {
    pub token_in: Address,
    pub token_out: Address,
    pub fee: u32,
    pub recipient: Address,
    pub amount_in: U256,
    pub amount_out_minimum: U256,
    pub sqrt_price_limit_x96: U256,
}

impl SwapAttemptParams {
    pub fn new(
        wrapped_native: Address,
        swap: &ValidatedSwap,
        fee: u32,
        recipient: Address,
    ) -> Self {
        Self {
            token_in: wrapped_native,
            token_out: swap.token_out,
            fee,
            recipient,
            amount_in: swap.amount_in,
            amount_out_minimum: MINIMUM_AMOUNT_OUT,
            sqrt_price_limit_x96: U256::zero(), // no price limit
        }
    }
}

/// Inclusion report for a submitted transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Confirmation {
    pub status: u64,
    pub block_number: Option<BlockNumber>,
}

impl Confirmation {
    pub fn succeeded(&self) -> bool {
        self.status == 1
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwapReceipt {
    pub tx_hash: TxHash,
    pub block_number: Option<BlockNumber>,
    pub token_symbol: String,
    pub token_balance: String,
    /// Label of the execution path that carried the swap, e.g. `uniswap-v3 1%`.
    pub path: String,
}

#[derive(Debug)]
pub enum SwapOutcome {
    Success(SwapReceipt),
    Failure(SwapError),
}

impl SwapOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, SwapOutcome::Success(_))
    }

    pub fn tx_hash(&self) -> Option<TxHash> {
        match self {
            SwapOutcome::Success(receipt) => Some(receipt.tx_hash),
            SwapOutcome::Failure(err) => err.tx_hash(),
        }
    }
}

impl From<Result<SwapReceipt, SwapError>> for SwapOutcome {
    fn from(result: Result<SwapReceipt, SwapError>) -> Self {
        match result {
            Ok(receipt) => SwapOutcome::Success(receipt),
            Err(err) => SwapOutcome::Failure(err),
        }
    }
}
