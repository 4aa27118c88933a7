use ethers::types::TxHash;
use serde::Serialize;

use crate::types::{BlockNumber, SwapOutcome};

/// `template` followed by the `0x`-prefixed transaction hash.
pub fn explorer_tx_url(template: &str, tx_hash: TxHash) -> String {
    format!("{}{:#x}", template, tx_hash)
}

/// Body returned by `POST /api/swap`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tx_hash: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block_number: Option<BlockNumber>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_symbol: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_balance: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explorer_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SwapResponse {
    /// Failed swaps whose transaction reached the chain still carry its hash and link.
    pub fn from_outcome(outcome: &SwapOutcome, explorer_template: &str) -> Self {
        let tx_hash = outcome.tx_hash();
        let tx_fields = (
            tx_hash.map(|hash| format!("{:#x}", hash)),
            tx_hash.map(|hash| explorer_tx_url(explorer_template, hash)),
        );

        match outcome {
            SwapOutcome::Success(receipt) => Self {
                success: true,
                tx_hash: tx_fields.0,
                block_number: receipt.block_number,
                token_symbol: Some(receipt.token_symbol.clone()),
                token_balance: Some(receipt.token_balance.clone()),
                explorer_url: tx_fields.1,
                error: None,
            },
            SwapOutcome::Failure(err) => Self {
                success: false,
                tx_hash: tx_fields.0,
                block_number: err.block_number(),
                token_symbol: None,
                token_balance: None,
                explorer_url: tx_fields.1,
                error: Some(err.to_string()),
            },
        }
    }
}

/// Terminal rendering used by the `buy` command.
pub fn render_text(outcome: &SwapOutcome, eth_amount: &str, explorer_template: &str) -> String {
    match outcome {
        SwapOutcome::Success(receipt) => {
            let block = receipt
                .block_number
                .map(|block| format!(" in block {}", block))
                .unwrap_or_default();
            format!(
                "Swap successful{} via {}! Bought with {} ETH, now holding ~{} {}.\n   View transaction: {}",
                block,
                receipt.path,
                eth_amount.trim(),
                receipt.token_balance,
                receipt.token_symbol,
                explorer_tx_url(explorer_template, receipt.tx_hash)
            )
        }
        SwapOutcome::Failure(err) => match err.tx_hash() {
            Some(tx_hash) => format!(
                "Error: {}\n   View transaction: {}",
                err,
                explorer_tx_url(explorer_template, tx_hash)
            ),
            None => format!("Error: {}", err),
        },
    }
}
