use ethers::types::{Address, TxHash};
use log::{debug, error, info, warn};
use std::sync::Arc;

use crate::constants::{DEFAULT_TOKEN_DECIMALS, DEFAULT_TOKEN_SYMBOL};
use crate::error::{AttemptStage, PathAttemptFailure, SwapError};
use crate::ethereum_client::ChainClient;
use crate::registry::{ExecutionPath, RouterRegistry};
use crate::types::{
    BlockNumber, SwapAttemptParams, SwapOutcome, SwapReceipt, SwapRequest, ValidatedSwap,
};
use crate::units::{format_token_amount, validate_request};

/// Buys a token with ETH by walking the registry's execution paths in
/// priority order until one of them gets a transaction on-chain.
///
/// Attempts within one swap are strictly sequential: once a path has a
/// transaction accepted, no other path is tried, even if that transaction
/// later reverts. Concurrent swaps share `client`, which owns nonce
/// assignment.
pub struct SwapOrchestrator<C> {
    client: Arc<C>,
    registry: Arc<RouterRegistry>,
    wrapped_native: Address,
}

impl<C: ChainClient> SwapOrchestrator<C> {
    pub fn new(client: Arc<C>, registry: Arc<RouterRegistry>, wrapped_native: Address) -> Self {
        Self {
            client,
            registry,
            wrapped_native,
        }
    }

    pub async fn execute_swap(&self, request: &SwapRequest) -> SwapOutcome {
        let outcome: SwapOutcome = self.try_execute_swap(request).await.into();
        match &outcome {
            SwapOutcome::Success(receipt) => info!(
                "swap {:#x} done: holding {} {}",
                receipt.tx_hash, receipt.token_balance, receipt.token_symbol
            ),
            SwapOutcome::Failure(err) => error!("swap failed: {}", err),
        }
        outcome
    }

    async fn try_execute_swap(&self, request: &SwapRequest) -> Result<SwapReceipt, SwapError> {
        let swap = validate_request(request)?;
        info!(
            "buying {:?} with {} wei at {} wei gas price",
            swap.token_out, swap.amount_in, swap.gas_price
        );

        let (path, tx_hash) = self.submit_first_available(&swap).await?;

        info!("waiting for confirmation of {:#x}", tx_hash);
        let confirmation = self
            .client
            .wait_for_confirmation(tx_hash)
            .await
            .map_err(|err| SwapError::ConfirmationFailed {
                tx_hash,
                reason: format!("{:#}", err),
            })?;

        if !confirmation.succeeded() {
            return Err(SwapError::TransactionReverted {
                tx_hash,
                block_number: confirmation.block_number,
            });
        }
        info!(
            "{:#x} confirmed in block {:?}",
            tx_hash, confirmation.block_number
        );

        self.read_result(&swap, path, tx_hash, confirmation.block_number)
            .await
    }

    async fn submit_first_available(
        &self,
        swap: &ValidatedSwap,
    ) -> Result<(&ExecutionPath, TxHash), SwapError> {
        let recipient = self.client.signer_address();
        let mut failures = Vec::new();

        for path in self.registry.paths_in_priority_order() {
            match self.attempt(path, swap, recipient).await {
                Ok(tx_hash) => {
                    info!("{} swap sent: {:#x}", path.label(), tx_hash);
                    return Ok((path, tx_hash));
                }
                Err(failure) => {
                    warn!("{}", failure);
                    failures.push(failure);
                }
            }
        }

        Err(SwapError::AllPathsExhausted { failures })
    }

    async fn attempt(
        &self,
        path: &ExecutionPath,
        swap: &ValidatedSwap,
        recipient: Address,
    ) -> Result<TxHash, PathAttemptFailure> {
        let params = SwapAttemptParams::new(self.wrapped_native, swap, path.fee_tier, recipient);
        let failure = |stage: AttemptStage, err: anyhow::Error| PathAttemptFailure {
            path: path.label(),
            stage,
            reason: format!("{:#}", err),
        };

        let gas_limit = match path
            .router
            .estimate_gas(&params, swap.amount_in, swap.gas_price)
            .await
        {
            Ok(estimate) => path.gas_policy.apply_headroom(estimate),
            Err(err) => match path.gas_policy.default_limit() {
                Some(limit) => {
                    debug!(
                        "{} gas estimation failed ({:#}), using {}",
                        path.label(),
                        err,
                        limit
                    );
                    limit
                }
                None => return Err(failure(AttemptStage::EstimateGas, err)),
            },
        };

        path.router
            .submit(&params, swap.amount_in, gas_limit, swap.gas_price)
            .await
            .map_err(|err| failure(AttemptStage::Submit, err))
    }

    async fn read_result(
        &self,
        swap: &ValidatedSwap,
        path: &ExecutionPath,
        tx_hash: TxHash,
        block_number: Option<BlockNumber>,
    ) -> Result<SwapReceipt, SwapError> {
        let owner = self.client.signer_address();
        let (balance, decimals, symbol) = tokio::join!(
            self.client.token_balance(swap.token_out, owner),
            self.client.token_decimals(swap.token_out),
            self.client.token_symbol(swap.token_out),
        );

        let decimals = decimals.unwrap_or_else(|err| {
            debug!("decimals() failed ({:#}), assuming {}", err, DEFAULT_TOKEN_DECIMALS);
            DEFAULT_TOKEN_DECIMALS
        });
        let token_symbol = symbol.unwrap_or_else(|err| {
            debug!("symbol() failed ({:#})", err);
            DEFAULT_TOKEN_SYMBOL.to_string()
        });

        let balance_unavailable = |err: anyhow::Error| SwapError::BalanceUnavailable {
            tx_hash,
            block_number,
            reason: format!("{:#}", err),
        };
        let balance = balance.map_err(balance_unavailable)?;
        let token_balance =
            format_token_amount(balance, decimals).map_err(balance_unavailable)?;

        Ok(SwapReceipt {
            tx_hash,
            block_number,
            token_symbol,
            token_balance,
            path: path.label(),
        })
    }
}
