use anyhow::Result;
use async_trait::async_trait;
use ethers::prelude::*;
use log::debug;
use std::sync::Arc;

use crate::types::SwapAttemptParams;

abigen!(RawSwapRouter, "./abis/SwapRouter.json");

/// A router contract able to run an exact-input single-hop swap.
#[async_trait]
pub trait SwapRouter: Send + Sync {
    fn address(&self) -> Address;

    async fn estimate_gas(
        &self,
        params: &SwapAttemptParams,
        value: U256,
        gas_price: U256,
    ) -> Result<U256>;

    /// Signs and broadcasts the swap, returning once the node has accepted it.
    async fn submit(
        &self,
        params: &SwapAttemptParams,
        value: U256,
        gas_limit: U256,
        gas_price: U256,
    ) -> Result<TxHash>;
}

/// `exactInputSingle` on a SwapRouter02-shaped contract.
pub struct UniswapRouter<M> {
    contract: RawSwapRouter<M>,
}

impl<M: Middleware + 'static> UniswapRouter<M> {
    pub fn new(address: Address, client: Arc<M>) -> Self {
        Self {
            contract: RawSwapRouter::new(address, client),
        }
    }

    fn call(
        &self,
        params: &SwapAttemptParams,
        value: U256,
        gas_price: U256,
    ) -> ContractCall<M, U256> {
        self.contract
            .exact_input_single(params.into())
            .value(value)
            .gas_price(gas_price)
    }
}

#[async_trait]
impl<M: Middleware + 'static> SwapRouter for UniswapRouter<M> {
    fn address(&self) -> Address {
        self.contract.address()
    }

    async fn estimate_gas(
        &self,
        params: &SwapAttemptParams,
        value: U256,
        gas_price: U256,
    ) -> Result<U256> {
        let gas = self.call(params, value, gas_price).estimate_gas().await?;
        debug!("estimated {} gas for fee tier {}", gas, params.fee);
        Ok(gas)
    }

    async fn submit(
        &self,
        params: &SwapAttemptParams,
        value: U256,
        gas_limit: U256,
        gas_price: U256,
    ) -> Result<TxHash> {
        let call = self.call(params, value, gas_price).gas(gas_limit);
        let pending = call.send().await?;
        Ok(pending.tx_hash())
    }
}

impl From<&SwapAttemptParams> for ExactInputSingleParams {
    fn from(params: &SwapAttemptParams) -> Self {
        Self {
            token_in: params.token_in,
            token_out: params.token_out,
            fee: params.fee,
            recipient: params.recipient,
            amount_in: params.amount_in,
            amount_out_minimum: params.amount_out_minimum,
            sqrt_price_limit_x96: params.sqrt_price_limit_x96,
        }
    }
}
