//! In-memory chain and router doubles that record every network call.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use ethers::types::{Address, TxHash, U256};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::ethereum_client::ChainClient;
use crate::router::SwapRouter;
use crate::types::{Confirmation, SwapAttemptParams};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    EstimateGas {
        router: Address,
        fee: u32,
    },
    Submit {
        router: Address,
        fee: u32,
        value: U256,
        gas_limit: U256,
        gas_price: U256,
    },
    WaitForConfirmation(TxHash),
    TokenBalance(Address),
    TokenDecimals(Address),
    TokenSymbol(Address),
}

pub type CallLog = Arc<Mutex<Vec<Call>>>;

pub fn new_call_log() -> CallLog {
    Arc::new(Mutex::new(Vec::new()))
}

pub fn recorded(log: &CallLog) -> Vec<Call> {
    log.lock().unwrap().clone()
}

/// Every fee tier estimates 200k gas and reverts on submission unless told otherwise.
pub struct MockRouter {
    address: Address,
    log: CallLog,
    estimates: HashMap<u32, std::result::Result<U256, String>>,
    submissions: HashMap<u32, std::result::Result<TxHash, String>>,
}

impl MockRouter {
    pub fn at(address: Address) -> Self {
        Self::with_log(address, new_call_log())
    }

    pub fn with_log(address: Address, log: CallLog) -> Self {
        Self {
            address,
            log,
            estimates: HashMap::new(),
            submissions: HashMap::new(),
        }
    }

    pub fn accepting(mut self, fee: u32, tx_hash: TxHash) -> Self {
        self.submissions.insert(fee, Ok(tx_hash));
        self
    }

    pub fn estimating(mut self, fee: u32, gas: u64) -> Self {
        self.estimates.insert(fee, Ok(U256::from(gas)));
        self
    }

    pub fn failing_estimate(mut self, fee: u32, reason: &str) -> Self {
        self.estimates.insert(fee, Err(reason.to_string()));
        self
    }

    pub fn into_shared(self) -> Arc<dyn SwapRouter> {
        Arc::new(self)
    }
}

#[async_trait]
impl SwapRouter for MockRouter {
    fn address(&self) -> Address {
        self.address
    }

    async fn estimate_gas(
        &self,
        params: &SwapAttemptParams,
        _value: U256,
        _gas_price: U256,
    ) -> Result<U256> {
        self.log.lock().unwrap().push(Call::EstimateGas {
            router: self.address,
            fee: params.fee,
        });
        match self.estimates.get(&params.fee) {
            Some(Ok(gas)) => Ok(*gas),
            Some(Err(reason)) => Err(anyhow!("{}", reason)),
            None => Ok(U256::from(200_000)),
        }
    }

    async fn submit(
        &self,
        params: &SwapAttemptParams,
        value: U256,
        gas_limit: U256,
        gas_price: U256,
    ) -> Result<TxHash> {
        self.log.lock().unwrap().push(Call::Submit {
            router: self.address,
            fee: params.fee,
            value,
            gas_limit,
            gas_price,
        });
        match self.submissions.get(&params.fee) {
            Some(Ok(tx_hash)) => Ok(*tx_hash),
            Some(Err(reason)) => Err(anyhow!("{}", reason)),
            None => Err(anyhow!("execution reverted: no pool for fee tier {}", params.fee)),
        }
    }
}

/// Confirms every transaction in block 100 and holds 1234.5 `MOCK` (18 decimals).
pub struct MockChain {
    pub signer: Address,
    pub log: CallLog,
    pub confirmation: std::result::Result<Confirmation, String>,
    pub balance: std::result::Result<U256, String>,
    pub decimals: std::result::Result<u8, String>,
    pub symbol: std::result::Result<String, String>,
}

impl MockChain {
    pub fn new(log: CallLog) -> Self {
        Self {
            signer: Address::repeat_byte(0x5e),
            log,
            confirmation: Ok(Confirmation {
                status: 1,
                block_number: Some(100),
            }),
            balance: Ok(U256::from(12_345u64) * U256::exp10(17)),
            decimals: Ok(18),
            symbol: Ok("MOCK".to_string()),
        }
    }
}

fn replay<T: Clone>(result: &std::result::Result<T, String>) -> Result<T> {
    result.clone().map_err(|reason| anyhow!("{}", reason))
}

#[async_trait]
impl ChainClient for MockChain {
    fn signer_address(&self) -> Address {
        self.signer
    }

    async fn wait_for_confirmation(&self, tx_hash: TxHash) -> Result<Confirmation> {
        self.log
            .lock()
            .unwrap()
            .push(Call::WaitForConfirmation(tx_hash));
        replay(&self.confirmation)
    }

    async fn token_balance(&self, token: Address, _owner: Address) -> Result<U256> {
        self.log.lock().unwrap().push(Call::TokenBalance(token));
        replay(&self.balance)
    }

    async fn token_decimals(&self, token: Address) -> Result<u8> {
        self.log.lock().unwrap().push(Call::TokenDecimals(token));
        replay(&self.decimals)
    }

    async fn token_symbol(&self, token: Address) -> Result<String> {
        self.log.lock().unwrap().push(Call::TokenSymbol(token));
        replay(&self.symbol)
    }
}
