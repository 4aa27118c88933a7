use crate::configuration::Configuration;
use crate::types::{BlockNumber, Confirmation};
use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use ethers::prelude::*;
use log::{debug, info};
use std::sync::Arc;
use std::time::Duration;

abigen!(RawErc20, "./abis/ERC20.json");

pub type SignerClient = NonceManagerMiddleware<SignerMiddleware<Provider<Http>, LocalWallet>>;

/// What the swap orchestrator needs from the network besides the routers.
#[async_trait]
pub trait ChainClient: Send + Sync {
    /// Address that signs swaps and receives the bought tokens.
    fn signer_address(&self) -> Address;

    /// Resolves once the transaction is included. There is no timeout.
    async fn wait_for_confirmation(&self, tx_hash: TxHash) -> Result<Confirmation>;

    async fn token_balance(&self, token: Address, owner: Address) -> Result<U256>;

    async fn token_decimals(&self, token: Address) -> Result<u8>;

    async fn token_symbol(&self, token: Address) -> Result<String>;
}

pub struct EthereumClient {
    inner_client: Arc<SignerClient>,
}

impl EthereumClient {
    pub fn new(config: &Configuration) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.rpc_timeout_secs))
            .build()
            .context("failed to build the RPC http client")?;
        let provider = Provider::new(Http::new_with_client(config.rpc_url.clone(), http_client))
            .interval(Duration::from_millis(config.poll_interval_ms));

        let wallet = config
            .private_key
            .parse::<LocalWallet>()
            .context("`PRIVATE_KEY` is not a valid secp256k1 key")?
            .with_chain_id(config.chain_id);
        let address = wallet.address();

        let signer = SignerMiddleware::new(provider, wallet);
        let client = NonceManagerMiddleware::new(signer, address);

        info!("signing as {:?} on chain {}", address, config.chain_id);

        Ok(Self {
            inner_client: Arc::new(client),
        })
    }

    /// Shared handle for contract bindings that need to sign.
    pub fn signer_client(&self) -> Arc<SignerClient> {
        Arc::clone(&self.inner_client)
    }

    pub async fn get_latest_block_number(&self) -> Result<BlockNumber> {
        Ok(self.inner_client.get_block_number().await?.as_u64())
    }

    fn erc20(&self, token: Address) -> RawErc20<SignerClient> {
        RawErc20::new(token, self.signer_client())
    }
}

#[async_trait]
impl ChainClient for EthereumClient {
    fn signer_address(&self) -> Address {
        self.inner_client.inner().address()
    }

    async fn wait_for_confirmation(&self, tx_hash: TxHash) -> Result<Confirmation> {
        debug!("waiting for {:#x} to be included", tx_hash);
        let receipt = PendingTransaction::new(tx_hash, self.inner_client.provider())
            .await?
            .ok_or(anyhow!("transaction was dropped from the mempool"))?;

        Ok(receipt_to_confirmation(&receipt))
    }

    async fn token_balance(&self, token: Address, owner: Address) -> Result<U256> {
        Ok(self.erc20(token).balance_of(owner).call().await?)
    }

    async fn token_decimals(&self, token: Address) -> Result<u8> {
        Ok(self.erc20(token).decimals().call().await?)
    }

    async fn token_symbol(&self, token: Address) -> Result<String> {
        Ok(self.erc20(token).symbol().call().await?)
    }
}

fn receipt_to_confirmation(receipt: &TransactionReceipt) -> Confirmation {
    Confirmation {
        // pre-Byzantium receipts carry no status; Base always does
        status: receipt.status.map(|status| status.as_u64()).unwrap_or(0),
        block_number: receipt.block_number.map(|block_num| block_num.as_u64()),
    }
}
