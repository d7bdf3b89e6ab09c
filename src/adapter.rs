use std::{
    fmt::{Debug, Formatter, Result as FmtResult},
    sync::Arc,
};

use ethers::{
    providers::{JsonRpcClient, Provider},
    types::Address,
};
use thiserror::Error;

use crate::{
    diagnostics::Diagnostics,
    session::ConnectionSnapshot,
    transport::{error::TransportError, PatchedTransport},
    AppConfig,
};

#[derive(Error, Debug)]
pub enum AdapterError {
    /// Thrown if the wallet no longer exposes the session account
    #[error("wallet does not expose account {0:?}")]
    AccountUnavailable(Address),

    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// EVM provider facade handed to the transaction flow once the wallet
/// connection is fully established.
#[derive(Clone)]
pub struct ProviderAdapter<P: JsonRpcClient + Clone> {
    transport: PatchedTransport<P>,
    provider: Arc<Provider<PatchedTransport<P>>>,
    address: Address,
    chain_id: u64,
}

impl<P: JsonRpcClient + Clone> Debug for ProviderAdapter<P> {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        write!(f, "ProviderAdapter address: {:?}, chain_id: {}", self.address, self.chain_id)
    }
}

impl<P: JsonRpcClient + Clone> ProviderAdapter<P> {
    pub(crate) fn new(
        wallet: P,
        address: Address,
        chain_id: u64,
        config: &AppConfig,
        diagnostics: Arc<dyn Diagnostics>,
    ) -> Self {
        let transport = PatchedTransport::new(wallet, config.rpc_patch_enabled, diagnostics);
        let provider = Provider::new(transport.clone()).interval(config.tx_poll_interval);
        Self { transport, provider: Arc::new(provider), address, chain_id }
    }

    pub fn provider(&self) -> Arc<Provider<PatchedTransport<P>>> {
        self.provider.clone()
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }

    /// Resolves the signing handle for the session account. Fails when the
    /// wallet stopped exposing the account between connect and use.
    pub async fn signer(&self) -> Result<WalletSigner<P>, AdapterError> {
        let accounts: Vec<Address> = self.transport.request("eth_accounts", ()).await?;
        if !accounts.contains(&self.address) {
            return Err(AdapterError::AccountUnavailable(self.address));
        }
        Ok(WalletSigner { provider: self.provider.clone(), address: self.address })
    }
}

/// Wallet-side signer: transactions sent through it are signed by the wallet,
/// not by a local key.
#[derive(Clone, Debug)]
pub struct WalletSigner<P: JsonRpcClient + Clone> {
    provider: Arc<Provider<PatchedTransport<P>>>,
    address: Address,
}

impl<P: JsonRpcClient + Clone> WalletSigner<P> {
    pub fn address(&self) -> Address {
        self.address
    }

    pub fn provider(&self) -> Arc<Provider<PatchedTransport<P>>> {
        self.provider.clone()
    }
}

/// Builds the adapter only when every connection precondition holds:
/// connected, account present, wallet provider present, chain id present.
pub fn build_adapter<P: JsonRpcClient + Clone>(
    config: &AppConfig,
    state: &ConnectionSnapshot,
    wallet: Option<&P>,
    diagnostics: &Arc<dyn Diagnostics>,
) -> Option<ProviderAdapter<P>> {
    if !state.connected {
        return None;
    }
    let address = state.address?;
    let chain_id = state.chain_id?;
    let wallet = wallet?;
    Some(ProviderAdapter::new(wallet.clone(), address, chain_id, config, diagnostics.clone()))
}
