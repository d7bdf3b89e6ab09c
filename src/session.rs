use std::{
    fmt::{Debug, Formatter, Result as FmtResult},
    sync::Arc,
};

use ethers::{providers::JsonRpcClient, types::Address};

use crate::{
    adapter::{build_adapter, ProviderAdapter},
    diagnostics::Diagnostics,
    AppConfig,
};

/// Connection facts owned by the wallet SDK. The session only mirrors them.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ConnectionSnapshot {
    pub connected: bool,
    pub address: Option<Address>,
    pub chain_id: Option<u64>,
}

/// State changes pushed in by the wallet SDK.
pub enum SessionEvent<P> {
    Connected { provider: P },
    Disconnected,
    AccountsChanged(Option<Vec<Address>>),
    ChainIdChanged(Option<u64>),
}

type ChangeListener = Arc<dyn Fn(&ConnectionSnapshot) + Send + Sync>;

/// Mirror of the wallet SDK connection, plus the provider adapter derived
/// from it.
#[derive(Clone)]
pub struct WalletSession<P: JsonRpcClient + Clone> {
    config: AppConfig,
    state: ConnectionSnapshot,
    wallet: Option<P>,
    adapter: Option<ProviderAdapter<P>>,
    listener: Option<ChangeListener>,
    diagnostics: Arc<dyn Diagnostics>,
}

impl<P: JsonRpcClient + Clone> Debug for WalletSession<P> {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        write!(
            f,
            "WalletSession connected: {}, address: {:?}, chain_id: {:?}",
            self.state.connected, self.state.address, self.state.chain_id
        )
    }
}

impl<P: JsonRpcClient + Clone> WalletSession<P> {
    pub fn new(config: AppConfig, diagnostics: Arc<dyn Diagnostics>) -> Self {
        Self {
            config,
            state: ConnectionSnapshot::default(),
            wallet: None,
            adapter: None,
            listener: None,
            diagnostics,
        }
    }

    /// Registers a callback fired after every applied event.
    pub fn on_state_change(&mut self, listener: ChangeListener) {
        self.listener = Some(listener);
    }

    /// Applies one SDK event and recomputes the provider adapter from
    /// scratch. The previous adapter is dropped wholesale; nothing is patched
    /// in place.
    pub fn handle_event(&mut self, event: SessionEvent<P>) {
        match event {
            SessionEvent::Connected { provider } => {
                self.state.connected = true;
                self.wallet = Some(provider);
            }
            SessionEvent::Disconnected => {
                self.state = ConnectionSnapshot::default();
                self.wallet = None;
            }
            SessionEvent::AccountsChanged(accounts) => {
                self.state.address = accounts.and_then(|list| list.first().copied());
            }
            SessionEvent::ChainIdChanged(chain_id) => {
                self.state.chain_id = chain_id;
            }
        }
        self.adapter =
            build_adapter(&self.config, &self.state, self.wallet.as_ref(), &self.diagnostics);
        if let Some(listener) = &self.listener {
            listener(&self.state);
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn snapshot(&self) -> &ConnectionSnapshot {
        &self.state
    }

    pub fn adapter(&self) -> Option<&ProviderAdapter<P>> {
        self.adapter.as_ref()
    }

    /// Connected with a usable account.
    pub fn is_connected(&self) -> bool {
        self.state.connected && self.state.address.is_some()
    }

    pub fn address(&self) -> Option<Address> {
        self.state.address
    }

    pub fn chain_id(&self) -> Option<u64> {
        self.state.chain_id
    }
}
