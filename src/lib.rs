pub mod adapter;
pub mod chain;
pub mod diagnostics;
pub mod flow;
pub mod session;
pub mod transport;

#[cfg(test)]
pub(crate) mod test_support;

use std::{sync::Arc, time::Duration};

use ethers::providers::JsonRpcClient;
use tokio::sync::RwLock;

pub use adapter::{build_adapter, AdapterError, ProviderAdapter, WalletSigner};
pub use chain::ChainProfile;
pub use diagnostics::{Diagnostics, LogDiagnostics, NoopDiagnostics};
pub use flow::{
    ApproveFlow, ConfirmationChoice, FlowOutcome, PendingApproval, UserPrompt, APPROVE_AMOUNT,
    DEMO_SPENDER_ADDRESS, USDC_TOKEN_ADDRESS,
};
pub use session::{ConnectionSnapshot, SessionEvent, WalletSession};
pub use transport::{PatchedTransport, FALLBACK_RPC_URL, PATCHED_METHODS};

const DEFAULT_TX_POLL_INTERVAL: Duration = Duration::from_secs(7);

/// Identity the wallet SDK shows to wallets during pairing.
#[derive(Clone, Debug)]
pub struct DappMetadata {
    pub name: String,
    pub description: String,
    pub url: String,
    pub icons: Vec<String>,
    /// Deep link wallets use to hop back into the app after signing.
    pub native_deeplink: Option<String>,
}

/// Everything the harness needs, built once at application start and passed
/// down explicitly.
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub metadata: DappMetadata,
    /// Wallet SDK project identifier, when paired with a cloud dashboard.
    pub project_id: Option<String>,
    pub chain: ChainProfile,
    /// Toggle for the read-call redirection workaround; see [`transport`].
    pub rpc_patch_enabled: bool,
    /// Receipt polling cadence for submitted transactions.
    pub tx_poll_interval: Duration,
}

pub struct AppConfigBuilder {
    pub name: String,
    pub description: String,
    pub url: String,
    pub icons: Vec<String>,
    pub native_deeplink: Option<String>,
    pub project_id: Option<String>,
    pub chain: ChainProfile,
    pub rpc_patch_enabled: bool,
    pub tx_poll_interval: Duration,
}

impl AppConfigBuilder {
    pub fn new() -> Self {
        Self {
            name: "Apollon".to_string(),
            description: "Token approval repro harness".to_string(),
            // Origin must match the project registration on the SDK dashboard.
            url: "https://app.apollon.fi".to_string(),
            icons: vec!["https://app.apollon.fi/assets/svgs/Apollon_logo_negative.svg".to_string()],
            native_deeplink: Some("approverepro://".to_string()),
            project_id: None,
            chain: ChainProfile::sei_mainnet(),
            rpc_patch_enabled: true,
            tx_poll_interval: DEFAULT_TX_POLL_INTERVAL,
        }
    }

    pub fn name(&mut self, name: &str) -> &Self {
        self.name = name.to_string();
        self
    }

    pub fn description(&mut self, description: &str) -> &Self {
        self.description = description.to_string();
        self
    }

    pub fn url(&mut self, url: &str) -> &Self {
        self.url = url.to_string();
        self
    }

    pub fn add_icon(&mut self, icon_url: &str) -> &Self {
        self.icons.push(icon_url.to_string());
        self
    }

    pub fn native_deeplink(&mut self, deeplink: &str) -> &Self {
        self.native_deeplink = Some(deeplink.to_string());
        self
    }

    pub fn project_id(&mut self, project_id: &str) -> &Self {
        self.project_id = Some(project_id.to_string());
        self
    }

    pub fn chain(&mut self, chain: ChainProfile) -> &Self {
        self.chain = chain;
        self
    }

    pub fn rpc_patch(&mut self, enabled: bool) -> &Self {
        self.rpc_patch_enabled = enabled;
        self
    }

    pub fn tx_poll_interval(&mut self, interval: Duration) -> &Self {
        self.tx_poll_interval = interval;
        self
    }

    pub fn build(&self) -> AppConfig {
        AppConfig {
            metadata: DappMetadata {
                name: self.name.clone(),
                description: self.description.clone(),
                url: self.url.clone(),
                icons: self.icons.clone(),
                native_deeplink: self.native_deeplink.clone(),
            },
            project_id: self.project_id.clone(),
            chain: self.chain.clone(),
            rpc_patch_enabled: self.rpc_patch_enabled,
            tx_poll_interval: self.tx_poll_interval,
        }
    }
}

/// Composition root: owns the session, receives wallet SDK events, and runs
/// the demo flow. Lifecycle is tied to application start/stop.
pub struct DemoApp<P: JsonRpcClient + Clone + 'static> {
    config: AppConfig,
    session: Arc<RwLock<WalletSession<P>>>,
    ui: Arc<dyn UserPrompt>,
    diagnostics: Arc<dyn Diagnostics>,
}

impl<P: JsonRpcClient + Clone + 'static> DemoApp<P> {
    pub fn start(
        config: AppConfig,
        ui: Arc<dyn UserPrompt>,
        diagnostics: Arc<dyn Diagnostics>,
    ) -> Self {
        let session = WalletSession::new(config.clone(), diagnostics.clone());
        Self { config, session: Arc::new(RwLock::new(session)), ui, diagnostics }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Forwards one wallet SDK event into the session.
    pub async fn on_wallet_event(&self, event: SessionEvent<P>) {
        self.session.write().await.handle_event(event);
    }

    /// Whether the demo action control should be visible.
    pub async fn is_connected(&self) -> bool {
        self.session.read().await.is_connected()
    }

    /// Runs the demo approval against the current session state.
    pub async fn execute_demo_transaction(&self) -> FlowOutcome {
        let session = self.session.read().await.clone();
        ApproveFlow::new(&session, self.ui.clone(), self.diagnostics.clone()).execute().await
    }

    /// Tears the session down, dropping any adapter.
    pub async fn stop(&self) {
        self.session.write().await.handle_event(SessionEvent::Disconnected);
    }
}
