use std::sync::Arc;

use async_trait::async_trait;
use ethers::{
    contract::{abigen, ContractError},
    providers::{JsonRpcClient, Middleware, Provider, ProviderError},
    types::{Address, H256, U256, U64},
};
use thiserror::Error;

use crate::{
    adapter::{AdapterError, ProviderAdapter},
    diagnostics::Diagnostics,
    session::WalletSession,
    transport::PatchedTransport,
};

abigen!(Erc20, "abi/ERC20.json");

/// USDC on Sei.
pub const USDC_TOKEN_ADDRESS: &str = "0x3894085ef7ff0f0aedf52e2a2704928d1ec074f1";
/// Account granted the demo allowance.
pub const DEMO_SPENDER_ADDRESS: &str = "0xb9383936b8508061458F7169490FcFe368EAD337";
/// 1 USDC; the token uses 6 decimals.
pub const APPROVE_AMOUNT: u64 = 1_000_000;

/// Answer to the transaction-sent dialog.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConfirmationChoice {
    WaitForConfirmation,
    Dismiss,
}

/// Submitted approval, updated once a receipt is observed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PendingApproval {
    pub hash: H256,
    pub confirmed: bool,
    pub block_number: Option<U64>,
}

/// Surface the flow talks to instead of rendering dialogs itself.
#[async_trait]
pub trait UserPrompt: Send + Sync {
    /// One-shot message box.
    fn notify(&self, title: &str, message: &str);

    /// Transaction-sent dialog; the answer decides whether the flow blocks on
    /// the receipt.
    async fn transaction_sent(&self, hash: H256) -> ConfirmationChoice;
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FlowOutcome {
    NotConnected,
    NotReady,
    /// Dismissed after submission; confirmation was never requested.
    Submitted(PendingApproval),
    Confirmed(PendingApproval),
    Failed(String),
}

type FlowMiddleware<P> = Provider<PatchedTransport<P>>;

#[derive(Error, Debug)]
pub enum FlowError<M: Middleware> {
    #[error(transparent)]
    Adapter(#[from] AdapterError),

    #[error(transparent)]
    Contract(#[from] ContractError<M>),

    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error(transparent)]
    Hex(#[from] hex::FromHexError),

    #[error("malformed address constant: {0}")]
    MalformedAddress(String),
}

fn parse_address<M: Middleware>(raw: &str) -> Result<Address, FlowError<M>> {
    let bytes = hex::decode(raw.trim_start_matches("0x"))?;
    if bytes.len() != Address::len_bytes() {
        return Err(FlowError::MalformedAddress(raw.to_string()));
    }
    Ok(Address::from_slice(&bytes))
}

/// Drives the demo approval end to end: signer acquisition, contract bind,
/// approve submission, optional confirmation wait.
pub struct ApproveFlow<'a, P: JsonRpcClient + Clone + 'static> {
    session: &'a WalletSession<P>,
    ui: Arc<dyn UserPrompt>,
    diagnostics: Arc<dyn Diagnostics>,
}

impl<'a, P: JsonRpcClient + Clone + 'static> ApproveFlow<'a, P> {
    pub fn new(
        session: &'a WalletSession<P>,
        ui: Arc<dyn UserPrompt>,
        diagnostics: Arc<dyn Diagnostics>,
    ) -> Self {
        Self { session, ui, diagnostics }
    }

    /// Runs the flow. Failures never escape: each is reported to diagnostics,
    /// surfaced through the prompt, and returned in the outcome.
    pub async fn execute(&self) -> FlowOutcome {
        self.diagnostics.flow_step("starting demo transaction");

        if !self.session.is_connected() {
            self.ui.notify("Not Connected", "Please connect your wallet first");
            return FlowOutcome::NotConnected;
        }

        let Some(adapter) = self.session.adapter() else {
            self.ui.notify(
                "Error",
                "Provider not initialized. Please wait for connection to complete.",
            );
            return FlowOutcome::NotReady;
        };

        match self.approve(adapter).await {
            Ok(outcome) => outcome,
            Err(err) => {
                let message = err.to_string();
                self.diagnostics.flow_failure("demo transaction", &message);
                self.ui.notify("Transaction Error", &message);
                FlowOutcome::Failed(message)
            }
        }
    }

    async fn approve(
        &self,
        adapter: &ProviderAdapter<P>,
    ) -> Result<FlowOutcome, FlowError<FlowMiddleware<P>>> {
        self.diagnostics.flow_step("acquiring signer");
        let signer = adapter.signer().await?;

        let token = parse_address(USDC_TOKEN_ADDRESS)?;
        let spender = parse_address(DEMO_SPENDER_ADDRESS)?;
        self.diagnostics.flow_step("binding token contract");
        let contract = Erc20::new(token, signer.provider());

        self.diagnostics.flow_step("submitting approve");
        // Legacy gas keeps fee filling to a single eth_gasPrice round trip.
        let call = contract
            .approve(spender, U256::from(APPROVE_AMOUNT))
            .from(signer.address())
            .legacy();
        let pending = call.send().await?;
        let hash = *pending;

        let mut approval = PendingApproval { hash, confirmed: false, block_number: None };
        self.diagnostics.flow_step(&format!(
            "transaction sent: {}",
            self.session.config().chain.explorer_tx_url(hash)
        ));

        match self.ui.transaction_sent(hash).await {
            ConfirmationChoice::Dismiss => Ok(FlowOutcome::Submitted(approval)),
            ConfirmationChoice::WaitForConfirmation => {
                self.diagnostics.flow_step("waiting for confirmation");
                let receipt = pending.await?;
                approval.confirmed = true;
                approval.block_number = receipt.and_then(|r| r.block_number);
                let block = approval
                    .block_number
                    .map(|number| number.to_string())
                    .unwrap_or_else(|| "unknown".to_string());
                self.ui.notify("Success", &format!("Transaction confirmed in block {block}"));
                Ok(FlowOutcome::Confirmed(approval))
            }
        }
    }
}
