pub mod error;

use std::{
    fmt::{Debug, Formatter, Result as FmtResult},
    sync::Arc,
};

use async_trait::async_trait;
use ethers::providers::{JsonRpcClient, JsonRpcError};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;

use self::error::TransportError;
use crate::diagnostics::Diagnostics;

/// Read-only chain queries the wallet SDK mishandles; these bypass the wallet
/// and go straight to the fallback node.
pub const PATCHED_METHODS: [&str; 2] = ["eth_blockNumber", "eth_getBlockByNumber"];

/// Public RPC node answering the patched methods.
pub const FALLBACK_RPC_URL: &str = "https://evm-rpc.sei-apis.com/";

/// JSON-RPC transport wrapping the wallet-injected provider `P`.
///
/// Allow-listed read calls are POSTed to the fallback node; every other
/// method is delegated verbatim to the wallet.
#[derive(Clone)]
pub struct PatchedTransport<P> {
    inner: P,
    http: reqwest::Client,
    fallback: String,
    patch_enabled: bool,
    diagnostics: Arc<dyn Diagnostics>,
}

impl<P> Debug for PatchedTransport<P> {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        write!(
            f,
            "PatchedTransport fallback: {}, patch enabled: {}",
            self.fallback, self.patch_enabled
        )
    }
}

impl<P> PatchedTransport<P> {
    pub fn new(inner: P, patch_enabled: bool, diagnostics: Arc<dyn Diagnostics>) -> Self {
        Self::with_fallback(inner, FALLBACK_RPC_URL, patch_enabled, diagnostics)
    }

    pub(crate) fn with_fallback(
        inner: P,
        fallback: impl Into<String>,
        patch_enabled: bool,
        diagnostics: Arc<dyn Diagnostics>,
    ) -> Self {
        Self {
            inner,
            http: reqwest::Client::new(),
            fallback: fallback.into(),
            patch_enabled,
            diagnostics,
        }
    }

    pub fn is_patched(&self, method: &str) -> bool {
        self.patch_enabled && PATCHED_METHODS.contains(&method)
    }

    async fn fallback_request(&self, method: &str, params: Value) -> Result<Value, TransportError> {
        let envelope = Envelope { jsonrpc: "2.0", method, params: &params, id: 1 };
        let reply: Reply =
            self.http.post(self.fallback.as_str()).json(&envelope).send().await?.json().await?;
        if let Some(error) = reply.error {
            return Err(TransportError::JsonRpc(error));
        }
        Ok(reply.result.unwrap_or(Value::Null))
    }
}

#[async_trait]
impl<P: JsonRpcClient> JsonRpcClient for PatchedTransport<P> {
    type Error = TransportError;

    async fn request<T: std::fmt::Debug + Serialize + Send + Sync, R: DeserializeOwned + Send>(
        &self,
        method: &str,
        params: T,
    ) -> Result<R, TransportError> {
        if self.is_patched(method) {
            self.diagnostics.rpc_request(method, true);
            // JSON-RPC nodes expect positional params; absent params become [].
            let params = match serde_json::to_value(&params)? {
                Value::Null => Value::Array(Vec::new()),
                other => other,
            };
            let raw = self.fallback_request(method, params).await?;
            self.diagnostics.rpc_fallback_result(method, &raw);
            Ok(serde_json::from_value(raw)?)
        } else {
            self.diagnostics.rpc_request(method, false);
            self.inner
                .request(method, params)
                .await
                .map_err(|err| TransportError::Wallet(err.into()))
        }
    }
}

#[derive(Serialize)]
struct Envelope<'a> {
    jsonrpc: &'static str,
    method: &'a str,
    params: &'a Value,
    id: u64,
}

#[derive(Deserialize)]
struct Reply {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<JsonRpcError>,
}
