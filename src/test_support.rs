use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use ethers::{
    providers::{JsonRpcClient, JsonRpcError},
    types::H256,
};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::{json, Value};

use crate::{
    diagnostics::Diagnostics,
    flow::{ConfirmationChoice, UserPrompt},
    transport::error::TransportError,
};

pub(crate) const TEST_ACCOUNT: &str = "0x63f9725f107358c9115bc9d86c72dd5823e9b1e6";

/// Canned wallet provider standing in for the SDK-injected one. Records every
/// method name it is asked for.
#[derive(Clone, Debug, Default)]
pub(crate) struct MockWallet {
    responses: Arc<Mutex<HashMap<String, Result<Value, (i64, String)>>>>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl MockWallet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(&self, method: &str, value: Value) {
        self.responses.lock().unwrap().insert(method.to_string(), Ok(value));
    }

    pub fn reject(&self, method: &str, code: i64, message: &str) {
        self.responses
            .lock()
            .unwrap()
            .insert(method.to_string(), Err((code, message.to_string())));
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_to(&self, method: &str) -> usize {
        self.calls.lock().unwrap().iter().filter(|name| *name == method).count()
    }
}

#[async_trait]
impl JsonRpcClient for MockWallet {
    type Error = TransportError;

    async fn request<T: Serialize + Send + Sync, R: DeserializeOwned + Send>(
        &self,
        method: &str,
        _params: T,
    ) -> Result<R, TransportError> {
        self.calls.lock().unwrap().push(method.to_string());
        let canned = self.responses.lock().unwrap().get(method).cloned();
        match canned {
            Some(Ok(value)) => Ok(serde_json::from_value(value)?),
            Some(Err((code, message))) => {
                Err(TransportError::JsonRpc(JsonRpcError { code, message, data: None }))
            }
            None => Err(TransportError::JsonRpc(JsonRpcError {
                code: -32601,
                message: format!("method {method} not found"),
                data: None,
            })),
        }
    }
}

/// Prompt that records every dialog and answers with a fixed choice.
pub(crate) struct RecordingPrompt {
    choice: ConfirmationChoice,
    notices: Mutex<Vec<(String, String)>>,
    sent: Mutex<Vec<H256>>,
}

impl RecordingPrompt {
    pub fn new(choice: ConfirmationChoice) -> Self {
        Self { choice, notices: Mutex::new(Vec::new()), sent: Mutex::new(Vec::new()) }
    }

    pub fn notices(&self) -> Vec<(String, String)> {
        self.notices.lock().unwrap().clone()
    }

    pub fn sent(&self) -> Vec<H256> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl UserPrompt for RecordingPrompt {
    fn notify(&self, title: &str, message: &str) {
        self.notices.lock().unwrap().push((title.to_string(), message.to_string()));
    }

    async fn transaction_sent(&self, hash: H256) -> ConfirmationChoice {
        self.sent.lock().unwrap().push(hash);
        self.choice
    }
}

#[derive(Default)]
pub(crate) struct RecordingDiagnostics {
    patched: Mutex<Vec<String>>,
    delegated: Mutex<Vec<String>>,
}

impl RecordingDiagnostics {
    pub fn patched(&self) -> Vec<String> {
        self.patched.lock().unwrap().clone()
    }

    pub fn delegated(&self) -> Vec<String> {
        self.delegated.lock().unwrap().clone()
    }
}

impl Diagnostics for RecordingDiagnostics {
    fn rpc_request(&self, method: &str, patched: bool) {
        if patched {
            self.patched.lock().unwrap().push(method.to_string());
        } else {
            self.delegated.lock().unwrap().push(method.to_string());
        }
    }

    fn rpc_fallback_result(&self, _method: &str, _result: &Value) {}
    fn flow_step(&self, _step: &str) {}
    fn flow_failure(&self, _step: &str, _message: &str) {}
}

/// Transaction as a node reports it once mined; receipt polling moves on
/// only after a block number shows up here.
pub(crate) fn canned_transaction(hash: &str, from: &str) -> Value {
    json!({
        "hash": hash,
        "nonce": "0x0",
        "blockHash": "0x88e96d4537bea4d9c05d12549907b32561d3bf31f45aae734cdc119f13406cb6",
        "blockNumber": "0x3039",
        "transactionIndex": "0x0",
        "from": from,
        "to": crate::flow::USDC_TOKEN_ADDRESS,
        "value": "0x0",
        "gasPrice": "0x3b9aca00",
        "gas": "0xb3b0",
        "input": "0x",
        "v": "0x0",
        "r": "0x0",
        "s": "0x0",
        "type": "0x0",
        "chainId": "0x531"
    })
}

/// Successful receipt for the canned transaction.
pub(crate) fn canned_receipt(hash: &str, block_number: &str) -> Value {
    json!({
        "transactionHash": hash,
        "transactionIndex": "0x0",
        "blockHash": "0x88e96d4537bea4d9c05d12549907b32561d3bf31f45aae734cdc119f13406cb6",
        "blockNumber": block_number,
        "from": TEST_ACCOUNT,
        "to": crate::flow::USDC_TOKEN_ADDRESS,
        "cumulativeGasUsed": "0xb3b0",
        "gasUsed": "0xb3b0",
        "contractAddress": null,
        "logs": [],
        "status": "0x1",
        "logsBloom": format!("0x{}", "0".repeat(512)),
        "effectiveGasPrice": "0x3b9aca00",
        "type": "0x0"
    })
}
