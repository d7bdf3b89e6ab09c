use ethers::types::H256;
use serde::{Deserialize, Serialize};

/// Static description of an EVM network, mirroring what the wallet SDK gets
/// configured with on the application side.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainProfile {
    pub id: u64,
    pub name: String,
    pub currency_name: String,
    pub currency_symbol: String,
    pub currency_decimals: u8,
    pub rpc_url: String,
    pub ws_url: Option<String>,
    pub explorer_name: String,
    pub explorer_url: String,
}

impl ChainProfile {
    /// Sei EVM mainnet (pacific-1).
    pub fn sei_mainnet() -> Self {
        Self {
            id: 1329,
            name: "Sei Network".to_string(),
            currency_name: "Sei".to_string(),
            currency_symbol: "SEI".to_string(),
            currency_decimals: 18,
            rpc_url: "https://evm-rpc.sei-apis.com/".to_string(),
            ws_url: Some("wss://evm-ws.sei-apis.com/".to_string()),
            explorer_name: "Seitrace".to_string(),
            explorer_url: "https://seitrace.com".to_string(),
        }
    }

    /// Explorer link for a transaction hash.
    pub fn explorer_tx_url(&self, hash: H256) -> String {
        format!("{}/tx/{hash:#x}", self.explorer_url.trim_end_matches('/'))
    }
}
