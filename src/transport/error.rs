use ethers::providers::{JsonRpcError, ProviderError, RpcError};
use thiserror::Error;

#[derive(Error, Debug)]
/// Error thrown when routing a JSON-RPC request
pub enum TransportError {
    /// Thrown if the fallback node could not be reached
    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    /// Serde JSON Error
    SerdeJson(#[from] serde_json::Error),

    /// Error object carried in a JSON-RPC reply
    #[error(transparent)]
    JsonRpc(#[from] JsonRpcError),

    /// Failure reported by the wallet provider, passed through untouched
    #[error(transparent)]
    Wallet(ProviderError),
}

impl RpcError for TransportError {
    fn as_error_response(&self) -> Option<&JsonRpcError> {
        match self {
            TransportError::JsonRpc(e) => Some(e),
            TransportError::Wallet(ProviderError::JsonRpcClientError(e)) => e.as_error_response(),
            _ => None,
        }
    }

    fn is_error_response(&self) -> bool {
        self.as_error_response().is_some()
    }

    fn as_serde_error(&self) -> Option<&serde_json::Error> {
        match self {
            TransportError::SerdeJson(e) => Some(e),
            TransportError::Wallet(ProviderError::SerdeJson(e)) => Some(e),
            _ => None,
        }
    }

    fn is_serde_error(&self) -> bool {
        self.as_serde_error().is_some()
    }
}

impl From<TransportError> for ProviderError {
    fn from(src: TransportError) -> Self {
        match src {
            // Delegated calls keep the wallet's own error untouched.
            TransportError::Wallet(err) => err,
            other => ProviderError::JsonRpcClientError(Box::new(other)),
        }
    }
}
