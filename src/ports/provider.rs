//! Wallet Provider Port
//!
//! Abstraction over the externally supplied wallet interface. The provider
//! owns signing, account approval, and network access; this crate only
//! relays requests to it and reacts to its events. The wire shape mirrors
//! the EIP-1193 `request({method, params})` surface.

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;
use tokio::sync::mpsc;

use crate::domain::Account;

/// EIP-1193 error code for a user-rejected request.
pub const CODE_USER_REJECTED: i64 = 4001;

/// MetaMask error code for a duplicate in-flight request.
pub const CODE_PENDING_REQUEST: i64 = -32002;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProviderError {
    /// No wallet provider available; user-actionable (install).
    #[error("no wallet provider is available")]
    Absent,
    /// User declined in the wallet UI. Never retried automatically.
    #[error("request rejected by the user")]
    UserRejected,
    /// A prior request to this provider has not resolved. The caller must
    /// wait, not resubmit.
    #[error("a previous provider request is still pending")]
    PendingRequest,
    #[error("provider error {code}: {message}")]
    Rpc { code: i64, message: String },
    #[error("transport error: {0}")]
    Transport(String),
}

impl ProviderError {
    /// Map a raw JSON-RPC error code onto the taxonomy.
    pub fn from_rpc(code: i64, message: impl Into<String>) -> Self {
        match code {
            CODE_USER_REJECTED => ProviderError::UserRejected,
            CODE_PENDING_REQUEST => ProviderError::PendingRequest,
            _ => ProviderError::Rpc {
                code,
                message: message.into(),
            },
        }
    }
}

/// A single provider request.
#[derive(Debug, Clone)]
pub struct RpcCall {
    pub method: String,
    pub params: Value,
}

impl RpcCall {
    pub fn new(method: impl Into<String>, params: Value) -> Self {
        Self {
            method: method.into(),
            params,
        }
    }
}

/// Events pushed by the provider. Chain change is a hard invalidation
/// requiring full state re-derivation.
#[derive(Debug, Clone)]
pub enum ProviderEvent {
    AccountsChanged(Vec<Account>),
    ChainChanged(u64),
    /// Provider injected after initial load; re-run detection.
    Initialized,
}

/// The wallet provider boundary. Implementations relay to an external
/// wallet or node and own no financial state of their own.
#[async_trait]
pub trait WalletProvider: Send + Sync {
    /// Dispatch a request. May block indefinitely while the wallet UI
    /// waits on the user; that is accepted behavior.
    async fn request(&self, call: RpcCall) -> Result<Value, ProviderError>;

    /// Open a fresh event stream. Providers with no event source return a
    /// receiver that yields nothing.
    fn events(&self) -> mpsc::Receiver<ProviderEvent>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_rejected_code_mapping() {
        assert_eq!(
            ProviderError::from_rpc(4001, "User rejected the request"),
            ProviderError::UserRejected
        );
    }

    #[test]
    fn test_pending_request_code_mapping() {
        assert_eq!(
            ProviderError::from_rpc(-32002, "Request already pending"),
            ProviderError::PendingRequest
        );
    }

    #[test]
    fn test_generic_code_stays_rpc() {
        assert!(matches!(
            ProviderError::from_rpc(-32603, "internal error"),
            ProviderError::Rpc { code: -32603, .. }
        ));
    }
}
