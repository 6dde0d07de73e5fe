//! Ethereum JSON-RPC Provider
//!
//! `WalletProvider` backed by a plain JSON-RPC endpoint over HTTP. Serves
//! the read-only paths (chain id, balances, calls, receipts); methods that
//! need a signing wallet surface whatever error the node returns. A bare
//! RPC node pushes no events, so the event stream opens closed.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::sync::mpsc;

use crate::ports::provider::{ProviderError, ProviderEvent, RpcCall, WalletProvider};

/// Ethereum RPC provider configuration
#[derive(Debug, Clone)]
pub struct EthRpcConfig {
    /// JSON-RPC endpoint URL
    pub rpc_url: String,
    /// Request timeout
    pub timeout: Duration,
}

impl Default for EthRpcConfig {
    fn default() -> Self {
        Self {
            rpc_url: "https://eth.llamarpc.com".to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

#[derive(Debug, Deserialize)]
struct RpcResponse {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<RpcErrorBody>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorBody {
    code: i64,
    message: String,
}

/// JSON-RPC transport with a per-process request id counter.
#[derive(Debug)]
pub struct EthRpcProvider {
    config: EthRpcConfig,
    http: Client,
    next_id: AtomicU64,
}

impl EthRpcProvider {
    pub fn new(rpc_url: impl Into<String>) -> Result<Self, ProviderError> {
        Self::with_config(EthRpcConfig {
            rpc_url: rpc_url.into(),
            ..EthRpcConfig::default()
        })
    }

    pub fn with_config(config: EthRpcConfig) -> Result<Self, ProviderError> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ProviderError::Transport(format!("failed to create HTTP client: {}", e)))?;
        Ok(Self {
            config,
            http,
            next_id: AtomicU64::new(1),
        })
    }

    pub fn rpc_url(&self) -> &str {
        &self.config.rpc_url
    }
}

#[async_trait]
impl WalletProvider for EthRpcProvider {
    async fn request(&self, call: RpcCall) -> Result<Value, ProviderError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let body = json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": call.method,
            "params": call.params,
        });

        let response = self
            .http
            .post(&self.config.rpc_url)
            .json(&body)
            .send()
            .await
            .map_err(|e| ProviderError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(ProviderError::Transport(format!(
                "HTTP {}: {}",
                status, text
            )));
        }

        let parsed: RpcResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::Transport(format!("failed to parse response: {}", e)))?;

        if let Some(error) = parsed.error {
            return Err(ProviderError::from_rpc(error.code, error.message));
        }
        Ok(parsed.result.unwrap_or(Value::Null))
    }

    fn events(&self) -> mpsc::Receiver<ProviderEvent> {
        // No push channel on plain HTTP; the stream closes immediately.
        let (_tx, rx) = mpsc::channel(1);
        rx
    }
}
