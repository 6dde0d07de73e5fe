//! Provider Gateway
//!
//! Wraps the injected wallet provider: capability probing at detection
//! time, request serialization (one in-flight request per provider), typed
//! helpers over the raw `request` surface, and cancellable event
//! subscriptions. The gateway owns no financial state; it only relays.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde::Serialize;
use serde_json::{json, Value};
use tokio::sync::{mpsc, Mutex};

use crate::domain::Account;
use crate::ports::provider::{ProviderError, ProviderEvent, RpcCall, WalletProvider};

/// Outcome of the capability probe, checked once at detection time.
pub enum Detection {
    /// No provider injected (yet); re-run on the Initialized event.
    Absent,
    Capable(ProviderGateway),
}

/// Transaction request relayed to the provider via `eth_sendTransaction`.
#[derive(Debug, Clone, Serialize)]
pub struct TxRequest {
    pub from: String,
    pub to: String,
    /// Hex-encoded wei value
    pub value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gas: Option<String>,
}

/// Handle to a detected, capable wallet provider.
#[derive(Clone)]
pub struct ProviderGateway {
    provider: Arc<dyn WalletProvider>,
    in_flight: Arc<Mutex<()>>,
}

impl ProviderGateway {
    pub fn new(provider: Arc<dyn WalletProvider>) -> Self {
        Self {
            provider,
            in_flight: Arc::new(Mutex::new(())),
        }
    }

    /// Probe for a usable provider. Injection can happen asynchronously
    /// after initial load; callers re-run detection on the `Initialized`
    /// event rather than treating absence as final.
    pub async fn detect(provider: Option<Arc<dyn WalletProvider>>) -> Detection {
        let Some(provider) = provider else {
            tracing::info!("No wallet provider injected");
            return Detection::Absent;
        };
        let gateway = Self::new(provider);
        match gateway.chain_id().await {
            Ok(chain_id) => {
                tracing::info!("Wallet provider detected on chain {}", chain_id);
                Detection::Capable(gateway)
            }
            Err(e) => {
                tracing::warn!("Provider probe failed, treating as absent: {}", e);
                Detection::Absent
            }
        }
    }

    /// Relay a read-only request. Requests queue on the in-flight guard,
    /// so concurrent callers serialize rather than fail.
    pub async fn request(&self, call: RpcCall) -> Result<Value, ProviderError> {
        let _guard = self.in_flight.lock().await;
        tracing::debug!("Provider request: {}", call.method);
        self.provider.request(call).await
    }

    /// Relay a request that opens the wallet UI. At most one may be in
    /// flight: issuing another while the first is unresolved fails with
    /// `PendingRequest` and is never retried automatically.
    async fn interactive_request(&self, call: RpcCall) -> Result<Value, ProviderError> {
        let _guard = self
            .in_flight
            .try_lock()
            .map_err(|_| ProviderError::PendingRequest)?;
        tracing::debug!("Provider request (interactive): {}", call.method);
        self.provider.request(call).await
    }

    /// Accounts already approved for this origin; empty when disconnected.
    pub async fn list_accounts(&self) -> Result<Vec<Account>, ProviderError> {
        let value = self.request(RpcCall::new("eth_accounts", json!([]))).await?;
        parse_accounts(&value)
    }

    /// Prompt the user to approve account access (opens the wallet UI).
    pub async fn request_accounts(&self) -> Result<Vec<Account>, ProviderError> {
        let value = self
            .interactive_request(RpcCall::new("eth_requestAccounts", json!([])))
            .await?;
        parse_accounts(&value)
    }

    /// Sign a login challenge with the given account.
    pub async fn sign_message(
        &self,
        account: &Account,
        message: &str,
    ) -> Result<String, ProviderError> {
        let value = self
            .interactive_request(RpcCall::new(
                "personal_sign",
                json!([message, account.as_str()]),
            ))
            .await?;
        as_string(&value)
    }

    pub async fn chain_id(&self) -> Result<u64, ProviderError> {
        let value = self.request(RpcCall::new("eth_chainId", json!([]))).await?;
        parse_hex_u64(&as_string(&value)?)
    }

    pub async fn switch_chain(&self, chain_id: u64) -> Result<(), ProviderError> {
        self.interactive_request(RpcCall::new(
            "wallet_switchEthereumChain",
            json!([{ "chainId": format!("0x{:x}", chain_id) }]),
        ))
        .await?;
        Ok(())
    }

    /// Native balance in base units (wei).
    pub async fn native_balance(&self, account: &Account) -> Result<u128, ProviderError> {
        let value = self
            .request(RpcCall::new(
                "eth_getBalance",
                json!([account.as_str(), "latest"]),
            ))
            .await?;
        parse_hex_u128(&as_string(&value)?)
    }

    /// Read-only contract call; returns the raw hex result.
    pub async fn call_contract(&self, to: &str, data: &str) -> Result<String, ProviderError> {
        let value = self
            .request(RpcCall::new(
                "eth_call",
                json!([{ "to": to, "data": data }, "latest"]),
            ))
            .await?;
        as_string(&value)
    }

    /// Submit a transaction; returns the hash on acceptance. Acceptance
    /// means submitted, not confirmed.
    pub async fn send_transaction(&self, tx: &TxRequest) -> Result<String, ProviderError> {
        let params = serde_json::to_value(tx)
            .map_err(|e| ProviderError::Transport(format!("bad tx request: {}", e)))?;
        let value = self
            .interactive_request(RpcCall::new("eth_sendTransaction", json!([params])))
            .await?;
        as_string(&value)
    }

    /// Receipt for a submitted transaction, None while unmined.
    pub async fn transaction_receipt(&self, hash: &str) -> Result<Option<Value>, ProviderError> {
        let value = self
            .request(RpcCall::new("eth_getTransactionReceipt", json!([hash])))
            .await?;
        Ok(match value {
            Value::Null => None,
            other => Some(other),
        })
    }

    /// Open a cancellable event subscription. Dropping the subscription or
    /// calling `dispose` on its disposer stops delivery, so an unmounted
    /// consumer never sees late events.
    pub fn subscribe(&self) -> EventSubscription {
        EventSubscription {
            rx: self.provider.events(),
            active: Arc::new(AtomicBool::new(true)),
        }
    }
}

/// A live provider event stream bound to one consumer.
pub struct EventSubscription {
    rx: mpsc::Receiver<ProviderEvent>,
    active: Arc<AtomicBool>,
}

impl EventSubscription {
    /// Next event, or None once the stream ends or the disposer fired.
    pub async fn next(&mut self) -> Option<ProviderEvent> {
        if !self.active.load(Ordering::Acquire) {
            return None;
        }
        let event = self.rx.recv().await?;
        if !self.active.load(Ordering::Acquire) {
            return None;
        }
        Some(event)
    }

    /// Handle that can cancel this subscription from elsewhere.
    pub fn disposer(&self) -> SubscriptionDisposer {
        SubscriptionDisposer {
            active: Arc::clone(&self.active),
        }
    }
}

/// Cancels the owning subscription; released when the UI context ends.
#[derive(Clone)]
pub struct SubscriptionDisposer {
    active: Arc<AtomicBool>,
}

impl SubscriptionDisposer {
    pub fn dispose(&self) {
        self.active.store(false, Ordering::Release);
    }
}

fn as_string(value: &Value) -> Result<String, ProviderError> {
    value
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| ProviderError::Transport(format!("unexpected response shape: {}", value)))
}

fn parse_accounts(value: &Value) -> Result<Vec<Account>, ProviderError> {
    let array = value
        .as_array()
        .ok_or_else(|| ProviderError::Transport(format!("expected account list: {}", value)))?;
    array
        .iter()
        .map(|v| v.as_str().map(Account::new))
        .collect::<Option<Vec<_>>>()
        .ok_or_else(|| ProviderError::Transport("non-string account entry".to_string()))
}

pub(crate) fn parse_hex_u64(hex: &str) -> Result<u64, ProviderError> {
    let body = hex.trim_start_matches("0x");
    if body.is_empty() {
        return Ok(0);
    }
    u64::from_str_radix(body, 16)
        .map_err(|e| ProviderError::Transport(format!("bad hex quantity '{}': {}", hex, e)))
}

pub(crate) fn parse_hex_u128(hex: &str) -> Result<u128, ProviderError> {
    let body = hex.trim_start_matches("0x");
    if body.is_empty() {
        return Ok(0);
    }
    u128::from_str_radix(body, 16)
        .map_err(|e| ProviderError::Transport(format!("bad hex quantity '{}': {}", hex, e)))
}
