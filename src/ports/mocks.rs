//! Recording fakes for the provider and swap API ports
//!
//! Used by unit/integration tests and by the CLI's offline demo mode.
//! Each mock records every call and serves configured responses through
//! builder methods.

use std::collections::{HashMap, VecDeque};
use std::str::FromStr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde_json::Value;
use tokio::sync::mpsc;

use crate::domain::{PreparedCall, Quote};
use super::provider::{ProviderError, ProviderEvent, RpcCall, WalletProvider};
use super::swap_api::{SwapApi, SwapApiError, SwapQuoteRequest};

/// Mock wallet provider with per-method canned responses and an event
/// channel the test can push into. The last configured response for a
/// method is sticky once the queue drains.
#[derive(Default)]
pub struct MockProvider {
    calls: Arc<Mutex<Vec<RpcCall>>>,
    responses: Arc<Mutex<HashMap<String, VecDeque<Result<Value, ProviderError>>>>>,
    delays: Arc<Mutex<HashMap<String, Duration>>>,
    event_senders: Arc<Mutex<Vec<mpsc::Sender<ProviderEvent>>>>,
}

impl MockProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// A provider already holding one approved account, able to answer the
    /// whole connect flow.
    pub fn with_connected_account(address: &str) -> Self {
        let accounts = serde_json::json!([address]);
        Self::new()
            .with_response("eth_chainId", serde_json::json!("0x1"))
            .with_response("eth_accounts", accounts.clone())
            .with_response("eth_requestAccounts", accounts)
            .with_response("personal_sign", serde_json::json!("0xsigned"))
    }

    pub fn with_response(self, method: &str, value: Value) -> Self {
        self.responses
            .lock()
            .unwrap()
            .entry(method.to_string())
            .or_default()
            .push_back(Ok(value));
        self
    }

    pub fn with_error(self, method: &str, error: ProviderError) -> Self {
        self.responses
            .lock()
            .unwrap()
            .entry(method.to_string())
            .or_default()
            .push_back(Err(error));
        self
    }

    /// Delay responses for a method, for in-flight ordering tests.
    pub fn with_delay(self, method: &str, delay: Duration) -> Self {
        self.delays
            .lock()
            .unwrap()
            .insert(method.to_string(), delay);
        self
    }

    pub fn calls(&self) -> Vec<RpcCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self, method: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.method == method)
            .count()
    }

    /// Push an event to every open subscription.
    pub async fn emit(&self, event: ProviderEvent) {
        let senders: Vec<_> = self.event_senders.lock().unwrap().clone();
        for sender in senders {
            let _ = sender.send(event.clone()).await;
        }
    }
}

#[async_trait]
impl WalletProvider for MockProvider {
    async fn request(&self, call: RpcCall) -> Result<Value, ProviderError> {
        self.calls.lock().unwrap().push(call.clone());

        let delay = self.delays.lock().unwrap().get(&call.method).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let mut responses = self.responses.lock().unwrap();
        let queue = responses
            .get_mut(&call.method)
            .ok_or_else(|| ProviderError::Rpc {
                code: -32601,
                message: format!("no response configured for {}", call.method),
            })?;
        let response = queue.pop_front().ok_or_else(|| ProviderError::Rpc {
            code: -32601,
            message: format!("response queue drained for {}", call.method),
        })?;
        if queue.is_empty() {
            queue.push_back(response.clone());
        }
        response
    }

    fn events(&self) -> mpsc::Receiver<ProviderEvent> {
        let (tx, rx) = mpsc::channel(16);
        self.event_senders.lock().unwrap().push(tx);
        rx
    }
}

/// Mock swap API backed by a configurable rate table, with per-amount
/// response delays for latest-wins ordering tests.
#[derive(Default)]
pub struct MockSwapApi {
    calls: Arc<Mutex<Vec<SwapQuoteRequest>>>,
    rates: Arc<Mutex<HashMap<String, Decimal>>>,
    failing_pairs: Arc<Mutex<Vec<String>>>,
    delays: Arc<Mutex<HashMap<String, Duration>>>,
}

impl MockSwapApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rate(self, from: &str, to: &str, rate: Decimal) -> Self {
        self.rates
            .lock()
            .unwrap()
            .insert(format!("{}-{}", from, to), rate);
        self
    }

    /// Make quotes for a pair fail with an API error.
    pub fn with_failure(self, from: &str, to: &str) -> Self {
        self.failing_pairs
            .lock()
            .unwrap()
            .push(format!("{}-{}", from, to));
        self
    }

    /// Delay the response for a specific request amount.
    pub fn with_delay_for_amount(self, amount: &str, delay: Duration) -> Self {
        self.delays
            .lock()
            .unwrap()
            .insert(amount.to_string(), delay);
        self
    }

    pub fn calls(&self) -> Vec<SwapQuoteRequest> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl SwapApi for MockSwapApi {
    async fn get_quote(&self, request: SwapQuoteRequest) -> Result<Quote, SwapApiError> {
        self.calls.lock().unwrap().push(request.clone());

        let delay = self.delays.lock().unwrap().get(&request.amount).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let pair = format!("{}-{}", request.from_token, request.to_token);
        if self.failing_pairs.lock().unwrap().contains(&pair) {
            return Err(SwapApiError::Api(format!("quote unavailable for {}", pair)));
        }

        let rate = self
            .rates
            .lock()
            .unwrap()
            .get(&pair)
            .copied()
            .ok_or_else(|| {
                SwapApiError::UnsupportedPair(request.from_token.clone(), request.to_token.clone())
            })?;

        let amount = Decimal::from_str(&request.amount)
            .map_err(|e| SwapApiError::Api(format!("bad amount: {}", e)))?;

        Ok(Quote {
            from_token: request.from_token,
            to_token: request.to_token,
            from_amount: amount,
            to_amount: amount * rate,
            rate,
            estimated_gas: "0.002 ETH".to_string(),
            tx: PreparedCall {
                to: "0x1111111254fb6c44bac0bed2854e76f90643097d".to_string(),
                data: "0x".to_string(),
                value: "0".to_string(),
                gas: "300000".to_string(),
            },
        })
    }
}
