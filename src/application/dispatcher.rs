//! Transaction Dispatcher
//!
//! Validates transfer and swap intents and submits them through the
//! provider gateway. Success means accepted by the wallet, not mined;
//! confirmation is a separate, opt-in receipt poll.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde_json::Value;
use thiserror::Error;
use tokio::sync::Mutex;

use crate::domain::{
    Account, Quote, SwapIntent, TokenRegistry, TransferIntent, ValidationError,
};
use crate::ports::provider::ProviderError;

use super::gateway::{ProviderGateway, TxRequest};

/// Native-transfer gas limit, the fixed 21000 of a value-only transaction.
const TRANSFER_GAS_HEX: &str = "0x5208";

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("quote no longer matches the swap request")]
    StaleQuote,
    #[error("another submission is already in flight")]
    SubmissionInFlight,
    #[error("user rejected the transaction")]
    Rejected,
    #[error("amount not representable in base units")]
    AmountOutOfRange,
    #[error("transaction not mined within {0:?}")]
    ReceiptTimeout(Duration),
    #[error("provider error: {0}")]
    Provider(ProviderError),
}

impl From<ProviderError> for DispatchError {
    fn from(e: ProviderError) -> Self {
        match e {
            ProviderError::UserRejected => DispatchError::Rejected,
            ProviderError::PendingRequest => DispatchError::SubmissionInFlight,
            other => DispatchError::Provider(other),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxKind {
    Transfer,
    Swap,
}

/// A submitted transaction. Holds the hash; does not imply confirmation.
#[derive(Debug, Clone)]
pub struct TxHandle {
    pub hash: String,
    pub kind: TxKind,
    pub submitted_at: DateTime<Utc>,
}

/// Intent-to-submission pipeline, one submission at a time.
#[derive(Clone)]
pub struct TransactionDispatcher {
    registry: Arc<TokenRegistry>,
    submitting: Arc<Mutex<()>>,
}

impl TransactionDispatcher {
    pub fn new(registry: TokenRegistry) -> Self {
        Self {
            registry: Arc::new(registry),
            submitting: Arc::new(Mutex::new(())),
        }
    }

    /// Validate and submit a native transfer. `available` is the spendable
    /// balance the intent is checked against before anything hits the
    /// network.
    pub async fn send_transfer(
        &self,
        gateway: &ProviderGateway,
        from: &Account,
        intent: &TransferIntent,
        available: Decimal,
    ) -> Result<TxHandle, DispatchError> {
        intent.validate(available)?;

        let native = self
            .registry
            .all()
            .iter()
            .find(|t| t.is_native())
            .ok_or(ValidationError::UnknownToken("native".to_string()))?;
        let value = to_base_units_hex(intent.amount, native.decimals)
            .ok_or(DispatchError::AmountOutOfRange)?;

        let tx = TxRequest {
            from: from.as_str().to_string(),
            to: intent.to.clone(),
            value,
            data: None,
            gas: Some(TRANSFER_GAS_HEX.to_string()),
        };
        self.submit(gateway, tx, TxKind::Transfer).await
    }

    /// Submit a swap using the prepared call from a quote. The quote must
    /// still match the intent; an edited form invalidates it.
    pub async fn send_swap(
        &self,
        gateway: &ProviderGateway,
        from: &Account,
        intent: &SwapIntent,
        quote: &Quote,
    ) -> Result<TxHandle, DispatchError> {
        intent.validate(&self.registry)?;
        if !intent.matches_quote(quote) {
            return Err(DispatchError::StaleQuote);
        }

        let tx = TxRequest {
            from: from.as_str().to_string(),
            to: quote.tx.to.clone(),
            value: quote.tx.value.clone(),
            data: Some(quote.tx.data.clone()),
            gas: Some(quote.tx.gas.clone()),
        };
        self.submit(gateway, tx, TxKind::Swap).await
    }

    async fn submit(
        &self,
        gateway: &ProviderGateway,
        tx: TxRequest,
        kind: TxKind,
    ) -> Result<TxHandle, DispatchError> {
        let _guard = self
            .submitting
            .try_lock()
            .map_err(|_| DispatchError::SubmissionInFlight)?;

        tracing::info!("Submitting {:?} transaction to {}", kind, tx.to);
        let hash = gateway.send_transaction(&tx).await?;
        tracing::info!("Transaction accepted: {}", hash);

        Ok(TxHandle {
            hash,
            kind,
            submitted_at: Utc::now(),
        })
    }

    /// Poll for the receipt of a submitted transaction. Opt-in; callers
    /// that only care about acceptance never wait for mining.
    pub async fn await_receipt(
        &self,
        gateway: &ProviderGateway,
        handle: &TxHandle,
        poll_interval: Duration,
        timeout: Duration,
    ) -> Result<Value, DispatchError> {
        let deadline = tokio::time::Instant::now() + timeout;
        loop {
            if let Some(receipt) = gateway.transaction_receipt(&handle.hash).await? {
                tracing::info!("Transaction mined: {}", handle.hash);
                return Ok(receipt);
            }
            if tokio::time::Instant::now() >= deadline {
                return Err(DispatchError::ReceiptTimeout(timeout));
            }
            tokio::time::sleep(poll_interval).await;
        }
    }
}

/// Convert a display amount to a hex base-unit quantity. None when the
/// amount does not fit the token's scale exactly: rescale rounds excess
/// precision and leaves the value untouched on overflow, and a submitted
/// value may never differ from the validated one.
fn to_base_units_hex(amount: Decimal, decimals: u8) -> Option<String> {
    let mut scaled = amount;
    scaled.rescale(decimals as u32);
    if scaled.scale() != decimals as u32 || scaled != amount {
        return None;
    }
    let units = scaled.mantissa();
    if units < 0 {
        return None;
    }
    Some(format!("0x{:x}", units))
}
