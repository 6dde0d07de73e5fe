//! Quote Engine
//!
//! Debounced, cancellable quote sequencing against the external swap API.
//! Rapid input edits coalesce into a single outstanding request; a
//! monotonically increasing sequence number makes the newest request the
//! only one allowed to publish, so the slot never shows a quote for stale
//! input. Stale results are discarded on arrival, not aborted at the
//! transport level.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;

use crate::domain::{Account, Quote, QuoteInput};
use crate::ports::swap_api::{SwapApi, SwapQuoteRequest};

/// Input quiescence window before a quote request dispatches.
pub const DEFAULT_DEBOUNCE_MS: u64 = 500;

/// The latest-value quote slot. Only the quote engine writes it.
#[derive(Debug, Clone, PartialEq)]
pub enum QuoteSlot {
    /// No qualifying input
    Idle,
    /// Debouncing or awaiting the API
    Pending,
    Ready(Quote),
    /// API failure; cleared by the next qualifying input change
    Failed(String),
}

/// Debounced quote fetcher; cheap to clone, all clones share the slot.
#[derive(Clone)]
pub struct QuoteEngine {
    api: Arc<dyn SwapApi>,
    debounce: Duration,
    slippage_bps: u16,
    seq: Arc<AtomicU64>,
    input: Arc<RwLock<Option<QuoteInput>>>,
    slot: Arc<RwLock<QuoteSlot>>,
    account: Arc<RwLock<Option<Account>>>,
}

impl QuoteEngine {
    pub fn new(api: Arc<dyn SwapApi>) -> Self {
        Self {
            api,
            debounce: Duration::from_millis(DEFAULT_DEBOUNCE_MS),
            slippage_bps: 100,
            seq: Arc::new(AtomicU64::new(0)),
            input: Arc::new(RwLock::new(None)),
            slot: Arc::new(RwLock::new(QuoteSlot::Idle)),
            account: Arc::new(RwLock::new(None)),
        }
    }

    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    pub fn with_slippage_bps(mut self, bps: u16) -> Self {
        self.slippage_bps = bps;
        self
    }

    /// Bind the requesting account forwarded to the swap API.
    pub async fn set_account(&self, account: Option<Account>) {
        *self.account.write().await = account;
    }

    /// Feed a new input tuple. Supersedes any pending or in-flight request
    /// for the slot; degenerate input clears the quote immediately and
    /// issues no request.
    pub async fn set_input(&self, input: QuoteInput) {
        let seq = self.seq.fetch_add(1, Ordering::SeqCst) + 1;

        if input.is_degenerate() {
            *self.input.write().await = None;
            *self.slot.write().await = QuoteSlot::Idle;
            return;
        }

        *self.input.write().await = Some(input.clone());
        *self.slot.write().await = QuoteSlot::Pending;

        let engine = self.clone();
        tokio::spawn(async move {
            engine.debounced_fetch(seq, input).await;
        });
    }

    /// Discard the current input and quote (navigation away, chain change).
    pub async fn clear(&self) {
        self.seq.fetch_add(1, Ordering::SeqCst);
        *self.input.write().await = None;
        *self.slot.write().await = QuoteSlot::Idle;
    }

    pub async fn current(&self) -> QuoteSlot {
        self.slot.read().await.clone()
    }

    /// The latest quote, only while it still matches current input.
    pub async fn current_quote(&self) -> Option<Quote> {
        let slot = self.slot.read().await;
        let QuoteSlot::Ready(quote) = &*slot else {
            return None;
        };
        let input = self.input.read().await;
        match &*input {
            Some(input) if quote.matches(input) => Some(quote.clone()),
            _ => None,
        }
    }

    async fn debounced_fetch(self, seq: u64, input: QuoteInput) {
        tokio::time::sleep(self.debounce).await;

        // Superseded during the quiescence window: never dispatch.
        if self.seq.load(Ordering::SeqCst) != seq {
            return;
        }

        let mut request = SwapQuoteRequest::new(
            input.from_token.clone(),
            input.to_token.clone(),
            input.amount.to_string(),
        )
        .with_slippage_bps(self.slippage_bps);
        if let Some(account) = self.account.read().await.clone() {
            request = request.with_from_address(account.as_str());
        }

        tracing::debug!(
            "Dispatching quote request #{}: {} {} -> {}",
            seq,
            input.amount,
            input.from_token,
            input.to_token
        );
        let result = self.api.get_quote(request).await;

        // A newer request may supersede this one at any point up to the
        // publish itself, so the check happens under the slot write lock.
        let mut slot = self.slot.write().await;
        if self.seq.load(Ordering::SeqCst) != seq {
            tracing::debug!("Discarding stale quote result #{}", seq);
            return;
        }
        match result {
            Ok(quote) if quote.matches(&input) => {
                tracing::info!(
                    "Quote ready: {} {} -> {} {}",
                    quote.from_amount,
                    quote.from_token,
                    quote.to_amount_display(),
                    quote.to_token
                );
                *slot = QuoteSlot::Ready(quote);
            }
            Ok(quote) => {
                // The API answered for a different tuple than asked.
                tracing::warn!(
                    "Quote response does not match request ({} {} -> {}), ignoring",
                    quote.from_amount,
                    quote.from_token,
                    quote.to_token
                );
            }
            Err(e) => {
                tracing::warn!("Quote request failed: {}", e);
                *slot = QuoteSlot::Failed(e.to_string());
            }
        }
    }
}
