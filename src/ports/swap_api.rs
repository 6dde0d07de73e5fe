//! Swap API Port
//!
//! Boundary to the external cross-chain quote/swap service. The service is
//! an opaque black box; this crate only specifies how its results are
//! sequenced and invalidated, not its own semantics.

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

use crate::domain::Quote;

#[derive(Debug, Error, Clone)]
pub enum SwapApiError {
    #[error("swap API request failed: {0}")]
    Api(String),
    #[error("network error: {0}")]
    Network(String),
    #[error("unsupported pair: {0}/{1}")]
    UnsupportedPair(String, String),
}

/// Quote request parameters sent to the swap service.
#[derive(Debug, Clone, Serialize)]
pub struct SwapQuoteRequest {
    pub from_token: String,
    pub to_token: String,
    /// Decimal amount as entered, not base units
    pub amount: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slippage_bps: Option<u16>,
}

impl SwapQuoteRequest {
    pub fn new(
        from_token: impl Into<String>,
        to_token: impl Into<String>,
        amount: impl Into<String>,
    ) -> Self {
        Self {
            from_token: from_token.into(),
            to_token: to_token.into(),
            amount: amount.into(),
            from_address: None,
            slippage_bps: None,
        }
    }

    pub fn with_from_address(mut self, address: impl Into<String>) -> Self {
        self.from_address = Some(address.into());
        self
    }

    pub fn with_slippage_bps(mut self, bps: u16) -> Self {
        self.slippage_bps = Some(bps);
        self
    }
}

/// External price/swap API boundary.
#[async_trait]
pub trait SwapApi: Send + Sync {
    /// Fetch a quote with prepared transaction material. Failures are
    /// surfaced, never silently retried.
    async fn get_quote(&self, request: SwapQuoteRequest) -> Result<Quote, SwapApiError>;
}
