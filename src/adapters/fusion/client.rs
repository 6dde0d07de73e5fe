//! Fusion API Client
//!
//! HTTP client for the cross-chain swap aggregator quote API.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::domain::{PreparedCall, Quote};
use crate::ports::swap_api::{SwapApi, SwapApiError, SwapQuoteRequest};

/// Fusion API client configuration
#[derive(Debug, Clone)]
pub struct FusionConfig {
    /// Base URL for the quote API
    pub api_base_url: String,
    /// Optional API key for higher rate limits
    pub api_key: Option<String>,
    /// Request timeout
    pub timeout: Duration,
}

impl Default for FusionConfig {
    fn default() -> Self {
        Self {
            api_base_url: "https://api.1inch.io/v5.0/1".to_string(),
            api_key: None,
            timeout: Duration::from_secs(30),
        }
    }
}

/// Quote response wire format.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QuoteResponse {
    from_token: String,
    to_token: String,
    from_amount: Decimal,
    to_amount: Decimal,
    rate: Decimal,
    estimated_gas: String,
    tx: TxResponse,
}

#[derive(Debug, Deserialize)]
struct TxResponse {
    to: String,
    data: String,
    value: String,
    gas: String,
}

impl From<QuoteResponse> for Quote {
    fn from(r: QuoteResponse) -> Self {
        Quote {
            from_token: r.from_token,
            to_token: r.to_token,
            from_amount: r.from_amount,
            to_amount: r.to_amount,
            rate: r.rate,
            estimated_gas: r.estimated_gas,
            tx: PreparedCall {
                to: r.tx.to,
                data: r.tx.data,
                value: r.tx.value,
                gas: r.tx.gas,
            },
        }
    }
}

/// Cross-chain swap aggregator client
#[derive(Debug, Clone)]
pub struct FusionClient {
    config: FusionConfig,
    http: Client,
}

impl FusionClient {
    /// Create a new client with default configuration
    pub fn new() -> Result<Self, SwapApiError> {
        Self::with_config(FusionConfig::default())
    }

    /// Create a new client with custom configuration
    pub fn with_config(config: FusionConfig) -> Result<Self, SwapApiError> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| SwapApiError::Network(format!("failed to create HTTP client: {}", e)))?;
        Ok(Self { config, http })
    }

    pub fn with_api_key(api_key: String) -> Result<Self, SwapApiError> {
        let config = FusionConfig {
            api_key: Some(api_key),
            ..FusionConfig::default()
        };
        Self::with_config(config)
    }

    pub fn api_base_url(&self) -> &str {
        &self.config.api_base_url
    }

    async fn fetch_quote(&self, request: &SwapQuoteRequest) -> Result<QuoteResponse, SwapApiError> {
        let url = format!("{}/quote", self.config.api_base_url);

        let mut req = self.http.get(&url).query(&[
            ("fromToken", request.from_token.as_str()),
            ("toToken", request.to_token.as_str()),
            ("amount", request.amount.as_str()),
        ]);
        if let Some(ref from_address) = request.from_address {
            req = req.query(&[("fromAddress", from_address.as_str())]);
        }
        if let Some(slippage_bps) = request.slippage_bps {
            req = req.query(&[("slippageBps", slippage_bps.to_string().as_str())]);
        }
        if let Some(ref api_key) = self.config.api_key {
            req = req.header("x-api-key", api_key);
        }

        // Failures surface immediately; the quote engine only re-fetches on
        // the next qualifying input change, never on its own.
        let response = req
            .send()
            .await
            .map_err(|e| SwapApiError::Network(e.to_string()))?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(SwapApiError::Api("rate limit exceeded".to_string()));
        }
        if status == StatusCode::NOT_FOUND || status == StatusCode::BAD_REQUEST {
            let text = response.text().await.unwrap_or_default();
            if text.contains("unsupported") || text.contains("pair") {
                return Err(SwapApiError::UnsupportedPair(
                    request.from_token.clone(),
                    request.to_token.clone(),
                ));
            }
            return Err(SwapApiError::Api(format!("API error {}: {}", status, text)));
        }
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(SwapApiError::Api(format!("API error {}: {}", status, text)));
        }

        response
            .json()
            .await
            .map_err(|e| SwapApiError::Api(format!("failed to parse quote: {}", e)))
    }

}

#[async_trait]
impl SwapApi for FusionClient {
    async fn get_quote(&self, request: SwapQuoteRequest) -> Result<Quote, SwapApiError> {
        let response = self.fetch_quote(&request).await?;
        Ok(response.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_default_config() {
        let client = FusionClient::new().unwrap();
        assert_eq!(client.api_base_url(), "https://api.1inch.io/v5.0/1");
    }

    #[tokio::test]
    async fn test_network_failure_surfaces_without_retry() {
        // Nothing listens on the discard port; the connection is refused.
        let client = FusionClient::with_config(FusionConfig {
            api_base_url: "http://127.0.0.1:9".to_string(),
            ..FusionConfig::default()
        })
        .unwrap();

        let started = std::time::Instant::now();
        let result = client
            .get_quote(SwapQuoteRequest::new("ETH", "TON", "1"))
            .await;
        assert!(matches!(result, Err(SwapApiError::Network(_))));
        // A retrying client would sleep between attempts before erroring
        assert!(started.elapsed() < Duration::from_millis(450));
    }

    #[test]
    fn test_quote_response_deserializes() {
        let json = r#"{
            "fromToken": "ETH",
            "toToken": "TON",
            "fromAmount": "1",
            "toAmount": "51.23",
            "rate": "51.23",
            "estimatedGas": "0.002 ETH",
            "tx": {
                "to": "0x1111111254fb6c44bac0bed2854e76f90643097d",
                "data": "0x",
                "value": "0",
                "gas": "300000"
            }
        }"#;
        let response: QuoteResponse = serde_json::from_str(json).unwrap();
        let quote: Quote = response.into();
        assert_eq!(quote.to_amount, dec!(51.23));
        assert_eq!(quote.tx.gas, "300000");
    }
}
