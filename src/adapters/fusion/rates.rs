//! Fixed Rate Quoter
//!
//! Offline `SwapApi` backed by a static rate table. Used for demo mode
//! and local development where no aggregator is reachable; produces the
//! same quote shape as the live client, including prepared call material.

use std::collections::HashMap;
use std::str::FromStr;

use async_trait::async_trait;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::domain::{PreparedCall, Quote};
use crate::ports::swap_api::{SwapApi, SwapApiError, SwapQuoteRequest};

/// Router address embedded in every offline prepared call.
const ROUTER_ADDRESS: &str = "0x1111111254fb6c44bac0bed2854e76f90643097d";

/// Static cross-chain rate table.
#[derive(Debug)]
pub struct FixedRateQuoter {
    rates: HashMap<(String, String), Decimal>,
}

impl Default for FixedRateQuoter {
    fn default() -> Self {
        let pairs = [
            ("ETH", "TON", dec!(51.23)),
            ("TON", "ETH", dec!(0.0195)),
            ("ETH", "USDT", dec!(1600)),
            ("USDT", "ETH", dec!(0.000625)),
            ("TON", "USDT", dec!(31.25)),
            ("USDT", "TON", dec!(0.032)),
        ];
        let rates = pairs
            .into_iter()
            .map(|(from, to, rate)| ((from.to_string(), to.to_string()), rate))
            .collect();
        Self { rates }
    }
}

impl FixedRateQuoter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rate(&self, from: &str, to: &str) -> Option<Decimal> {
        self.rates
            .get(&(from.to_uppercase(), to.to_uppercase()))
            .copied()
    }
}

#[async_trait]
impl SwapApi for FixedRateQuoter {
    async fn get_quote(&self, request: SwapQuoteRequest) -> Result<Quote, SwapApiError> {
        let rate = self.rate(&request.from_token, &request.to_token).ok_or_else(|| {
            SwapApiError::UnsupportedPair(request.from_token.clone(), request.to_token.clone())
        })?;

        let amount = Decimal::from_str(&request.amount)
            .map_err(|e| SwapApiError::Api(format!("bad amount '{}': {}", request.amount, e)))?;

        Ok(Quote {
            from_token: request.from_token,
            to_token: request.to_token,
            from_amount: amount,
            to_amount: amount * rate,
            rate,
            estimated_gas: "0.002 ETH".to_string(),
            tx: PreparedCall {
                to: ROUTER_ADDRESS.to_string(),
                data: "0x".to_string(),
                value: "0".to_string(),
                gas: "300000".to_string(),
            },
        })
    }
}
