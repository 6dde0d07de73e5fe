//! Swap Quotes
//!
//! A quote is a priced estimate for converting one token amount into
//! another. It carries the prepared call that executes it and is valid
//! only for the exact input that produced it; any mismatch with the
//! current form state makes it stale and inert.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::token::format_amount;

/// The (fromToken, toToken, amount) tuple driving the quote slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuoteInput {
    pub from_token: String,
    pub to_token: String,
    pub amount: Decimal,
}

impl QuoteInput {
    pub fn new(from_token: impl Into<String>, to_token: impl Into<String>, amount: Decimal) -> Self {
        Self {
            from_token: from_token.into(),
            to_token: to_token.into(),
            amount,
        }
    }

    /// Degenerate input clears the quote and must issue no request.
    pub fn is_degenerate(&self) -> bool {
        self.amount <= Decimal::ZERO
    }
}

/// Transaction material prepared by the swap service, submitted verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreparedCall {
    pub to: String,
    pub data: String,
    pub value: String,
    pub gas: String,
}

/// A priced swap estimate. Created per request, never mutated in place;
/// superseded by any newer request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub from_token: String,
    pub to_token: String,
    pub from_amount: Decimal,
    pub to_amount: Decimal,
    /// Units of toToken per one fromToken
    pub rate: Decimal,
    /// Display-only fee estimate, e.g. "0.002 ETH"
    pub estimated_gas: String,
    pub tx: PreparedCall,
}

impl Quote {
    /// A quote is actionable only while its input tuple still matches.
    pub fn matches(&self, input: &QuoteInput) -> bool {
        self.from_token == input.from_token
            && self.to_token == input.to_token
            && self.from_amount == input.amount
    }

    /// Fixed four-decimal output amount, e.g. "51.2300".
    pub fn to_amount_display(&self) -> String {
        format_amount(self.to_amount)
    }

    /// Rate string in the form "1 ETH = 51.2300 TON".
    pub fn rate_display(&self) -> String {
        format!(
            "1 {} = {} {}",
            self.from_token,
            format_amount(self.rate),
            self.to_token
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn eth_ton_quote() -> Quote {
        Quote {
            from_token: "ETH".to_string(),
            to_token: "TON".to_string(),
            from_amount: dec!(1),
            to_amount: dec!(51.23),
            rate: dec!(51.23),
            estimated_gas: "0.002 ETH".to_string(),
            tx: PreparedCall {
                to: "0x1111111254fb6c44bac0bed2854e76f90643097d".to_string(),
                data: "0x".to_string(),
                value: "0".to_string(),
                gas: "300000".to_string(),
            },
        }
    }

    #[test]
    fn test_matches_exact_input() {
        let quote = eth_ton_quote();
        assert!(quote.matches(&QuoteInput::new("ETH", "TON", dec!(1))));
    }

    #[test]
    fn test_stale_on_any_mismatch() {
        let quote = eth_ton_quote();
        assert!(!quote.matches(&QuoteInput::new("ETH", "TON", dec!(2))));
        assert!(!quote.matches(&QuoteInput::new("ETH", "USDT", dec!(1))));
        assert!(!quote.matches(&QuoteInput::new("TON", "ETH", dec!(1))));
    }

    #[test]
    fn test_display_formatting() {
        let quote = eth_ton_quote();
        assert_eq!(quote.to_amount_display(), "51.2300");
        assert_eq!(quote.rate_display(), "1 ETH = 51.2300 TON");
    }

    #[test]
    fn test_degenerate_input() {
        assert!(QuoteInput::new("ETH", "TON", Decimal::ZERO).is_degenerate());
        assert!(QuoteInput::new("ETH", "TON", dec!(-1)).is_degenerate());
        assert!(!QuoteInput::new("ETH", "TON", dec!(0.5)).is_degenerate());
    }
}
