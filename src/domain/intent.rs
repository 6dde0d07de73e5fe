//! Transaction Intents
//!
//! Ephemeral transfer/swap requests built from form state and consumed
//! exactly once by the transaction dispatcher. Validation is resolved
//! locally and blocks submission; invalid input never reaches the provider.

use rust_decimal::Decimal;
use thiserror::Error;

use super::account::is_valid_address;
use super::quote::{Quote, QuoteInput};
use super::token::TokenRegistry;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("invalid recipient address: {0}")]
    InvalidAddress(String),
    #[error("amount must be positive")]
    NonPositiveAmount,
    #[error("insufficient balance: need {needed}, have {available}")]
    InsufficientBalance {
        needed: Decimal,
        available: Decimal,
    },
    #[error("unknown token: {0}")]
    UnknownToken(String),
    #[error("cannot swap a token for itself")]
    SameToken,
}

/// Native transfer request.
#[derive(Debug, Clone)]
pub struct TransferIntent {
    pub to: String,
    pub amount: Decimal,
}

impl TransferIntent {
    pub fn new(to: impl Into<String>, amount: Decimal) -> Self {
        Self {
            to: to.into(),
            amount,
        }
    }

    /// Check recipient shape and balance ceiling. The available figure is
    /// whatever the caller treats as spendable; any reserved-fee margin is
    /// applied before calling here.
    pub fn validate(&self, available: Decimal) -> Result<(), ValidationError> {
        if !is_valid_address(&self.to) {
            return Err(ValidationError::InvalidAddress(self.to.clone()));
        }
        if self.amount <= Decimal::ZERO {
            return Err(ValidationError::NonPositiveAmount);
        }
        if self.amount > available {
            return Err(ValidationError::InsufficientBalance {
                needed: self.amount,
                available,
            });
        }
        Ok(())
    }
}

/// Swap request; executed only against a quote that still matches it.
#[derive(Debug, Clone)]
pub struct SwapIntent {
    pub from_token: String,
    pub to_token: String,
    pub amount: Decimal,
    pub slippage_bps: u16,
}

impl SwapIntent {
    pub fn new(
        from_token: impl Into<String>,
        to_token: impl Into<String>,
        amount: Decimal,
        slippage_bps: u16,
    ) -> Self {
        Self {
            from_token: from_token.into(),
            to_token: to_token.into(),
            amount,
            slippage_bps,
        }
    }

    pub fn validate(&self, registry: &TokenRegistry) -> Result<(), ValidationError> {
        if !registry.contains(&self.from_token) {
            return Err(ValidationError::UnknownToken(self.from_token.clone()));
        }
        if !registry.contains(&self.to_token) {
            return Err(ValidationError::UnknownToken(self.to_token.clone()));
        }
        if self.from_token.eq_ignore_ascii_case(&self.to_token) {
            return Err(ValidationError::SameToken);
        }
        if self.amount <= Decimal::ZERO {
            return Err(ValidationError::NonPositiveAmount);
        }
        Ok(())
    }

    pub fn quote_input(&self) -> QuoteInput {
        QuoteInput::new(self.from_token.clone(), self.to_token.clone(), self.amount)
    }

    /// Whether a quote was produced by exactly this intent.
    pub fn matches_quote(&self, quote: &Quote) -> bool {
        quote.matches(&self.quote_input())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    const RECIPIENT: &str = "0xdac17f958d2ee523a2206206994597c13d831ec7";

    #[test]
    fn test_valid_transfer() {
        let intent = TransferIntent::new(RECIPIENT, dec!(0.5));
        assert!(intent.validate(dec!(2.45)).is_ok());
    }

    #[test]
    fn test_bad_address_rejected() {
        let intent = TransferIntent::new("not-an-address", dec!(0.5));
        assert!(matches!(
            intent.validate(dec!(2.45)),
            Err(ValidationError::InvalidAddress(_))
        ));
    }

    #[test]
    fn test_zero_amount_rejected() {
        let intent = TransferIntent::new(RECIPIENT, Decimal::ZERO);
        assert_eq!(
            intent.validate(dec!(2.45)),
            Err(ValidationError::NonPositiveAmount)
        );
    }

    #[test]
    fn test_insufficient_balance_rejected() {
        let intent = TransferIntent::new(RECIPIENT, dec!(3));
        assert!(matches!(
            intent.validate(dec!(2.45)),
            Err(ValidationError::InsufficientBalance { .. })
        ));
    }

    #[test]
    fn test_amount_equal_to_balance_allowed() {
        let intent = TransferIntent::new(RECIPIENT, dec!(2.45));
        assert!(intent.validate(dec!(2.45)).is_ok());
    }

    #[test]
    fn test_swap_intent_validation() {
        let registry = TokenRegistry::new();
        assert!(SwapIntent::new("ETH", "TON", dec!(1), 50)
            .validate(&registry)
            .is_ok());
        assert!(matches!(
            SwapIntent::new("ETH", "DOGE", dec!(1), 50).validate(&registry),
            Err(ValidationError::UnknownToken(_))
        ));
        assert_eq!(
            SwapIntent::new("ETH", "eth", dec!(1), 50).validate(&registry),
            Err(ValidationError::SameToken)
        );
        assert_eq!(
            SwapIntent::new("ETH", "TON", Decimal::ZERO, 50).validate(&registry),
            Err(ValidationError::NonPositiveAmount)
        );
    }
}
