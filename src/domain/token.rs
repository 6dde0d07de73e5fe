//! Token Registry
//!
//! Static metadata for the tokens supported by the cross-chain swap flows,
//! plus fixed-precision display formatting. The registry is read-only at
//! runtime; cardinality of everything keyed by token is bounded by it.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Contract address used for chain-native assets (ETH, TON).
pub const NATIVE_ADDRESS: &str = "0x0000000000000000000000000000000000000000";

/// Fixed display precision for amounts and rates.
pub const DISPLAY_DECIMALS: u32 = 4;

/// A supported token and where it lives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    /// Ticker symbol, e.g. "ETH"
    pub symbol: String,
    /// Human readable name
    pub name: String,
    /// Contract address; the zero address marks a chain-native asset
    pub address: String,
    /// Base-unit decimals
    pub decimals: u8,
    /// Chain the token settles on (TON mainnet uses a negative id)
    pub chain_id: i64,
}

impl Token {
    /// Native assets are queried with a direct balance call,
    /// contract tokens with a read-only `balanceOf` call.
    pub fn is_native(&self) -> bool {
        self.address == NATIVE_ADDRESS
    }
}

/// Read-only token registry seeded with the supported cross-chain set.
#[derive(Debug, Clone)]
pub struct TokenRegistry {
    tokens: Vec<Token>,
}

impl Default for TokenRegistry {
    fn default() -> Self {
        Self {
            tokens: vec![
                Token {
                    symbol: "ETH".to_string(),
                    name: "Ethereum".to_string(),
                    address: NATIVE_ADDRESS.to_string(),
                    decimals: 18,
                    chain_id: 1,
                },
                Token {
                    symbol: "TON".to_string(),
                    name: "Toncoin".to_string(),
                    address: NATIVE_ADDRESS.to_string(),
                    decimals: 9,
                    chain_id: -239,
                },
                Token {
                    symbol: "USDT".to_string(),
                    name: "Tether USD".to_string(),
                    address: "0xdac17f958d2ee523a2206206994597c13d831ec7".to_string(),
                    decimals: 6,
                    chain_id: 1,
                },
                Token {
                    symbol: "WETH".to_string(),
                    name: "Wrapped Ethereum".to_string(),
                    address: "0xc02aaa39b223fe8d0a0e5c4f27ead9083c756cc2".to_string(),
                    decimals: 18,
                    chain_id: 1,
                },
            ],
        }
    }
}

impl TokenRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a token by symbol (case-insensitive).
    pub fn get(&self, symbol: &str) -> Option<&Token> {
        self.tokens
            .iter()
            .find(|t| t.symbol.eq_ignore_ascii_case(symbol))
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.get(symbol).is_some()
    }

    pub fn all(&self) -> &[Token] {
        &self.tokens
    }

    /// Extend the registry with an additional token (config-supplied).
    pub fn with_token(mut self, token: Token) -> Self {
        self.tokens.push(token);
        self
    }
}

/// Format an amount with fixed four-decimal precision, e.g. "51.2300".
pub fn format_amount(amount: Decimal) -> String {
    let mut rounded = amount.round_dp(DISPLAY_DECIMALS);
    rounded.rescale(DISPLAY_DECIMALS);
    rounded.to_string()
}
