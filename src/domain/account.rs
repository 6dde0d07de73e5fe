//! Account Identity
//!
//! Opaque wallet address wrapper. An account exists once the provider
//! reports at least one address and becomes absent on disconnect.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A connected wallet identity, stored lowercase for comparison.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Account(String);

impl Account {
    /// Wrap an address string, normalizing case.
    pub fn new(address: impl Into<String>) -> Self {
        Self(address.into().to_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Abbreviated form for logs and UI copy: `0xabcd...1234`.
    pub fn short(&self) -> String {
        if self.0.len() > 10 {
            format!("{}...{}", &self.0[..6], &self.0[self.0.len() - 4..])
        } else {
            self.0.clone()
        }
    }

    /// Hex payload without the `0x` prefix.
    pub fn hex_body(&self) -> &str {
        self.0.strip_prefix("0x").unwrap_or(&self.0)
    }
}

impl fmt::Display for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Check an EVM address shape: `0x` followed by 40 hex digits.
pub fn is_valid_address(address: &str) -> bool {
    let Some(body) = address.strip_prefix("0x") else {
        return false;
    };
    body.len() == 40 && body.chars().all(|c| c.is_ascii_hexdigit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_account_normalizes_case() {
        let account = Account::new("0xABCdef1234567890abcdef1234567890ABCDEF12");
        assert_eq!(account.as_str(), "0xabcdef1234567890abcdef1234567890abcdef12");
    }

    #[test]
    fn test_short_form() {
        let account = Account::new("0xabcdef1234567890abcdef1234567890abcdef12");
        assert_eq!(account.short(), "0xabcd...ef12");
    }

    #[test]
    fn test_valid_address() {
        assert!(is_valid_address("0xdAC17F958D2ee523a2206206994597C13D831ec7"));
        assert!(is_valid_address("0x0000000000000000000000000000000000000000"));
    }

    #[test]
    fn test_invalid_addresses() {
        assert!(!is_valid_address(""));
        assert!(!is_valid_address("0x123"));
        assert!(!is_valid_address("dAC17F958D2ee523a2206206994597C13D831ec7"));
        assert!(!is_valid_address("0xZZC17F958D2ee523a2206206994597C13D831ec7"));
        assert!(!is_valid_address("0xdAC17F958D2ee523a2206206994597C13D831ec70"));
    }

    #[test]
    fn test_hex_body() {
        let account = Account::new("0xdac17f958d2ee523a2206206994597c13d831ec7");
        assert_eq!(account.hex_body(), "dac17f958d2ee523a2206206994597c13d831ec7");
    }
}
