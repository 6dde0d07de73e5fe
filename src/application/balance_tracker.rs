//! Balance Tracker
//!
//! Fetches and caches per-token balances for the connected account. All
//! registry tokens are queried concurrently on refresh; a failing token
//! keeps its last known value marked stale instead of poisoning the
//! whole view.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use futures::future::join_all;
use rust_decimal::Decimal;
use tokio::sync::RwLock;

use crate::domain::{format_amount, Account, Token, TokenRegistry};

use super::gateway::ProviderGateway;

/// ERC-20 `balanceOf(address)` selector.
const BALANCE_OF_SELECTOR: &str = "70a08231";

/// Freshness of one cached balance entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BalanceState {
    Fresh,
    /// Last refresh failed for this token; amount is the previous value.
    Stale,
}

/// One token's cached balance.
#[derive(Debug, Clone, PartialEq)]
pub struct Balance {
    pub amount: Decimal,
    pub as_of: DateTime<Utc>,
    pub state: BalanceState,
}

impl Balance {
    pub fn display(&self) -> String {
        format_amount(self.amount)
    }
}

/// Per-account balance cache over the provider gateway.
#[derive(Clone)]
pub struct BalanceTracker {
    registry: Arc<TokenRegistry>,
    account: Arc<RwLock<Option<Account>>>,
    balances: Arc<RwLock<HashMap<String, Balance>>>,
}

impl BalanceTracker {
    pub fn new(registry: TokenRegistry) -> Self {
        Self {
            registry: Arc::new(registry),
            account: Arc::new(RwLock::new(None)),
            balances: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Bind the tracked account. Switching accounts drops the old cache;
    /// clearing the account empties it entirely.
    pub async fn set_account(&self, account: Option<Account>) {
        let mut current = self.account.write().await;
        if *current != account {
            self.balances.write().await.clear();
        }
        *current = account;
    }

    /// Drop every cached balance (logout, chain change).
    pub async fn clear(&self) {
        self.balances.write().await.clear();
    }

    pub async fn balance(&self, symbol: &str) -> Option<Balance> {
        self.balances.read().await.get(symbol).cloned()
    }

    /// Snapshot of the cache in registry order.
    pub async fn snapshot(&self) -> Vec<(Token, Option<Balance>)> {
        let balances = self.balances.read().await;
        self.registry
            .all()
            .iter()
            .map(|token| (token.clone(), balances.get(&token.symbol).cloned()))
            .collect()
    }

    /// Refresh every registry token concurrently. Individual failures are
    /// logged and marked stale; the refresh itself never errors.
    pub async fn refresh(&self, gateway: &ProviderGateway) {
        let Some(account) = self.account.read().await.clone() else {
            tracing::debug!("Balance refresh skipped, no account bound");
            return;
        };

        let fetches = self.registry.all().iter().map(|token| {
            let account = account.clone();
            async move {
                let result = fetch_token_balance(gateway, &account, token).await;
                (token.clone(), result)
            }
        });
        let results = join_all(fetches).await;

        let now = Utc::now();
        let mut balances = self.balances.write().await;
        for (token, result) in results {
            match result {
                Ok(amount) => {
                    tracing::debug!("Balance {}: {}", token.symbol, amount);
                    balances.insert(
                        token.symbol.clone(),
                        Balance {
                            amount,
                            as_of: now,
                            state: BalanceState::Fresh,
                        },
                    );
                }
                Err(e) => {
                    tracing::warn!("Balance fetch failed for {}: {}", token.symbol, e);
                    match balances.get_mut(&token.symbol) {
                        Some(entry) => entry.state = BalanceState::Stale,
                        None => {
                            balances.insert(
                                token.symbol.clone(),
                                Balance {
                                    amount: Decimal::ZERO,
                                    as_of: now,
                                    state: BalanceState::Stale,
                                },
                            );
                        }
                    }
                }
            }
        }
    }
}

async fn fetch_token_balance(
    gateway: &ProviderGateway,
    account: &Account,
    token: &Token,
) -> Result<Decimal, String> {
    let units = if token.is_native() {
        gateway
            .native_balance(account)
            .await
            .map_err(|e| e.to_string())?
    } else {
        let data = balance_of_calldata(account);
        let hex = gateway
            .call_contract(&token.address, &data)
            .await
            .map_err(|e| e.to_string())?;
        super::gateway::parse_hex_u128(&hex).map_err(|e| e.to_string())?
    };
    from_base_units(units, token.decimals)
        .ok_or_else(|| format!("balance overflows decimal range: {}", units))
}

/// `balanceOf(address)` calldata with the account left-padded to 32 bytes.
fn balance_of_calldata(account: &Account) -> String {
    format!("0x{}{:0>64}", BALANCE_OF_SELECTOR, account.hex_body())
}

fn from_base_units(units: u128, decimals: u8) -> Option<Decimal> {
    let units = i128::try_from(units).ok()?;
    Decimal::try_from_i128_with_scale(units, decimals as u32).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::mocks::MockProvider;
    use crate::ports::provider::{ProviderError, WalletProvider};
    use rust_decimal_macros::dec;
    use serde_json::json;

    const ACCOUNT: &str = "0xabcdef1234567890abcdef1234567890abcdef12";

    fn tracker_and_gateway(provider: MockProvider) -> (BalanceTracker, ProviderGateway) {
        let gateway =
            ProviderGateway::new(Arc::new(provider) as Arc<dyn WalletProvider>);
        (BalanceTracker::new(TokenRegistry::new()), gateway)
    }

    #[test]
    fn test_balance_of_calldata_layout() {
        let data = balance_of_calldata(&Account::new(ACCOUNT));
        assert_eq!(data.len(), 2 + 8 + 64);
        assert!(data.starts_with("0x70a08231"));
        assert!(data.ends_with("abcdef1234567890abcdef1234567890abcdef12"));
        assert!(data[10..34].chars().all(|c| c == '0'));
    }

    #[test]
    fn test_from_base_units() {
        // 1.5 ETH in wei
        assert_eq!(
            from_base_units(1_500_000_000_000_000_000, 18),
            Some(dec!(1.5))
        );
        assert_eq!(from_base_units(31_250_000, 6), Some(dec!(31.25)));
        assert_eq!(from_base_units(u128::MAX, 18), None);
    }

    #[tokio::test]
    async fn test_refresh_populates_all_tokens() {
        let provider = MockProvider::new()
            // 2 ETH
            .with_response("eth_getBalance", json!("0x1bc16d674ec80000"))
            // every balanceOf call: 0 (sticky response reused per token)
            .with_response("eth_call", json!("0x0"));
        let (tracker, gateway) = tracker_and_gateway(provider);

        tracker.set_account(Some(Account::new(ACCOUNT))).await;
        tracker.refresh(&gateway).await;

        let eth = tracker.balance("ETH").await.unwrap();
        assert_eq!(eth.amount, dec!(2));
        assert_eq!(eth.state, BalanceState::Fresh);
        assert_eq!(eth.display(), "2.0000");

        let snapshot = tracker.snapshot().await;
        assert_eq!(snapshot.len(), 4);
        assert!(snapshot.iter().all(|(_, b)| b.is_some()));
    }

    #[tokio::test]
    async fn test_partial_failure_marks_stale_keeps_rest() {
        let provider = MockProvider::new()
            .with_response("eth_getBalance", json!("0x1bc16d674ec80000"))
            .with_error(
                "eth_call",
                ProviderError::Transport("connection reset".to_string()),
            );
        let (tracker, gateway) = tracker_and_gateway(provider);

        tracker.set_account(Some(Account::new(ACCOUNT))).await;
        tracker.refresh(&gateway).await;

        assert_eq!(
            tracker.balance("ETH").await.unwrap().state,
            BalanceState::Fresh
        );
        let usdt = tracker.balance("USDT").await.unwrap();
        assert_eq!(usdt.state, BalanceState::Stale);
        assert_eq!(usdt.amount, Decimal::ZERO);
    }

    #[tokio::test]
    async fn test_failed_refresh_keeps_previous_amount() {
        // First refresh answers all three contract tokens, then the
        // sticky tail error makes every later call fail.
        let provider = MockProvider::new()
            .with_response("eth_getBalance", json!("0x1bc16d674ec80000"))
            .with_response("eth_call", json!("0x1dcd6500"))
            .with_response("eth_call", json!("0x1dcd6500"))
            .with_response("eth_call", json!("0x1dcd6500"))
            .with_error(
                "eth_call",
                ProviderError::Transport("timeout".to_string()),
            );
        let (tracker, gateway) = tracker_and_gateway(provider);

        tracker.set_account(Some(Account::new(ACCOUNT))).await;
        tracker.refresh(&gateway).await;
        let before = tracker.balance("USDT").await.unwrap();
        assert_eq!(before.state, BalanceState::Fresh);

        tracker.refresh(&gateway).await;
        let after = tracker.balance("USDT").await.unwrap();
        assert_eq!(after.amount, before.amount);
        assert_eq!(after.state, BalanceState::Stale);
    }

    #[tokio::test]
    async fn test_account_switch_drops_cache() {
        let provider = MockProvider::new()
            .with_response("eth_getBalance", json!("0x1"))
            .with_response("eth_call", json!("0x0"));
        let (tracker, gateway) = tracker_and_gateway(provider);

        tracker.set_account(Some(Account::new(ACCOUNT))).await;
        tracker.refresh(&gateway).await;
        assert!(tracker.balance("ETH").await.is_some());

        tracker
            .set_account(Some(Account::new(
                "0x1111111111111111111111111111111111111111",
            )))
            .await;
        assert!(tracker.balance("ETH").await.is_none());
    }

    #[tokio::test]
    async fn test_refresh_without_account_is_noop() {
        let provider = MockProvider::new().with_response("eth_getBalance", json!("0x1"));
        let (tracker, gateway) = tracker_and_gateway(provider);
        tracker.refresh(&gateway).await;
        assert!(tracker.snapshot().await.iter().all(|(_, b)| b.is_none()));
    }
}
