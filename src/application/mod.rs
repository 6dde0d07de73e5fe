//! Application Layer - Wallet orchestration
//!
//! Coordinates the domain state machine with the provider gateway, the
//! swap API and the local session store. Everything async lives here.

pub mod balance_tracker;
pub mod dispatcher;
pub mod gateway;
pub mod quote_engine;
pub mod wallet;

pub use balance_tracker::{Balance, BalanceState, BalanceTracker};
pub use dispatcher::{DispatchError, TransactionDispatcher, TxHandle, TxKind};
pub use gateway::{Detection, EventSubscription, ProviderGateway, SubscriptionDisposer, TxRequest};
pub use quote_engine::{QuoteEngine, QuoteSlot, DEFAULT_DEBOUNCE_MS};
pub use wallet::{AuthPolicy, WalletApp, WalletError};
