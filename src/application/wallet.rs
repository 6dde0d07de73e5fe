//! Wallet Application
//!
//! Ties the session state machine to the provider gateway, session store,
//! balance tracker and quote engine. This is the layer that turns async
//! provider outcomes into state-machine events and keeps the derived
//! caches consistent with the session.

use std::sync::Arc;
use std::time::Duration;

use rust_decimal::Decimal;
use thiserror::Error;
use tokio::sync::RwLock;

use crate::domain::{
    Account, Quote, QuoteInput, Session, SessionError, SessionState, SessionStore, SwapIntent,
    TokenRegistry, TransferIntent, WalletStateMachine,
};
use crate::domain::{ErrorReason, SessionEvent, TransitionError};
use crate::ports::provider::{ProviderError, ProviderEvent, WalletProvider};
use crate::ports::swap_api::SwapApi;

use super::balance_tracker::{Balance, BalanceTracker};
use super::dispatcher::{DispatchError, TransactionDispatcher, TxHandle};
use super::gateway::{Detection, EventSubscription, ProviderGateway};
use super::quote_engine::{QuoteEngine, QuoteSlot};

/// How a fresh connect binds an account to a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthPolicy {
    /// Account approval alone establishes the session.
    AccountsOnly,
    /// A signed login challenge is required on top of account approval.
    SignedChallenge,
}

#[derive(Debug, Error)]
pub enum WalletError {
    #[error(transparent)]
    Transition(#[from] TransitionError),
    #[error("no wallet provider is available")]
    ProviderUnavailable,
    #[error("not connected")]
    NotConnected,
    #[error("provider error: {0}")]
    Provider(#[from] ProviderError),
    #[error("session store error: {0}")]
    Session(#[from] SessionError),
    #[error(transparent)]
    Dispatch(#[from] DispatchError),
}

/// Long-lived application object; one per process.
pub struct WalletApp {
    machine: RwLock<WalletStateMachine>,
    provider: RwLock<Option<Arc<dyn WalletProvider>>>,
    gateway: RwLock<Option<ProviderGateway>>,
    store: SessionStore,
    session_ttl: chrono::Duration,
    policy: AuthPolicy,
    balances: BalanceTracker,
    quotes: QuoteEngine,
    dispatcher: TransactionDispatcher,
}

impl WalletApp {
    pub fn new(
        api: Arc<dyn SwapApi>,
        registry: TokenRegistry,
        store: SessionStore,
        session_ttl: chrono::Duration,
    ) -> Self {
        Self {
            machine: RwLock::new(WalletStateMachine::new()),
            provider: RwLock::new(None),
            gateway: RwLock::new(None),
            store,
            session_ttl,
            policy: AuthPolicy::AccountsOnly,
            balances: BalanceTracker::new(registry.clone()),
            quotes: QuoteEngine::new(api),
            dispatcher: TransactionDispatcher::new(registry),
        }
    }

    pub fn with_auth_policy(mut self, policy: AuthPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_quote_debounce(mut self, debounce: Duration) -> Self {
        self.quotes = self.quotes.with_debounce(debounce);
        self
    }

    pub fn with_slippage_bps(mut self, bps: u16) -> Self {
        self.quotes = self.quotes.with_slippage_bps(bps);
        self
    }

    pub async fn state(&self) -> SessionState {
        self.machine.read().await.state().clone()
    }

    pub async fn account(&self) -> Option<Account> {
        self.machine.read().await.account().cloned()
    }

    pub fn balances(&self) -> &BalanceTracker {
        &self.balances
    }

    pub fn quotes(&self) -> &QuoteEngine {
        &self.quotes
    }

    /// Detect the provider, then try to restore a stored session. Runs
    /// once at startup; `Initialized` provider events re-run detection
    /// for late-injected providers.
    pub async fn startup(&self, provider: Option<Arc<dyn WalletProvider>>) {
        *self.provider.write().await = provider;
        self.detect_provider().await;
    }

    /// Probe the retained provider handle. Also the late-injection path:
    /// an `Initialized` event re-runs this until a probe succeeds.
    async fn detect_provider(&self) {
        let provider = self.provider.read().await.clone();
        match ProviderGateway::detect(provider).await {
            Detection::Absent => {
                let mut machine = self.machine.write().await;
                let _ = machine.apply(SessionEvent::ProviderMissing);
            }
            Detection::Capable(gateway) => {
                {
                    let mut machine = self.machine.write().await;
                    let _ = machine.apply(SessionEvent::ProviderDetected);
                }
                *self.gateway.write().await = Some(gateway.clone());
                self.restore_session(&gateway).await;
            }
        }
    }

    async fn restore_session(&self, gateway: &ProviderGateway) {
        let session = match self.store.load_valid(self.session_ttl) {
            Ok(Some(session)) => session,
            Ok(None) => return,
            Err(e) => {
                tracing::warn!("Session restore failed: {}", e);
                return;
            }
        };

        // The stored account must still be approved for this origin.
        let approved = match gateway.list_accounts().await {
            Ok(accounts) => accounts.contains(&session.account),
            Err(e) => {
                tracing::warn!("Account check during restore failed: {}", e);
                false
            }
        };
        if !approved {
            tracing::info!("Stored session account no longer approved, discarding");
            let _ = self.store.clear();
            return;
        }

        tracing::info!("Session restored for {}", session.account.short());
        {
            let mut machine = self.machine.write().await;
            let _ = machine.apply(SessionEvent::SessionRestored {
                account: session.account.clone(),
            });
        }
        self.bind_account(session.account, gateway).await;
    }

    /// User-initiated connect. Drives the full flow: account approval,
    /// optional login signature, session persistence, cache binding.
    pub async fn connect(&self) -> Result<SessionState, WalletError> {
        self.machine
            .write()
            .await
            .apply(SessionEvent::ConnectRequested)?;

        // Once in Connecting, every failure must route through the
        // ConnectFailed arm so the machine lands in a recoverable state.
        let result = match self.gateway().await {
            Ok(gateway) => self.run_connect_flow(&gateway).await,
            Err(e) => Err(e),
        };

        let mut machine = self.machine.write().await;
        match result {
            Ok(()) => {}
            Err(WalletError::Provider(ProviderError::UserRejected)) => {
                let event = if matches!(machine.state(), SessionState::AwaitingSignature { .. }) {
                    SessionEvent::SignatureRejected
                } else {
                    SessionEvent::ConnectFailed(ErrorReason::UserCancelled)
                };
                let _ = machine.apply(event);
            }
            Err(e) => {
                let _ = machine.apply(SessionEvent::ConnectFailed(ErrorReason::ProviderFailure(
                    e.to_string(),
                )));
            }
        }
        Ok(machine.state().clone())
    }

    async fn run_connect_flow(&self, gateway: &ProviderGateway) -> Result<(), WalletError> {
        let accounts = gateway.request_accounts().await?;
        let Some(account) = accounts.into_iter().next() else {
            return Err(WalletError::Provider(ProviderError::Rpc {
                code: -32000,
                message: "provider returned no accounts".to_string(),
            }));
        };

        let needs_signature = self.policy == AuthPolicy::SignedChallenge;
        self.machine
            .write()
            .await
            .apply(SessionEvent::AccountsReceived {
                account: account.clone(),
                needs_signature,
            })?;

        let signature = if needs_signature {
            let challenge = login_challenge(&account);
            let signature = gateway.sign_message(&account, &challenge).await?;
            self.machine
                .write()
                .await
                .apply(SessionEvent::SignatureCompleted)?;
            Some(signature)
        } else {
            None
        };

        if let Err(e) = self.store.save(&Session::new(account.clone(), signature)) {
            // Session persistence is best-effort; the live session stands.
            tracing::warn!("Failed to persist session: {}", e);
        }
        tracing::info!("Connected as {}", account.short());
        self.bind_account(account, gateway).await;
        Ok(())
    }

    /// Clear the session and every derived cache.
    pub async fn logout(&self) -> Result<(), WalletError> {
        self.machine.write().await.apply(SessionEvent::LoggedOut)?;
        self.store.clear()?;
        self.unbind_account().await;
        tracing::info!("Logged out");
        Ok(())
    }

    /// Acknowledge an error screen and return to Disconnected.
    pub async fn retry(&self) -> Result<SessionState, WalletError> {
        let mut machine = self.machine.write().await;
        machine.apply(SessionEvent::Retry)?;
        Ok(machine.state().clone())
    }

    /// Feed one provider event through the state machine and keep the
    /// caches consistent with the outcome.
    pub async fn handle_provider_event(&self, event: ProviderEvent) {
        match event {
            ProviderEvent::AccountsChanged(accounts) => {
                let account = accounts.into_iter().next();
                let was_authenticated = self.machine.read().await.is_authenticated();
                {
                    let mut machine = self.machine.write().await;
                    let _ = machine.apply(SessionEvent::AccountsChanged(account.clone()));
                }
                if !was_authenticated {
                    return;
                }
                match account {
                    Some(account) => {
                        tracing::info!("Account changed to {}", account.short());
                        let _ = self.store.clear();
                        if let Ok(gateway) = self.gateway().await {
                            self.bind_account(account, &gateway).await;
                        }
                    }
                    None => {
                        tracing::info!("Account access revoked");
                        let _ = self.store.clear();
                        self.unbind_account().await;
                    }
                }
            }
            ProviderEvent::ChainChanged(chain_id) => {
                tracing::info!("Chain changed to {}, invalidating session", chain_id);
                {
                    let mut machine = self.machine.write().await;
                    let _ = machine.apply(SessionEvent::ChainChanged);
                }
                let _ = self.store.clear();
                self.unbind_account().await;
            }
            ProviderEvent::Initialized => {
                if self.gateway.read().await.is_some() {
                    return;
                }
                tracing::info!("Provider initialized after load, re-probing");
                self.detect_provider().await;
            }
        }
    }

    /// Drain a provider event subscription until it closes.
    pub async fn run_event_loop(&self, mut subscription: EventSubscription) {
        while let Some(event) = subscription.next().await {
            self.handle_provider_event(event).await;
        }
        tracing::debug!("Provider event stream closed");
    }

    /// Expire the session if its TTL has lapsed. Intended to run on a
    /// periodic tick; a no-op while the session is young.
    pub async fn check_session_expiry(&self) {
        let expired = matches!(self.store.load_valid(self.session_ttl), Ok(None))
            && self.machine.read().await.is_authenticated();
        if expired {
            tracing::info!("Session TTL lapsed, disconnecting");
            let mut machine = self.machine.write().await;
            let _ = machine.apply(SessionEvent::SessionExpired);
            drop(machine);
            self.unbind_account().await;
        }
    }

    pub async fn refresh_balances(&self) -> Result<(), WalletError> {
        let gateway = self.gateway().await?;
        self.balances.refresh(&gateway).await;
        Ok(())
    }

    /// Feed the swap form's current input into the quote engine.
    pub async fn update_quote_input(&self, input: QuoteInput) {
        self.quotes.set_input(input).await;
    }

    pub async fn current_quote(&self) -> Option<Quote> {
        self.quotes.current_quote().await
    }

    pub async fn quote_slot(&self) -> QuoteSlot {
        self.quotes.current().await
    }

    pub async fn send_transfer(&self, intent: &TransferIntent) -> Result<TxHandle, WalletError> {
        let account = self.account().await.ok_or(WalletError::NotConnected)?;
        let gateway = self.gateway().await?;
        let available = self
            .balances
            .balance("ETH")
            .await
            .map(|b| b.amount)
            .unwrap_or(Decimal::ZERO);
        let handle = self
            .dispatcher
            .send_transfer(&gateway, &account, intent, available)
            .await?;
        Ok(handle)
    }

    pub async fn send_swap(&self, intent: &SwapIntent) -> Result<TxHandle, WalletError> {
        let account = self.account().await.ok_or(WalletError::NotConnected)?;
        let gateway = self.gateway().await?;
        let quote = self
            .current_quote()
            .await
            .ok_or(DispatchError::StaleQuote)?;
        let handle = self
            .dispatcher
            .send_swap(&gateway, &account, intent, &quote)
            .await?;
        // A consumed quote never submits twice.
        self.quotes.clear().await;
        Ok(handle)
    }

    /// Wait for a submitted transaction to be mined.
    pub async fn await_receipt(
        &self,
        handle: &TxHandle,
        poll_interval: Duration,
        timeout: Duration,
    ) -> Result<serde_json::Value, WalletError> {
        let gateway = self.gateway().await?;
        let receipt = self
            .dispatcher
            .await_receipt(&gateway, handle, poll_interval, timeout)
            .await?;
        Ok(receipt)
    }

    pub async fn balance_of(&self, symbol: &str) -> Option<Balance> {
        self.balances.balance(symbol).await
    }

    pub async fn subscribe(&self) -> Result<EventSubscription, WalletError> {
        Ok(self.gateway().await?.subscribe())
    }

    async fn gateway(&self) -> Result<ProviderGateway, WalletError> {
        self.gateway
            .read()
            .await
            .clone()
            .ok_or(WalletError::ProviderUnavailable)
    }

    async fn bind_account(&self, account: Account, gateway: &ProviderGateway) {
        self.balances.set_account(Some(account.clone())).await;
        self.quotes.set_account(Some(account)).await;
        self.balances.refresh(gateway).await;
    }

    async fn unbind_account(&self) {
        self.balances.set_account(None).await;
        self.quotes.set_account(None).await;
        self.quotes.clear().await;
        self.balances.clear().await;
    }
}

/// The message signed to establish a session under `SignedChallenge`.
fn login_challenge(account: &Account) -> String {
    format!(
        "CrossWap login\naccount: {}\nissued: {}",
        account.as_str(),
        chrono::Utc::now().to_rfc3339()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::mocks::{MockProvider, MockSwapApi};
    use chrono::Utc;
    use rust_decimal_macros::dec;
    use tempfile::tempdir;

    const ACCOUNT: &str = "0xabcdef1234567890abcdef1234567890abcdef12";

    struct Fixture {
        app: WalletApp,
        provider: Arc<MockProvider>,
        _dir: tempfile::TempDir,
    }

    fn fixture(provider: MockProvider) -> Fixture {
        fixture_with_policy(provider, AuthPolicy::AccountsOnly)
    }

    fn fixture_with_policy(provider: MockProvider, policy: AuthPolicy) -> Fixture {
        let dir = tempdir().unwrap();
        let store = SessionStore::new(dir.path().join("session.json"));
        let app = WalletApp::new(
            Arc::new(MockSwapApi::new().with_rate("ETH", "TON", dec!(51.23))),
            TokenRegistry::new(),
            store,
            chrono::Duration::hours(24),
        )
        .with_auth_policy(policy);
        Fixture {
            app,
            provider: Arc::new(provider),
            _dir: dir,
        }
    }

    async fn started(fixture: &Fixture) {
        fixture
            .app
            .startup(Some(Arc::clone(&fixture.provider) as Arc<dyn WalletProvider>))
            .await;
    }

    #[tokio::test]
    async fn test_startup_without_provider() {
        let f = fixture(MockProvider::new());
        f.app.startup(None).await;
        assert_eq!(f.app.state().await, SessionState::ProviderAbsent);

        // Connect is refused, not queued
        assert!(matches!(
            f.app.connect().await,
            Err(WalletError::Transition(TransitionError::ProviderAbsent))
        ));
    }

    #[tokio::test]
    async fn test_late_provider_injection_reprobes() {
        // Probe fails at startup (provider not ready), then succeeds when
        // the provider announces itself.
        let provider = MockProvider::new()
            .with_error(
                "eth_chainId",
                ProviderError::Transport("not ready".to_string()),
            )
            .with_response("eth_chainId", serde_json::json!("0x1"))
            .with_response("eth_requestAccounts", serde_json::json!([ACCOUNT]));
        let f = fixture(provider);
        started(&f).await;
        assert_eq!(f.app.state().await, SessionState::ProviderAbsent);

        f.app
            .handle_provider_event(ProviderEvent::Initialized)
            .await;
        assert_eq!(f.app.state().await, SessionState::Disconnected);

        let state = f.app.connect().await.unwrap();
        assert!(matches!(state, SessionState::Authenticated { .. }));
    }

    #[tokio::test]
    async fn test_initialized_without_provider_stays_absent() {
        let f = fixture(MockProvider::new());
        f.app.startup(None).await;
        f.app
            .handle_provider_event(ProviderEvent::Initialized)
            .await;
        assert_eq!(f.app.state().await, SessionState::ProviderAbsent);

        // Refused outright each time, never stuck in Connecting
        for _ in 0..2 {
            assert!(matches!(
                f.app.connect().await,
                Err(WalletError::Transition(TransitionError::ProviderAbsent))
            ));
        }
        assert_eq!(f.app.state().await, SessionState::ProviderAbsent);
    }

    #[tokio::test]
    async fn test_connect_provider_failure_recovers() {
        let provider = MockProvider::new()
            .with_response("eth_chainId", serde_json::json!("0x1"))
            .with_error(
                "eth_requestAccounts",
                ProviderError::Transport("rpc down".to_string()),
            )
            .with_response("eth_requestAccounts", serde_json::json!([ACCOUNT]));
        let f = fixture(provider);
        started(&f).await;

        let state = f.app.connect().await.unwrap();
        assert!(matches!(
            state,
            SessionState::Error {
                reason: ErrorReason::ProviderFailure(_)
            }
        ));

        // Not stranded: acknowledge and connect again
        f.app.retry().await.unwrap();
        let state = f.app.connect().await.unwrap();
        assert!(matches!(state, SessionState::Authenticated { .. }));
    }

    #[tokio::test]
    async fn test_startup_with_provider_no_session() {
        let f = fixture(MockProvider::with_connected_account(ACCOUNT));
        started(&f).await;
        assert_eq!(f.app.state().await, SessionState::Disconnected);
    }

    #[tokio::test]
    async fn test_connect_accounts_only() {
        let f = fixture(MockProvider::with_connected_account(ACCOUNT));
        started(&f).await;

        let state = f.app.connect().await.unwrap();
        assert!(matches!(state, SessionState::Authenticated { .. }));
        assert_eq!(f.app.account().await.unwrap().as_str(), ACCOUNT);
        // No signature requested under AccountsOnly
        assert_eq!(f.provider.call_count("personal_sign"), 0);
        // Balances were fetched on bind
        assert!(f.app.balance_of("ETH").await.is_some());
    }

    #[tokio::test]
    async fn test_connect_with_signed_challenge() {
        let f = fixture_with_policy(
            MockProvider::with_connected_account(ACCOUNT),
            AuthPolicy::SignedChallenge,
        );
        started(&f).await;

        let state = f.app.connect().await.unwrap();
        assert!(matches!(state, SessionState::Authenticated { .. }));
        assert_eq!(f.provider.call_count("personal_sign"), 1);
    }

    #[tokio::test]
    async fn test_connect_rejection_is_user_cancelled() {
        let provider = MockProvider::with_connected_account(ACCOUNT)
            .with_error("eth_requestAccounts", ProviderError::UserRejected);
        let f = fixture(provider);
        started(&f).await;

        let state = f.app.connect().await.unwrap();
        assert_eq!(
            state,
            SessionState::Error {
                reason: ErrorReason::UserCancelled
            }
        );

        // Recoverable
        let state = f.app.retry().await.unwrap();
        assert_eq!(state, SessionState::Disconnected);
    }

    #[tokio::test]
    async fn test_signature_rejection_lands_in_error() {
        let provider = MockProvider::with_connected_account(ACCOUNT)
            .with_error("personal_sign", ProviderError::UserRejected);
        let f = fixture_with_policy(provider, AuthPolicy::SignedChallenge);
        started(&f).await;

        let state = f.app.connect().await.unwrap();
        assert_eq!(
            state,
            SessionState::Error {
                reason: ErrorReason::UserCancelled
            }
        );
    }

    #[tokio::test]
    async fn test_session_restored_on_startup() {
        let dir = tempdir().unwrap();
        let store = SessionStore::new(dir.path().join("session.json"));
        store
            .save(&Session::new(Account::new(ACCOUNT), None))
            .unwrap();

        let app = WalletApp::new(
            Arc::new(MockSwapApi::new()),
            TokenRegistry::new(),
            store,
            chrono::Duration::hours(24),
        );
        let provider: Arc<dyn WalletProvider> =
            Arc::new(MockProvider::with_connected_account(ACCOUNT));
        app.startup(Some(provider)).await;

        assert!(matches!(
            app.state().await,
            SessionState::Authenticated { .. }
        ));
    }

    #[tokio::test]
    async fn test_expired_session_not_restored() {
        let dir = tempdir().unwrap();
        let store = SessionStore::new(dir.path().join("session.json"));
        let mut session = Session::new(Account::new(ACCOUNT), None);
        session.established_at = Utc::now() - chrono::Duration::hours(25);
        store.save(&session).unwrap();

        let app = WalletApp::new(
            Arc::new(MockSwapApi::new()),
            TokenRegistry::new(),
            store,
            chrono::Duration::hours(24),
        );
        let provider: Arc<dyn WalletProvider> =
            Arc::new(MockProvider::with_connected_account(ACCOUNT));
        app.startup(Some(provider)).await;

        assert_eq!(app.state().await, SessionState::Disconnected);
    }

    #[tokio::test]
    async fn test_restore_discarded_when_account_not_approved() {
        let dir = tempdir().unwrap();
        let store = SessionStore::new(dir.path().join("session.json"));
        store
            .save(&Session::new(
                Account::new("0x1111111111111111111111111111111111111111"),
                None,
            ))
            .unwrap();

        let app = WalletApp::new(
            Arc::new(MockSwapApi::new()),
            TokenRegistry::new(),
            store,
            chrono::Duration::hours(24),
        );
        // Provider approves a different account than the stored one
        let provider: Arc<dyn WalletProvider> =
            Arc::new(MockProvider::with_connected_account(ACCOUNT));
        app.startup(Some(provider)).await;

        assert_eq!(app.state().await, SessionState::Disconnected);
    }

    #[tokio::test]
    async fn test_logout_clears_everything() {
        let f = fixture(MockProvider::with_connected_account(ACCOUNT));
        started(&f).await;
        f.app.connect().await.unwrap();
        assert!(f.app.balance_of("ETH").await.is_some());

        f.app.logout().await.unwrap();
        assert_eq!(f.app.state().await, SessionState::Disconnected);
        assert!(f.app.balance_of("ETH").await.is_none());
        assert!(f.app.account().await.is_none());
    }

    #[tokio::test]
    async fn test_chain_change_invalidates_session_and_caches() {
        let f = fixture(MockProvider::with_connected_account(ACCOUNT));
        started(&f).await;
        f.app.connect().await.unwrap();
        f.app
            .update_quote_input(QuoteInput::new("ETH", "TON", dec!(1)))
            .await;

        f.app
            .handle_provider_event(ProviderEvent::ChainChanged(137))
            .await;

        assert_eq!(f.app.state().await, SessionState::Disconnected);
        assert!(f.app.balance_of("ETH").await.is_none());
        assert_eq!(f.app.quote_slot().await, QuoteSlot::Idle);
    }

    #[tokio::test]
    async fn test_accounts_changed_to_empty_disconnects() {
        let f = fixture(MockProvider::with_connected_account(ACCOUNT));
        started(&f).await;
        f.app.connect().await.unwrap();

        f.app
            .handle_provider_event(ProviderEvent::AccountsChanged(vec![]))
            .await;

        assert_eq!(f.app.state().await, SessionState::Disconnected);
        assert!(f.app.balance_of("ETH").await.is_none());
    }

    #[tokio::test]
    async fn test_accounts_changed_rebinds() {
        let f = fixture(MockProvider::with_connected_account(ACCOUNT));
        started(&f).await;
        f.app.connect().await.unwrap();

        let other = Account::new("0x2222222222222222222222222222222222222222");
        f.app
            .handle_provider_event(ProviderEvent::AccountsChanged(vec![other.clone()]))
            .await;

        assert_eq!(f.app.account().await, Some(other));
    }

    #[tokio::test]
    async fn test_transfer_requires_connection() {
        let f = fixture(MockProvider::with_connected_account(ACCOUNT));
        started(&f).await;

        let result = f
            .app
            .send_transfer(&TransferIntent::new(
                "0xdac17f958d2ee523a2206206994597c13d831ec7",
                dec!(0.1),
            ))
            .await;
        assert!(matches!(result, Err(WalletError::NotConnected)));
    }

    #[tokio::test]
    async fn test_swap_without_quote_fails() {
        let f = fixture(MockProvider::with_connected_account(ACCOUNT));
        started(&f).await;
        f.app.connect().await.unwrap();

        let result = f
            .app
            .send_swap(&SwapIntent::new("ETH", "TON", dec!(1), 100))
            .await;
        assert!(matches!(
            result,
            Err(WalletError::Dispatch(DispatchError::StaleQuote))
        ));
    }
}
