//! Session State Machine
//!
//! Derives a single UI mode from provider availability, connection status
//! and authentication status. Pure transition logic; the async connect flow
//! that feeds it events lives in the application layer.
//!
//! `Unknown` is the initial state (provider presence not yet determined).
//! There is no terminal state: `ProviderAbsent` is absorbing only until an
//! install action outside this process changes browser state.

use thiserror::Error;

use super::account::Account;

/// Why a connect or signature attempt landed in `Error`. The state is the
/// same either way, but UI copy differs for a user cancellation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorReason {
    UserCancelled,
    ProviderFailure(String),
}

/// The single derived UI mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    /// Provider presence not yet determined
    Unknown,
    /// No wallet provider injected; user-actionable (install)
    ProviderAbsent,
    /// Provider present, no account
    Disconnected,
    /// Connect request in flight
    Connecting,
    /// Account present, login challenge outstanding
    AwaitingSignature { account: Account },
    /// Account bound to a valid session
    Authenticated { account: Account },
    /// Connect or signature failed; recoverable back to Disconnected
    Error { reason: ErrorReason },
}

impl SessionState {
    fn name(&self) -> &'static str {
        match self {
            SessionState::Unknown => "Unknown",
            SessionState::ProviderAbsent => "ProviderAbsent",
            SessionState::Disconnected => "Disconnected",
            SessionState::Connecting => "Connecting",
            SessionState::AwaitingSignature { .. } => "AwaitingSignature",
            SessionState::Authenticated { .. } => "Authenticated",
            SessionState::Error { .. } => "Error",
        }
    }
}

/// Everything that can move the machine.
#[derive(Debug, Clone)]
pub enum SessionEvent {
    /// Provider injection observed (possibly after initial load)
    ProviderDetected,
    /// Initial probe found no provider
    ProviderMissing,
    /// User-initiated connect
    ConnectRequested,
    /// Provider returned accounts for the connect request
    AccountsReceived {
        account: Account,
        needs_signature: bool,
    },
    /// Login challenge signed
    SignatureCompleted,
    /// User declined the login challenge in the wallet UI
    SignatureRejected,
    /// Connect or signature failed for a non-user reason
    ConnectFailed(ErrorReason),
    /// A stored session survived the TTL check
    SessionRestored { account: Account },
    /// Provider reported a new account set; None means empty
    AccountsChanged(Option<Account>),
    /// Hard invalidation: full re-authentication required
    ChainChanged,
    /// Explicit logout
    LoggedOut,
    /// TTL check failed
    SessionExpired,
    /// User acknowledged the error screen
    Retry,
}

impl SessionEvent {
    fn name(&self) -> &'static str {
        match self {
            SessionEvent::ProviderDetected => "ProviderDetected",
            SessionEvent::ProviderMissing => "ProviderMissing",
            SessionEvent::ConnectRequested => "ConnectRequested",
            SessionEvent::AccountsReceived { .. } => "AccountsReceived",
            SessionEvent::SignatureCompleted => "SignatureCompleted",
            SessionEvent::SignatureRejected => "SignatureRejected",
            SessionEvent::ConnectFailed(_) => "ConnectFailed",
            SessionEvent::SessionRestored { .. } => "SessionRestored",
            SessionEvent::AccountsChanged(_) => "AccountsChanged",
            SessionEvent::ChainChanged => "ChainChanged",
            SessionEvent::LoggedOut => "LoggedOut",
            SessionEvent::SessionExpired => "SessionExpired",
            SessionEvent::Retry => "Retry",
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransitionError {
    /// A connect attempt is already in flight; wait, do not resubmit.
    #[error("a connect request is already in flight")]
    PendingRequest,
    #[error("no wallet provider is available")]
    ProviderAbsent,
    #[error("event {event} is not valid in state {state}")]
    InvalidTransition {
        state: &'static str,
        event: &'static str,
    },
}

/// The wallet-session state machine. Long-lived; owns no I/O.
#[derive(Debug)]
pub struct WalletStateMachine {
    state: SessionState,
}

impl Default for WalletStateMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl WalletStateMachine {
    pub fn new() -> Self {
        Self {
            state: SessionState::Unknown,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self.state, SessionState::Authenticated { .. })
    }

    pub fn account(&self) -> Option<&Account> {
        match &self.state {
            SessionState::Authenticated { account }
            | SessionState::AwaitingSignature { account } => Some(account),
            _ => None,
        }
    }

    /// Apply an event. Invalid user actions (duplicate connect, connect
    /// without a provider) fail; stale asynchronous events that do not
    /// apply to the current state are ignored as no-ops.
    pub fn apply(&mut self, event: SessionEvent) -> Result<&SessionState, TransitionError> {
        use SessionEvent as E;
        use SessionState as S;

        let next = match (&self.state, &event) {
            (S::Unknown | S::ProviderAbsent, E::ProviderDetected) => Some(S::Disconnected),
            (_, E::ProviderDetected) => None,

            (S::Unknown, E::ProviderMissing) => Some(S::ProviderAbsent),
            (_, E::ProviderMissing) => None,

            (S::Disconnected | S::Error { .. }, E::ConnectRequested) => Some(S::Connecting),
            (S::Connecting | S::AwaitingSignature { .. }, E::ConnectRequested) => {
                return Err(TransitionError::PendingRequest)
            }
            (S::Unknown | S::ProviderAbsent, E::ConnectRequested) => {
                return Err(TransitionError::ProviderAbsent)
            }
            // Already connected; nothing to do.
            (S::Authenticated { .. }, E::ConnectRequested) => None,

            (
                S::Connecting,
                E::AccountsReceived {
                    account,
                    needs_signature,
                },
            ) => Some(if *needs_signature {
                S::AwaitingSignature {
                    account: account.clone(),
                }
            } else {
                S::Authenticated {
                    account: account.clone(),
                }
            }),
            (_, E::AccountsReceived { .. }) => {
                return Err(TransitionError::InvalidTransition {
                    state: self.state.name(),
                    event: event.name(),
                })
            }

            (S::AwaitingSignature { account }, E::SignatureCompleted) => Some(S::Authenticated {
                account: account.clone(),
            }),
            (_, E::SignatureCompleted) => {
                return Err(TransitionError::InvalidTransition {
                    state: self.state.name(),
                    event: event.name(),
                })
            }

            (S::AwaitingSignature { .. }, E::SignatureRejected) => Some(S::Error {
                reason: ErrorReason::UserCancelled,
            }),
            (_, E::SignatureRejected) => None,

            (S::Connecting | S::AwaitingSignature { .. }, E::ConnectFailed(reason)) => {
                Some(S::Error {
                    reason: reason.clone(),
                })
            }
            (_, E::ConnectFailed(_)) => None,

            (S::Unknown | S::Disconnected, E::SessionRestored { account }) => {
                Some(S::Authenticated {
                    account: account.clone(),
                })
            }
            (_, E::SessionRestored { .. }) => None,

            (S::Authenticated { .. }, E::AccountsChanged(Some(account))) => {
                Some(S::Authenticated {
                    account: account.clone(),
                })
            }
            (S::Authenticated { .. }, E::AccountsChanged(None)) => Some(S::Disconnected),
            (_, E::AccountsChanged(_)) => None,

            // Chain change from any post-detection state forces a full
            // re-derivation; the event itself proves a provider exists.
            (_, E::ChainChanged) => Some(S::Disconnected),

            (S::Authenticated { .. } | S::AwaitingSignature { .. }, E::LoggedOut) => {
                Some(S::Disconnected)
            }
            (_, E::LoggedOut) => None,

            (S::Authenticated { .. }, E::SessionExpired) => Some(S::Disconnected),
            (_, E::SessionExpired) => None,

            (S::Error { .. }, E::Retry) => Some(S::Disconnected),
            (_, E::Retry) => None,
        };

        if let Some(next) = next {
            tracing::debug!(
                "Session state: {} -> {} ({})",
                self.state.name(),
                next.name(),
                event.name()
            );
            self.state = next;
        }
        Ok(&self.state)
    }
}
