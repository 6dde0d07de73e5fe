//! Domain Layer - Core wallet business logic
//!
//! Pure domain types and logic with no I/O: accounts, the token registry,
//! the session record and its state machine, quotes, and transaction
//! intents. All external interactions happen through the ports layer.

pub mod account;
pub mod intent;
pub mod quote;
pub mod session;
pub mod state_machine;
pub mod token;

pub use account::{is_valid_address, Account};
pub use intent::{SwapIntent, TransferIntent, ValidationError};
pub use quote::{PreparedCall, Quote, QuoteInput};
pub use session::{Session, SessionError, SessionStore, SESSION_TTL_HOURS};
pub use state_machine::{
    ErrorReason, SessionEvent, SessionState, TransitionError, WalletStateMachine,
};
pub use token::{format_amount, Token, TokenRegistry, NATIVE_ADDRESS};
