//! Ports Layer - Trait definitions for external dependencies
//!
//! This module defines the interfaces (ports) that adapters must implement.
//! Following hexagonal architecture, these traits abstract:
//! - The injected wallet provider (requests, events)
//! - The external cross-chain quote/swap API

pub mod mocks;
pub mod provider;
pub mod swap_api;

pub use provider::{
    ProviderError, ProviderEvent, RpcCall, WalletProvider, CODE_PENDING_REQUEST,
    CODE_USER_REJECTED,
};
pub use swap_api::{SwapApi, SwapApiError, SwapQuoteRequest};
