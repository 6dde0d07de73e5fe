//! CrossWap - Cross-chain swap wallet core
//!
//! Session handling, balance tracking, quoting and transaction dispatch
//! for an EIP-1193 style wallet over the ETH/TON corridor.
//!
//! # Modules
//!
//! - `domain`: Core business logic (Account, Token, Session, state machine, intents)
//! - `ports`: Trait abstractions (WalletProvider, SwapApi) and recording mocks
//! - `adapters`: External implementations (Ethereum RPC, Fusion API, CLI)
//! - `config`: Configuration loading and validation
//! - `application`: Gateway, quote engine, balance tracker, dispatcher, wallet app

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
