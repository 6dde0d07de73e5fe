//! Adapters Layer - External System Implementations
//!
//! This module contains implementations of the port traits:
//! - Ethereum: JSON-RPC wallet provider transport
//! - Fusion: swap aggregator API client and the offline fixed-rate quoter
//! - CLI: command-line interface handlers

pub mod cli;
pub mod ethereum;
pub mod fusion;

pub use cli::CliApp;
pub use ethereum::EthRpcProvider;
pub use fusion::{FixedRateQuoter, FusionClient};
