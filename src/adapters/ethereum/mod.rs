//! Ethereum Adapter
//!
//! JSON-RPC transport implementing the wallet provider port.

mod rpc;

pub use rpc::{EthRpcConfig, EthRpcProvider};
