//! Fusion Adapter
//!
//! Swap aggregator API client and the offline fixed-rate fallback.

mod client;
mod rates;

pub use client::{FusionClient, FusionConfig};
pub use rates::FixedRateQuoter;
