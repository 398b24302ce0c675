//! Funding-rate arbitrage controller
//!
//! Watches the funding rate of one perpetual on two venues and, when the
//! spread crosses a threshold, opens a matched short/long pair sized to a
//! fixed lot. Positions are unwound one lot at a time when the spread turns
//! against the held inventory.

pub mod adapters;
pub mod config;
pub mod core;
pub mod error;

pub use error::AppError;
