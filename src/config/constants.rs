//! Configuration defaults and environment variable names
//!
//! Strategy defaults reproduce the production setup: one SOL-PERP lot of
//! 5 SOL per action, at most 60 lots, 0.01% open threshold, one cycle per
//! minute.

use std::path::PathBuf;

use rust_decimal::Decimal;

// =============================================================================
// Environment
// =============================================================================

/// YAML config location override
pub const CONFIG_PATH_ENV: &str = "CONFIG_PATH";
pub const DEFAULT_CONFIG_PATH: &str = "config.yaml";

/// 64-byte wallet keypair as a JSON array of integers
pub const ONCHAIN_SECRET_KEY_ENV: &str = "ONCHAIN_SECRET_KEY";
pub const CEX_API_KEY_ENV: &str = "CEX_API_KEY";
pub const CEX_API_SECRET_ENV: &str = "CEX_API_SECRET";

/// Path of the YAML config (`CONFIG_PATH`, default `config.yaml`)
pub fn config_path() -> PathBuf {
    std::env::var(CONFIG_PATH_ENV)
        .ok()
        .filter(|s| !s.trim().is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}

// =============================================================================
// Strategy Defaults
// =============================================================================

pub const DEFAULT_SYMBOL: &str = "SOL-PERP";
pub const DEFAULT_MAX_LOTS: i64 = 60;
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 60;
pub const DEFAULT_VENUE_TIMEOUT_MS: u64 = 10_000;

/// Base units per action
pub fn default_lot_size() -> Decimal {
    Decimal::new(5, 0)
}

/// Percent per funding interval (0.01%)
pub fn default_open_threshold() -> Decimal {
    Decimal::new(1, 2)
}

// =============================================================================
// Venue Defaults
// =============================================================================

pub const DEFAULT_DEX_GATEWAY_URL: &str = "http://127.0.0.1:8080";
pub const DEFAULT_DEX_MARKET_INDEX: u16 = 0;
pub const DEFAULT_CEX_REST_URL: &str = "https://ftx.com";
