//! Configuration types for strategy and venue settings
//!
//! Loaded from YAML; every field has a default so an empty file yields the
//! production setup. Credentials are not part of this file, see
//! [`super::secrets`].

use std::time::Duration;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::core::controller::ControllerSettings;
use crate::core::spread::SpreadThresholds;
use crate::error::AppError;

use super::constants::{
    default_lot_size, default_open_threshold, DEFAULT_CEX_REST_URL, DEFAULT_DEX_GATEWAY_URL,
    DEFAULT_DEX_MARKET_INDEX, DEFAULT_MAX_LOTS, DEFAULT_POLL_INTERVAL_SECS, DEFAULT_SYMBOL,
    DEFAULT_VENUE_TIMEOUT_MS,
};

// ============================================================================
// Configuration Structs
// ============================================================================

/// Decision and sizing parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StrategyConfig {
    /// Perpetual traded on both venues (e.g., "SOL-PERP")
    pub symbol: String,
    /// Base units per action (e.g., 5 SOL)
    pub lot_size: Decimal,
    /// Ledger bound in lots, applied symmetrically
    pub max_lots: i64,
    /// Percent differential that opens a lot (e.g., 0.01 = 0.01%)
    pub open_threshold: Decimal,
    pub poll_interval_secs: u64,
    /// Budget for each individual venue call
    pub venue_timeout_ms: u64,
    /// Run the close check even when the open check already acted this cycle
    pub allow_open_and_close_same_cycle: bool,
}

impl Default for StrategyConfig {
    fn default() -> Self {
        Self {
            symbol: DEFAULT_SYMBOL.to_string(),
            lot_size: default_lot_size(),
            max_lots: DEFAULT_MAX_LOTS,
            open_threshold: default_open_threshold(),
            poll_interval_secs: DEFAULT_POLL_INTERVAL_SECS,
            venue_timeout_ms: DEFAULT_VENUE_TIMEOUT_MS,
            allow_open_and_close_same_cycle: true,
        }
    }
}

impl StrategyConfig {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.symbol.trim().is_empty() {
            return Err(AppError::Config("strategy.symbol cannot be empty".to_string()));
        }

        if self.lot_size <= Decimal::ZERO {
            return Err(AppError::Config(format!(
                "strategy.lot_size must be > 0 (got {})",
                self.lot_size
            )));
        }

        if self.max_lots <= 0 {
            return Err(AppError::Config(format!(
                "strategy.max_lots must be > 0 (got {})",
                self.max_lots
            )));
        }

        // A negative threshold would open on both sides of zero at once
        if self.open_threshold < Decimal::ZERO {
            return Err(AppError::Config(format!(
                "strategy.open_threshold must be >= 0 (got {})",
                self.open_threshold
            )));
        }

        if self.poll_interval_secs == 0 {
            return Err(AppError::Config(
                "strategy.poll_interval_secs must be > 0".to_string(),
            ));
        }

        if self.venue_timeout_ms == 0 {
            return Err(AppError::Config(
                "strategy.venue_timeout_ms must be > 0".to_string(),
            ));
        }

        let interval_ms = self.poll_interval_secs.checked_mul(1000).ok_or_else(|| {
            AppError::Config(format!(
                "strategy.poll_interval_secs is out of range (got {})",
                self.poll_interval_secs
            ))
        })?;

        // Two fetches then two submissions must fit inside one tick
        let fits = self
            .venue_timeout_ms
            .checked_mul(2)
            .is_some_and(|calls_ms| calls_ms <= interval_ms);
        if !fits {
            return Err(AppError::Config(format!(
                "strategy.venue_timeout_ms ({}) leaves no room in a {}s poll interval",
                self.venue_timeout_ms, self.poll_interval_secs
            )));
        }

        Ok(())
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    pub fn venue_timeout(&self) -> Duration {
        Duration::from_millis(self.venue_timeout_ms)
    }

    pub fn controller_settings(&self) -> ControllerSettings {
        ControllerSettings {
            thresholds: SpreadThresholds {
                open_threshold: self.open_threshold,
                limit: self.max_lots,
            },
            lot_size: self.lot_size,
            allow_open_and_close_same_cycle: self.allow_open_and_close_same_cycle,
        }
    }
}

/// Venue endpoints
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VenuesConfig {
    /// Signing gateway for the on-chain venue (A)
    pub dex_gateway_url: String,
    /// Perpetual market index of `strategy.symbol` on venue A
    pub dex_market_index: u16,
    /// REST origin of the centralized venue (B)
    pub cex_rest_url: String,
}

impl Default for VenuesConfig {
    fn default() -> Self {
        Self {
            dex_gateway_url: DEFAULT_DEX_GATEWAY_URL.to_string(),
            dex_market_index: DEFAULT_DEX_MARKET_INDEX,
            cex_rest_url: DEFAULT_CEX_REST_URL.to_string(),
        }
    }
}

impl VenuesConfig {
    pub fn validate(&self) -> Result<(), AppError> {
        for (name, url) in [
            ("venues.dex_gateway_url", &self.dex_gateway_url),
            ("venues.cex_rest_url", &self.cex_rest_url),
        ] {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(AppError::Config(format!(
                    "{} must be an http(s) URL (got '{}')",
                    name, url
                )));
            }
        }
        Ok(())
    }
}

/// Root application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub strategy: StrategyConfig,
    pub venues: VenuesConfig,
}

impl AppConfig {
    /// Validate all configuration rules
    pub fn validate(&self) -> Result<(), AppError> {
        self.strategy.validate()?;
        self.venues.validate()?;
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::load_config_from_str;
    use rust_decimal_macros::dec;

    #[test]
    fn test_defaults_are_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.strategy.symbol, "SOL-PERP");
        assert_eq!(config.strategy.lot_size, dec!(5));
        assert_eq!(config.strategy.max_lots, 60);
        assert_eq!(config.strategy.open_threshold, dec!(0.01));
        assert_eq!(config.strategy.poll_interval(), Duration::from_secs(60));
        assert!(config.strategy.allow_open_and_close_same_cycle);
    }

    #[test]
    fn test_full_config_deserialize() {
        let yaml = r#"
strategy:
  symbol: SOL-PERP
  lot_size: 2.5
  max_lots: 10
  open_threshold: 0.02
  poll_interval_secs: 30
  venue_timeout_ms: 5000
  allow_open_and_close_same_cycle: false
venues:
  dex_gateway_url: http://localhost:9000
  dex_market_index: 3
  cex_rest_url: https://exchange.example
"#;
        let config: AppConfig = serde_yaml::from_str(yaml).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.strategy.lot_size, dec!(2.5));
        assert_eq!(config.strategy.open_threshold, dec!(0.02));
        assert_eq!(config.strategy.max_lots, 10);
        assert!(!config.strategy.allow_open_and_close_same_cycle);
        assert_eq!(config.venues.dex_market_index, 3);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let yaml = "strategy:\n  max_lots: 3\n";
        let config: AppConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.strategy.max_lots, 3);
        assert_eq!(config.strategy.symbol, "SOL-PERP");
        assert_eq!(config.venues, VenuesConfig::default());
    }

    #[test]
    fn test_zero_lot_size_fails() {
        let mut config = AppConfig::default();
        config.strategy.lot_size = Decimal::ZERO;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_max_lots_fails() {
        let mut config = AppConfig::default();
        config.strategy.max_lots = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_negative_threshold_fails() {
        let mut config = AppConfig::default();
        config.strategy.open_threshold = dec!(-0.01);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_empty_symbol_fails() {
        let mut config = AppConfig::default();
        config.strategy.symbol = "   ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_timeout_must_fit_interval() {
        let mut config = AppConfig::default();
        config.strategy.poll_interval_secs = 10;
        config.strategy.venue_timeout_ms = 6000;
        assert!(config.validate().is_err());

        config.strategy.venue_timeout_ms = 5000;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_oversized_durations_are_config_errors() {
        let result = load_config_from_str("strategy:\n  venue_timeout_ms: 18446744073709551615\n");
        match result {
            Err(AppError::Config(msg)) => assert!(msg.contains("venue_timeout_ms")),
            other => panic!("expected config error, got {:?}", other),
        }

        let result = load_config_from_str("strategy:\n  poll_interval_secs: 18446744073709551615\n");
        match result {
            Err(AppError::Config(msg)) => assert!(msg.contains("poll_interval_secs")),
            other => panic!("expected config error, got {:?}", other),
        }

        // Largest interval that still converts to milliseconds
        let mut config = AppConfig::default();
        config.strategy.poll_interval_secs = u64::MAX / 1000;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_bad_venue_url_fails() {
        let mut config = AppConfig::default();
        config.venues.cex_rest_url = "ftp://nope".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("venues.cex_rest_url"));
    }

    #[test]
    fn test_controller_settings_mapping() {
        let settings = AppConfig::default().strategy.controller_settings();
        assert_eq!(settings.thresholds.limit, 60);
        assert_eq!(settings.thresholds.open_threshold, dec!(0.01));
        assert_eq!(settings.lot_size, dec!(5));
    }
}
