//! Configuration loader for YAML files

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::error::AppError;

use super::types::AppConfig;

/// Load and validate configuration from a YAML file
///
/// # Example
/// ```ignore
/// use funding_arb::config::{constants::config_path, load_config};
///
/// let config = load_config(&config_path())?;
/// ```
pub fn load_config(path: &Path) -> Result<AppConfig, AppError> {
    if !path.exists() {
        return Err(AppError::Config(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let reader = BufReader::new(File::open(path)?);

    let config: AppConfig = serde_yaml::from_reader(reader).map_err(|e| {
        AppError::Config(format!("YAML parse error in '{}': {}", path.display(), e))
    })?;

    config.validate()?;

    Ok(config)
}

/// Load configuration from a YAML string
pub fn load_config_from_str(yaml_content: &str) -> Result<AppConfig, AppError> {
    let config: AppConfig = serde_yaml::from_str(yaml_content)
        .map_err(|e| AppError::Config(format!("YAML parse error: {}", e)))?;

    config.validate()?;

    Ok(config)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const VALID_CONFIG_YAML: &str = r#"
strategy:
  symbol: SOL-PERP
  lot_size: 5
  max_lots: 60
  open_threshold: "0.01"
  poll_interval_secs: 60
  venue_timeout_ms: 10000
venues:
  dex_gateway_url: http://127.0.0.1:8080
  dex_market_index: 0
  cex_rest_url: https://ftx.com
"#;

    #[test]
    fn test_load_config_from_str_valid() {
        let config = load_config_from_str(VALID_CONFIG_YAML).unwrap();
        assert_eq!(config.strategy.symbol, "SOL-PERP");
        assert_eq!(config.strategy.open_threshold, dec!(0.01));
        assert_eq!(config.venues.cex_rest_url, "https://ftx.com");
    }

    #[test]
    fn test_load_config_from_str_empty_is_defaults() {
        let config = load_config_from_str("{}").unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_load_config_from_str_invalid_yaml() {
        let result = load_config_from_str("strategy: [");
        assert!(result.unwrap_err().to_string().contains("YAML parse error"));
    }

    #[test]
    fn test_load_config_from_str_validation_failure() {
        let result = load_config_from_str("strategy:\n  max_lots: -4\n");
        assert!(result.unwrap_err().to_string().contains("strategy.max_lots must be > 0"));
    }

    #[test]
    fn test_load_config_unknown_type_rejected() {
        let result = load_config_from_str("strategy:\n  lot_size: lots\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_load_config_file_not_found() {
        let result = load_config(Path::new("/nonexistent/path/config.yaml"));
        assert!(result.unwrap_err().to_string().contains("Configuration file not found"));
    }

    #[test]
    fn test_load_config_from_file_valid() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(VALID_CONFIG_YAML.as_bytes()).unwrap();
        temp_file.flush().unwrap();

        let config = load_config(temp_file.path()).unwrap();
        assert_eq!(config.strategy.max_lots, 60);
        assert_eq!(config.strategy.lot_size, dec!(5));
    }

    #[test]
    fn test_load_config_from_file_invalid_yaml() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(b"venues: [yaml: content").unwrap();
        temp_file.flush().unwrap();

        let result = load_config(temp_file.path());
        assert!(result.unwrap_err().to_string().contains("YAML parse error"));
    }
}
