//! Configuration module
//!
//! - Strategy and venue settings (`AppConfig`) loaded from YAML
//! - Venue credentials (`Credentials`) from the environment
//! - Defaults and environment variable names in `constants`

pub mod constants;
mod loader;
mod secrets;
mod types;

pub use loader::{load_config, load_config_from_str};
pub use secrets::{Credentials, KEYPAIR_LEN};
pub use types::{AppConfig, StrategyConfig, VenuesConfig};
