//! Venue credentials from the process environment
//!
//! Malformed or missing credentials are configuration errors and stop the
//! process before the first cycle.

use std::fmt;

use crate::core::logging::sanitize;
use crate::error::AppError;

use super::constants::{CEX_API_KEY_ENV, CEX_API_SECRET_ENV, ONCHAIN_SECRET_KEY_ENV};

/// Length of an ed25519 keypair: 32 secret bytes then 32 public bytes
pub const KEYPAIR_LEN: usize = 64;

#[derive(Clone)]
pub struct Credentials {
    keypair: [u8; KEYPAIR_LEN],
    pub cex_api_key: String,
    pub cex_api_secret: String,
}

impl Credentials {
    /// Read `ONCHAIN_SECRET_KEY`, `CEX_API_KEY` and `CEX_API_SECRET`
    pub fn from_env() -> Result<Self, AppError> {
        let keypair_json = required_var(ONCHAIN_SECRET_KEY_ENV)?;
        let api_key = required_var(CEX_API_KEY_ENV)?;
        let api_secret = required_var(CEX_API_SECRET_ENV)?;
        Self::from_parts(&keypair_json, api_key, api_secret)
    }

    pub fn from_parts(
        keypair_json: &str,
        cex_api_key: impl Into<String>,
        cex_api_secret: impl Into<String>,
    ) -> Result<Self, AppError> {
        Ok(Self {
            keypair: parse_keypair(keypair_json)?,
            cex_api_key: cex_api_key.into(),
            cex_api_secret: cex_api_secret.into(),
        })
    }

    /// Hex of the wallet public key (second half of the keypair)
    pub fn authority_hex(&self) -> String {
        hex::encode(&self.keypair[32..])
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("authority", &self.authority_hex())
            .field("cex_api_key", &format_args!("{}", sanitize(&self.cex_api_key)))
            .field("cex_api_secret", &"REDACTED")
            .finish_non_exhaustive()
    }
}

fn required_var(name: &str) -> Result<String, AppError> {
    match std::env::var(name) {
        Ok(v) if !v.trim().is_empty() => Ok(v.trim().to_string()),
        _ => Err(AppError::Config(format!("{} environment variable not set", name))),
    }
}

/// Parse a keypair given as a JSON array of 64 integers in `0..=255`
fn parse_keypair(json: &str) -> Result<[u8; KEYPAIR_LEN], AppError> {
    // Never echo the input: it is the wallet secret
    let bytes: Vec<u8> = serde_json::from_str(json).map_err(|_| {
        AppError::Config(format!(
            "{} must be a JSON array of byte values",
            ONCHAIN_SECRET_KEY_ENV
        ))
    })?;
    let len = bytes.len();
    bytes.try_into().map_err(|_| {
        AppError::Config(format!(
            "{} must hold {} bytes (got {})",
            ONCHAIN_SECRET_KEY_ENV, KEYPAIR_LEN, len
        ))
    })
}
