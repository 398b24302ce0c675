//! Core data types for venue adapters
//!
//! These types are shared by both venue adapters so the controller can treat
//! an on-chain protocol and a centralized exchange through one interface.

use std::fmt;
use std::time::Duration;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

// =============================================================================
// Shared HTTP Client Builder
// =============================================================================

/// HTTP connect timeout (milliseconds); unreachable hosts fail fast
const HTTP_CONNECT_TIMEOUT_MS: u64 = 1500;
/// Max idle connections per host in connection pool
const HTTP_POOL_MAX_IDLE: usize = 2;
/// TCP keepalive interval (seconds)
const HTTP_TCP_KEEPALIVE_SECS: u64 = 30;

/// Create the HTTP client used by a venue adapter
///
/// `request_timeout` bounds every request so a stalled venue cannot hold the
/// poll loop.
pub fn create_http_client(venue_name: &str, request_timeout: Duration) -> reqwest::Client {
    let client = reqwest::Client::builder()
        .timeout(request_timeout)
        .pool_max_idle_per_host(HTTP_POOL_MAX_IDLE)
        .tcp_keepalive(Duration::from_secs(HTTP_TCP_KEEPALIVE_SECS))
        .connect_timeout(Duration::from_millis(HTTP_CONNECT_TIMEOUT_MS))
        .build()
        .unwrap_or_else(|_| reqwest::Client::new());
    tracing::info!(
        phase = "init",
        venue = %venue_name,
        timeout_ms = request_timeout.as_millis() as u64,
        connect_timeout_ms = HTTP_CONNECT_TIMEOUT_MS,
        pool_max_idle = HTTP_POOL_MAX_IDLE,
        "HTTP client configured"
    );
    client
}

// =============================================================================
// Venue Identity
// =============================================================================

/// Which side of the venue pair a value belongs to
///
/// Venue A is the one whose direction defines the ledger sign convention:
/// a positive count means net short on A / long on B.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VenueId {
    A,
    B,
}

impl fmt::Display for VenueId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VenueId::A => write!(f, "venue_a"),
            VenueId::B => write!(f, "venue_b"),
        }
    }
}

// =============================================================================
// Raw Quote Types
// =============================================================================

/// A number as the venue reported it, before any unit conversion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawValue {
    /// Already a decimal in the venue's declared unit
    Decimal(Decimal),
    /// Integer mantissa scaled by `10^scale` (e.g. on-chain fixed point)
    FixedPoint { mantissa: i128, scale: u32 },
}

/// Unit in which a venue reports its funding rate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateUnit {
    /// 0.0001 means 0.01% per funding interval
    Fraction,
    /// 0.01 means 0.01% per funding interval
    Percent,
}

/// Funding rate and mark price exactly as one venue returned them
///
/// Fields are optional because venues omit them on partial responses; the
/// normalizer refuses to infer missing values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawQuote {
    pub venue: VenueId,
    pub symbol: String,
    pub funding_rate: Option<RawValue>,
    pub rate_unit: RateUnit,
    pub mark_price: Option<RawValue>,
}

// =============================================================================
// Order Types
// =============================================================================

/// Economic direction of one leg
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderSide {
    Long,
    Short,
}

impl OrderSide {
    pub fn opposite(self) -> Self {
        match self {
            OrderSide::Long => OrderSide::Short,
            OrderSide::Short => OrderSide::Long,
        }
    }

    /// Exchange-style side string
    pub fn as_buy_sell(self) -> &'static str {
        match self {
            OrderSide::Long => "buy",
            OrderSide::Short => "sell",
        }
    }
}

impl fmt::Display for OrderSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderSide::Long => write!(f, "LONG"),
            OrderSide::Short => write!(f, "SHORT"),
        }
    }
}

/// Market order handed to a venue adapter
///
/// Carries both sizing views: venues that size in base units read
/// `quantity`, venues that size in quote notional read `notional`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderRequest {
    pub client_order_id: String,
    pub symbol: String,
    pub side: OrderSide,
    /// Base asset units
    pub quantity: Decimal,
    /// Quote currency units
    pub notional: Decimal,
}

impl OrderRequest {
    pub fn market(symbol: impl Into<String>, side: OrderSide, quantity: Decimal, notional: Decimal) -> Self {
        Self {
            client_order_id: format!("fa-{}", uuid::Uuid::new_v4()),
            symbol: symbol.into(),
            side,
            quantity,
            notional,
        }
    }
}

/// Venue acknowledgement of a market order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderResponse {
    /// Venue-assigned identifier (order id or transaction signature)
    pub order_id: String,
    pub client_order_id: String,
}
