//! Paired leg execution
//!
//! Submits the two legs of one action (one per venue) concurrently and
//! reports each leg's outcome. Every venue call is bounded by a timeout so a
//! stalled venue cannot hold the cycle.
//!
//! # Architecture
//! - `OrderIntent`: value object describing one leg
//! - `PairExecutor`: owns both adapters and runs legs with `tokio::join!`
//! - `PairResult` / `LegStatus`: outcome of both legs

use std::time::{Duration, Instant};

use rust_decimal::Decimal;
use tracing::{info, warn};

use crate::adapters::{
    ExchangeError, ExchangeResult, OrderRequest, OrderResponse, OrderSide, VenueAdapter, VenueId,
};

// =============================================================================
// Types
// =============================================================================

/// One leg of a matched pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderIntent {
    pub venue: VenueId,
    pub side: OrderSide,
    /// Lots moved by this leg (always 1 per action)
    pub lots: u32,
    /// Base units (`lots * lot_size`)
    pub quantity: Decimal,
    /// Quote units (`quantity * mark price of venue A`)
    pub notional: Decimal,
}

impl OrderIntent {
    /// Build the matched pair for one action
    ///
    /// Both legs share size and notional; venue A's mark price drives the
    /// notional of both. Legs always have opposite sides.
    pub fn pair(venue_a_side: OrderSide, lots: u32, lot_size: Decimal, mark_price_a: Decimal) -> [OrderIntent; 2] {
        let quantity = lot_size * Decimal::from(lots);
        let notional = quantity * mark_price_a;
        [
            OrderIntent {
                venue: VenueId::A,
                side: venue_a_side,
                lots,
                quantity,
                notional,
            },
            OrderIntent {
                venue: VenueId::B,
                side: venue_a_side.opposite(),
                lots,
                quantity,
                notional,
            },
        ]
    }

    pub fn to_request(&self, symbol: &str) -> OrderRequest {
        OrderRequest::market(symbol, self.side, self.quantity, self.notional)
    }
}

/// Status of a single leg
#[derive(Debug, Clone)]
pub enum LegStatus {
    /// Order accepted by the venue
    Success(OrderResponse),
    /// Order failed with error message
    Failed(String),
}

impl LegStatus {
    pub fn is_success(&self) -> bool {
        matches!(self, LegStatus::Success(_))
    }
}

/// Result of submitting both legs
#[derive(Debug, Clone)]
pub struct PairResult {
    pub leg_a: LegStatus,
    pub leg_b: LegStatus,
    /// Total execution latency in milliseconds
    pub execution_latency_ms: u64,
    /// True if both legs succeeded
    pub success: bool,
}

impl PairResult {
    /// Exactly one leg went through: the venues now hold unhedged exposure
    pub fn is_one_legged(&self) -> bool {
        self.leg_a.is_success() != self.leg_b.is_success()
    }
}

// =============================================================================
// PairExecutor
// =============================================================================

/// Owns both venue adapters and submits matched pairs
pub struct PairExecutor<A, B>
where
    A: VenueAdapter,
    B: VenueAdapter,
{
    venue_a: A,
    venue_b: B,
    symbol: String,
    call_timeout: Duration,
}

impl<A, B> PairExecutor<A, B>
where
    A: VenueAdapter,
    B: VenueAdapter,
{
    pub fn new(venue_a: A, venue_b: B, symbol: impl Into<String>, call_timeout: Duration) -> Self {
        Self {
            venue_a,
            venue_b,
            symbol: symbol.into(),
            call_timeout,
        }
    }

    pub fn venue_a(&self) -> &A {
        &self.venue_a
    }

    pub fn venue_b(&self) -> &B {
        &self.venue_b
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn call_timeout(&self) -> Duration {
        self.call_timeout
    }

    /// Submit both legs concurrently
    pub async fn execute_pair(&self, intents: &[OrderIntent; 2]) -> PairResult {
        let start = Instant::now();

        let request_a = intents[0].to_request(&self.symbol);
        let request_b = intents[1].to_request(&self.symbol);

        let (result_a, result_b) = tokio::join!(
            with_timeout(self.call_timeout, self.venue_a.submit_market_order(&request_a)),
            with_timeout(self.call_timeout, self.venue_b.submit_market_order(&request_b)),
        );

        let execution_latency_ms = start.elapsed().as_millis() as u64;
        let leg_a = result_to_leg_status(result_a);
        let leg_b = result_to_leg_status(result_b);
        let success = leg_a.is_success() && leg_b.is_success();

        if success {
            info!(
                venue_a = %self.venue_a.venue_name(),
                side_a = %intents[0].side,
                venue_b = %self.venue_b.venue_name(),
                side_b = %intents[1].side,
                quantity = %intents[0].quantity,
                notional = %intents[0].notional,
                latency_ms = execution_latency_ms,
                "[TRADE] Pair executed"
            );
        } else {
            warn!(
                leg_a_success = %leg_a.is_success(),
                leg_b_success = %leg_b.is_success(),
                latency_ms = execution_latency_ms,
                "[TRADE] Pair failed"
            );
        }

        PairResult {
            leg_a,
            leg_b,
            execution_latency_ms,
            success,
        }
    }
}

/// Bound a venue call; elapsed budget becomes `NetworkTimeout`
pub async fn with_timeout<T, F>(budget: Duration, call: F) -> ExchangeResult<T>
where
    F: std::future::Future<Output = ExchangeResult<T>>,
{
    match tokio::time::timeout(budget, call).await {
        Ok(result) => result,
        Err(_) => Err(ExchangeError::NetworkTimeout(budget.as_millis() as u64)),
    }
}

fn result_to_leg_status(result: ExchangeResult<OrderResponse>) -> LegStatus {
    match result {
        Ok(response) => LegStatus::Success(response),
        Err(e) => LegStatus::Failed(e.to_string()),
    }
}

// =============================================================================
// Tests
// =============================================================================
