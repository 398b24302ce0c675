//! Funding-rate spread evaluation
//!
//! The differential is `percent_rate(A) - percent_rate(B)`. Two independent
//! checks run against it every cycle:
//!
//! - **open**: `diff > +open_threshold` with room below `+limit` opens
//!   short-A/long-B; `diff < -open_threshold` with room above `-limit` opens
//!   long-A/short-B.
//! - **close**: a differential whose sign disagrees with the inventory sign
//!   unwinds one lot toward zero.
//!
//! Both may fire in the same cycle. The close check is evaluated against the
//! count as it stands after the open action.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::adapters::types::OrderSide;
use crate::core::normalizer::RateQuote;

// =============================================================================
// Types
// =============================================================================

/// Outcome of one decision check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpreadClassification {
    /// A is paying more: short A, long B, count +1
    OpenShortVenueA,
    /// B is paying more: long A, short B, count -1
    OpenLongVenueA,
    /// Differential disagrees with inventory sign: unwind one lot
    CloseTowardZero,
    Hold,
}

impl SpreadClassification {
    pub fn is_hold(self) -> bool {
        self == SpreadClassification::Hold
    }

    /// Ledger change this action produces at inventory `count`
    pub fn ledger_delta(self, count: i64) -> i64 {
        match self {
            SpreadClassification::OpenShortVenueA => 1,
            SpreadClassification::OpenLongVenueA => -1,
            SpreadClassification::CloseTowardZero => -count.signum(),
            SpreadClassification::Hold => 0,
        }
    }

    /// Side of the venue A leg at inventory `count`, `None` for no-ops
    pub fn venue_a_side(self, count: i64) -> Option<OrderSide> {
        match self.ledger_delta(count) {
            1 => Some(OrderSide::Short),
            -1 => Some(OrderSide::Long),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SpreadClassification::OpenShortVenueA => "OPEN_SHORT_VENUE_A",
            SpreadClassification::OpenLongVenueA => "OPEN_LONG_VENUE_A",
            SpreadClassification::CloseTowardZero => "CLOSE_TOWARD_ZERO",
            SpreadClassification::Hold => "HOLD",
        }
    }
}

/// Thresholds for the open and close checks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpreadThresholds {
    /// Percent differential beyond which a position is opened (e.g. 0.01)
    pub open_threshold: Decimal,
    /// Inventory bound in lots, applied symmetrically
    pub limit: i64,
}

/// Both checks of one cycle, as projected from a starting count
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpreadDecision {
    pub differential: Decimal,
    pub open: SpreadClassification,
    /// Evaluated against the count after `open` is applied
    pub close: SpreadClassification,
}

impl SpreadDecision {
    pub fn is_hold(&self) -> bool {
        self.open.is_hold() && self.close.is_hold()
    }

    pub fn fires_both(&self) -> bool {
        !self.open.is_hold() && !self.close.is_hold()
    }
}

// =============================================================================
// SpreadEvaluator
// =============================================================================

#[derive(Debug, Clone)]
pub struct SpreadEvaluator {
    thresholds: SpreadThresholds,
}

impl SpreadEvaluator {
    pub fn new(thresholds: SpreadThresholds) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> &SpreadThresholds {
        &self.thresholds
    }

    /// `percent_rate(A) - percent_rate(B)`
    #[inline]
    pub fn differential(quote_a: &RateQuote, quote_b: &RateQuote) -> Decimal {
        quote_a.percent_rate - quote_b.percent_rate
    }

    /// Open check: threshold crossing with room left in the ledger
    pub fn evaluate_open(&self, diff: Decimal, count: i64) -> SpreadClassification {
        let threshold = self.thresholds.open_threshold;
        let limit = self.thresholds.limit;

        if diff > threshold && count < limit {
            SpreadClassification::OpenShortVenueA
        } else if diff < -threshold && count > -limit {
            SpreadClassification::OpenLongVenueA
        } else {
            SpreadClassification::Hold
        }
    }

    /// Close check: differential sign disagrees with inventory sign
    pub fn evaluate_close(&self, diff: Decimal, count: i64) -> SpreadClassification {
        if (diff < Decimal::ZERO && count > 0) || (diff > Decimal::ZERO && count < 0) {
            SpreadClassification::CloseTowardZero
        } else {
            SpreadClassification::Hold
        }
    }

    /// Run both checks, projecting the open action onto the close check
    pub fn classify(&self, quote_a: &RateQuote, quote_b: &RateQuote, count: i64) -> SpreadDecision {
        let differential = Self::differential(quote_a, quote_b);
        let open = self.evaluate_open(differential, count);
        let close = self.evaluate_close(differential, count + open.ledger_delta(count));
        SpreadDecision {
            differential,
            open,
            close,
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
