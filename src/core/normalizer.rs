//! Rate normalization
//!
//! Converts each venue's native funding/price representation into a
//! [`RateQuote`]: funding as decimal percent per funding interval, mark price
//! as quote-currency decimal. No unit inference is attempted; a missing field
//! fails the whole cycle.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::adapters::types::{RateUnit, RawQuote, RawValue, VenueId};

/// Normalization failures
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NormalizeError {
    #[error("{venue} response is missing '{field}'")]
    MissingField { venue: VenueId, field: &'static str },

    #[error("{venue} '{field}' cannot be represented as a decimal")]
    Precision { venue: VenueId, field: &'static str },

    #[error("{venue} mark price must be positive (got {mark})")]
    NonPositiveMark { venue: VenueId, mark: Decimal },
}

/// Funding rate and mark price of one venue in common units
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateQuote {
    pub venue: VenueId,
    /// Percent per funding interval (0.01 == 0.01%)
    pub percent_rate: Decimal,
    /// Quote currency per unit of base asset
    pub mark_price: Decimal,
}

/// Stateless converter from [`RawQuote`] to [`RateQuote`]
#[derive(Debug, Clone, Copy, Default)]
pub struct RateNormalizer;

impl RateNormalizer {
    pub fn new() -> Self {
        Self
    }

    /// Normalize one venue response
    pub fn normalize(&self, raw: &RawQuote) -> Result<RateQuote, NormalizeError> {
        let rate = raw.funding_rate.ok_or(NormalizeError::MissingField {
            venue: raw.venue,
            field: "funding_rate",
        })?;
        let mark = raw.mark_price.ok_or(NormalizeError::MissingField {
            venue: raw.venue,
            field: "mark_price",
        })?;

        let rate = to_decimal(rate).ok_or(NormalizeError::Precision {
            venue: raw.venue,
            field: "funding_rate",
        })?;
        let percent_rate = match raw.rate_unit {
            RateUnit::Percent => rate,
            RateUnit::Fraction => rate
                .checked_mul(Decimal::ONE_HUNDRED)
                .ok_or(NormalizeError::Precision {
                    venue: raw.venue,
                    field: "funding_rate",
                })?,
        };

        let mark_price = to_decimal(mark).ok_or(NormalizeError::Precision {
            venue: raw.venue,
            field: "mark_price",
        })?;
        if mark_price <= Decimal::ZERO {
            return Err(NormalizeError::NonPositiveMark {
                venue: raw.venue,
                mark: mark_price,
            });
        }

        Ok(RateQuote {
            venue: raw.venue,
            percent_rate: percent_rate.normalize(),
            mark_price: mark_price.normalize(),
        })
    }

    /// Normalize both venues of a cycle, venue A first
    pub fn normalize_pair(
        &self,
        raw_a: &RawQuote,
        raw_b: &RawQuote,
    ) -> Result<(RateQuote, RateQuote), NormalizeError> {
        Ok((self.normalize(raw_a)?, self.normalize(raw_b)?))
    }
}

fn to_decimal(value: RawValue) -> Option<Decimal> {
    match value {
        RawValue::Decimal(d) => Some(d),
        RawValue::FixedPoint { mantissa, scale } => {
            Decimal::try_from_i128_with_scale(mantissa, scale).ok()
        }
    }
}
