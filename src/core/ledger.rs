//! Inventory ledger
//!
//! A single signed lot counter bounded to `[-limit, +limit]`. Positive means
//! net short on venue A / long on venue B. Each action moves it by exactly one
//! lot. Mutation is two-phase: a [`Reservation`] is taken before any order is
//! sent, then confirmed once both legs succeed or released otherwise.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// Applying the delta would leave `[-limit, +limit]`
    #[error("ledger bound exceeded: count {count} + delta {delta} outside ±{limit}")]
    OutOfRange { count: i64, delta: i64, limit: i64 },

    #[error("ledger delta must be ±1, got {0}")]
    InvalidDelta(i64),

    #[error("a reservation is already pending")]
    ReservationPending,
}

/// Tentative one-lot change, must be confirmed or released
#[derive(Debug, PartialEq, Eq)]
#[must_use = "a reservation must be confirmed or released"]
pub struct Reservation {
    delta: i64,
}

impl Reservation {
    pub fn delta(&self) -> i64 {
        self.delta
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InventoryLedger {
    count: i64,
    limit: i64,
    pending: Option<i64>,
}

impl InventoryLedger {
    /// Create an empty ledger; `limit` is the max absolute lot count
    pub fn new(limit: i64) -> Self {
        Self {
            count: 0,
            limit: limit.abs(),
            pending: None,
        }
    }

    /// Confirmed count
    pub fn current(&self) -> i64 {
        self.count
    }

    pub fn limit(&self) -> i64 {
        self.limit
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    fn check(&self, delta: i64) -> Result<i64, LedgerError> {
        if delta != 1 && delta != -1 {
            return Err(LedgerError::InvalidDelta(delta));
        }
        let next = self.count + delta;
        if next.abs() > self.limit {
            return Err(LedgerError::OutOfRange {
                count: self.count,
                delta,
                limit: self.limit,
            });
        }
        Ok(next)
    }

    /// Apply a one-lot change immediately
    pub fn apply_delta(&mut self, delta: i64) -> Result<i64, LedgerError> {
        if self.pending.is_some() {
            return Err(LedgerError::ReservationPending);
        }
        self.count = self.check(delta)?;
        Ok(self.count)
    }

    /// Bound-check and hold a one-lot change without applying it
    pub fn reserve(&mut self, delta: i64) -> Result<Reservation, LedgerError> {
        if self.pending.is_some() {
            return Err(LedgerError::ReservationPending);
        }
        self.check(delta)?;
        self.pending = Some(delta);
        Ok(Reservation { delta })
    }

    /// Apply a reserved change, returning the new count
    pub fn confirm(&mut self, reservation: Reservation) -> i64 {
        self.pending = None;
        self.count += reservation.delta;
        self.count
    }

    /// Drop a reserved change, leaving the count untouched
    pub fn release(&mut self, reservation: Reservation) -> i64 {
        let _ = reservation;
        self.pending = None;
        self.count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_ledger_is_zero() {
        let ledger = InventoryLedger::new(60);
        assert_eq!(ledger.current(), 0);
        assert_eq!(ledger.limit(), 60);
        assert!(!ledger.has_pending());
    }

    #[test]
    fn test_apply_delta_within_bounds() {
        let mut ledger = InventoryLedger::new(2);
        assert_eq!(ledger.apply_delta(1).unwrap(), 1);
        assert_eq!(ledger.apply_delta(1).unwrap(), 2);
        assert_eq!(
            ledger.apply_delta(1),
            Err(LedgerError::OutOfRange { count: 2, delta: 1, limit: 2 })
        );
        assert_eq!(ledger.current(), 2);
    }

    #[test]
    fn test_negative_bound() {
        let mut ledger = InventoryLedger::new(1);
        assert_eq!(ledger.apply_delta(-1).unwrap(), -1);
        assert!(ledger.apply_delta(-1).is_err());
        assert_eq!(ledger.current(), -1);
    }

    #[test]
    fn test_only_single_lot_deltas() {
        let mut ledger = InventoryLedger::new(60);
        assert_eq!(ledger.apply_delta(2), Err(LedgerError::InvalidDelta(2)));
        assert_eq!(ledger.apply_delta(0), Err(LedgerError::InvalidDelta(0)));
    }

    #[test]
    fn test_reserve_confirm() {
        let mut ledger = InventoryLedger::new(60);
        let reservation = ledger.reserve(1).unwrap();
        assert_eq!(ledger.current(), 0);
        assert!(ledger.has_pending());
        assert_eq!(ledger.confirm(reservation), 1);
        assert!(!ledger.has_pending());
    }

    #[test]
    fn test_reserve_release_leaves_count() {
        let mut ledger = InventoryLedger::new(60);
        let reservation = ledger.reserve(-1).unwrap();
        assert_eq!(ledger.release(reservation), 0);
        assert_eq!(ledger.current(), 0);
        assert!(!ledger.has_pending());
    }

    #[test]
    fn test_reserve_checks_bound_before_orders() {
        let mut ledger = InventoryLedger::new(1);
        ledger.apply_delta(1).unwrap();
        assert!(matches!(ledger.reserve(1), Err(LedgerError::OutOfRange { .. })));
        assert!(!ledger.has_pending());
    }

    #[test]
    fn test_single_pending_reservation() {
        let mut ledger = InventoryLedger::new(60);
        let first = ledger.reserve(1).unwrap();
        assert_eq!(ledger.reserve(1), Err(LedgerError::ReservationPending));
        assert_eq!(ledger.apply_delta(1), Err(LedgerError::ReservationPending));
        ledger.confirm(first);
        assert!(ledger.reserve(1).is_ok());
    }
}
