//! Position controller
//!
//! Owns the inventory ledger and both venues. Each cycle it runs the open
//! check, then the close check against the resulting count, and turns every
//! non-hold classification into a matched pair of market orders.
//!
//! Ledger mutation is two-phase: the lot is reserved (bound-checked) before
//! any order is sent, confirmed only when both legs succeed, and released
//! otherwise.

use rust_decimal::Decimal;
use tracing::{error, info, warn};

use crate::adapters::VenueAdapter;
use crate::core::execution::{LegStatus, OrderIntent, PairExecutor, PairResult};
use crate::core::ledger::{InventoryLedger, LedgerError};
use crate::core::normalizer::RateQuote;
use crate::core::spread::{SpreadClassification, SpreadEvaluator, SpreadThresholds};

// =============================================================================
// Types
// =============================================================================

/// Static parameters of the controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControllerSettings {
    pub thresholds: SpreadThresholds,
    /// Base units per action
    pub lot_size: Decimal,
    /// When false, the close check is skipped in a cycle that already opened
    pub allow_open_and_close_same_cycle: bool,
}

/// What happened to one non-hold classification
#[derive(Debug, Clone)]
pub enum ActionOutcome {
    /// Both legs filled, ledger moved
    Executed,
    /// Ledger bound refused the reservation, no order sent
    Skipped(LedgerError),
    /// At least one leg failed, reservation released
    Failed { leg_a: LegStatus, leg_b: LegStatus },
}

#[derive(Debug, Clone)]
pub struct ActionReport {
    pub classification: SpreadClassification,
    /// Intents built for this action, empty when skipped before sizing
    pub intents: Vec<OrderIntent>,
    pub outcome: ActionOutcome,
    pub count_after: i64,
}

impl ActionReport {
    pub fn is_executed(&self) -> bool {
        matches!(self.outcome, ActionOutcome::Executed)
    }
}

/// Summary of one `run_cycle`
#[derive(Debug, Clone)]
pub struct CycleReport {
    pub differential: Decimal,
    pub count_before: i64,
    pub count_after: i64,
    pub actions: Vec<ActionReport>,
}

impl CycleReport {
    /// Intents of all executed actions, in submission order
    pub fn executed_intents(&self) -> Vec<OrderIntent> {
        self.actions
            .iter()
            .filter(|a| a.is_executed())
            .flat_map(|a| a.intents.iter().cloned())
            .collect()
    }

    pub fn executed_actions(&self) -> usize {
        self.actions.iter().filter(|a| a.is_executed()).count()
    }

    pub fn is_hold(&self) -> bool {
        self.actions.is_empty()
    }
}

// =============================================================================
// PositionController
// =============================================================================

pub struct PositionController<A, B>
where
    A: VenueAdapter,
    B: VenueAdapter,
{
    ledger: InventoryLedger,
    evaluator: SpreadEvaluator,
    executor: PairExecutor<A, B>,
    settings: ControllerSettings,
}

impl<A, B> PositionController<A, B>
where
    A: VenueAdapter,
    B: VenueAdapter,
{
    /// Create a controller with an empty ledger
    pub fn new(executor: PairExecutor<A, B>, settings: ControllerSettings) -> Self {
        Self {
            ledger: InventoryLedger::new(settings.thresholds.limit),
            evaluator: SpreadEvaluator::new(settings.thresholds),
            executor,
            settings,
        }
    }

    pub fn ledger(&self) -> &InventoryLedger {
        &self.ledger
    }

    pub fn evaluator(&self) -> &SpreadEvaluator {
        &self.evaluator
    }

    pub fn executor(&self) -> &PairExecutor<A, B> {
        &self.executor
    }

    pub fn settings(&self) -> &ControllerSettings {
        &self.settings
    }

    /// Decide and execute this cycle's actions
    pub async fn run_cycle(&mut self, quote_a: &RateQuote, quote_b: &RateQuote) -> CycleReport {
        let differential = SpreadEvaluator::differential(quote_a, quote_b);
        let count_before = self.ledger.current();

        info!(
            rate_a = %quote_a.percent_rate,
            rate_b = %quote_b.percent_rate,
            mark_a = %quote_a.mark_price,
            differential = %differential,
            count = count_before,
            "Funding rates evaluated"
        );

        let mut actions = Vec::with_capacity(2);

        let open = self.evaluator.evaluate_open(differential, count_before);
        if !open.is_hold() {
            actions.push(self.execute_action(open, quote_a.mark_price).await);
        }

        let close = self.evaluator.evaluate_close(differential, self.ledger.current());
        if !close.is_hold() {
            if !open.is_hold() && !self.settings.allow_open_and_close_same_cycle {
                info!(
                    differential = %differential,
                    count = self.ledger.current(),
                    "[SKIP] Close suppressed after open in same cycle"
                );
            } else {
                if !open.is_hold() {
                    warn!(
                        open = open.label(),
                        close = close.label(),
                        differential = %differential,
                        "[DOUBLE-ACTION] Open and close both fire this cycle"
                    );
                }
                actions.push(self.execute_action(close, quote_a.mark_price).await);
            }
        }

        let count_after = self.ledger.current();
        if actions.is_empty() {
            info!(differential = %differential, count = count_after, "Hold");
        }

        CycleReport {
            differential,
            count_before,
            count_after,
            actions,
        }
    }

    async fn execute_action(&mut self, classification: SpreadClassification, mark_price_a: Decimal) -> ActionReport {
        let count = self.ledger.current();
        let delta = classification.ledger_delta(count);

        // A close at a flat count has no side and no delta
        let reserved = classification
            .venue_a_side(count)
            .ok_or(LedgerError::InvalidDelta(delta))
            .and_then(|side| Ok((side, self.ledger.reserve(delta)?)));

        let (venue_a_side, reservation) = match reserved {
            Ok(pair) => pair,
            Err(e) => {
                info!(
                    action = classification.label(),
                    count = count,
                    reason = %e,
                    "[SKIP] Action not executed"
                );
                return ActionReport {
                    classification,
                    intents: Vec::new(),
                    outcome: ActionOutcome::Skipped(e),
                    count_after: count,
                };
            }
        };

        let intents = OrderIntent::pair(venue_a_side, 1, self.settings.lot_size, mark_price_a);
        let result = self.executor.execute_pair(&intents).await;

        let (outcome, count_after) = if result.success {
            let count_after = self.ledger.confirm(reservation);
            let tag = match classification {
                SpreadClassification::CloseTowardZero => "[CLOSE]",
                _ => "[OPEN]",
            };
            info!(
                action = classification.label(),
                side_a = %intents[0].side,
                side_b = %intents[1].side,
                quantity = %intents[0].quantity,
                notional = %intents[0].notional,
                count_before = count,
                count_after = count_after,
                "{} Action executed",
                tag
            );
            (ActionOutcome::Executed, count_after)
        } else {
            let count_after = self.ledger.release(reservation);
            log_failed_pair(classification, &result);
            (
                ActionOutcome::Failed {
                    leg_a: result.leg_a,
                    leg_b: result.leg_b,
                },
                count_after,
            )
        };

        ActionReport {
            classification,
            intents: intents.to_vec(),
            outcome,
            count_after,
        }
    }
}

fn log_failed_pair(classification: SpreadClassification, result: &PairResult) {
    if result.is_one_legged() {
        error!(
            action = classification.label(),
            leg_a = ?result.leg_a,
            leg_b = ?result.leg_b,
            "[TRADE] One leg filled, venues hold unhedged exposure"
        );
    } else {
        warn!(
            action = classification.label(),
            leg_a = ?result.leg_a,
            leg_b = ?result.leg_b,
            "[TRADE] Both legs failed, ledger unchanged"
        );
    }
}

// =============================================================================
// Tests
// =============================================================================
