//! Poll loop
//!
//! Drives one controller cycle per tick: fetch both venues concurrently,
//! normalize, decide, execute. A failing cycle is logged and counted; the
//! loop always proceeds to the next tick. Cycles never overlap because the
//! cycle runs inside the tick branch and missed ticks are delayed rather than
//! burst.

use tokio::sync::broadcast;
use tokio::time::{interval, Duration, MissedTickBehavior};
use tracing::{error, info, warn};

use crate::adapters::VenueAdapter;
use crate::core::controller::{CycleReport, PositionController};
use crate::core::execution::{with_timeout, PairExecutor};
use crate::core::normalizer::{RateNormalizer, RateQuote};
use crate::error::{AppError, Result};

/// Counters reported when the loop exits
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoopStats {
    pub cycles_run: u64,
    pub cycles_failed: u64,
    pub actions_executed: u64,
}

/// Fetch and normalize both venues' quotes, each call under the venue timeout
pub async fn fetch_quotes<A, B>(
    executor: &PairExecutor<A, B>,
    normalizer: &RateNormalizer,
) -> Result<(RateQuote, RateQuote)>
where
    A: VenueAdapter,
    B: VenueAdapter,
{
    let budget = executor.call_timeout();
    let symbol = executor.symbol();

    let (raw_a, raw_b) = tokio::join!(
        with_timeout(budget, executor.venue_a().fetch_funding_and_mark(symbol)),
        with_timeout(budget, executor.venue_b().fetch_funding_and_mark(symbol)),
    );
    let raw_a = raw_a.map_err(|e| AppError::venue(executor.venue_a().venue_id(), e))?;
    let raw_b = raw_b.map_err(|e| AppError::venue(executor.venue_b().venue_id(), e))?;

    Ok(normalizer.normalize_pair(&raw_a, &raw_b)?)
}

/// One complete cycle: quotes then decision
pub async fn run_single_cycle<A, B>(
    controller: &mut PositionController<A, B>,
    normalizer: &RateNormalizer,
) -> Result<CycleReport>
where
    A: VenueAdapter,
    B: VenueAdapter,
{
    let (quote_a, quote_b) = fetch_quotes(controller.executor(), normalizer).await?;
    Ok(controller.run_cycle(&quote_a, &quote_b).await)
}

/// Run cycles every `poll_interval` until a shutdown signal arrives
///
/// The first cycle runs immediately. Shutdown is only observed between
/// cycles, so an in-flight cycle finishes its order legs first.
pub async fn poll_loop<A, B>(
    controller: &mut PositionController<A, B>,
    poll_interval: Duration,
    mut shutdown_rx: broadcast::Receiver<()>,
) -> LoopStats
where
    A: VenueAdapter,
    B: VenueAdapter,
{
    let normalizer = RateNormalizer::new();
    let mut stats = LoopStats::default();
    let mut ticker = interval(poll_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    info!(
        interval_secs = poll_interval.as_secs_f64(),
        symbol = %controller.executor().symbol(),
        limit = controller.ledger().limit(),
        "Poll loop started"
    );

    loop {
        tokio::select! {
            biased;
            _ = shutdown_rx.recv() => {
                info!(
                    cycles = stats.cycles_run,
                    failed = stats.cycles_failed,
                    actions = stats.actions_executed,
                    count = controller.ledger().current(),
                    "[SHUTDOWN] Poll loop stopping"
                );
                break;
            }
            _ = ticker.tick() => {
                stats.cycles_run += 1;
                match run_single_cycle(controller, &normalizer).await {
                    Ok(report) => {
                        stats.actions_executed += report.executed_actions() as u64;
                    }
                    Err(e) => {
                        stats.cycles_failed += 1;
                        match &e {
                            AppError::Venue { source, .. } if source.is_transient() => {
                                warn!(error = %e, cycle = stats.cycles_run, "Cycle skipped, retrying next tick");
                            }
                            _ => {
                                error!(error = %e, cycle = stats.cycles_run, "Cycle failed");
                            }
                        }
                    }
                }
            }
        }
    }

    stats
}
