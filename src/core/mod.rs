//! Core module - normalization, spread evaluation, ledger, controller, poll loop
//!
//! Explicit re-exports keep the public surface deliberate. Prefer importing
//! from `crate::core`:
//! ```ignore
//! use funding_arb::core::{PositionController, RateNormalizer, SpreadEvaluator};
//! ```

pub mod controller;
pub mod execution;
pub mod ledger;
pub mod logging;
pub mod normalizer;
pub mod runtime;
pub mod spread;

pub use controller::{ActionOutcome, ActionReport, ControllerSettings, CycleReport, PositionController};
pub use execution::{with_timeout, LegStatus, OrderIntent, PairExecutor, PairResult};
pub use ledger::{InventoryLedger, LedgerError, Reservation};
pub use logging::{
    init_logging, init_logging_with_config, sanitize, LoggingConfig, SanitizedValue,
    DEFAULT_LOG_LEVEL,
};
pub use normalizer::{NormalizeError, RateNormalizer, RateQuote};
pub use runtime::{fetch_quotes, poll_loop, run_single_cycle, LoopStats};
pub use spread::{SpreadClassification, SpreadDecision, SpreadEvaluator, SpreadThresholds};
