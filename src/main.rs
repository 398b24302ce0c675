//! Funding-rate arbitrage controller entry point
//!
//! 1. Loads `.env`, logging, YAML config and venue credentials
//! 2. Builds both venue adapters and the position controller
//! 3. Polls until Ctrl+C, then exits cleanly
//!
//! Any startup failure exits with status 1.

use tokio::signal;
use tokio::sync::broadcast;
use tracing::{error, info};

use funding_arb::adapters::{CexAdapter, CexConfig, DexGatewayAdapter, DexGatewayConfig};
use funding_arb::config::{self, constants::config_path, Credentials};
use funding_arb::core::{init_logging, poll_loop, sanitize, PairExecutor, PositionController};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_logging();

    info!(version = env!("CARGO_PKG_VERSION"), "Funding arbitrage controller starting");

    let path = config_path();
    let config = match config::load_config(&path) {
        Ok(cfg) => {
            info!(
                path = %path.display(),
                symbol = %cfg.strategy.symbol,
                lot_size = %cfg.strategy.lot_size,
                max_lots = cfg.strategy.max_lots,
                open_threshold = %cfg.strategy.open_threshold,
                poll_interval_secs = cfg.strategy.poll_interval_secs,
                "[CONFIG] Loaded"
            );
            cfg
        }
        Err(e) => {
            error!(path = %path.display(), error = %e, "[CONFIG] Configuration failed");
            std::process::exit(1);
        }
    };

    let credentials = match Credentials::from_env() {
        Ok(c) => c,
        Err(e) => {
            error!(error = %e, "[CONFIG] Credentials invalid");
            std::process::exit(1);
        }
    };
    info!(
        authority = %credentials.authority_hex(),
        cex_api_key = %sanitize(&credentials.cex_api_key),
        "[CONFIG] Credentials loaded"
    );

    let strategy = &config.strategy;
    let venue_a = DexGatewayAdapter::new(DexGatewayConfig {
        base_url: config.venues.dex_gateway_url.clone(),
        market_index: config.venues.dex_market_index,
        authority: credentials.authority_hex(),
        request_timeout: strategy.venue_timeout(),
    });
    let venue_b = CexAdapter::new(CexConfig {
        rest_base_url: config.venues.cex_rest_url.clone(),
        api_key: credentials.cex_api_key.clone(),
        api_secret: credentials.cex_api_secret.clone(),
        request_timeout: strategy.venue_timeout(),
    });

    let executor = PairExecutor::new(venue_a, venue_b, strategy.symbol.clone(), strategy.venue_timeout());
    let mut controller = PositionController::new(executor, strategy.controller_settings());

    let (shutdown_tx, shutdown_rx) = broadcast::channel::<()>(1);
    let shutdown_signal = shutdown_tx.clone();
    tokio::spawn(async move {
        match signal::ctrl_c().await {
            Ok(()) => {
                info!("[SHUTDOWN] Graceful shutdown initiated");
                let _ = shutdown_signal.send(());
            }
            Err(err) => {
                error!(error = %err, "Failed to listen for Ctrl+C signal");
            }
        }
    });

    let stats = poll_loop(&mut controller, strategy.poll_interval(), shutdown_rx).await;

    info!(
        cycles = stats.cycles_run,
        failed = stats.cycles_failed,
        actions = stats.actions_executed,
        final_count = controller.ledger().current(),
        "[SHUTDOWN] Clean exit"
    );
    drop(shutdown_tx);
    Ok(())
}
