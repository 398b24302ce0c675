//! One-shot funding rate check
//!
//! Fetches both venues once, prints the normalized rates, the differential
//! and what the controller would do from an empty ledger. Never places orders.
//!
//! Usage:
//! ```bash
//! cargo run --bin check_rates
//! ```
//!
//! Reads the same `config.yaml` / `CONFIG_PATH` and credentials as the
//! controller.

use anyhow::Context;
use tracing::info;

use funding_arb::adapters::{CexAdapter, CexConfig, DexGatewayAdapter, DexGatewayConfig};
use funding_arb::config::{self, constants::config_path, Credentials};
use funding_arb::core::{fetch_quotes, PairExecutor, RateNormalizer, SpreadEvaluator};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt().with_env_filter("funding_arb=warn").init();

    let path = config_path();
    let config = config::load_config(&path)
        .with_context(|| format!("loading {}", path.display()))?;
    let credentials = Credentials::from_env().context("loading credentials")?;
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

    let (quote_a, quote_b) = fetch_quotes(&executor, &RateNormalizer::new())
        .await
        .context("fetching funding rates")?;

    let settings = strategy.controller_settings();
    let decision = SpreadEvaluator::new(settings.thresholds).classify(&quote_a, &quote_b, 0);

    println!("symbol        : {}", strategy.symbol);
    println!("venue A rate  : {}%  (mark {})", quote_a.percent_rate, quote_a.mark_price);
    println!("venue B rate  : {}%  (mark {})", quote_b.percent_rate, quote_b.mark_price);
    println!("differential  : {}%", decision.differential);
    println!("threshold     : ±{}%", settings.thresholds.open_threshold);
    println!("open check    : {}", decision.open.label());
    println!("close check   : {}", decision.close.label());
    println!(
        "lot notional  : {} (lot {} x mark A)",
        settings.lot_size * quote_a.mark_price,
        settings.lot_size
    );

    info!(differential = %decision.differential, "Rate check complete");
    Ok(())
}
