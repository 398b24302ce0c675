//! Venue adapters
//!
//! The core reaches both venues through the single [`VenueAdapter`] trait:
//! - venue A: [`DexGatewayAdapter`], on-chain perpetuals via a local signing gateway
//! - venue B: [`CexAdapter`], centralized exchange REST API

pub mod cex;
pub mod dex_gateway;
pub mod errors;
pub mod traits;
pub mod types;

pub use cex::{CexAdapter, CexConfig};
pub use dex_gateway::{DexGatewayAdapter, DexGatewayConfig};
pub use errors::{ExchangeError, ExchangeResult};
pub use traits::VenueAdapter;
pub use types::{
    create_http_client, OrderRequest, OrderResponse, OrderSide, RateUnit, RawQuote, RawValue, VenueId,
};
