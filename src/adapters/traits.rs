//! Venue adapter trait definition
//!
//! The VenueAdapter trait is the only surface the controller sees of a venue.
//! Wire formats, authentication and signing live behind it.

use async_trait::async_trait;

use crate::adapters::errors::ExchangeResult;
use crate::adapters::types::{OrderRequest, OrderResponse, RawQuote, VenueId};

/// Common trait for both venue adapters
///
/// # Example Implementation
///
/// ```ignore
/// use async_trait::async_trait;
///
/// struct PaperVenue;
///
/// #[async_trait]
/// impl VenueAdapter for PaperVenue {
///     async fn fetch_funding_and_mark(&self, symbol: &str) -> ExchangeResult<RawQuote> {
///         // read the venue's funding endpoint
///     }
///     // ... other methods
/// }
/// ```
#[async_trait]
pub trait VenueAdapter: Send + Sync {
    /// Fetch the current funding rate and mark price for a symbol
    ///
    /// Values are returned in the venue's native representation; see
    /// [`crate::core::normalizer::RateNormalizer`] for unit conversion.
    ///
    /// # Errors
    /// * `Network` / `NetworkTimeout` - venue unreachable
    /// * `AuthenticationFailed` - credentials refused
    /// * `InvalidResponse` - body could not be parsed
    async fn fetch_funding_and_mark(&self, symbol: &str) -> ExchangeResult<RawQuote>;

    /// Submit a market order
    ///
    /// # Errors
    /// * `Network` / `NetworkTimeout` - venue unreachable
    /// * `OrderRejected` - venue refused the order
    async fn submit_market_order(&self, order: &OrderRequest) -> ExchangeResult<OrderResponse>;

    /// Position of this adapter in the venue pair
    fn venue_id(&self) -> VenueId;

    /// Human-readable venue name for logs (e.g. "dex_gateway", "cex")
    fn venue_name(&self) -> &'static str;
}
