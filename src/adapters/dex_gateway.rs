//! On-chain perpetual protocol adapter (venue A)
//!
//! Account subscription and transaction signing are owned by a local gateway
//! process; this adapter talks to it over HTTP/JSON. The gateway reports
//! protocol-native fixed-point integers:
//!
//! | Field                  | Precision | Unit                      |
//! |------------------------|-----------|---------------------------|
//! | `estimatedFundingRate` | 10^10     | percent per funding period |
//! | `markPrice`            | 10^10     | quote currency            |
//! | `quoteAssetAmount`     | 10^6      | quote currency (orders)   |

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::{debug, info};

use crate::adapters::errors::{ExchangeError, ExchangeResult};
use crate::adapters::traits::VenueAdapter;
use crate::adapters::types::{
    create_http_client, OrderRequest, OrderResponse, RateUnit, RawQuote, RawValue, VenueId,
};

/// Decimal places of the protocol's mark price and funding rate integers
pub const MARK_PRICE_PRECISION_EXP: u32 = 10;
/// Decimal places of the protocol's quote amounts
pub const QUOTE_PRECISION_EXP: u32 = 6;

// =============================================================================
// Configuration
// =============================================================================

/// Connection settings for the signing gateway
#[derive(Debug, Clone)]
pub struct DexGatewayConfig {
    /// Gateway origin (e.g. "http://127.0.0.1:8080")
    pub base_url: String,
    /// Perpetual market index of the traded symbol
    pub market_index: u16,
    /// Hex-encoded wallet public key the gateway signs for
    pub authority: String,
    pub request_timeout: Duration,
}

// =============================================================================
// Wire Types
// =============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FundingResponse {
    estimated_funding_rate: Option<String>,
    mark_price: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OrderAck {
    tx_signature: Option<String>,
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GatewayError {
    error: Option<String>,
}

fn parse_fixed_point(field: &str, value: &str) -> ExchangeResult<RawValue> {
    let mantissa = value.trim().parse::<i128>().map_err(|e| {
        ExchangeError::InvalidResponse(format!("{} '{}' is not an integer: {}", field, value, e))
    })?;
    Ok(RawValue::FixedPoint {
        mantissa,
        scale: MARK_PRICE_PRECISION_EXP,
    })
}

/// Convert a quote notional to the protocol's integer quote amount (truncating)
pub fn to_quote_amount(notional: Decimal) -> ExchangeResult<i128> {
    let scaled = notional
        .checked_mul(Decimal::from(10_i64.pow(QUOTE_PRECISION_EXP)))
        .ok_or_else(|| ExchangeError::OrderRejected(format!("notional {} overflows", notional)))?;
    scaled
        .trunc()
        .to_i128()
        .ok_or_else(|| ExchangeError::OrderRejected(format!("notional {} out of range", notional)))
}

// =============================================================================
// DexGatewayAdapter
// =============================================================================

/// Venue A adapter over the signing gateway
pub struct DexGatewayAdapter {
    config: DexGatewayConfig,
    http_client: reqwest::Client,
}

impl DexGatewayAdapter {
    pub fn new(config: DexGatewayConfig) -> Self {
        let http_client = create_http_client("dex_gateway", config.request_timeout);
        info!(
            venue = "dex_gateway",
            base_url = %config.base_url,
            market_index = config.market_index,
            authority = %config.authority,
            "DEX gateway adapter created"
        );
        Self {
            config,
            http_client,
        }
    }

    fn timeout_ms(&self) -> u64 {
        self.config.request_timeout.as_millis() as u64
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }

    async fn error_from_status(response: reqwest::Response, reject: bool) -> ExchangeError {
        let status = response.status();
        let text = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<GatewayError>(&text)
            .ok()
            .and_then(|e| e.error)
            .unwrap_or(text);

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            ExchangeError::AuthenticationFailed(message)
        } else if status.is_server_error() {
            ExchangeError::Network(format!("HTTP {}: {}", status, message))
        } else if reject {
            ExchangeError::OrderRejected(message)
        } else {
            ExchangeError::InvalidResponse(format!("HTTP {}: {}", status, message))
        }
    }
}

#[async_trait]
impl VenueAdapter for DexGatewayAdapter {
    async fn fetch_funding_and_mark(&self, symbol: &str) -> ExchangeResult<RawQuote> {
        let path = format!("/v2/perp/{}/funding", self.config.market_index);
        debug!(venue = "dex_gateway", path = %path, symbol = %symbol, "GET");

        let response = self
            .http_client
            .get(self.url(&path))
            .send()
            .await
            .map_err(|e| ExchangeError::from_reqwest(e, self.timeout_ms()))?;

        if !response.status().is_success() {
            return Err(Self::error_from_status(response, false).await);
        }

        let body: FundingResponse = response
            .json()
            .await
            .map_err(|e| ExchangeError::InvalidResponse(e.to_string()))?;

        let funding_rate = body
            .estimated_funding_rate
            .as_deref()
            .map(|v| parse_fixed_point("estimatedFundingRate", v))
            .transpose()?;
        let mark_price = body
            .mark_price
            .as_deref()
            .map(|v| parse_fixed_point("markPrice", v))
            .transpose()?;

        Ok(RawQuote {
            venue: VenueId::A,
            symbol: symbol.to_string(),
            funding_rate,
            rate_unit: RateUnit::Percent,
            mark_price,
        })
    }

    async fn submit_market_order(&self, order: &OrderRequest) -> ExchangeResult<OrderResponse> {
        let quote_amount = to_quote_amount(order.notional)?;
        if quote_amount <= 0 {
            return Err(ExchangeError::OrderRejected(format!(
                "quote amount must be positive (notional {})",
                order.notional
            )));
        }

        let body = serde_json::json!({
            "marketIndex": self.config.market_index,
            "direction": order.side,
            "orderType": "market",
            "quoteAssetAmount": quote_amount.to_string(),
            "authority": self.config.authority,
            "clientOrderId": order.client_order_id,
        });

        let response = self
            .http_client
            .post(self.url("/v2/orders"))
            .json(&body)
            .send()
            .await
            .map_err(|e| ExchangeError::from_reqwest(e, self.timeout_ms()))?;

        if !response.status().is_success() {
            return Err(Self::error_from_status(response, true).await);
        }

        let ack: OrderAck = response
            .json()
            .await
            .map_err(|e| ExchangeError::InvalidResponse(e.to_string()))?;

        match (ack.tx_signature, ack.error) {
            (Some(signature), None) => {
                info!(
                    venue = "dex_gateway",
                    side = %order.side,
                    quote_amount = %quote_amount,
                    tx = %signature,
                    "Market order submitted"
                );
                Ok(OrderResponse {
                    order_id: signature,
                    client_order_id: order.client_order_id.clone(),
                })
            }
            (_, Some(error)) => Err(ExchangeError::OrderRejected(error)),
            (None, None) => Err(ExchangeError::InvalidResponse(
                "order ack carries neither txSignature nor error".to_string(),
            )),
        }
    }

    fn venue_id(&self) -> VenueId {
        VenueId::A
    }

    fn venue_name(&self) -> &'static str {
        "dex_gateway"
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
