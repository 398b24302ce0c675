//! Centralized exchange adapter (venue B)
//!
//! Speaks an FTX-compatible REST API:
//! - `GET /api/futures/{symbol}/stats` -> `nextFundingRate` (fraction per interval)
//! - `GET /api/futures/{symbol}` -> `mark`
//! - `POST /api/orders` -> market order sized in base units
//!
//! Private requests are signed with HMAC-SHA256 over `ts + METHOD + path + body`.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use hmac::{Hmac, Mac};
use reqwest::StatusCode;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use sha2::Sha256;
use tracing::{debug, info};

use crate::adapters::errors::{ExchangeError, ExchangeResult};
use crate::adapters::traits::VenueAdapter;
use crate::adapters::types::{
    create_http_client, OrderRequest, OrderResponse, RateUnit, RawQuote, RawValue, VenueId,
};
use crate::core::logging::sanitize;

type HmacSha256 = Hmac<Sha256>;

// =============================================================================
// Configuration
// =============================================================================

/// Connection settings for the centralized exchange
#[derive(Clone)]
pub struct CexConfig {
    /// REST origin without the `/api` prefix (e.g. "https://ftx.com")
    pub rest_base_url: String,
    pub api_key: String,
    pub api_secret: String,
    pub request_timeout: Duration,
}

impl fmt::Debug for CexConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CexConfig")
            .field("rest_base_url", &self.rest_base_url)
            .field("api_key", &format_args!("{}", sanitize(&self.api_key)))
            .field("api_secret", &"REDACTED")
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

// =============================================================================
// Wire Types
// =============================================================================

/// Standard response envelope: `{"success": bool, "result": T, "error": "..."}`
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    success: bool,
    result: Option<T>,
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FutureStats {
    next_funding_rate: Option<Decimal>,
}

#[derive(Debug, Deserialize)]
struct FutureInfo {
    mark: Option<Decimal>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlacedOrder {
    id: serde_json::Value,
    client_id: Option<String>,
}

// =============================================================================
// Signing
// =============================================================================

/// Sign a request payload, returning lowercase hex
pub fn sign_request(secret: &str, ts_ms: i64, method: &str, path: &str, body: &str) -> String {
    // HMAC accepts keys of any length, new_from_slice cannot fail here
    let mut mac = match HmacSha256::new_from_slice(secret.as_bytes()) {
        Ok(mac) => mac,
        Err(_) => return String::new(),
    };
    mac.update(ts_ms.to_string().as_bytes());
    mac.update(method.as_bytes());
    mac.update(path.as_bytes());
    mac.update(body.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

// =============================================================================
// CexAdapter
// =============================================================================

/// Venue B adapter over the exchange's REST API
pub struct CexAdapter {
    config: CexConfig,
    http_client: reqwest::Client,
}

impl CexAdapter {
    pub fn new(config: CexConfig) -> Self {
        let http_client = create_http_client("cex", config.request_timeout);
        info!(
            venue = "cex",
            base_url = %config.rest_base_url,
            api_key = %sanitize(&config.api_key),
            "CEX adapter created"
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
        format!("{}{}", self.config.rest_base_url.trim_end_matches('/'), path)
    }

    async fn get_public<T: DeserializeOwned>(&self, path: &str) -> ExchangeResult<T> {
        debug!(venue = "cex", path = %path, "GET");
        let response = self
            .http_client
            .get(self.url(path))
            .send()
            .await
            .map_err(|e| ExchangeError::from_reqwest(e, self.timeout_ms()))?;

        let envelope = self.read_envelope::<T>(response).await?;
        unwrap_envelope(envelope).map_err(ExchangeError::InvalidResponse)
    }

    async fn read_envelope<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> ExchangeResult<Envelope<T>> {
        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            let text = response.text().await.unwrap_or_default();
            return Err(ExchangeError::AuthenticationFailed(format!("{}: {}", status, text)));
        }
        if status.is_server_error() {
            return Err(ExchangeError::Network(format!("HTTP {}", status)));
        }

        let text = response
            .text()
            .await
            .map_err(|e| ExchangeError::from_reqwest(e, self.timeout_ms()))?;
        serde_json::from_str::<Envelope<T>>(&text).map_err(|e| {
            ExchangeError::InvalidResponse(format!("HTTP {} body '{}': {}", status, text, e))
        })
    }
}

fn unwrap_envelope<T>(envelope: Envelope<T>) -> Result<T, String> {
    if !envelope.success {
        return Err(envelope.error.unwrap_or_else(|| "success=false".to_string()));
    }
    envelope
        .result
        .ok_or_else(|| "missing 'result' field".to_string())
}

#[async_trait]
impl VenueAdapter for CexAdapter {
    async fn fetch_funding_and_mark(&self, symbol: &str) -> ExchangeResult<RawQuote> {
        let stats_path = format!("/api/futures/{}/stats", symbol);
        let info_path = format!("/api/futures/{}", symbol);

        let (stats, info) = tokio::try_join!(
            self.get_public::<FutureStats>(&stats_path),
            self.get_public::<FutureInfo>(&info_path),
        )?;

        Ok(RawQuote {
            venue: VenueId::B,
            symbol: symbol.to_string(),
            funding_rate: stats.next_funding_rate.map(RawValue::Decimal),
            rate_unit: RateUnit::Fraction,
            mark_price: info.mark.map(RawValue::Decimal),
        })
    }

    async fn submit_market_order(&self, order: &OrderRequest) -> ExchangeResult<OrderResponse> {
        let size = order.quantity.to_f64().ok_or_else(|| {
            ExchangeError::OrderRejected(format!("size {} not representable", order.quantity))
        })?;
        let body = serde_json::json!({
            "market": order.symbol,
            "side": order.side.as_buy_sell(),
            "price": null,
            "type": "market",
            "size": size,
            "clientId": order.client_order_id,
        })
        .to_string();

        let path = "/api/orders";
        let ts_ms = chrono::Utc::now().timestamp_millis();
        let signature = sign_request(&self.config.api_secret, ts_ms, "POST", path, &body);

        let response = self
            .http_client
            .post(self.url(path))
            .header("FTX-KEY", &self.config.api_key)
            .header("FTX-SIGN", signature)
            .header("FTX-TS", ts_ms.to_string())
            .header("Content-Type", "application/json")
            .body(body)
            .send()
            .await
            .map_err(|e| ExchangeError::from_reqwest(e, self.timeout_ms()))?;

        let envelope = self.read_envelope::<PlacedOrder>(response).await?;
        let placed = unwrap_envelope(envelope).map_err(ExchangeError::OrderRejected)?;

        let order_id = match placed.id {
            serde_json::Value::String(s) => s,
            other => other.to_string(),
        };
        info!(
            venue = "cex",
            symbol = %order.symbol,
            side = %order.side,
            size = %order.quantity,
            order_id = %order_id,
            "Market order accepted"
        );

        Ok(OrderResponse {
            order_id,
            client_order_id: placed
                .client_id
                .unwrap_or_else(|| order.client_order_id.clone()),
        })
    }

    fn venue_id(&self) -> VenueId {
        VenueId::B
    }

    fn venue_name(&self) -> &'static str {
        "cex"
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::types::OrderSide;
    use rust_decimal_macros::dec;

    fn test_config(url: String) -> CexConfig {
        CexConfig {
            rest_base_url: url,
            api_key: "test-api-key-123456".to_string(),
            api_secret: "test-secret".to_string(),
            request_timeout: Duration::from_secs(2),
        }
    }

    #[test]
    fn test_sign_request_is_deterministic_hex() {
        let a = sign_request("secret", 1_700_000_000_000, "POST", "/api/orders", "{}");
        let b = sign_request("secret", 1_700_000_000_000, "POST", "/api/orders", "{}");
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_sign_request_covers_body() {
        let a = sign_request("secret", 1, "POST", "/api/orders", "{\"size\":5}");
        let b = sign_request("secret", 1, "POST", "/api/orders", "{\"size\":6}");
        assert_ne!(a, b);
    }

    #[test]
    fn test_config_debug_redacts_secrets() {
        let config = test_config("http://localhost".to_string());
        let debug = format!("{:?}", config);
        assert!(!debug.contains("test-secret"));
        assert!(!debug.contains("test-api-key-123456"));
        assert!(debug.contains("REDACTED"));
    }

    #[tokio::test]
    async fn test_fetch_funding_and_mark() {
        let mut server = mockito::Server::new_async().await;
        let _stats = server
            .mock("GET", "/api/futures/SOL-PERP/stats")
            .with_status(200)
            .with_body(r#"{"success":true,"result":{"nextFundingRate":0.0001,"nextFundingTime":"2022-01-01T00:00:00+00:00"}}"#)
            .create_async()
            .await;
        let _info = server
            .mock("GET", "/api/futures/SOL-PERP")
            .with_status(200)
            .with_body(r#"{"success":true,"result":{"name":"SOL-PERP","mark":101.25}}"#)
            .create_async()
            .await;

        let adapter = CexAdapter::new(test_config(server.url()));
        let quote = adapter.fetch_funding_and_mark("SOL-PERP").await.unwrap();

        assert_eq!(quote.venue, VenueId::B);
        assert_eq!(quote.rate_unit, RateUnit::Fraction);
        assert_eq!(quote.funding_rate, Some(RawValue::Decimal(dec!(0.0001))));
        assert_eq!(quote.mark_price, Some(RawValue::Decimal(dec!(101.25))));
    }

    #[tokio::test]
    async fn test_fetch_missing_funding_field_is_none() {
        let mut server = mockito::Server::new_async().await;
        let _stats = server
            .mock("GET", "/api/futures/SOL-PERP/stats")
            .with_body(r#"{"success":true,"result":{}}"#)
            .create_async()
            .await;
        let _info = server
            .mock("GET", "/api/futures/SOL-PERP")
            .with_body(r#"{"success":true,"result":{"mark":100}}"#)
            .create_async()
            .await;

        let adapter = CexAdapter::new(test_config(server.url()));
        let quote = adapter.fetch_funding_and_mark("SOL-PERP").await.unwrap();
        assert!(quote.funding_rate.is_none());
        assert!(quote.mark_price.is_some());
    }

    #[tokio::test]
    async fn test_fetch_unsuccessful_envelope_is_invalid_response() {
        let mut server = mockito::Server::new_async().await;
        let _stats = server
            .mock("GET", "/api/futures/SOL-PERP/stats")
            .with_body(r#"{"success":false,"error":"No such future"}"#)
            .create_async()
            .await;
        let _info = server
            .mock("GET", "/api/futures/SOL-PERP")
            .with_body(r#"{"success":true,"result":{"mark":100}}"#)
            .create_async()
            .await;

        let adapter = CexAdapter::new(test_config(server.url()));
        let err = adapter.fetch_funding_and_mark("SOL-PERP").await.unwrap_err();
        assert!(matches!(err, ExchangeError::InvalidResponse(ref m) if m.contains("No such future")));
    }

    #[tokio::test]
    async fn test_submit_market_order_signed() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/orders")
            .match_header("FTX-KEY", "test-api-key-123456")
            .match_header("FTX-SIGN", mockito::Matcher::Regex("^[0-9a-f]{64}$".to_string()))
            .match_header("FTX-TS", mockito::Matcher::Regex("^[0-9]+$".to_string()))
            .match_body(mockito::Matcher::PartialJson(serde_json::json!({
                "market": "SOL-PERP",
                "side": "buy",
                "type": "market",
                "size": 5.0
            })))
            .with_body(r#"{"success":true,"result":{"id":9001,"clientId":null}}"#)
            .create_async()
            .await;

        let adapter = CexAdapter::new(test_config(server.url()));
        let order = OrderRequest::market("SOL-PERP", OrderSide::Long, dec!(5), dec!(500));
        let response = adapter.submit_market_order(&order).await.unwrap();

        mock.assert_async().await;
        assert_eq!(response.order_id, "9001");
        assert_eq!(response.client_order_id, order.client_order_id);
    }

    #[tokio::test]
    async fn test_submit_rejected_order() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/api/orders")
            .with_status(400)
            .with_body(r#"{"success":false,"error":"Not enough balances"}"#)
            .create_async()
            .await;

        let adapter = CexAdapter::new(test_config(server.url()));
        let order = OrderRequest::market("SOL-PERP", OrderSide::Short, dec!(5), dec!(500));
        let err = adapter.submit_market_order(&order).await.unwrap_err();
        assert!(matches!(err, ExchangeError::OrderRejected(ref m) if m.contains("Not enough balances")));
    }

    #[tokio::test]
    async fn test_unauthorized_maps_to_authentication_failed() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/api/orders")
            .with_status(401)
            .with_body(r#"{"success":false,"error":"Not logged in"}"#)
            .create_async()
            .await;

        let adapter = CexAdapter::new(test_config(server.url()));
        let order = OrderRequest::market("SOL-PERP", OrderSide::Short, dec!(5), dec!(500));
        let err = adapter.submit_market_order(&order).await.unwrap_err();
        assert!(matches!(err, ExchangeError::AuthenticationFailed(_)));
    }

    #[tokio::test]
    async fn test_server_error_is_network() {
        let mut server = mockito::Server::new_async().await;
        let _stats = server
            .mock("GET", "/api/futures/SOL-PERP/stats")
            .with_status(502)
            .create_async()
            .await;
        let _info = server
            .mock("GET", "/api/futures/SOL-PERP")
            .with_status(502)
            .create_async()
            .await;

        let adapter = CexAdapter::new(test_config(server.url()));
        let err = adapter.fetch_funding_and_mark("SOL-PERP").await.unwrap_err();
        assert!(err.is_transient());
    }
}
