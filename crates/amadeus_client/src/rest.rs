//! REST client for the Amadeus Flight Offers Search API.
//!
//! Every call is rate-limited and carries an OAuth2 bearer token.
//! Nothing is retried: a failed lookup is reported once and dropped.

use std::time::Duration;

use async_trait::async_trait;
use common::config::AmadeusConfig;
use common::{Error, QuoteRequest, QuoteSource};
use serde::Deserialize;
use tracing::debug;

use crate::auth::AmadeusAuth;
use crate::rate_limit::RateLimiter;

const FLIGHT_OFFERS_PATH: &str = "/v2/shopping/flight-offers";

/// Async REST client for the Amadeus API.
#[derive(Debug, Clone)]
pub struct AmadeusClient {
    client: reqwest::Client,
    auth: AmadeusAuth,
    base_url: String,
    limiter: RateLimiter,
}

// ── Amadeus response types ────────────────────────────────────────────

/// Response from `GET /v2/shopping/flight-offers`.
#[derive(Debug, Deserialize)]
pub struct FlightOffersResponse {
    #[serde(default)]
    pub data: Vec<FlightOffer>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FlightOffer {
    pub price: OfferPrice,
}

/// Amounts are decimal strings, e.g. `"289.99"`.
#[derive(Debug, Clone, Deserialize)]
pub struct OfferPrice {
    pub total: String,
}

/// Error envelope returned with non-2xx statuses.
#[derive(Debug, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub errors: Vec<ApiErrorItem>,
}

#[derive(Debug, Deserialize)]
pub struct ApiErrorItem {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub detail: Option<String>,
}

// ── Implementation ────────────────────────────────────────────────────

impl AmadeusClient {
    pub fn new(
        auth: AmadeusAuth,
        base_url: impl Into<String>,
        timeout: Duration,
        requests_per_sec: u32,
    ) -> Self {
        let client = reqwest::Client::builder()
            .user_agent("fare-trend/0.1")
            .pool_max_idle_per_host(4)
            .tcp_keepalive(Duration::from_secs(30))
            .timeout(timeout)
            .build()
            .expect("failed to build reqwest client");

        Self {
            client,
            auth,
            base_url: base_url.into(),
            limiter: RateLimiter::with_limit(requests_per_sec),
        }
    }

    /// Build a client from config, or `None` when credentials are absent.
    pub fn from_config(cfg: &AmadeusConfig) -> Option<Self> {
        if !cfg.has_credentials() {
            return None;
        }

        let auth = AmadeusAuth::new(&cfg.client_id, &cfg.client_secret);
        Some(Self::new(
            auth,
            cfg.resolved_base_url(),
            Duration::from_secs(cfg.timeout_secs),
            cfg.requests_per_sec,
        ))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// URL helper.
    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Fetch an access token to verify the configured credentials.
    pub async fn check_auth(&self) -> Result<(), Error> {
        self.auth
            .bearer_token(&self.client, &self.base_url, &self.limiter)
            .await?;
        Ok(())
    }

    /// Search one-way offers for a single departure date.
    pub async fn flight_offers(&self, request: &QuoteRequest) -> Result<Vec<FlightOffer>, Error> {
        let token = self
            .auth
            .bearer_token(&self.client, &self.base_url, &self.limiter)
            .await?;
        self.limiter.wait().await;

        let date = request.departure_date.format("%Y-%m-%d").to_string();
        let query = [
            ("originLocationCode", request.origin.clone()),
            ("destinationLocationCode", request.destination.clone()),
            ("departureDate", date.clone()),
            ("adults", request.adults.to_string()),
            ("max", request.max_results.to_string()),
        ];

        debug!(
            "Fetching flight offers: {} {} on {}",
            FLIGHT_OFFERS_PATH,
            request.route_label(),
            date
        );

        let resp = self
            .client
            .get(self.url(FLIGHT_OFFERS_PATH))
            .bearer_auth(&token)
            .query(&query)
            .send()
            .await
            .map_err(|e| Error::Http(e.to_string()))?;

        let status = resp.status().as_u16();
        if status != 200 {
            let body = resp.text().await.unwrap_or_default();
            let message = describe_error_body(&body);
            return Err(match status {
                401 => {
                    self.auth.invalidate().await;
                    Error::Auth(message)
                }
                429 => Error::RateLimited(message),
                _ => Error::AmadeusApi { status, message },
            });
        }

        let text = resp.text().await.map_err(|e| Error::Http(e.to_string()))?;
        let body: FlightOffersResponse = serde_json::from_str(&text)?;

        debug!(
            "Got {} offers for {} on {}",
            body.data.len(),
            request.route_label(),
            date
        );

        Ok(body.data)
    }
}

#[async_trait]
impl QuoteSource for AmadeusClient {
    async fn lowest_price(&self, request: &QuoteRequest) -> Result<f64, Error> {
        let offers = self.flight_offers(request).await?;
        lowest_total(&offers).ok_or_else(|| Error::NoOffers {
            route: request.route_label(),
            date: request.departure_date.format("%Y-%m-%d").to_string(),
        })
    }
}

/// Lowest positive `price.total` across offers.
fn lowest_total(offers: &[FlightOffer]) -> Option<f64> {
    offers
        .iter()
        .filter_map(|offer| offer.price.total.trim().parse::<f64>().ok())
        .filter(|total| total.is_finite() && *total > 0.0)
        .fold(None, |min: Option<f64>, total| match min {
            Some(current) if current <= total => Some(current),
            _ => Some(total),
        })
}

/// Prefer the provider's own error description over the raw body.
fn describe_error_body(body: &str) -> String {
    let first = serde_json::from_str::<ApiErrorBody>(body)
        .ok()
        .and_then(|parsed| parsed.errors.into_iter().next());

    match first {
        Some(ApiErrorItem {
            title: Some(title),
            detail: Some(detail),
            ..
        }) => format!("{title}: {detail}"),
        Some(ApiErrorItem {
            detail: Some(detail),
            ..
        }) => detail,
        Some(ApiErrorItem {
            title: Some(title),
            ..
        }) => title,
        _ => body.chars().take(500).collect(),
    }
}
