//! Price-trend sampler.
//!
//! Walks a fixed ladder of booking lead times, asks the quote source for
//! the cheapest fare at each one, and keeps whatever succeeds. Calls are
//! strictly sequential with a fixed pause between them; a failed offset
//! is recorded and skipped, never retried.

use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use common::config::AppConfig;
use common::{OffsetError, PricePoint, QuoteRequest, QuoteSource, RoutePair, SampleResult};
use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::clock::Clock;
use crate::mock::generate_curve;

/// Outcome of probing one lead-time offset.
type OffsetAttempt = Result<PricePoint, OffsetError>;

/// Samples fares for a route across booking lead times.
pub struct TrendSampler {
    source: Option<Arc<dyn QuoteSource>>,
    clock: Arc<dyn Clock>,
    offsets_days: Vec<u32>,
    pacing: Duration,
    adults: u32,
    max_results: u32,
    base_price: f64,
}

impl TrendSampler {
    /// `source` is `None` when no provider credentials are configured.
    pub fn new(
        source: Option<Arc<dyn QuoteSource>>,
        clock: Arc<dyn Clock>,
        config: &AppConfig,
    ) -> Self {
        Self {
            source,
            clock,
            offsets_days: config.sampler.offsets_days.clone(),
            pacing: Duration::from_millis(config.sampler.pacing_ms),
            adults: config.sampler.adults,
            max_results: config.sampler.max_results,
            base_price: config.mock.base_price,
        }
    }

    /// Sample the trend for `route`.
    ///
    /// Always returns a non-empty point list. Provider failures are folded
    /// into `partial_errors` or trigger the synthetic fallback.
    pub async fn sample(&self, route: &RoutePair) -> SampleResult {
        let today = self.clock.now().date_naive();

        let Some(source) = self.source.as_deref() else {
            info!("No provider credentials, returning synthetic data for {}", route);
            return SampleResult::synthetic(generate_curve(self.base_price, today));
        };

        let attempts = self.probe_offsets(source, route, today).await;

        let mut points = Vec::with_capacity(attempts.len());
        let mut errors = Vec::new();
        for attempt in attempts {
            match attempt {
                Ok(point) => points.push(point),
                Err(err) => errors.push(err),
            }
        }

        if points.is_empty() {
            warn!(
                "All {} offsets failed for {}, falling back to synthetic data",
                errors.len(),
                route
            );
            return SampleResult::fallback(generate_curve(self.base_price, today), errors);
        }

        info!(
            "Sampled {} live prices for {} ({} offsets failed)",
            points.len(),
            route,
            errors.len()
        );
        SampleResult::live(points, errors)
    }

    async fn probe_offsets(
        &self,
        source: &dyn QuoteSource,
        route: &RoutePair,
        today: NaiveDate,
    ) -> Vec<OffsetAttempt> {
        let mut attempts = Vec::with_capacity(self.offsets_days.len());

        for (i, &days) in self.offsets_days.iter().enumerate() {
            if i > 0 && !self.pacing.is_zero() {
                sleep(self.pacing).await;
            }

            let request = QuoteRequest {
                origin: route.origin.clone(),
                destination: route.destination.clone(),
                departure_date: today + chrono::Duration::days(i64::from(days)),
                adults: self.adults,
                max_results: self.max_results,
            };

            attempts.push(self.probe(source, request, days).await);
        }

        attempts
    }

    async fn probe(&self, source: &dyn QuoteSource, request: QuoteRequest, days: u32) -> OffsetAttempt {
        match source.lowest_price(&request).await {
            Ok(price) if price.is_finite() && price > 0.0 => {
                debug!("{} T+{}d: {:.2}", request.route_label(), days, price);
                Ok(PricePoint {
                    lead_days: days,
                    price,
                    flight_date: request.departure_date,
                })
            }
            Ok(price) => {
                warn!("Discarding non-positive quote for T+{}: {}", days, price);
                Err(OffsetError {
                    days,
                    error: format!("provider returned non-positive price {price}"),
                })
            }
            Err(e) => {
                warn!("Error fetching for T+{}: {}", days, e);
                Err(OffsetError {
                    days,
                    error: e.to_string(),
                })
            }
        }
    }
}
