//! The seam between the trend sampler and a live price provider.

use async_trait::async_trait;

use crate::{Error, QuoteRequest};

/// Anything that can quote the lowest fare for one route on one date.
///
/// Implementations make a single attempt per call. A provider that finds
/// no offers must return an error rather than a zero price.
#[async_trait]
pub trait QuoteSource: Send + Sync {
    async fn lowest_price(&self, request: &QuoteRequest) -> Result<f64, Error>;
}
