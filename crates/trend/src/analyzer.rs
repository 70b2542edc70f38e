//! Route analysis: cache lookup, sampling on miss, recommendation.

use common::{Provenance, RoutePair, SampleResult};
use tracing::{debug, info};

use crate::advice::{advise, BookingAdvice};
use crate::cache::TrendCache;
use crate::sampler::TrendSampler;

/// Everything the API returns for one route.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteAnalysis {
    pub result: SampleResult,
    /// Served from the cache without sampling.
    pub cached: bool,
    pub advice: Option<BookingAdvice>,
}

impl RouteAnalysis {
    fn new(result: SampleResult, cached: bool) -> Self {
        let advice = advise(&result.points);
        Self {
            result,
            cached,
            advice,
        }
    }
}

/// Owns the sampler and the process-wide route cache.
pub struct TrendAnalyzer {
    sampler: TrendSampler,
    cache: TrendCache,
}

impl TrendAnalyzer {
    pub fn new(sampler: TrendSampler, cache: TrendCache) -> Self {
        Self { sampler, cache }
    }

    /// Return the cached trend for `route`, or sample a fresh one.
    ///
    /// Only live results are cached; synthetic and fallback curves are
    /// regenerated on every request.
    pub async fn analyze(&self, route: &RoutePair) -> RouteAnalysis {
        if let Some(result) = self.cache.get(route) {
            info!("Returning cached data for {}", route);
            return RouteAnalysis::new(result, true);
        }

        let result = self.sampler.sample(route).await;
        if result.provenance == Provenance::Live {
            self.cache.put(route.clone(), result.clone());
            debug!("Cached {} ({} routes cached)", route, self.cache.len());
        } else {
            debug!("Not caching {} result for {}", result.provenance, route);
        }

        RouteAnalysis::new(result, false)
    }
}
