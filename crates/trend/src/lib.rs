//! Price-trend engine crate.
//!
//! Samples fares across booking lead times, caches live results per
//! route, and turns a trend into a booking recommendation.

pub mod advice;
pub mod analyzer;
pub mod cache;
pub mod clock;
pub mod mock;
pub mod sampler;

pub use advice::{advise, BookingAdvice, Recommendation};
pub use analyzer::{RouteAnalysis, TrendAnalyzer};
pub use cache::{CacheEntry, TrendCache};
pub use clock::{Clock, ManualClock, SystemClock};
pub use sampler::TrendSampler;
