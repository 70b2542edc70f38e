//! Amadeus Self-Service API client library.
//!
//! Provides OAuth2-authenticated access to the Flight Offers Search
//! endpoint, throttled to the provider's request quota.

pub mod auth;
pub mod rate_limit;
pub mod rest;

pub use auth::AmadeusAuth;
pub use rate_limit::RateLimiter;
pub use rest::AmadeusClient;
