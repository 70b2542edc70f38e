//! Unified error type for fare-trend.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("HTTP request failed: {0}")]
    Http(String),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Auth error: {0}")]
    Auth(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Amadeus API error (status={status}): {message}")]
    AmadeusApi { status: u16, message: String },

    #[error("Rate limited by provider: {0}")]
    RateLimited(String),

    #[error("No offers found for {route} on {date}")]
    NoOffers { route: String, date: String },

    #[error("Invalid route: {0}")]
    InvalidRoute(String),
}
