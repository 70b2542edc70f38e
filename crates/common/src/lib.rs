//! Shared types, config, and error definitions for fare-trend.

pub mod config;
pub mod error;
pub mod quote;
pub mod types;

pub use config::AppConfig;
pub use error::Error;
pub use quote::QuoteSource;
pub use types::*;
