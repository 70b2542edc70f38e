//! Application configuration types.

use std::fmt;
use std::net::SocketAddr;

use serde::{Deserialize, Serialize};

/// Booking lead times probed against the live provider, in days.
pub const DEFAULT_OFFSETS_DAYS: [u32; 12] = [1, 3, 7, 14, 21, 30, 45, 60, 90, 120, 150, 180];

const TEST_BASE_URL: &str = "https://test.api.amadeus.com";
const PRODUCTION_BASE_URL: &str = "https://api.amadeus.com";

/// Top-level application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Quote provider credentials and transport settings.
    #[serde(default)]
    pub amadeus: AmadeusConfig,

    /// HTTP listener settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Trend sampling parameters.
    #[serde(default)]
    pub sampler: SamplerConfig,

    /// Route result cache settings.
    #[serde(default)]
    pub cache: CacheConfig,

    /// Synthetic curve settings.
    #[serde(default)]
    pub mock: MockConfig,
}

/// Amadeus environment selector.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AmadeusHostname {
    Test,
    Production,
}

impl AmadeusHostname {
    pub fn base_url(&self) -> &'static str {
        match self {
            AmadeusHostname::Test => TEST_BASE_URL,
            AmadeusHostname::Production => PRODUCTION_BASE_URL,
        }
    }
}

impl fmt::Display for AmadeusHostname {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AmadeusHostname::Test => f.write_str("test"),
            AmadeusHostname::Production => f.write_str("production"),
        }
    }
}

/// Amadeus Self-Service API settings.
///
/// Empty credentials are a valid steady state (demo mode).
#[derive(Clone, Serialize, Deserialize)]
pub struct AmadeusConfig {
    #[serde(default)]
    pub client_id: String,

    #[serde(default)]
    pub client_secret: String,

    /// Which Amadeus environment to call.
    #[serde(default = "default_hostname")]
    pub hostname: AmadeusHostname,

    /// Explicit base URL; takes precedence over `hostname`.
    #[serde(default)]
    pub base_url: Option<String>,

    /// Per-request timeout.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Client-side throttle (the test environment allows 10 tps).
    #[serde(default = "default_requests_per_sec")]
    pub requests_per_sec: u32,
}

impl AmadeusConfig {
    /// Both credential values are present.
    pub fn has_credentials(&self) -> bool {
        !self.client_id.trim().is_empty() && !self.client_secret.trim().is_empty()
    }

    pub fn resolved_base_url(&self) -> String {
        match &self.base_url {
            Some(url) if !url.trim().is_empty() => url.trim().trim_end_matches('/').to_string(),
            _ => self.hostname.base_url().to_string(),
        }
    }
}

impl fmt::Debug for AmadeusConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AmadeusConfig")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("hostname", &self.hostname)
            .field("base_url", &self.base_url)
            .field("timeout_secs", &self.timeout_secs)
            .field("requests_per_sec", &self.requests_per_sec)
            .finish()
    }
}

/// HTTP listener settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind_addr")]
    pub bind_addr: SocketAddr,
}

/// Trend sampler parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SamplerConfig {
    /// Strictly ascending lead-time offsets in days.
    #[serde(default = "default_offsets")]
    pub offsets_days: Vec<u32>,

    /// Pause between successive provider calls.
    #[serde(default = "default_pacing_ms")]
    pub pacing_ms: u64,

    #[serde(default = "default_adults")]
    pub adults: u32,

    #[serde(default = "default_max_results")]
    pub max_results: u32,
}

/// Route cache settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,
}

/// Synthetic price curve settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MockConfig {
    #[serde(default = "default_base_price")]
    pub base_price: f64,
}

// ── Defaults ──────────────────────────────────────────────────────────

fn default_hostname() -> AmadeusHostname {
    AmadeusHostname::Test
}
fn default_timeout_secs() -> u64 {
    15
}
fn default_requests_per_sec() -> u32 {
    10
}

fn default_bind_addr() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 3000))
}

fn default_offsets() -> Vec<u32> {
    DEFAULT_OFFSETS_DAYS.to_vec()
}
fn default_pacing_ms() -> u64 {
    200
}
fn default_adults() -> u32 {
    1
}
fn default_max_results() -> u32 {
    1
}

fn default_ttl_secs() -> u64 {
    3600
}

fn default_base_price() -> f64 {
    500.0
}

impl Default for AmadeusConfig {
    fn default() -> Self {
        Self {
            client_id: String::new(),
            client_secret: String::new(),
            hostname: default_hostname(),
            base_url: None,
            timeout_secs: default_timeout_secs(),
            requests_per_sec: default_requests_per_sec(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
        }
    }
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            offsets_days: default_offsets(),
            pacing_ms: default_pacing_ms(),
            adults: default_adults(),
            max_results: default_max_results(),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_secs: default_ttl_secs(),
        }
    }
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            base_price: default_base_price(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            amadeus: AmadeusConfig::default(),
            server: ServerConfig::default(),
            sampler: SamplerConfig::default(),
            cache: CacheConfig::default(),
            mock: MockConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = AppConfig::default();
        assert_eq!(
            cfg.sampler.offsets_days,
            vec![1, 3, 7, 14, 21, 30, 45, 60, 90, 120, 150, 180]
        );
        assert_eq!(cfg.sampler.pacing_ms, 200);
        assert_eq!(cfg.sampler.adults, 1);
        assert_eq!(cfg.sampler.max_results, 1);
        assert_eq!(cfg.cache.ttl_secs, 3600);
        assert_eq!(cfg.mock.base_price, 500.0);
        assert!(!cfg.amadeus.has_credentials());
        assert_eq!(cfg.amadeus.resolved_base_url(), "https://test.api.amadeus.com");
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let cfg: AppConfig = toml::from_str(
            r#"
            [amadeus]
            hostname = "production"

            [cache]
            ttl_secs = 60
            "#,
        )
        .expect("config should parse");

        assert_eq!(cfg.amadeus.hostname, AmadeusHostname::Production);
        assert_eq!(cfg.amadeus.resolved_base_url(), "https://api.amadeus.com");
        assert_eq!(cfg.cache.ttl_secs, 60);
        assert_eq!(cfg.sampler.offsets_days.len(), 12);
        assert_eq!(cfg.server.bind_addr.port(), 3000);
    }

    #[test]
    fn test_base_url_override_wins() {
        let cfg = AmadeusConfig {
            base_url: Some("http://127.0.0.1:9000/".into()),
            ..AmadeusConfig::default()
        };
        assert_eq!(cfg.resolved_base_url(), "http://127.0.0.1:9000");
    }

    #[test]
    fn test_credentials_require_both_values() {
        let mut cfg = AmadeusConfig {
            client_id: "id".into(),
            ..AmadeusConfig::default()
        };
        assert!(!cfg.has_credentials());
        cfg.client_secret = "secret".into();
        assert!(cfg.has_credentials());
    }

    #[test]
    fn test_debug_redacts_secret() {
        let cfg = AmadeusConfig {
            client_id: "id".into(),
            client_secret: "hunter2".into(),
            ..AmadeusConfig::default()
        };
        let rendered = format!("{:?}", cfg);
        assert!(!rendered.contains("hunter2"));
        assert!(rendered.contains("<redacted>"));
    }
}
