//! Configuration loader: merges .env file, config.toml, and env vars.

use common::config::{AmadeusHostname, AppConfig};
use common::Error;
use std::net::SocketAddr;
use std::path::Path;

fn parse_positive_u64(raw: &str, env_name: &str) -> Result<u64, Error> {
    let parsed = raw
        .trim()
        .parse::<u64>()
        .map_err(|_| Error::Config(format!("{env_name} must be an integer > 0")))?;
    if parsed == 0 {
        return Err(Error::Config(format!("{env_name} must be an integer > 0")));
    }
    Ok(parsed)
}

fn parse_non_negative_u64(raw: &str, env_name: &str) -> Result<u64, Error> {
    raw.trim()
        .parse::<u64>()
        .map_err(|_| Error::Config(format!("{env_name} must be an integer >= 0")))
}

fn parse_positive_f64(raw: &str, env_name: &str) -> Result<f64, Error> {
    let parsed = raw
        .trim()
        .parse::<f64>()
        .map_err(|_| Error::Config(format!("{env_name} must be a number > 0")))?;
    if !parsed.is_finite() || parsed <= 0.0 {
        return Err(Error::Config(format!("{env_name} must be a number > 0")));
    }
    Ok(parsed)
}

fn parse_offsets(raw: &str) -> Result<Vec<u32>, Error> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<u32>().map_err(|_| {
                Error::Config(format!(
                    "FARE_TREND_OFFSETS must be comma-separated day counts (bad value '{s}')"
                ))
            })
        })
        .collect()
}

fn parse_hostname(raw: &str) -> Result<AmadeusHostname, Error> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "test" => Ok(AmadeusHostname::Test),
        "production" | "prod" => Ok(AmadeusHostname::Production),
        _ => Err(Error::Config(
            "AMADEUS_HOSTNAME must be one of: test, production".into(),
        )),
    }
}

/// Apply environment overrides on top of file/default values.
///
/// `lookup` returns the raw value of a variable, if set.
fn apply_env_overrides(
    config: &mut AppConfig,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<(), Error> {
    if let Some(id) = lookup("AMADEUS_CLIENT_ID") {
        config.amadeus.client_id = id.trim().to_string();
    }
    if let Some(secret) = lookup("AMADEUS_CLIENT_SECRET") {
        config.amadeus.client_secret = secret.trim().to_string();
    }
    if let Some(raw) = lookup("AMADEUS_HOSTNAME") {
        config.amadeus.hostname = parse_hostname(&raw)?;
    }
    if let Some(url) = lookup("AMADEUS_BASE_URL") {
        config.amadeus.base_url = Some(url.trim().to_string()).filter(|u| !u.is_empty());
    }

    if let Some(raw) = lookup("FARE_TREND_BIND") {
        config.server.bind_addr = raw.trim().parse::<SocketAddr>().map_err(|_| {
            Error::Config("FARE_TREND_BIND must be a socket address like 0.0.0.0:3000".into())
        })?;
    }
    if let Some(raw) = lookup("PORT") {
        let port = raw
            .trim()
            .parse::<u16>()
            .map_err(|_| Error::Config("PORT must be an integer in 0..=65535".into()))?;
        config.server.bind_addr.set_port(port);
    }

    if let Some(raw) = lookup("FARE_TREND_PACING_MS") {
        config.sampler.pacing_ms = parse_non_negative_u64(&raw, "FARE_TREND_PACING_MS")?;
    }
    if let Some(raw) = lookup("FARE_TREND_OFFSETS") {
        config.sampler.offsets_days = parse_offsets(&raw)?;
    }
    if let Some(raw) = lookup("FARE_TREND_CACHE_TTL_SECS") {
        config.cache.ttl_secs = parse_positive_u64(&raw, "FARE_TREND_CACHE_TTL_SECS")?;
    }
    if let Some(raw) = lookup("FARE_TREND_BASE_PRICE") {
        config.mock.base_price = parse_positive_f64(&raw, "FARE_TREND_BASE_PRICE")?;
    }

    Ok(())
}

fn validate_config(config: &AppConfig) -> Result<(), Error> {
    let mut issues: Vec<String> = Vec::new();

    let offsets = &config.sampler.offsets_days;
    if offsets.is_empty() {
        issues.push("sampler.offsets_days must contain at least one offset".into());
    }
    if offsets.windows(2).any(|w| w[0] >= w[1]) {
        issues.push("sampler.offsets_days must be strictly ascending".into());
    }
    if config.sampler.adults == 0 {
        issues.push("sampler.adults must be > 0".into());
    }
    if config.sampler.max_results == 0 {
        issues.push("sampler.max_results must be > 0".into());
    }

    if config.cache.ttl_secs == 0 {
        issues.push("cache.ttl_secs must be > 0".into());
    }
    if !config.mock.base_price.is_finite() || config.mock.base_price <= 0.0 {
        issues.push("mock.base_price must be > 0".into());
    }

    if config.amadeus.timeout_secs == 0 {
        issues.push("amadeus.timeout_secs must be > 0".into());
    }
    if config.amadeus.requests_per_sec == 0 {
        issues.push("amadeus.requests_per_sec must be > 0".into());
    }

    if issues.is_empty() {
        Ok(())
    } else {
        Err(Error::Config(format!(
            "Invalid config:\n - {}",
            issues.join("\n - ")
        )))
    }
}

fn load_config_from(
    config_path: &Path,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<AppConfig, Error> {
    let mut config = AppConfig::default();

    if config_path.exists() {
        let contents = std::fs::read_to_string(config_path).map_err(|e| {
            Error::Config(format!("Failed to read {}: {}", config_path.display(), e))
        })?;
        config = toml::from_str(&contents).map_err(|e| {
            Error::Config(format!("Failed to parse {}: {}", config_path.display(), e))
        })?;
    }

    apply_env_overrides(&mut config, lookup)?;
    validate_config(&config)?;

    Ok(config)
}

/// Load application configuration from environment and optional config file.
///
/// Missing provider credentials are not an error; the sampler runs in
/// demo mode without them.
pub fn load_config() -> Result<AppConfig, Error> {
    if let Err(e) = dotenvy::dotenv() {
        tracing::debug!("No .env file loaded: {}", e);
    }

    load_config_from(Path::new("config.toml"), |name| std::env::var(name).ok())
}
