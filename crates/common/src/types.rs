//! Domain types shared across fare-trend.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::Error;

// ── Routes ────────────────────────────────────────────────────────────

/// Ordered origin → destination pair of IATA-style location codes.
///
/// Codes are trimmed and upper-cased, so `tpe-nrt` and `TPE-NRT` share a
/// cache slot. Format is not checked beyond emptiness; a bad code surfaces
/// later as a provider failure.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RoutePair {
    pub origin: String,
    pub destination: String,
}

impl RoutePair {
    pub fn new(origin: &str, destination: &str) -> Result<Self, Error> {
        let origin = origin.trim().to_ascii_uppercase();
        let destination = destination.trim().to_ascii_uppercase();
        if origin.is_empty() || destination.is_empty() {
            return Err(Error::InvalidRoute("Missing origin or destination".into()));
        }
        Ok(Self {
            origin,
            destination,
        })
    }
}

impl fmt::Display for RoutePair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.origin, self.destination)
    }
}

/// Parses the `ORIGIN-DEST` form used on the command line.
impl FromStr for RoutePair {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (origin, destination) = s
            .split_once('-')
            .ok_or_else(|| Error::InvalidRoute(format!("expected ORIGIN-DEST, got {s:?}")))?;
        Self::new(origin, destination)
    }
}

// ── Price samples ─────────────────────────────────────────────────────

/// One observed (or synthesized) fare at a given booking lead time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    /// Days between booking and departure.
    #[serde(rename = "daysPrior")]
    pub lead_days: u32,
    /// Total fare in provider currency units.
    pub price: f64,
    /// Departure date the fare was quoted for.
    #[serde(rename = "dateStr")]
    pub flight_date: NaiveDate,
}

/// Where a sample's points came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Provenance {
    /// Quotes from the live provider (possibly partial).
    Live,
    /// Generated curve; no provider credentials configured.
    Synthetic,
    /// Generated curve after live sampling yielded zero points.
    Fallback,
}

impl Provenance {
    pub fn as_str(&self) -> &'static str {
        match self {
            Provenance::Live => "live",
            Provenance::Synthetic => "synthetic",
            Provenance::Fallback => "fallback",
        }
    }
}

impl fmt::Display for Provenance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A lead-time offset whose quote attempt failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OffsetError {
    pub days: u32,
    pub error: String,
}

/// Outcome of one sampling pass over a route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleResult {
    pub provenance: Provenance,
    /// Points in insertion order; never empty.
    pub points: Vec<PricePoint>,
    pub partial_errors: Vec<OffsetError>,
}

impl SampleResult {
    pub fn live(points: Vec<PricePoint>, partial_errors: Vec<OffsetError>) -> Self {
        Self {
            provenance: Provenance::Live,
            points,
            partial_errors,
        }
    }

    pub fn synthetic(points: Vec<PricePoint>) -> Self {
        Self {
            provenance: Provenance::Synthetic,
            points,
            partial_errors: Vec::new(),
        }
    }

    pub fn fallback(points: Vec<PricePoint>, partial_errors: Vec<OffsetError>) -> Self {
        Self {
            provenance: Provenance::Fallback,
            points,
            partial_errors,
        }
    }
}

// ── Provider requests ─────────────────────────────────────────────────

/// A single fare lookup sent to a `QuoteSource`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuoteRequest {
    pub origin: String,
    pub destination: String,
    pub departure_date: NaiveDate,
    /// Adult passenger count.
    pub adults: u32,
    /// Cap on offers returned by the provider.
    pub max_results: u32,
}

impl QuoteRequest {
    pub fn route_label(&self) -> String {
        format!("{}-{}", self.origin, self.destination)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_pair_normalises_codes() {
        let route = RoutePair::new(" tpe ", "nrt").expect("route should build");
        assert_eq!(route.origin, "TPE");
        assert_eq!(route.destination, "NRT");
        assert_eq!(route.to_string(), "TPE-NRT");
        assert_eq!(route, RoutePair::new("TPE", "NRT").unwrap());
    }

    #[test]
    fn test_route_pair_rejects_blank_codes() {
        assert!(RoutePair::new("", "NRT").is_err());
        assert!(RoutePair::new("TPE", "   ").is_err());
    }

    #[test]
    fn test_route_pair_from_str() {
        let route: RoutePair = "tpe-lax".parse().expect("should parse");
        assert_eq!(route.origin, "TPE");
        assert_eq!(route.destination, "LAX");

        assert!("TPELAX".parse::<RoutePair>().is_err());
        assert!("TPE-".parse::<RoutePair>().is_err());
    }

    #[test]
    fn test_price_point_wire_names() {
        let point = PricePoint {
            lead_days: 90,
            price: 412.5,
            flight_date: NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
        };
        let value = serde_json::to_value(&point).unwrap();
        assert_eq!(value["daysPrior"], 90);
        assert_eq!(value["price"], 412.5);
        assert_eq!(value["dateStr"], "2026-03-01");
    }

    #[test]
    fn test_provenance_labels() {
        assert_eq!(serde_json::to_value(Provenance::Live).unwrap(), "live");
        assert_eq!(serde_json::to_value(Provenance::Synthetic).unwrap(), "synthetic");
        assert_eq!(serde_json::to_value(Provenance::Fallback).unwrap(), "fallback");
        assert_eq!(Provenance::Fallback.to_string(), "fallback");
    }
}
