//! Booking recommendation derived from a price trend.

use chrono::NaiveDate;
use common::PricePoint;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Recommendation {
    /// A longer lead time is cheaper than booking now.
    BookEarly,
    /// Prices are flat or lowest at the shortest lead time.
    BookNow,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingAdvice {
    pub best_days_prior: u32,
    pub best_date: NaiveDate,
    pub lowest_price: f64,
    /// Shortest sampled lead time, used as the "book now" reference.
    pub current_days_prior: u32,
    pub current_price: f64,
    pub savings: f64,
    pub savings_percent: i64,
    pub recommendation: Recommendation,
}

/// Compare the cheapest sampled lead time against booking now.
///
/// Returns `None` for an empty trend. Ties keep the earliest point in
/// list order.
pub fn advise(points: &[PricePoint]) -> Option<BookingAdvice> {
    let first = points.first()?;

    let lowest = points
        .iter()
        .fold(first, |min, p| if p.price < min.price { p } else { min });
    let current = points
        .iter()
        .fold(first, |cur, p| if p.lead_days < cur.lead_days { p } else { cur });

    let savings = current.price - lowest.price;
    let savings_percent = if current.price > 0.0 {
        (savings / current.price * 100.0).round() as i64
    } else {
        0
    };

    Some(BookingAdvice {
        best_days_prior: lowest.lead_days,
        best_date: lowest.flight_date,
        lowest_price: lowest.price,
        current_days_prior: current.lead_days,
        current_price: current.price,
        savings,
        savings_percent,
        recommendation: if savings > 0.0 {
            Recommendation::BookEarly
        } else {
            Recommendation::BookNow
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(days: u32, price: f64) -> PricePoint {
        PricePoint {
            lead_days: days,
            price,
            flight_date: NaiveDate::from_ymd_opt(2026, 10, 18).unwrap()
                + chrono::Duration::days(i64::from(days)),
        }
    }

    #[test]
    fn test_empty_trend_has_no_advice() {
        assert!(advise(&[]).is_none());
    }

    #[test]
    fn test_savings_against_shortest_lead_time() {
        let points = vec![point(1, 800.0), point(30, 520.0), point(90, 400.0), point(180, 560.0)];
        let advice = advise(&points).expect("advice");

        assert_eq!(advice.best_days_prior, 90);
        assert_eq!(advice.best_date, NaiveDate::from_ymd_opt(2027, 1, 16).unwrap());
        assert_eq!(advice.lowest_price, 400.0);
        assert_eq!(advice.current_days_prior, 1);
        assert_eq!(advice.current_price, 800.0);
        assert_eq!(advice.savings, 400.0);
        assert_eq!(advice.savings_percent, 50);
        assert_eq!(advice.recommendation, Recommendation::BookEarly);
    }

    #[test]
    fn test_current_is_not_assumed_first() {
        let points = vec![point(60, 300.0), point(3, 330.0), point(120, 310.0)];
        let advice = advise(&points).expect("advice");

        assert_eq!(advice.current_days_prior, 3);
        assert_eq!(advice.best_days_prior, 60);
        assert_eq!(advice.savings, 30.0);
        assert_eq!(advice.savings_percent, 9);
    }

    #[test]
    fn test_cheapest_now_recommends_booking_now() {
        let points = vec![point(1, 200.0), point(30, 250.0), point(90, 200.0)];
        let advice = advise(&points).expect("advice");

        assert_eq!(advice.best_days_prior, 1, "ties keep the first point");
        assert_eq!(advice.savings, 0.0);
        assert_eq!(advice.savings_percent, 0);
        assert_eq!(advice.recommendation, Recommendation::BookNow);
    }

    #[test]
    fn test_wire_names() {
        let advice = advise(&[point(0, 100.0)]).expect("advice");
        let value = serde_json::to_value(&advice).unwrap();
        assert_eq!(value["bestDaysPrior"], 0);
        assert_eq!(value["savingsPercent"], 0);
        assert_eq!(value["recommendation"], "book_now");
    }
}
