//! Synthetic price curve for demo mode and provider fallback.
//!
//! The curve is U-shaped over lead time: a steep last-minute premium,
//! a cheap window roughly two to four months out, and a mild premium
//! for very early bookings. Noise is random; only the shape is fixed.

use chrono::NaiveDate;
use common::PricePoint;
use rand::Rng;

pub const MAX_LEAD_DAYS: u32 = 180;
pub const LEAD_DAY_STEP: usize = 3;
pub const PRICE_FLOOR: f64 = 50.0;

const LAST_MINUTE_WINDOW: u32 = 21;
const LAST_MINUTE_PEAK: f64 = 1.5;
const LAST_MINUTE_DECAY: f64 = 0.1;
const SWEET_SPOT: (u32, u32) = (60, 120);
const SWEET_SPOT_DISCOUNT: f64 = 0.2;
const SWEET_SPOT_NOISE: f64 = 25.0;
const EARLY_BIRD_AFTER: u32 = 150;
const EARLY_BIRD_PREMIUM: f64 = 0.1;
const GENERAL_NOISE: f64 = 10.0;

/// Noise-free price at `days` lead time.
pub fn baseline_price(base_price: f64, days: u32) -> f64 {
    let mut fluctuation = 0.0;

    if days < LAST_MINUTE_WINDOW {
        fluctuation += base_price * LAST_MINUTE_PEAK * (-LAST_MINUTE_DECAY * f64::from(days)).exp();
    }
    if in_sweet_spot(days) {
        fluctuation -= base_price * SWEET_SPOT_DISCOUNT;
    }
    if days > EARLY_BIRD_AFTER {
        fluctuation += base_price * EARLY_BIRD_PREMIUM;
    }

    base_price + fluctuation
}

fn in_sweet_spot(days: u32) -> bool {
    days > SWEET_SPOT.0 && days < SWEET_SPOT.1
}

/// Generate the 0..=180 day curve (every 3 days) using the thread RNG.
pub fn generate_curve(base_price: f64, today: NaiveDate) -> Vec<PricePoint> {
    generate_curve_with(&mut rand::thread_rng(), base_price, today)
}

/// Generate the curve with a caller-supplied RNG.
pub fn generate_curve_with<R: Rng>(
    rng: &mut R,
    base_price: f64,
    today: NaiveDate,
) -> Vec<PricePoint> {
    (0..=MAX_LEAD_DAYS)
        .step_by(LEAD_DAY_STEP)
        .map(|days| {
            let mut price = baseline_price(base_price, days);
            if in_sweet_spot(days) {
                price += rng.gen_range(-SWEET_SPOT_NOISE..SWEET_SPOT_NOISE);
            }
            price += rng.gen_range(-GENERAL_NOISE..GENERAL_NOISE);

            PricePoint {
                lead_days: days,
                price: price.round().max(PRICE_FLOOR),
                flight_date: today + chrono::Duration::days(i64::from(days)),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const DEFAULT_BASE_PRICE: f64 = 500.0;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 18).unwrap()
    }

    #[test]
    fn test_curve_covers_half_year_every_three_days() {
        let curve = generate_curve(DEFAULT_BASE_PRICE, today());

        assert_eq!(curve.len(), 61);
        assert_eq!(curve.first().map(|p| p.lead_days), Some(0));
        assert_eq!(curve.last().map(|p| p.lead_days), Some(180));
        for (i, point) in curve.iter().enumerate() {
            assert_eq!(point.lead_days, (i * 3) as u32);
            assert_eq!(
                point.flight_date,
                today() + chrono::Duration::days(i64::from(point.lead_days))
            );
        }
    }

    #[test]
    fn test_prices_respect_floor_for_any_base() {
        let mut rng = StdRng::seed_from_u64(7);
        for base in [1.0, 20.0, 60.0, 500.0, 5000.0] {
            let curve = generate_curve_with(&mut rng, base, today());
            assert!(
                curve.iter().all(|p| p.price >= PRICE_FLOOR),
                "base {base} produced a price below the floor"
            );
        }
    }

    #[test]
    fn test_prices_are_whole_units() {
        let curve = generate_curve(DEFAULT_BASE_PRICE, today());
        assert!(curve.iter().all(|p| p.price.fract() == 0.0));
    }

    #[test]
    fn test_noise_stays_within_bounds() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..20 {
            for point in generate_curve_with(&mut rng, DEFAULT_BASE_PRICE, today()) {
                let expected = baseline_price(DEFAULT_BASE_PRICE, point.lead_days);
                let bound = if in_sweet_spot(point.lead_days) {
                    SWEET_SPOT_NOISE + GENERAL_NOISE + 0.5
                } else {
                    GENERAL_NOISE + 0.5
                };
                assert!(
                    (point.price - expected).abs() <= bound,
                    "day {}: price {} too far from {}",
                    point.lead_days,
                    point.price,
                    expected
                );
            }
        }
    }

    #[test]
    fn test_sweet_spot_is_below_base() {
        for base in [100.0, 500.0, 1200.0] {
            for days in 61..120 {
                assert!(baseline_price(base, days) < base, "day {days}");
            }
            assert_eq!(baseline_price(base, 60), base);
            assert_eq!(baseline_price(base, 120), base);
        }
    }

    #[test]
    fn test_last_minute_is_above_base() {
        for days in 0..21 {
            assert!(baseline_price(500.0, days) > 500.0, "day {days}");
        }
        assert!((baseline_price(500.0, 0) - 1250.0).abs() < 1e-9);
        assert!(baseline_price(500.0, 0) > baseline_price(500.0, 12));
    }

    #[test]
    fn test_far_out_premium() {
        assert!((baseline_price(500.0, 153) - 550.0).abs() < 1e-9);
        assert_eq!(baseline_price(500.0, 150), 500.0);
    }
}
