//! Re-expresses reporting-currency series in troy ounces of gold.

use crate::core::model::{ValuationPoint, ValuationSeries};
use crate::core::price_index::PriceIndex;
use tracing::debug;

pub const GRAMS_PER_TROY_OUNCE: f64 = 31.1034768;

/// Converts `series` into troy ounces using a gold price quoted per gram in
/// the series' currency.
///
/// The gold price for a date is the exact-date quote if one exists, else the
/// last price resolved earlier in this pass, else the latest quote on or
/// before the date. Dates with no usable gold price are dropped.
pub fn to_troy_ounces(series: &ValuationSeries, gold_per_gram: &PriceIndex) -> ValuationSeries {
    let mut last_known: Option<f64> = None;
    let mut points = Vec::with_capacity(series.len());

    for point in &series.points {
        let gram_price = gold_per_gram
            .exact(point.date)
            .or(last_known)
            .or_else(|| gold_per_gram.value_on_or_before(point.date));

        match gram_price {
            Some(gram_price) if gram_price > 0.0 => {
                last_known = Some(gram_price);
                points.push(ValuationPoint {
                    date: point.date,
                    value: point.value / (gram_price * GRAMS_PER_TROY_OUNCE),
                });
            }
            _ => debug!("No gold price for {}, dropping date", point.date),
        }
    }

    ValuationSeries {
        points,
        status: series.status,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::ConversionStatus;
    use chrono::NaiveDate;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    fn series(points: &[(u32, f64)]) -> ValuationSeries {
        ValuationSeries {
            points: points
                .iter()
                .map(|(d, value)| ValuationPoint {
                    date: day(*d),
                    value: *value,
                })
                .collect(),
            status: ConversionStatus::Native,
        }
    }

    #[test]
    fn test_ounce_arithmetic() {
        let gold = PriceIndex::build(vec![(day(5), 60.0)]);
        let ounces = to_troy_ounces(&series(&[(5, 18_662.10)]), &gold);

        assert_eq!(ounces.len(), 1);
        assert!((ounces.points[0].value - 10.0).abs() < 1e-3);
    }

    #[test]
    fn test_carries_last_known_price() {
        let gold = PriceIndex::build(vec![(day(2), 50.0), (day(4), 60.0), (day(6), 70.0)]);
        let ounces = to_troy_ounces(&series(&[(2, 1000.0), (5, 1000.0), (6, 1000.0)]), &gold);

        let per_ounce = |gram: f64| 1000.0 / (gram * GRAMS_PER_TROY_OUNCE);
        assert_eq!(ounces.len(), 3);
        assert!((ounces.points[0].value - per_ounce(50.0)).abs() < 1e-12);
        // Day 5 reuses the day 2 price rather than the day 4 quote
        assert!((ounces.points[1].value - per_ounce(50.0)).abs() < 1e-12);
        assert!((ounces.points[2].value - per_ounce(70.0)).abs() < 1e-12);
    }

    #[test]
    fn test_floor_search_as_last_resort() {
        let gold = PriceIndex::build(vec![(day(1), 40.0)]);
        let ounces = to_troy_ounces(&series(&[(3, 1000.0)]), &gold);

        assert_eq!(ounces.len(), 1);
        assert!((ounces.points[0].value - 1000.0 / (40.0 * GRAMS_PER_TROY_OUNCE)).abs() < 1e-12);
    }

    #[test]
    fn test_dates_without_gold_are_dropped() {
        let gold = PriceIndex::build(vec![(day(4), 60.0)]);
        let ounces = to_troy_ounces(&series(&[(2, 1000.0), (3, 1000.0), (4, 1000.0)]), &gold);

        let dates: Vec<NaiveDate> = ounces.points.iter().map(|p| p.date).collect();
        assert_eq!(dates, vec![day(4)]);
        assert!(to_troy_ounces(&series(&[(2, 1.0)]), &PriceIndex::default()).is_empty());
    }
}
