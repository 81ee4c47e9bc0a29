//! "What if the portfolio had tracked the benchmark" comparison series.

use crate::core::model::{ValuationPoint, ValuationSeries};
use crate::core::price_index::PriceIndex;
use tracing::{debug, warn};

/// Rescales the benchmark's performance onto the portfolio's first value.
///
/// Each output value is `first_value * benchmark(date) / benchmark(first_date)`
/// for the dates of `portfolio`. Dates where the benchmark has no price on or
/// before them are skipped. Without a benchmark price at the first date there
/// is nothing to anchor to and the result is empty.
pub fn compare_to_benchmark(portfolio: &ValuationSeries, benchmark: &PriceIndex) -> ValuationSeries {
    let Some(anchor) = portfolio.first() else {
        return ValuationSeries::default();
    };
    let Some(anchor_price) = benchmark.value_on_or_before(anchor.date) else {
        warn!("No benchmark price on or before {}, cannot compare", anchor.date);
        return ValuationSeries::default();
    };
    if anchor_price == 0.0 {
        warn!("Benchmark price on {} is zero, cannot compare", anchor.date);
        return ValuationSeries::default();
    }

    let points: Vec<ValuationPoint> = portfolio
        .points
        .iter()
        .filter_map(|point| {
            benchmark
                .value_on_or_before(point.date)
                .map(|price| ValuationPoint {
                    date: point.date,
                    value: anchor.value * (price / anchor_price),
                })
        })
        .collect();
    debug!(
        "Benchmark comparison has {} of {} portfolio dates",
        points.len(),
        portfolio.len()
    );

    ValuationSeries {
        points,
        status: portfolio.status,
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
            status: ConversionStatus::Converted,
        }
    }

    #[test]
    fn test_first_value_is_anchor() {
        let portfolio = series(&[(2, 1234.5), (3, 1300.0), (4, 1250.0)]);
        let benchmark = PriceIndex::build(vec![(day(1), 50.0), (day(3), 55.0), (day(4), 60.0)]);

        let compared = compare_to_benchmark(&portfolio, &benchmark);

        assert_eq!(compared.len(), 3);
        assert_eq!(compared.points[0].value, 1234.5);
        assert!((compared.points[1].value - 1234.5 * 1.1).abs() < 1e-9);
        assert!((compared.points[2].value - 1234.5 * 1.2).abs() < 1e-9);
        assert_eq!(compared.status, ConversionStatus::Converted);
    }

    #[test]
    fn test_missing_anchor_yields_empty() {
        let portfolio = series(&[(2, 100.0), (3, 110.0)]);
        let benchmark = PriceIndex::build(vec![(day(3), 55.0)]);

        assert!(compare_to_benchmark(&portfolio, &benchmark).is_empty());
        assert!(compare_to_benchmark(&ValuationSeries::default(), &benchmark).is_empty());
    }

    #[test]
    fn test_dates_are_aligned_to_portfolio() {
        let portfolio = series(&[(2, 100.0), (5, 120.0), (9, 90.0)]);
        let benchmark = PriceIndex::build(vec![(day(2), 10.0), (day(7), 20.0)]);

        let compared = compare_to_benchmark(&portfolio, &benchmark);

        let dates: Vec<NaiveDate> = compared.points.iter().map(|p| p.date).collect();
        assert_eq!(dates, vec![day(2), day(5), day(9)]);
        assert_eq!(compared.points[1].value, 100.0);
        assert_eq!(compared.points[2].value, 200.0);
    }
}
