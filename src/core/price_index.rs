//! Sorted, date-unique price and rate histories with floor lookups.

use crate::core::model::{ExchangeRate, Price};
use chrono::NaiveDate;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub value: f64,
}

/// An ascending, date-unique history of values for one instrument or one
/// currency pair.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PriceIndex {
    entries: Vec<PricePoint>,
}

impl PriceIndex {
    /// Builds an index from unordered `(date, value)` observations. When a
    /// date occurs more than once the observation that comes last in the
    /// input wins, matching the overwrite semantics of the record store.
    pub fn build<I>(observations: I) -> Self
    where
        I: IntoIterator<Item = (NaiveDate, f64)>,
    {
        let mut sorted: Vec<PricePoint> = observations
            .into_iter()
            .map(|(date, value)| PricePoint { date, value })
            .collect();
        // Stable, so equal dates keep their input order.
        sorted.sort_by_key(|p| p.date);

        let mut entries: Vec<PricePoint> = Vec::with_capacity(sorted.len());
        for point in sorted {
            match entries.last_mut() {
                Some(last) if last.date == point.date => *last = point,
                _ => entries.push(point),
            }
        }
        Self { entries }
    }

    pub fn from_prices(prices: &[Price]) -> Self {
        Self::build(prices.iter().map(|p| (p.date, p.value)))
    }

    pub fn from_rates(rates: &[ExchangeRate]) -> Self {
        Self::build(rates.iter().map(|r| (r.date, r.rate)))
    }

    /// Latest entry dated on or before `date`.
    pub fn on_or_before(&self, date: NaiveDate) -> Option<PricePoint> {
        let idx = self.entries.partition_point(|p| p.date <= date);
        idx.checked_sub(1).map(|i| self.entries[i])
    }

    /// Latest entry dated strictly before `date`.
    pub fn before(&self, date: NaiveDate) -> Option<PricePoint> {
        let idx = self.entries.partition_point(|p| p.date < date);
        idx.checked_sub(1).map(|i| self.entries[i])
    }

    pub fn value_on_or_before(&self, date: NaiveDate) -> Option<f64> {
        self.on_or_before(date).map(|p| p.value)
    }

    pub fn exact(&self, date: NaiveDate) -> Option<f64> {
        self.entries
            .binary_search_by_key(&date, |p| p.date)
            .ok()
            .map(|i| self.entries[i].value)
    }

    pub fn earliest(&self) -> Option<PricePoint> {
        self.entries.first().copied()
    }

    pub fn latest(&self) -> Option<PricePoint> {
        self.entries.last().copied()
    }

    /// Dates on or after `start`, ascending.
    pub fn dates_from(&self, start: NaiveDate) -> impl Iterator<Item = NaiveDate> + '_ {
        let idx = self.entries.partition_point(|p| p.date < start);
        self.entries[idx..].iter().map(|p| p.date)
    }

    pub fn entries(&self) -> &[PricePoint] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    fn sample_index() -> PriceIndex {
        PriceIndex::build(vec![(day(10), 3.0), (day(2), 1.0), (day(5), 2.0)])
    }

    #[test]
    fn test_build_sorts_ascending() {
        let index = sample_index();
        let dates: Vec<NaiveDate> = index.entries().iter().map(|p| p.date).collect();
        assert_eq!(dates, vec![day(2), day(5), day(10)]);
    }

    #[test]
    fn test_build_collapses_duplicates_last_write_wins() {
        let index = PriceIndex::build(vec![
            (day(3), 1.0),
            (day(1), 5.0),
            (day(3), 2.0),
            (day(3), 7.5),
        ]);
        assert_eq!(index.len(), 2);
        assert_eq!(index.exact(day(3)), Some(7.5));
        assert_eq!(index.exact(day(1)), Some(5.0));
    }

    #[test]
    fn test_build_is_idempotent() {
        let records = vec![(day(4), 4.0), (day(1), 1.0), (day(4), 4.5), (day(2), 2.0)];
        let first = PriceIndex::build(records.clone());
        let second = PriceIndex::build(records);
        assert_eq!(first, second);
    }

    #[test]
    fn test_on_or_before() {
        let index = sample_index();
        assert_eq!(index.value_on_or_before(day(1)), None);
        assert_eq!(index.value_on_or_before(day(2)), Some(1.0));
        assert_eq!(index.value_on_or_before(day(4)), Some(1.0));
        assert_eq!(index.value_on_or_before(day(5)), Some(2.0));
        assert_eq!(index.value_on_or_before(day(31)), Some(3.0));
        assert_eq!(PriceIndex::default().value_on_or_before(day(31)), None);
    }

    #[test]
    fn test_on_or_before_has_no_closer_entry() {
        let index = PriceIndex::build((1..=28).step_by(3).map(|d| (day(d), d as f64)));
        for target in 1..=31 {
            let target = day(target);
            match index.on_or_before(target) {
                Some(found) => {
                    assert!(found.date <= target);
                    assert!(
                        !index
                            .entries()
                            .iter()
                            .any(|p| p.date > found.date && p.date <= target)
                    );
                }
                None => assert!(index.entries().iter().all(|p| p.date > target)),
            }
        }
    }

    #[test]
    fn test_before_is_strict() {
        let index = sample_index();
        assert_eq!(index.before(day(5)).map(|p| p.date), Some(day(2)));
        assert_eq!(index.before(day(6)).map(|p| p.date), Some(day(5)));
        assert!(index.before(day(2)).is_none());
    }

    #[test]
    fn test_dates_from() {
        let index = sample_index();
        let dates: Vec<NaiveDate> = index.dates_from(day(3)).collect();
        assert_eq!(dates, vec![day(5), day(10)]);
        assert_eq!(index.earliest().map(|p| p.date), Some(day(2)));
        assert_eq!(index.latest().map(|p| p.date), Some(day(10)));
    }
}
