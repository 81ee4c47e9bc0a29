//! Read-only access to stored price and exchange-rate records.

use crate::core::model::{ExchangeRate, Price};
use crate::core::price_index::{PricePoint, PriceIndex};
use chrono::NaiveDate;

/// Snapshot queries the valuation engine runs against the record store.
///
/// Histories are returned unordered. The point lookups have default
/// implementations built on [`PriceIndex`].
pub trait MarketData: Send + Sync {
    fn price_history(&self, instrument: &str) -> Vec<Price>;

    fn rate_history(&self, from: &str, to: &str) -> Vec<ExchangeRate>;

    fn price_index(&self, instrument: &str) -> PriceIndex {
        PriceIndex::from_prices(&self.price_history(instrument))
    }

    fn rate_index(&self, from: &str, to: &str) -> PriceIndex {
        PriceIndex::from_rates(&self.rate_history(from, to))
    }

    fn latest_price(&self, instrument: &str) -> Option<PricePoint> {
        self.price_index(instrument).latest()
    }

    fn price_on_or_before(&self, instrument: &str, date: NaiveDate) -> Option<PricePoint> {
        self.price_index(instrument).on_or_before(date)
    }

    fn price_before(&self, instrument: &str, date: NaiveDate) -> Option<PricePoint> {
        self.price_index(instrument).before(date)
    }

    fn latest_rate(&self, from: &str, to: &str) -> Option<PricePoint> {
        self.rate_index(from, to).latest()
    }

    fn rate_on_or_before(&self, from: &str, to: &str, date: NaiveDate) -> Option<PricePoint> {
        self.rate_index(from, to).on_or_before(date)
    }
}
