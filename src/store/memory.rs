use crate::core::market::MarketData;
use crate::core::model::{ExchangeRate, Price};
use crate::core::price_index::PricePoint;
use chrono::NaiveDate;
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

type Pair = (String, String);

/// In-memory record store. Holds at most one price per instrument and date
/// and one rate per currency pair and date; later inserts overwrite.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    prices: HashMap<String, BTreeMap<NaiveDate, Price>>,
    rates: HashMap<Pair, BTreeMap<NaiveDate, ExchangeRate>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records(
        prices: impl IntoIterator<Item = Price>,
        rates: impl IntoIterator<Item = ExchangeRate>,
    ) -> Self {
        let mut store = Self::new();
        for price in prices {
            store.insert_price(price);
        }
        for rate in rates {
            store.insert_rate(rate);
        }
        store
    }

    pub fn insert_price(&mut self, price: Price) {
        debug!("Store PUT price {} @ {}", price.instrument, price.date);
        self.prices
            .entry(price.instrument.clone())
            .or_default()
            .insert(price.date, price);
    }

    pub fn insert_rate(&mut self, rate: ExchangeRate) {
        debug!("Store PUT rate {}/{} @ {}", rate.from, rate.to, rate.date);
        self.rates
            .entry((rate.from.clone(), rate.to.clone()))
            .or_default()
            .insert(rate.date, rate);
    }

    pub fn price_count(&self) -> usize {
        self.prices.values().map(BTreeMap::len).sum()
    }

    pub fn rate_count(&self) -> usize {
        self.rates.values().map(BTreeMap::len).sum()
    }

    fn rates_of(&self, from: &str, to: &str) -> Option<&BTreeMap<NaiveDate, ExchangeRate>> {
        self.rates.get(&(from.to_string(), to.to_string()))
    }
}

impl MarketData for MemoryStore {
    fn price_history(&self, instrument: &str) -> Vec<Price> {
        self.prices
            .get(instrument)
            .map(|history| history.values().cloned().collect())
            .unwrap_or_default()
    }

    fn rate_history(&self, from: &str, to: &str) -> Vec<ExchangeRate> {
        self.rates_of(from, to)
            .map(|history| history.values().cloned().collect())
            .unwrap_or_default()
    }

    fn latest_price(&self, instrument: &str) -> Option<PricePoint> {
        self.prices
            .get(instrument)?
            .values()
            .next_back()
            .map(price_point)
    }

    fn price_on_or_before(&self, instrument: &str, date: NaiveDate) -> Option<PricePoint> {
        self.prices
            .get(instrument)?
            .range(..=date)
            .next_back()
            .map(|(_, price)| price_point(price))
    }

    fn price_before(&self, instrument: &str, date: NaiveDate) -> Option<PricePoint> {
        self.prices
            .get(instrument)?
            .range(..date)
            .next_back()
            .map(|(_, price)| price_point(price))
    }

    fn latest_rate(&self, from: &str, to: &str) -> Option<PricePoint> {
        self.rates_of(from, to)?.values().next_back().map(rate_point)
    }

    fn rate_on_or_before(&self, from: &str, to: &str, date: NaiveDate) -> Option<PricePoint> {
        self.rates_of(from, to)?
            .range(..=date)
            .next_back()
            .map(|(_, rate)| rate_point(rate))
    }
}

fn price_point(price: &Price) -> PricePoint {
    PricePoint {
        date: price.date,
        value: price.value,
    }
}

fn rate_point(rate: &ExchangeRate) -> PricePoint {
    PricePoint {
        date: rate.date,
        value: rate.rate,
    }
}
