//! Date-aware conversion into the reporting currency.

use crate::core::market::MarketData;
use crate::core::model::ConversionStatus;
use chrono::NaiveDate;
use std::collections::HashMap;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Conversion {
    pub value: f64,
    pub status: ConversionStatus,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct ResolvedRate {
    rate: f64,
    status: ConversionStatus,
}

/// Converts values into a single reporting currency using the stored rate
/// history for each `(source, reporting)` pair.
///
/// Resolved rates are memoized per `(currency, date)`. The memo belongs to
/// one computation: call [`CurrencyConverter::clear`] before starting the
/// next one, and never share a converter between concurrent computations.
pub struct CurrencyConverter<'a> {
    market: &'a dyn MarketData,
    reporting_currency: String,
    cache: HashMap<(String, NaiveDate), Option<ResolvedRate>>,
}

impl<'a> CurrencyConverter<'a> {
    pub fn new(market: &'a dyn MarketData, reporting_currency: &str) -> Self {
        Self {
            market,
            reporting_currency: reporting_currency.to_string(),
            cache: HashMap::new(),
        }
    }

    pub fn reporting_currency(&self) -> &str {
        &self.reporting_currency
    }

    pub fn clear(&mut self) {
        debug!("Rate cache CLEAR ({} entries)", self.cache.len());
        self.cache.clear();
    }

    pub fn cached_rates(&self) -> usize {
        self.cache.len()
    }

    /// Converts `value`, denominated in `source`, into the reporting currency
    /// as of `on`.
    ///
    /// Without any stored rate for the pair the value comes back unchanged
    /// and flagged [`ConversionStatus::Unconverted`].
    pub fn to_reporting_currency(
        &mut self,
        value: f64,
        source: Option<&str>,
        on: NaiveDate,
    ) -> Conversion {
        let source = match source {
            Some(currency) if currency != self.reporting_currency => currency,
            _ => {
                return Conversion {
                    value,
                    status: ConversionStatus::Native,
                };
            }
        };

        match self.resolve_rate(source, on) {
            Some(resolved) => Conversion {
                value: value * resolved.rate,
                status: resolved.status,
            },
            None => Conversion {
                value,
                status: ConversionStatus::Unconverted,
            },
        }
    }

    fn resolve_rate(&mut self, source: &str, on: NaiveDate) -> Option<ResolvedRate> {
        let key = (source.to_string(), on);
        if let Some(cached) = self.cache.get(&key) {
            debug!("Rate cache HIT for {source} @ {on}");
            return *cached;
        }
        debug!("Rate cache MISS for {source} @ {on}");

        let reporting = self.reporting_currency.as_str();
        let resolved = if let Some(rate) = self.market.rate_on_or_before(source, reporting, on) {
            Some(ResolvedRate {
                rate: rate.value,
                status: ConversionStatus::Converted,
            })
        } else if let Some(latest) = self.market.latest_rate(source, reporting) {
            debug!(
                "No {source}/{reporting} rate on or before {on}, using latest rate from {}",
                latest.date
            );
            Some(ResolvedRate {
                rate: latest.value,
                status: ConversionStatus::FallbackRate,
            })
        } else {
            warn!("No {source}/{reporting} rate available, leaving value unconverted");
            None
        };

        self.cache.insert(key, resolved);
        resolved
    }
}
