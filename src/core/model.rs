//! Records the valuation engine reads: instruments, holdings and the
//! dated price and exchange-rate observations.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Instrument {
    /// ISIN, ticker or any other stable key.
    pub id: String,
    pub name: String,
    /// Trading currency. Prices are always interpreted in this currency.
    pub currency: String,
    #[serde(default)]
    pub category: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Account {
    pub id: String,
    pub name: String,
}

/// A user-defined grouping of instruments, also called a quadrant.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Category {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Holding {
    pub account: String,
    pub instrument: String,
    pub quantity: f64,
    #[serde(default)]
    pub purchase_date: Option<NaiveDate>,
    #[serde(default)]
    pub purchase_price: Option<f64>,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Price {
    pub instrument: String,
    pub date: NaiveDate,
    pub value: f64,
    /// Currency the provider reported. Informational only.
    #[serde(default)]
    pub currency: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ExchangeRate {
    pub from: String,
    pub to: String,
    pub date: NaiveDate,
    pub rate: f64,
}

/// How a value reached the reporting currency. Ordered from best to worst so
/// the status of an aggregate is the maximum of its parts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ConversionStatus {
    /// Already in the reporting currency.
    Native,
    /// Converted with a rate dated on or before the valuation date.
    Converted,
    /// Converted with the latest known rate, which is dated after the
    /// valuation date.
    FallbackRate,
    /// No rate exists for the pair; the value is still in its own currency.
    Unconverted,
}

impl ConversionStatus {
    pub fn is_degraded(&self) -> bool {
        matches!(
            self,
            ConversionStatus::FallbackRate | ConversionStatus::Unconverted
        )
    }
}

impl std::fmt::Display for ConversionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                ConversionStatus::Native => "native",
                ConversionStatus::Converted => "converted",
                ConversionStatus::FallbackRate => "fallback rate",
                ConversionStatus::Unconverted => "unconverted",
            }
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ValuationPoint {
    pub date: NaiveDate,
    pub value: f64,
}

/// Ascending, date-unique sequence of values. An empty series means no data.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValuationSeries {
    pub points: Vec<ValuationPoint>,
    /// Worst conversion status among all values summed into the series.
    pub status: ConversionStatus,
}

impl Default for ValuationSeries {
    fn default() -> Self {
        Self {
            points: Vec::new(),
            status: ConversionStatus::Native,
        }
    }
}

impl ValuationSeries {
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn first(&self) -> Option<&ValuationPoint> {
        self.points.first()
    }

    pub fn last(&self) -> Option<&ValuationPoint> {
        self.points.last()
    }

    /// Relative change between the first and last value, in percent.
    pub fn change_pct(&self) -> Option<f64> {
        match (self.first(), self.last()) {
            (Some(first), Some(last)) => percent_change(first.value, last.value),
            _ => None,
        }
    }
}

/// Percent change from `from` to `to`, `None` when `from` is zero.
pub fn percent_change(from: f64, to: f64) -> Option<f64> {
    if from == 0.0 {
        return None;
    }
    Some((to - from) / from * 100.0)
}
