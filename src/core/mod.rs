//! Valuation engine: pure, synchronous transformations from stored records to
//! value series and totals.

pub mod anonymize;
pub mod benchmark;
pub mod config;
pub mod currency;
pub mod gold;
pub mod log;
pub mod market;
pub mod model;
pub mod period;
pub mod portfolio;
pub mod price_index;
pub mod valuation;

// Re-export main types for cleaner imports
pub use anonymize::Anonymizer;
pub use market::MarketData;
pub use model::{ConversionStatus, ValuationPoint, ValuationSeries};
pub use period::ReportPeriod;
pub use portfolio::{Portfolio, ValuationScope};
pub use price_index::{PriceIndex, PricePoint};
pub use valuation::Valuator;
