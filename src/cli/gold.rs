use super::series::render_series;
use crate::core::gold::to_troy_ounces;
use crate::core::{MarketData, Portfolio, ReportPeriod, ValuationScope, Valuator};
use anyhow::{Result, bail};
use chrono::NaiveDate;
use tracing::{info, warn};

pub fn run(
    valuator: &mut Valuator<'_>,
    portfolio: &Portfolio,
    market: &dyn MarketData,
    gold: Option<&str>,
    period: ReportPeriod,
    today: NaiveDate,
) -> Result<()> {
    let Some(gold) = gold else {
        bail!("No gold instrument configured, set `gold` in the config file");
    };
    let currency = valuator.reporting_currency().to_string();
    if let Some(instrument) = portfolio.instrument(gold) {
        if instrument.currency != currency {
            warn!(
                "Gold is quoted in {} but values are in {currency}; ounces will be off by the exchange rate",
                instrument.currency
            );
        }
    }
    info!("Converting portfolio to troy ounces using {gold} over {period}");

    let series = valuator.series(&ValuationScope::Portfolio, period.cutoff(today));
    let ounces = to_troy_ounces(&series, &market.price_index(gold));
    if ounces.is_empty() {
        println!("No portfolio data with a gold price in period {period}.");
        return Ok(());
    }

    println!(
        "{}",
        render_series(
            &format!("portfolio in gold ({period})"),
            "oz",
            &currency,
            &ounces,
            4
        )
    );
    Ok(())
}
