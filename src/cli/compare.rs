use super::ui;
use crate::core::benchmark::compare_to_benchmark;
use crate::core::{MarketData, ReportPeriod, ValuationScope, ValuationSeries, Valuator};
use anyhow::{Result, bail};
use chrono::NaiveDate;
use comfy_table::Cell;
use std::collections::HashMap;
use tracing::info;

/// Portfolio and benchmark values side by side, on the portfolio's dates.
pub fn render_comparison(
    benchmark_name: &str,
    currency: &str,
    portfolio: &ValuationSeries,
    benchmark: &ValuationSeries,
) -> String {
    let benchmark_by_date: HashMap<NaiveDate, f64> =
        benchmark.points.iter().map(|p| (p.date, p.value)).collect();

    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Date"),
        ui::header_cell(&format!("Portfolio ({currency})")),
        ui::header_cell(&format!("{benchmark_name} ({currency})")),
    ]);
    for point in &portfolio.points {
        table.add_row(vec![
            Cell::new(point.date.to_string()),
            ui::value_cell(format!("{:.2}", point.value)),
            ui::format_optional_cell(benchmark_by_date.get(&point.date), |v| format!("{v:.2}")),
        ]);
    }

    let change = |series: &ValuationSeries| {
        series
            .change_pct()
            .map_or("N/A".to_string(), |c| format!("{c:+.2}%"))
    };

    let mut output = format!(
        "Portfolio vs {}\n\n",
        ui::style_text(benchmark_name, ui::StyleType::Title)
    );
    output.push_str(&table.to_string());
    output.push_str(&format!(
        "\n\nChange: portfolio {}, benchmark {}",
        change(portfolio),
        change(benchmark)
    ));
    output.push_str(&ui::status_note(portfolio.status, currency));
    output
}

pub fn run(
    valuator: &mut Valuator<'_>,
    market: &dyn MarketData,
    benchmark: Option<&str>,
    period: ReportPeriod,
    today: NaiveDate,
) -> Result<()> {
    let Some(benchmark) = benchmark else {
        bail!("No benchmark instrument configured, set `benchmark` in the config file");
    };
    info!("Comparing portfolio with {benchmark} over {period}");

    let portfolio = valuator.series(&ValuationScope::Portfolio, period.cutoff(today));
    if portfolio.is_empty() {
        println!("No portfolio data in period {period}.");
        return Ok(());
    }

    let compared = compare_to_benchmark(&portfolio, &market.price_index(benchmark));
    if compared.is_empty() {
        println!("No {benchmark} price at the start of the period, nothing to compare.");
        return Ok(());
    }

    let currency = valuator.reporting_currency().to_string();
    println!(
        "{}",
        render_comparison(benchmark, &currency, &portfolio, &compared)
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::{ConversionStatus, ValuationPoint};

    fn series(points: &[(u32, f64)]) -> ValuationSeries {
        ValuationSeries {
            points: points
                .iter()
                .map(|(d, value)| ValuationPoint {
                    date: NaiveDate::from_ymd_opt(2024, 1, *d).unwrap(),
                    value: *value,
                })
                .collect(),
            status: ConversionStatus::Converted,
        }
    }

    #[test]
    fn test_render_comparison() {
        let portfolio = series(&[(1, 1000.0), (8, 1100.0), (15, 1050.0)]);
        let benchmark = series(&[(1, 1000.0), (15, 1200.0)]);

        let output = render_comparison("MSCI World", "EUR", &portfolio, &benchmark);
        assert!(output.contains("MSCI World (EUR)"));
        assert!(output.contains("2024-01-08"));
        assert!(output.contains("N/A"));
        assert!(output.contains("1200.00"));
        assert!(output.contains("portfolio +5.00%, benchmark +20.00%"));
    }
}
