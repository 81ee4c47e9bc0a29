use super::ui;
use crate::core::{ReportPeriod, ValuationScope, ValuationSeries, Valuator};
use anyhow::Result;
use chrono::NaiveDate;
use comfy_table::Cell;
use tracing::info;

/// Renders a series as a date/value table with the change over the series.
/// `currency` is the reporting currency the values were converted into,
/// which differs from `unit` for derived series such as gold.
pub fn render_series(
    title: &str,
    unit: &str,
    currency: &str,
    series: &ValuationSeries,
    precision: usize,
) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Date"),
        ui::header_cell(&format!("Value ({unit})")),
    ]);
    for point in &series.points {
        table.add_row(vec![
            Cell::new(point.date.to_string()),
            ui::value_cell(format!("{:.precision$}", point.value)),
        ]);
    }

    let change_text = series
        .change_pct()
        .map_or("N/A".to_string(), |c| format!("{c:+.2}%"));

    let mut output = format!("{}\n\n", ui::style_text(title, ui::StyleType::Title));
    output.push_str(&table.to_string());
    output.push_str(&format!(
        "\n\n{}: {}",
        ui::style_text("Change", ui::StyleType::TotalLabel),
        change_text
    ));
    output.push_str(&ui::status_note(series.status, currency));
    output
}

pub fn run(
    valuator: &mut Valuator<'_>,
    scope: &ValuationScope,
    period: ReportPeriod,
    today: NaiveDate,
) -> Result<()> {
    info!("Building {period} series for {scope}");
    let series = valuator.series(scope, period.cutoff(today));
    if series.is_empty() {
        println!("No data for {scope} in period {period}.");
        return Ok(());
    }

    let currency = valuator.reporting_currency().to_string();
    let title = format!("{scope} ({period})");
    println!("{}", render_series(&title, &currency, &currency, &series, 2));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::{ConversionStatus, ValuationPoint};

    #[test]
    fn test_render_series() {
        let series = ValuationSeries {
            points: vec![
                ValuationPoint {
                    date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                    value: 900.0,
                },
                ValuationPoint {
                    date: NaiveDate::from_ymd_opt(2024, 1, 8).unwrap(),
                    value: 990.0,
                },
            ],
            status: ConversionStatus::Unconverted,
        };

        let output = render_series("portfolio (1M)", "EUR", "EUR", &series, 2);
        assert!(output.contains("2024-01-08"));
        assert!(output.contains("990.00"));
        assert!(output.contains("+10.00%"));
        assert!(output.contains("could not be converted to EUR"));
    }

    #[test]
    fn test_status_note_names_reporting_currency() {
        let series = ValuationSeries {
            points: vec![ValuationPoint {
                date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                value: 1.2345,
            }],
            status: ConversionStatus::Unconverted,
        };

        let output = render_series("portfolio in gold (1M)", "oz", "EUR", &series, 4);
        assert!(output.contains("Value (oz)"));
        assert!(output.contains("1.2345"));
        assert!(output.contains("could not be converted to EUR"));
        assert!(!output.contains("converted to oz"));
    }
}
