use super::ui;
use crate::core::valuation::{HoldingDetail, PeriodTotals};
use crate::core::{ReportPeriod, ValuationScope, Valuator};
use anyhow::Result;
use chrono::NaiveDate;
use comfy_table::Cell;
use tracing::info;

/// Holding details and totals of one scope, ready to display.
#[derive(Debug)]
pub struct Summary {
    pub title: String,
    pub currency: String,
    pub holdings: Vec<HoldingDetail>,
    pub totals: PeriodTotals,
}

impl Summary {
    pub fn display_as_table(&self) -> String {
        let currency = &self.currency;
        let period = self.totals.period;

        let mut table = ui::new_styled_table();
        table.set_header(vec![
            ui::header_cell("Instrument"),
            ui::header_cell("Quantity"),
            ui::header_cell("Price"),
            ui::header_cell(&format!("Price ({period})")),
            ui::header_cell(&format!("Value ({currency})")),
            ui::header_cell(&format!("Change ({period})")),
            ui::header_cell("Weight (%)"),
        ]);

        for holding in &self.holdings {
            let price_currency = &holding.currency;
            table.add_row(vec![
                Cell::new(&holding.name),
                ui::value_cell(format!("{:.4}", holding.quantity)),
                ui::format_optional_cell(holding.price, |p| {
                    format!("{:.2}{price_currency}", p.value)
                }),
                ui::format_optional_cell(holding.reference_price, |p| {
                    format!("{:.2}{price_currency}", p.value)
                }),
                ui::format_optional_cell(holding.value, |v| format!("{v:.2}")),
                ui::change_cell(holding.change_pct),
                ui::format_optional_cell(holding.weight, |w| format!("{w:.2}%")),
            ]);
        }

        let (total_style, total_text) = match self.totals.current {
            Some(v) => (ui::StyleType::TotalValue, format!("{v:.2}")),
            None => (ui::StyleType::Error, "N/A".to_string()),
        };
        let previous_text = self
            .totals
            .previous
            .map_or("N/A".to_string(), |v| format!("{v:.2}"));
        let change_text = self
            .totals
            .change_pct
            .map_or("N/A".to_string(), |c| format!("{c:+.2}%"));

        let mut output = format!(
            "Summary: {}\n\n",
            ui::style_text(&self.title, ui::StyleType::Title)
        );
        output.push_str(&table.to_string());
        output.push_str(&format!(
            "\n\nTotal Value ({}): {}",
            ui::style_text(currency, ui::StyleType::TotalLabel),
            ui::style_text(&total_text, total_style)
        ));
        output.push_str(&format!(
            "\nPrevious Value ({period}): {previous_text}  Change: {change_text}"
        ));
        output.push_str(&ui::status_note(self.totals.status, currency));
        output
    }
}

pub fn build_summary(
    valuator: &mut Valuator<'_>,
    scope: &ValuationScope,
    period: ReportPeriod,
    today: NaiveDate,
) -> Summary {
    Summary {
        title: scope.to_string(),
        currency: valuator.reporting_currency().to_string(),
        holdings: valuator.holding_details(scope, period, today),
        totals: valuator.totals(scope, period, today),
    }
}

pub fn run(valuator: &mut Valuator<'_>, period: ReportPeriod, today: NaiveDate) -> Result<()> {
    info!("Summarizing portfolio for {period} as of {today}");
    let summary = build_summary(valuator, &ValuationScope::Portfolio, period, today);
    if summary.holdings.is_empty() {
        println!("No holdings found to summarize.");
        return Ok(());
    }
    println!("{}", summary.display_as_table());
    Ok(())
}
