use crate::core::ConversionStatus;
use anyhow::Result;
use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

/// Defines different styles for text elements.
pub enum StyleType {
    Title,
    TotalLabel,
    TotalValue,
    Error,
    Subtle,
}

/// Applies a consistent style to a string.
pub fn style_text(text: &str, style_type: StyleType) -> String {
    let styled = match style_type {
        StyleType::Title => style(text).bold().underlined(),
        StyleType::TotalLabel => style(text).bold(),
        StyleType::TotalValue => style(text).green().bold(),
        StyleType::Error => style(text).red(),
        StyleType::Subtle => style(text).dim(),
    };
    styled.to_string()
}

/// Creates a new `comfy_table::Table` with standard styling.
pub fn new_styled_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Creates a styled header cell for a table.
pub fn header_cell(text: &str) -> Cell {
    Cell::new(text)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

/// Right-aligned numeric cell.
pub fn value_cell(text: String) -> Cell {
    Cell::new(text).set_alignment(CellAlignment::Right)
}

/// Formats an `Option<T>` into a `Cell`. `None` is displayed as "N/A".
pub fn format_optional_cell<T>(value: Option<T>, format_fn: impl Fn(T) -> String) -> Cell {
    value.map_or(
        Cell::new("N/A")
            .fg(Color::DarkGrey)
            .set_alignment(CellAlignment::Right),
        |v| value_cell(format_fn(v)),
    )
}

/// Creates a cell for displaying percentage change with color coding.
pub fn change_cell(change: Option<f64>) -> Cell {
    match change {
        Some(change) => {
            let color = if change >= 0.0 { Color::Green } else { Color::Red };
            value_cell(format!("{change:+.2}%")).fg(color)
        }
        None => format_optional_cell(None::<f64>, |_| String::new()),
    }
}

/// Footer line describing a degraded conversion, empty when values are sound.
pub fn status_note(status: ConversionStatus, currency: &str) -> String {
    match status {
        ConversionStatus::Native | ConversionStatus::Converted => String::new(),
        ConversionStatus::FallbackRate => format!(
            "\n{}",
            style_text(
                &format!("Some values use a later exchange rate than their date into {currency}."),
                StyleType::Subtle
            )
        ),
        ConversionStatus::Unconverted => format!(
            "\n{}",
            style_text(
                &format!("Some values could not be converted to {currency} and are summed in their own currency."),
                StyleType::Error
            )
        ),
    }
}

/// Creates a new `indicatif::ProgressBar` with standard styling.
pub fn new_progress_bar(len: u64, with_message: bool) -> Result<ProgressBar> {
    let template = if with_message {
        "{spinner:.green} {msg} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})"
    } else {
        "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})"
    };

    let pb = ProgressBar::new(len);
    pb.set_style(
        ProgressStyle::default_bar()
            .template(template)?
            .progress_chars("#>-"),
    );
    Ok(pb)
}
