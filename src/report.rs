//! Console and CSV rendering of aggregation results

use crate::aggregate::AggregationResult;
use crate::error::{AnalyticsError, Result};
use crate::types::{format_timestamp, ItemIdentity};
use std::fmt::Write as _;
use std::io::{BufRead, Write};

/// Header row of the batch CSV
pub const CSV_HEADER: [&str; 6] = [
    "Product Name",
    "Unit Description",
    "Total Units",
    "Average Units per Month",
    "Average Units per Order",
    "Price Fluctuations",
];

/// Numbered menu of identities, one per line, starting at 1
pub fn format_item_list(identities: &[ItemIdentity]) -> String {
    let mut out = String::new();
    for (index, identity) in identities.iter().enumerate() {
        let _ = writeln!(out, "{}. {}", index + 1, identity);
    }
    out
}

/// Resolve a 1-based menu entry typed by the user
pub fn select_item<'a>(identities: &'a [ItemIdentity], input: &str) -> Result<&'a ItemIdentity> {
    let trimmed = input.trim();
    let selection: usize = trimmed
        .parse()
        .map_err(|_| AnalyticsError::InvalidSelection(trimmed.to_string()))?;

    selection
        .checked_sub(1)
        .and_then(|index| identities.get(index))
        .ok_or(AnalyticsError::SelectionOutOfRange {
            selection,
            count: identities.len(),
        })
}

/// Print the menu and read one selection
pub fn prompt_selection<'a, R: BufRead, W: Write>(
    identities: &'a [ItemIdentity],
    input: &mut R,
    output: &mut W,
) -> Result<&'a ItemIdentity> {
    writeln!(output, "List of unique items (ordered by string similarity):")?;
    write!(output, "{}", format_item_list(identities))?;
    write!(output, "Select an item by entering its number: ")?;
    output.flush()?;

    let mut line = String::new();
    input.read_line(&mut line)?;
    select_item(identities, &line)
}

/// Human-readable summary of a single item
pub fn format_summary(result: &AggregationResult, precision: usize) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "You have ordered {} units of {}.",
        result.total_units, result.identity
    );
    let _ = writeln!(
        out,
        "Average units per month: {:.*}",
        precision, result.average_units_per_month
    );
    let _ = writeln!(
        out,
        "Average units per order: {:.*}",
        precision, result.average_units_per_order
    );

    if result.price_changes.is_empty() {
        let _ = writeln!(out, "No price fluctuations data available.");
    } else {
        let _ = writeln!(out, "Price fluctuations:");
        for change in &result.price_changes {
            let direction = if change.is_increase() { "increased" } else { "decreased" };
            let _ = writeln!(
                out,
                "- Price {} by ${:.*} on {}",
                direction,
                precision,
                change.delta.abs(),
                format_timestamp(&change.date_time)
            );
        }
    }
    out
}

/// Stable sort, highest monthly consumption first
pub fn sort_by_monthly_rate(results: &mut [AggregationResult]) {
    results.sort_by(|a, b| b.average_units_per_month.total_cmp(&a.average_units_per_month));
}

fn strip_quotes(field: &str) -> String {
    field.replace('"', "")
}

fn price_fluctuations(result: &AggregationResult) -> String {
    result
        .price_changes
        .iter()
        .map(|change| change.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Write the batch table, rows in the order given
pub fn write_csv<W: Write>(results: &[AggregationResult], writer: W) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(CSV_HEADER)?;

    for result in results {
        wtr.write_record([
            strip_quotes(&result.identity.name),
            strip_quotes(&result.identity.unit_description),
            strip_quotes(&result.total_units.to_string()),
            strip_quotes(&format!("{:.2}", result.average_units_per_month)),
            strip_quotes(&format!("{:.2}", result.average_units_per_order)),
            strip_quotes(&price_fluctuations(result)),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

/// Render the batch table fully in memory
pub fn render_csv(results: &[AggregationResult]) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    write_csv(results, &mut buffer)?;
    Ok(buffer)
}
