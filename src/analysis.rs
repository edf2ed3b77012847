//! Pipeline entry point: load, filter, normalize, group, aggregate, report

use crate::aggregate::{aggregate, aggregate_all, AggregationResult};
use crate::error::Result;
use crate::grouping::group_identities;
use crate::ingest::{load_orders, OrderFilter};
use crate::normalize::NormalizedOrders;
use crate::report::{format_item_list, format_summary, prompt_selection, render_csv, select_item, sort_by_monthly_rate};
use crate::types::{ItemIdentity, Order, Timestamp};
use std::ffi::OsString;
use std::fs;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

/// Suffix appended to the input path for the batch CSV
pub const DEFAULT_OUTPUT_SUFFIX: &str = ".analysis.csv";

/// Decimal places used in the console summary
pub const DEFAULT_PRICE_PRECISION: usize = 2;

/// What a run produces
#[derive(Debug, Clone, PartialEq)]
pub enum RunMode {
    /// Summarize one item, chosen by 1-based ordinal or interactively
    Select { item: Option<usize> },
    /// Aggregate every item into a CSV table
    Batch { output: Option<PathBuf> },
    /// Only print the grouped item list
    List,
}

/// Everything a run needs, resolved from CLI flags and config
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    pub input: PathBuf,
    pub after: Option<Timestamp>,
    pub mode: RunMode,
    pub output_suffix: String,
    pub price_precision: usize,
}

impl AnalysisConfig {
    pub fn new(input: impl Into<PathBuf>, mode: RunMode) -> Self {
        Self {
            input: input.into(),
            after: None,
            mode,
            output_suffix: DEFAULT_OUTPUT_SUFFIX.to_string(),
            price_precision: DEFAULT_PRICE_PRECISION,
        }
    }

    pub fn with_after(mut self, after: Option<Timestamp>) -> Self {
        self.after = after;
        self
    }
}

/// `<input><suffix>`, appended to the full file name
pub fn default_output_path(input: &Path, suffix: &str) -> PathBuf {
    let mut path: OsString = input.as_os_str().to_owned();
    path.push(suffix);
    PathBuf::from(path)
}

/// Surviving orders with their normalized series and grouped identities
#[derive(Debug, Clone)]
pub struct Analysis {
    orders: Vec<Order>,
    normalized: NormalizedOrders,
    identities: Vec<ItemIdentity>,
}

impl Analysis {
    /// Filter, normalize and group a raw order history
    pub fn prepare(orders: Vec<Order>, filter: &OrderFilter) -> Result<Self> {
        let orders = filter.apply(orders);
        let normalized = NormalizedOrders::from_orders(&orders)?;
        let identities = group_identities(&normalized.identities());
        log::info!("Found {} distinct items", identities.len());

        Ok(Self {
            orders,
            normalized,
            identities,
        })
    }

    /// Identities in grouped (similarity) order
    pub fn identities(&self) -> &[ItemIdentity] {
        &self.identities
    }

    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    pub fn aggregate(&self, identity: &ItemIdentity) -> Result<AggregationResult> {
        aggregate(identity, &self.normalized, &self.orders)
    }

    /// Every item, highest monthly consumption first
    pub fn batch(&self) -> Result<Vec<AggregationResult>> {
        let mut results = aggregate_all(&self.identities, &self.normalized, &self.orders)?;
        sort_by_monthly_rate(&mut results);
        Ok(results)
    }
}

/// What a completed run did
#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome {
    CsvWritten { path: PathBuf, rows: usize },
    Summarized(AggregationResult),
    Listed(usize),
}

/// Run the whole pipeline for one input file.
///
/// `input` and `output` are the console streams used by interactive
/// selection and by the text reports. In batch mode the CSV is rendered in
/// memory first, so a failure never leaves a partial file behind.
pub fn run_analysis<R: BufRead, W: Write>(
    config: &AnalysisConfig,
    input: &mut R,
    output: &mut W,
) -> Result<RunOutcome> {
    let orders = load_orders(&config.input)?;
    let filter = OrderFilter { after: config.after };
    let analysis = Analysis::prepare(orders, &filter)?;

    match &config.mode {
        RunMode::Batch { output: target } => {
            let results = analysis.batch()?;
            let bytes = render_csv(&results)?;
            let path = target
                .clone()
                .unwrap_or_else(|| default_output_path(&config.input, &config.output_suffix));
            fs::write(&path, bytes)?;
            log::info!("Wrote {} rows to {}", results.len(), path.display());
            Ok(RunOutcome::CsvWritten {
                path,
                rows: results.len(),
            })
        }
        RunMode::Select { item } => {
            let identity = match item {
                Some(ordinal) => select_item(analysis.identities(), &ordinal.to_string())?,
                None => prompt_selection(analysis.identities(), input, output)?,
            };
            let result = analysis.aggregate(identity)?;
            writeln!(output)?;
            write!(output, "{}", format_summary(&result, config.price_precision))?;
            Ok(RunOutcome::Summarized(result))
        }
        RunMode::List => {
            writeln!(output, "List of unique items (ordered by string similarity):")?;
            write!(output, "{}", format_item_list(analysis.identities()))?;
            Ok(RunOutcome::Listed(analysis.identities().len()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{parse_timestamp, LineItem};

    #[test]
    fn test_default_output_path_appends_suffix() {
        let path = default_output_path(Path::new("/tmp/orders.json"), DEFAULT_OUTPUT_SUFFIX);
        assert_eq!(path, PathBuf::from("/tmp/orders.json.analysis.csv"));
    }

    #[test]
    fn test_prepare_groups_surviving_items_only() {
        let orders = vec![
            Order::new(
                parse_timestamp("2024-01-05 10:00").unwrap(),
                vec![LineItem::new("Bananas", "each", "1 ea", "0.29")],
            ),
            Order::new(
                parse_timestamp("2024-02-05 10:00").unwrap(),
                vec![LineItem::new("Whole Milk", "1L", "1 ea", "2.49")],
            )
            .cancelled(),
        ];

        let analysis = Analysis::prepare(orders, &OrderFilter::default()).unwrap();
        assert_eq!(analysis.orders().len(), 1);
        assert_eq!(analysis.identities(), &[ItemIdentity::new("Bananas", "each")]);
    }

    #[test]
    fn test_config_defaults() {
        let config = AnalysisConfig::new("orders.json", RunMode::List);
        assert_eq!(config.output_suffix, ".analysis.csv");
        assert_eq!(config.price_precision, 2);
        assert!(config.after.is_none());
    }
}
