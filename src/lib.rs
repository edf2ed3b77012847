//! # order_analytics
//!
//! Per-item analytics over a retail order history.
//!
//! Orders are loaded from a JSON export, cancelled orders and orders at or
//! before an optional threshold are dropped, and line items are keyed by
//! their exact (name, unit description) pair. Near-duplicate listings are
//! ordered next to each other by fuzzy name similarity, and each item gets
//! its consumption rate and price-change history.
//!
//! ## Example
//!
//! ```rust,no_run
//! use order_analytics::prelude::*;
//! use std::path::Path;
//!
//! fn main() -> Result<()> {
//!     let orders = load_orders(Path::new("orders.json"))?;
//!     let analysis = Analysis::prepare(orders, &OrderFilter::default())?;
//!
//!     for result in analysis.batch()? {
//!         println!("{}: {:.2}/month", result.identity, result.average_units_per_month);
//!     }
//!     Ok(())
//! }
//! ```

pub mod aggregate;
pub mod analysis;
pub mod error;
pub mod grouping;
pub mod ingest;
pub mod normalize;
pub mod report;
pub mod similarity;
pub mod types;

pub mod prelude {
    //! Commonly used types and functions
    pub use crate::aggregate::{aggregate, aggregate_all, AggregationResult};
    pub use crate::analysis::{run_analysis, Analysis, AnalysisConfig, RunMode, RunOutcome};
    pub use crate::error::{AnalyticsError, Result};
    pub use crate::grouping::group_identities;
    pub use crate::ingest::{load_orders, parse_orders, OrderFilter};
    pub use crate::normalize::NormalizedOrders;
    pub use crate::types::*;
}
