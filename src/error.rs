//! Error types for order analytics

use thiserror::Error;

/// Main error type for order analytics
#[derive(Error, Debug)]
pub enum AnalyticsError {
    #[error("Invalid {field} value {raw:?}: no parseable number after stripping non-numeric characters")]
    InvalidNumber { field: &'static str, raw: String },

    #[error("Invalid date/time {raw:?}: expected YYYY-MM-DD HH:MM")]
    InvalidDateTime { raw: String },

    #[error("No orders left to analyze after filtering")]
    NoOrders,

    #[error(
        "Division by zero: all {order_count} orders fall in the same calendar month ({month}), \
         monthly average is undefined"
    )]
    ZeroMonthSpan { order_count: usize, month: String },

    #[error("Unknown item: {name} - {unit_description}")]
    UnknownItem {
        name: String,
        unit_description: String,
    },

    #[error("Selection {selection} out of range: choose a number between 1 and {count}")]
    SelectionOutOfRange { selection: usize, count: usize },

    #[error("Invalid selection {0:?}: expected an item number")]
    InvalidSelection(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
}

/// Result type alias for order analytics operations
pub type Result<T> = std::result::Result<T, AnalyticsError>;
