//! Core types and constants

use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

use crate::error::{AnalyticsError, Result};

/// Timestamp type used throughout the library (minute precision, no zone)
pub type Timestamp = NaiveDateTime;

/// Price type (using f64 for precision)
pub type Price = f64;

/// Quantity type
pub type Quantity = f64;

/// Format of `dateTime` in order files and of the `--after` threshold
pub const DATE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Parse a `YYYY-MM-DD HH:MM` string
pub fn parse_timestamp(raw: &str) -> Result<Timestamp> {
    NaiveDateTime::parse_from_str(raw.trim(), DATE_TIME_FORMAT).map_err(|_| {
        AnalyticsError::InvalidDateTime {
            raw: raw.to_string(),
        }
    })
}

/// Format a timestamp the way it appears in order files
pub fn format_timestamp(ts: &Timestamp) -> String {
    ts.format(DATE_TIME_FORMAT).to_string()
}

mod date_time_serde {
    use super::*;

    pub fn serialize<S: Serializer>(ts: &Timestamp, s: S) -> std::result::Result<S::Ok, S::Error> {
        s.serialize_str(&format_timestamp(ts))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<Timestamp, D::Error> {
        let raw = String::deserialize(d)?;
        parse_timestamp(&raw).map_err(serde::de::Error::custom)
    }
}

/// A single purchase order
///
/// Acquisition also records `itemCount`, `total`, `url` and
/// `delivery_photo_url`; those are accepted and ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    #[serde(with = "date_time_serde")]
    pub date_time: Timestamp,
    #[serde(default)]
    pub cancelled: bool,
    pub items: Vec<LineItem>,
}

impl Order {
    /// Create a non-cancelled order
    pub fn new(date_time: Timestamp, items: Vec<LineItem>) -> Self {
        Self {
            date_time,
            cancelled: false,
            items,
        }
    }

    /// Mark the order as cancelled
    pub fn cancelled(mut self) -> Self {
        self.cancelled = true;
        self
    }
}

/// A line item as logged by the store, numeric fields still raw
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    pub name: String,
    pub unit_description: String,
    /// e.g. "3 ea"
    pub quantity: String,
    /// e.g. "4.99", currency symbol already removed
    pub unit_price: String,
}

impl LineItem {
    pub fn new(
        name: impl Into<String>,
        unit_description: impl Into<String>,
        quantity: impl Into<String>,
        unit_price: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            unit_description: unit_description.into(),
            quantity: quantity.into(),
            unit_price: unit_price.into(),
        }
    }

    /// The exact-match key this line item is grouped under
    pub fn identity(&self) -> ItemIdentity {
        ItemIdentity::new(self.name.clone(), self.unit_description.clone())
    }
}

/// Exact (name, unit description) pair identifying a distinct raw listing
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ItemIdentity {
    pub name: String,
    pub unit_description: String,
}

impl ItemIdentity {
    pub fn new(name: impl Into<String>, unit_description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            unit_description: unit_description.into(),
        }
    }
}

impl fmt::Display for ItemIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.name, self.unit_description)
    }
}

/// Difference between an occurrence's unit price and the one before it
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceChange {
    pub date_time: Timestamp,
    pub delta: Price,
}

impl PriceChange {
    pub fn is_increase(&self) -> bool {
        self.delta > 0.0
    }
}

impl fmt::Display for PriceChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:+.2} on {}", self.delta, format_timestamp(&self.date_time))
    }
}
