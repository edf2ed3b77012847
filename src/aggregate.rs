//! Per-item consumption and price statistics

use crate::error::{AnalyticsError, Result};
use crate::normalize::NormalizedOrders;
use crate::types::{ItemIdentity, Order, Price, PriceChange, Quantity, Timestamp};
use chrono::Datelike;
use serde::{Deserialize, Serialize};

/// Calendar months between two moments, ignoring the day of month
pub fn month_span(start: &Timestamp, end: &Timestamp) -> i32 {
    (end.year() * 12 + end.month() as i32) - (start.year() * 12 + start.month() as i32)
}

/// Consecutive price differences, in arrival order.
///
/// Only occurrences whose price differs from the one right before them are
/// reported. The series is never re-sorted by date.
pub fn price_changes(prices: &[(Timestamp, Price)]) -> Vec<PriceChange> {
    prices
        .windows(2)
        .filter(|w| w[1].1 != w[0].1)
        .map(|w| PriceChange {
            date_time: w[1].0,
            delta: w[1].1 - w[0].1,
        })
        .collect()
}

/// Denominators shared by every item: the surviving order set as a whole
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrderWindow {
    pub order_count: usize,
    pub first: Timestamp,
    pub last: Timestamp,
}

impl OrderWindow {
    /// Compute the window over all surviving orders
    pub fn from_orders(orders: &[Order]) -> Result<Self> {
        let first = orders.iter().map(|o| o.date_time).min();
        let last = orders.iter().map(|o| o.date_time).max();

        match (first, last) {
            (Some(first), Some(last)) => Ok(Self {
                order_count: orders.len(),
                first,
                last,
            }),
            _ => Err(AnalyticsError::NoOrders),
        }
    }

    pub fn month_span(&self) -> i32 {
        month_span(&self.first, &self.last)
    }

    /// Units per calendar month; fails when every order is in one month
    pub fn per_month(&self, units: Quantity) -> Result<f64> {
        let months = self.month_span();
        if months == 0 {
            return Err(AnalyticsError::ZeroMonthSpan {
                order_count: self.order_count,
                month: self.first.format("%Y-%m").to_string(),
            });
        }
        Ok(units / months as f64)
    }

    /// Units per surviving order, whether or not the order contains the item
    pub fn per_order(&self, units: Quantity) -> f64 {
        units / self.order_count as f64
    }
}

/// Statistics for one item identity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregationResult {
    pub identity: ItemIdentity,
    pub total_units: Quantity,
    pub average_units_per_month: f64,
    pub average_units_per_order: f64,
    pub price_changes: Vec<PriceChange>,
}

fn aggregate_in_window(
    identity: &ItemIdentity,
    normalized: &NormalizedOrders,
    window: &OrderWindow,
) -> Result<AggregationResult> {
    let unknown = || AnalyticsError::UnknownItem {
        name: identity.name.clone(),
        unit_description: identity.unit_description.clone(),
    };
    let quantities = normalized.quantities(identity).ok_or_else(unknown)?;
    let prices = normalized.prices(identity).ok_or_else(unknown)?;

    let total_units: Quantity = quantities.iter().sum();

    Ok(AggregationResult {
        identity: identity.clone(),
        total_units,
        average_units_per_month: window.per_month(total_units)?,
        average_units_per_order: window.per_order(total_units),
        price_changes: price_changes(prices),
    })
}

/// Aggregate a single identity against the surviving orders
pub fn aggregate(
    identity: &ItemIdentity,
    normalized: &NormalizedOrders,
    orders: &[Order],
) -> Result<AggregationResult> {
    let window = OrderWindow::from_orders(orders)?;
    aggregate_in_window(identity, normalized, &window)
}

/// Aggregate every identity, in the order given
pub fn aggregate_all(
    identities: &[ItemIdentity],
    normalized: &NormalizedOrders,
    orders: &[Order],
) -> Result<Vec<AggregationResult>> {
    let window = OrderWindow::from_orders(orders)?;
    log::debug!(
        "Aggregating {} items over {} orders spanning {} months",
        identities.len(),
        window.order_count,
        window.month_span()
    );

    identities
        .iter()
        .map(|identity| aggregate_in_window(identity, normalized, &window))
        .collect()
}
