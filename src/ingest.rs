//! Loading order files and selecting the orders that survive filtering

use crate::error::Result;
use crate::types::{Order, Timestamp};
use std::fs;
use std::path::Path;

/// Parse an order history from JSON text
pub fn parse_orders(json: &str) -> Result<Vec<Order>> {
    Ok(serde_json::from_str(json)?)
}

/// Read and parse an order history file
pub fn load_orders(path: &Path) -> Result<Vec<Order>> {
    let contents = fs::read_to_string(path)?;
    let orders = parse_orders(&contents)?;
    log::info!("Loaded {} orders from {}", orders.len(), path.display());
    Ok(orders)
}

/// Which orders take part in the analysis
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct OrderFilter {
    /// Keep only orders strictly after this moment
    pub after: Option<Timestamp>,
}

impl OrderFilter {
    pub fn after(threshold: Timestamp) -> Self {
        Self {
            after: Some(threshold),
        }
    }

    /// Check whether a single order survives
    pub fn accepts(&self, order: &Order) -> bool {
        if order.cancelled {
            return false;
        }
        match self.after {
            Some(threshold) => order.date_time > threshold,
            None => true,
        }
    }

    /// Drop cancelled orders and orders at or before the threshold
    pub fn apply(&self, orders: Vec<Order>) -> Vec<Order> {
        let total = orders.len();
        let cancelled = orders.iter().filter(|o| o.cancelled).count();
        let surviving: Vec<Order> = orders.into_iter().filter(|o| self.accepts(o)).collect();

        log::info!(
            "{} of {} orders survive ({} cancelled, {} at or before threshold)",
            surviving.len(),
            total,
            cancelled,
            total - cancelled - surviving.len()
        );
        surviving
    }
}
