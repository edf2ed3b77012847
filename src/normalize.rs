//! Record normalization: raw line items to per-identity numeric series

use crate::error::{AnalyticsError, Result};
use crate::types::{ItemIdentity, Order, Price, Quantity, Timestamp};
use hashbrown::HashMap;

/// Extract the number embedded in a raw field like `"3 ea"` or `"$4.99"`.
///
/// Every character that is not an ASCII digit or `.` is discarded first, so
/// unit labels and currency symbols never reach the float parser. An empty
/// or otherwise unparseable remainder is an error, never zero.
pub fn parse_numeric(raw: &str, field: &'static str) -> Result<f64> {
    let digits: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();

    digits.parse::<f64>().map_err(|_| AnalyticsError::InvalidNumber {
        field,
        raw: raw.to_string(),
    })
}

/// Quantity and price series for every distinct item identity
#[derive(Debug, Clone, Default)]
pub struct NormalizedOrders {
    quantities: HashMap<ItemIdentity, Vec<Quantity>>,
    prices: HashMap<ItemIdentity, Vec<(Timestamp, Price)>>,
}

impl NormalizedOrders {
    /// Normalize every line item of the given (already filtered) orders
    pub fn from_orders(orders: &[Order]) -> Result<Self> {
        let mut normalized = Self::default();

        for order in orders {
            for item in &order.items {
                let quantity = parse_numeric(&item.quantity, "quantity")?;
                let price = parse_numeric(&item.unit_price, "unit price")?;
                normalized.record(item.identity(), order.date_time, quantity, price);
            }
        }

        log::debug!("Normalized {} distinct items", normalized.len());
        Ok(normalized)
    }

    /// Append one occurrence of an item
    pub fn record(&mut self, identity: ItemIdentity, at: Timestamp, quantity: Quantity, price: Price) {
        self.prices
            .entry(identity.clone())
            .or_insert_with(Vec::new)
            .push((at, price));
        self.quantities
            .entry(identity)
            .or_insert_with(Vec::new)
            .push(quantity);
    }

    /// Parsed quantities of an item, one per occurrence
    pub fn quantities(&self, identity: &ItemIdentity) -> Option<&[Quantity]> {
        self.quantities.get(identity).map(|v| v.as_slice())
    }

    /// (date, unit price) pairs of an item in arrival order
    pub fn prices(&self, identity: &ItemIdentity) -> Option<&[(Timestamp, Price)]> {
        self.prices.get(identity).map(|v| v.as_slice())
    }

    /// Every distinct identity, in no particular order
    pub fn identities(&self) -> Vec<ItemIdentity> {
        self.quantities.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.quantities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quantities.is_empty()
    }
}
