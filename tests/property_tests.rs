//! Property tests for normalization, aggregation and grouping

use order_analytics::prelude::*;
use proptest::prelude::*;

fn orders_from(quantities: &[u32]) -> Vec<Order> {
    quantities
        .iter()
        .enumerate()
        .map(|(i, q)| {
            let month = (i % 12) as u32 + 1;
            let year = 2020 + (i / 12) as i32;
            let ts = chrono::NaiveDate::from_ymd_opt(year, month, 10)
                .unwrap()
                .and_hms_opt(12, 0, 0)
                .unwrap();
            Order::new(ts, vec![LineItem::new("Bananas", "each", format!("{q} ea"), "0.29")])
        })
        .collect()
}

proptest! {
    #[test]
    fn total_units_is_exact_sum(quantities in prop::collection::vec(0u32..1000, 2..40)) {
        let orders = orders_from(&quantities);
        let normalized = NormalizedOrders::from_orders(&orders).unwrap();
        let result = aggregate(&ItemIdentity::new("Bananas", "each"), &normalized, &orders).unwrap();

        let expected: u32 = quantities.iter().sum();
        prop_assert_eq!(result.total_units, expected as f64);
    }

    #[test]
    fn total_units_invariant_under_reordering(
        quantities in prop::collection::vec(0u32..1000, 2..40),
        seed in any::<u64>(),
    ) {
        let orders = orders_from(&quantities);
        let mut shuffled = orders.clone();
        let len = shuffled.len();
        shuffled.rotate_left((seed as usize) % len);
        shuffled.reverse();

        let identity = ItemIdentity::new("Bananas", "each");
        let a = aggregate(&identity, &NormalizedOrders::from_orders(&orders).unwrap(), &orders).unwrap();
        let b = aggregate(&identity, &NormalizedOrders::from_orders(&shuffled).unwrap(), &shuffled).unwrap();

        prop_assert_eq!(a.total_units, b.total_units);
        prop_assert_eq!(a.average_units_per_month, b.average_units_per_month);
        prop_assert_eq!(a.average_units_per_order, b.average_units_per_order);
    }

    #[test]
    fn grouping_keeps_every_identity(names in prop::collection::btree_set("[A-Za-z]{1,6}( [A-Za-z]{1,6}){0,2}", 0..20)) {
        let identities: Vec<ItemIdentity> = names.iter().map(|n| ItemIdentity::new(n.clone(), "each")).collect();
        let mut grouped = group_identities(&identities);
        prop_assert_eq!(grouped.len(), identities.len());

        grouped.sort();
        let mut expected = identities.clone();
        expected.sort();
        prop_assert_eq!(grouped, expected);
    }

    #[test]
    fn numeric_parse_roundtrip(whole in 0u32..100_000, unit in "[a-z]{0,3}") {
        let raw = format!("{whole} {unit}");
        let parsed = order_analytics::normalize::parse_numeric(&raw, "quantity").unwrap();
        prop_assert_eq!(parsed, whole as f64);
    }
}
