use proptest::prelude::*;

use shelfsmart::{core::filter::filter_by_name, record::InventoryRecord};

fn record(name: &str, quantity: u32) -> InventoryRecord {
    InventoryRecord {
        id: name.to_string(),
        name: name.to_string(),
        quantity,
        expiration: "2024-12-01".to_string(),
    }
}

fn inventory_strategy() -> impl Strategy<Value = Vec<InventoryRecord>> {
    prop::collection::vec(("[a-zA-Z ]{0,10}", 0u32..100), 0..20).prop_map(|items| {
        items
            .into_iter()
            .enumerate()
            .map(|(idx, (name, quantity))| InventoryRecord {
                id: format!("rec-{idx:06}"),
                name,
                quantity,
                expiration: "2024-12-01".to_string(),
            })
            .collect()
    })
}

proptest! {
    #[test]
    fn filtered_view_is_an_ordered_subsequence(
        inventory in inventory_strategy(),
        query in "[a-zA-Z ]{0,5}",
    ) {
        let filtered = filter_by_name(&inventory, &query);

        // Subset, and in inventory order.
        let mut cursor = 0usize;
        for rec in &filtered {
            let pos = inventory[cursor..]
                .iter()
                .position(|candidate| std::ptr::eq(candidate, *rec));
            prop_assert!(pos.is_some(), "filtered record not found in inventory order");
            cursor += pos.unwrap() + 1;
        }
    }

    #[test]
    fn every_match_contains_query_case_insensitively(
        inventory in inventory_strategy(),
        query in "[a-zA-Z ]{1,5}",
    ) {
        let filtered = filter_by_name(&inventory, &query);
        let needle = query.to_lowercase();

        for rec in &filtered {
            prop_assert!(rec.name.to_lowercase().contains(&needle));
        }

        // Nothing matching was left out.
        let expected = inventory
            .iter()
            .filter(|rec| rec.name.to_lowercase().contains(&needle))
            .count();
        prop_assert_eq!(filtered.len(), expected);
    }

    #[test]
    fn empty_query_yields_full_inventory(inventory in inventory_strategy()) {
        let filtered = filter_by_name(&inventory, "");
        prop_assert_eq!(filtered.len(), inventory.len());
        for (got, expected) in filtered.iter().zip(inventory.iter()) {
            prop_assert_eq!(*got, expected);
        }
    }

    #[test]
    fn query_casing_never_changes_the_result(
        inventory in inventory_strategy(),
        query in "[a-zA-Z]{1,5}",
    ) {
        let lower = filter_by_name(&inventory, &query.to_lowercase());
        let upper = filter_by_name(&inventory, &query.to_uppercase());
        prop_assert_eq!(lower, upper);
    }
}

#[test]
fn substring_match_is_case_insensitive() {
    let inventory = vec![record("Milk", 2), record("Oat Milk", 1), record("Eggs", 12)];

    let filtered = filter_by_name(&inventory, "milk");
    let names: Vec<&str> = filtered.iter().map(|rec| rec.name.as_str()).collect();
    assert_eq!(names, vec!["Milk", "Oat Milk"]);

    assert!(filter_by_name(&inventory, "MILKSHAKE").is_empty());
}
