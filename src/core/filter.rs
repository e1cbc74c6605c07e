//! Pure derivation of the displayed subset from the full inventory.

use crate::record::InventoryRecord;

/// Returns the records whose name contains `query` as a case-insensitive
/// substring, in inventory order.
///
/// An empty query yields the full inventory. Recomputed on demand; inventories
/// are household scale, so nothing is memoized.
pub fn filter_by_name<'a>(
    inventory: &'a [InventoryRecord],
    query: &str,
) -> Vec<&'a InventoryRecord> {
    if query.is_empty() {
        return inventory.iter().collect();
    }

    let needle = query.to_lowercase();
    inventory
        .iter()
        .filter(|rec| rec.name.to_lowercase().contains(&needle))
        .collect()
}
