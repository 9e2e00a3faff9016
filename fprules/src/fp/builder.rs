use super::budget::{MiningError, NodeBudget};
use super::frequency::FrequencyTable;
use super::index::ItemId;
use super::tree::FPTree;

/// Builds the tree of one batch: counts items, then inserts every path
/// reduced to its frequent items in rank order.
///
/// The top-level batch is the input transactions with weight 1; deeper
/// batches are conditional pattern bases.
pub fn build_fp_tree(
    batch: &[(Vec<ItemId>, usize)],
    min_support_count: usize,
    budget: &NodeBudget,
) -> Result<(FPTree, FrequencyTable), MiningError> {
    let table = FrequencyTable::from_weighted(batch, min_support_count);
    let mut fp_tree = FPTree::new();

    if table.is_empty() {
        return Ok((fp_tree, table));
    }

    for (path, count) in batch {
        let ordered = table.canonicalize(path);
        if ordered.is_empty() {
            continue;
        }
        let created = fp_tree.insert_transaction(&ordered, *count);
        budget.charge(created)?;
    }

    Ok((fp_tree, table))
}
