use super::budget::{MiningError, NodeBudget};
use super::builder::build_fp_tree;
use super::frequency::DuplicatePolicy;
use super::index::{ItemId, ItemIndex};
use super::storage::{FrequentItemsets, Item, Itemset};
use rayon::prelude::*;
use tracing::{debug, instrument};

type Found = Vec<(Vec<ItemId>, usize)>;

/// FP-Growth miner over one fixed batch of transactions.
///
/// `min_support_count` is an absolute count and is applied unchanged at every
/// recursion depth.
#[derive(Debug, Clone)]
pub struct FpGrowth {
    min_support_count: usize,
    duplicates: DuplicatePolicy,
    parallel: bool,
    node_budget: Option<usize>,
}

struct MiningContext {
    min_support_count: usize,
    parallel: bool,
    budget: NodeBudget,
}

impl FpGrowth {
    /// A zero threshold is raised to 1.
    pub fn new(min_support_count: usize) -> Self {
        Self {
            min_support_count: min_support_count.max(1),
            duplicates: DuplicatePolicy::default(),
            parallel: true,
            node_budget: None,
        }
    }

    pub fn duplicates(mut self, policy: DuplicatePolicy) -> Self {
        self.duplicates = policy;
        self
    }

    /// Mine sibling branches on the rayon pool. Output is identical either way.
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn node_budget(mut self, max_nodes: usize) -> Self {
        self.node_budget = Some(max_nodes);
        self
    }

    pub fn min_support_count(&self) -> usize {
        self.min_support_count
    }

    /// Every itemset whose count reaches the threshold, in discovery order.
    #[instrument(
        skip(self, transactions),
        fields(
            transaction_count = transactions.len(),
            min_support_count = self.min_support_count
        )
    )]
    pub fn mine<T: Item>(
        &self,
        transactions: &[Vec<T>],
    ) -> Result<FrequentItemsets<T>, MiningError> {
        let mut index = ItemIndex::new();
        let batch: Vec<(Vec<ItemId>, usize)> = transactions
            .iter()
            .map(|transaction| (self.duplicates.apply(index.to_ids(transaction)), 1))
            .collect();

        let ctx = MiningContext {
            min_support_count: self.min_support_count,
            parallel: self.parallel,
            budget: self
                .node_budget
                .map_or_else(NodeBudget::unlimited, NodeBudget::new),
        };

        let found = mine_batch(&batch, &[], &ctx)?;
        debug!(
            itemsets = found.len(),
            distinct_items = index.len(),
            tree_nodes = ctx.budget.used(),
            "mining finished"
        );

        let mut itemsets = FrequentItemsets::with_capacity(found.len());
        for (ids, count) in found {
            itemsets.insert(Itemset::new(index.to_labels(&ids)), count);
        }
        Ok(itemsets)
    }
}

/// Mines `transactions` with default options: per-occurrence counting,
/// parallel branches, no node budget.
pub fn fp_growth<T: Item>(
    transactions: &[Vec<T>],
    min_support_count: usize,
) -> Result<FrequentItemsets<T>, MiningError> {
    FpGrowth::new(min_support_count).mine(transactions)
}

/// One recursion level. The tree is built here and dropped on return.
fn mine_batch(
    batch: &[(Vec<ItemId>, usize)],
    prefix: &[ItemId],
    ctx: &MiningContext,
) -> Result<Found, MiningError> {
    let (fp_tree, table) = build_fp_tree(batch, ctx.min_support_count, &ctx.budget)?;
    if fp_tree.is_empty() {
        return Ok(Vec::new());
    }

    // Least frequent first: each item's conditional base only holds items
    // ranked above it.
    let items: Vec<ItemId> = table.items_ascending().collect();

    let branch = |&item: &ItemId| -> Result<Found, MiningError> {
        let mut itemset = prefix.to_vec();
        itemset.push(item);

        let mut found = vec![(itemset.clone(), fp_tree.item_support(item))];

        let conditional = fp_tree.prefix_paths(item);
        if !conditional.is_empty() {
            found.extend(mine_batch(&conditional, &itemset, ctx)?);
        }
        Ok(found)
    };

    let branches: Vec<Found> = if ctx.parallel && items.len() > 1 {
        items.par_iter().map(branch).collect::<Result<_, _>>()?
    } else {
        items.iter().map(branch).collect::<Result<_, _>>()?
    };

    // Single writer: branches are appended in item order.
    Ok(branches.into_iter().flatten().collect())
}
