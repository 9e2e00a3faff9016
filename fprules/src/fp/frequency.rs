use super::index::ItemId;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// How repeated items inside one transaction are counted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicatePolicy {
    /// Every occurrence counts; a repeated item inflates its own support and
    /// appears repeatedly along its tree path.
    #[default]
    CountEachOccurrence,
    /// Only the first occurrence of an item in a transaction is kept.
    DedupePerTransaction,
}

impl DuplicatePolicy {
    pub(crate) fn apply(self, transaction: Vec<ItemId>) -> Vec<ItemId> {
        match self {
            DuplicatePolicy::CountEachOccurrence => transaction,
            DuplicatePolicy::DedupePerTransaction => {
                let mut seen = HashSet::with_capacity(transaction.len());
                transaction
                    .into_iter()
                    .filter(|&item| seen.insert(item))
                    .collect()
            }
        }
    }
}

/// Frequent items of one batch, ranked by descending count.
///
/// Ties keep first-seen order. The threshold is an absolute count and is
/// never rescaled to the batch size.
#[derive(Debug, Clone)]
pub struct FrequencyTable {
    ranked: Vec<(ItemId, usize)>,
    rank: HashMap<ItemId, usize>,
}

impl FrequencyTable {
    /// Counts every occurrence of every item, weighting each path by its
    /// multiplicity.
    pub fn from_weighted(batch: &[(Vec<ItemId>, usize)], min_support_count: usize) -> Self {
        let mut counts: HashMap<ItemId, usize> = HashMap::new();
        let mut first_seen = Vec::new();

        for (path, weight) in batch {
            for &item in path {
                let count = counts.entry(item).or_insert_with(|| {
                    first_seen.push(item);
                    0
                });
                *count += weight;
            }
        }

        let mut ranked: Vec<(ItemId, usize)> = first_seen
            .into_iter()
            .map(|item| (item, counts[&item]))
            .filter(|&(_, count)| count >= min_support_count)
            .collect();

        // Stable: equal counts keep first-seen order.
        ranked.sort_by(|a, b| b.1.cmp(&a.1));

        let rank = ranked
            .iter()
            .enumerate()
            .map(|(rank, &(item, _))| (item, rank))
            .collect();

        Self { ranked, rank }
    }

    pub fn is_empty(&self) -> bool {
        self.ranked.is_empty()
    }

    pub fn len(&self) -> usize {
        self.ranked.len()
    }

    pub fn rank_of(&self, item: ItemId) -> Option<usize> {
        self.rank.get(&item).copied()
    }

    pub fn count_of(&self, item: ItemId) -> Option<usize> {
        self.rank_of(item).map(|rank| self.ranked[rank].1)
    }

    /// Most frequent first.
    pub fn items_descending(&self) -> impl DoubleEndedIterator<Item = ItemId> + '_ {
        self.ranked.iter().map(|&(item, _)| item)
    }

    /// Least frequent first; the order in which items are mined.
    pub fn items_ascending(&self) -> impl Iterator<Item = ItemId> + '_ {
        self.items_descending().rev()
    }

    /// Drops infrequent items and orders the rest by rank.
    pub fn canonicalize(&self, transaction: &[ItemId]) -> Vec<ItemId> {
        let mut ranked: Vec<(usize, ItemId)> = transaction
            .iter()
            .filter_map(|&item| self.rank_of(item).map(|rank| (rank, item)))
            .collect();
        ranked.sort_by_key(|&(rank, _)| rank);
        ranked.into_iter().map(|(_, item)| item).collect()
    }
}
