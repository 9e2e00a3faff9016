use super::generate::{generate_rules, RuleThresholds};
use super::rule::Rule;
use crate::fp::{FrequentItemsets, Item};
use tracing::{debug, instrument};

/// Drops rules under the lift or quality thresholds, ranks the rest by
/// `(quality_score, lift)` descending and keeps at most `max_rules`.
///
/// The sort is stable: equal keys keep their input order.
pub fn filter_by_quality<T: Item>(
    rules: Vec<Rule<T>>,
    thresholds: &RuleThresholds,
) -> Vec<Rule<T>> {
    let mut kept: Vec<Rule<T>> = rules
        .into_iter()
        .filter(|rule| {
            rule.lift >= thresholds.min_lift && rule.quality_score >= thresholds.min_quality_score
        })
        .collect();

    kept.sort_by(|a, b| {
        b.quality_score
            .total_cmp(&a.quality_score)
            .then_with(|| b.lift.total_cmp(&a.lift))
    });

    if let Some(max_rules) = thresholds.max_rules {
        kept.truncate(max_rules);
    }
    kept
}

/// Ranked association rules of `itemsets`.
#[instrument(skip(itemsets, thresholds), fields(itemset_count = itemsets.len()))]
pub fn association_rules<T: Item>(
    itemsets: &FrequentItemsets<T>,
    total_transactions: usize,
    thresholds: &RuleThresholds,
) -> Vec<Rule<T>> {
    let candidates = generate_rules(itemsets, total_transactions, thresholds);
    let candidate_count = candidates.len();
    let ranked = filter_by_quality(candidates, thresholds);
    debug!(candidates = candidate_count, kept = ranked.len(), "rules ranked");
    ranked
}
