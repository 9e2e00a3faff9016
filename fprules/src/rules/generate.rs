use super::rule::Rule;
use crate::fp::combinations::proper_subsets;
use crate::fp::{FrequentItemsets, Item, Itemset};
use rayon::prelude::*;
use tracing::{debug, instrument};

/// Thresholds of the rule stage.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RuleThresholds {
    pub min_confidence: f64,
    pub min_lift: f64,
    pub min_quality_score: f64,
    pub max_rules: Option<usize>,
}

impl RuleThresholds {
    /// `min_lift` 1.0, `min_quality_score` 0.0, no rule cap.
    pub fn new(min_confidence: f64) -> Self {
        Self {
            min_confidence,
            min_lift: 1.0,
            min_quality_score: 0.0,
            max_rules: None,
        }
    }

    pub fn with_min_lift(mut self, min_lift: f64) -> Self {
        self.min_lift = min_lift;
        self
    }

    pub fn with_min_quality_score(mut self, min_quality_score: f64) -> Self {
        self.min_quality_score = min_quality_score;
        self
    }

    pub fn with_max_rules(mut self, max_rules: usize) -> Self {
        self.max_rules = Some(max_rules);
        self
    }
}

/// Splits every itemset of size ≥ 2 into antecedent/consequent pairs and
/// keeps the ones passing the confidence and lift thresholds.
///
/// Splits whose antecedent or consequent is missing from `itemsets` are
/// skipped. Output follows the discovery order of `itemsets`; the quality
/// threshold is not applied here.
#[instrument(skip(itemsets, thresholds), fields(itemset_count = itemsets.len()))]
pub fn generate_rules<T: Item>(
    itemsets: &FrequentItemsets<T>,
    total_transactions: usize,
    thresholds: &RuleThresholds,
) -> Vec<Rule<T>> {
    if total_transactions == 0 {
        return Vec::new();
    }
    let total = total_transactions as f64;

    let sources: Vec<(&Itemset<T>, usize)> = itemsets
        .iter()
        .filter(|(itemset, _)| itemset.len() >= 2)
        .collect();

    let per_itemset: Vec<Vec<Rule<T>>> = sources
        .par_iter()
        .map(|&(itemset, count)| rules_from_itemset(itemset, count, itemsets, total, thresholds))
        .collect();

    let rules: Vec<Rule<T>> = per_itemset.into_iter().flatten().collect();
    debug!(sources = sources.len(), candidates = rules.len(), "rule candidates generated");
    rules
}

fn rules_from_itemset<T: Item>(
    itemset: &Itemset<T>,
    count: usize,
    itemsets: &FrequentItemsets<T>,
    total: f64,
    thresholds: &RuleThresholds,
) -> Vec<Rule<T>> {
    let support = count as f64 / total;
    let items = itemset.items();

    proper_subsets(items.len())
        .into_iter()
        .filter_map(|chosen| {
            let antecedent: Itemset<T> = chosen.iter().map(|&i| items[i].clone()).collect();
            let consequent = itemset.difference(&antecedent);

            let antecedent_support = itemsets.get(&antecedent)? as f64 / total;
            if antecedent_support == 0.0 {
                return None;
            }

            let confidence = support / antecedent_support;
            if confidence > 1.0 || confidence < thresholds.min_confidence {
                return None;
            }

            let consequent_support = itemsets.get(&consequent)? as f64 / total;
            let lift = if consequent_support == 0.0 {
                0.0
            } else {
                confidence / consequent_support
            };
            if lift < thresholds.min_lift {
                return None;
            }

            Some(Rule::new(antecedent, consequent, support, confidence, lift))
        })
        .collect()
}
