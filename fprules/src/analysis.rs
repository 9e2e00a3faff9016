//! One end-to-end run: mine, derive rules, report.

use crate::config::MiningConfig;
use crate::error::AnalysisError;
use crate::fp::{FrequentItemsets, Item};
use crate::rules::{association_rules, Rule};
use std::collections::HashMap;
use tracing::{info, instrument, warn};

/// Length statistics of a transaction batch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransactionStats {
    pub count: usize,
    pub min_len: usize,
    pub max_len: usize,
    pub mean_len: f64,
    /// Transactions with at least two items; only these can feed a rule.
    pub multi_item: usize,
}

impl TransactionStats {
    pub fn of<T>(transactions: &[Vec<T>]) -> Option<Self> {
        let lengths = transactions.iter().map(Vec::len);
        let min_len = lengths.clone().min()?;
        let max_len = lengths.clone().max()?;
        let total: usize = lengths.clone().sum();
        Some(Self {
            count: transactions.len(),
            min_len,
            max_len,
            mean_len: total as f64 / transactions.len() as f64,
            multi_item: lengths.filter(|&len| len >= 2).count(),
        })
    }
}

/// Min / max / mean of one rule metric.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spread {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
}

impl Spread {
    fn of(values: impl Iterator<Item = f64> + Clone) -> Option<Self> {
        let count = values.clone().count();
        if count == 0 {
            return None;
        }
        Some(Self {
            min: values.clone().fold(f64::INFINITY, f64::min),
            max: values.clone().fold(f64::NEG_INFINITY, f64::max),
            mean: values.sum::<f64>() / count as f64,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RuleStats {
    pub lift: Spread,
    pub confidence: Spread,
    pub quality_score: Spread,
}

impl RuleStats {
    pub fn of<T>(rules: &[Rule<T>]) -> Option<Self> {
        Some(Self {
            lift: Spread::of(rules.iter().map(|r| r.lift))?,
            confidence: Spread::of(rules.iter().map(|r| r.confidence))?,
            quality_score: Spread::of(rules.iter().map(|r| r.quality_score))?,
        })
    }
}

/// Items by descending occurrence count, ties by first appearance.
pub fn top_items<T: Item>(transactions: &[Vec<T>], limit: usize) -> Vec<(T, usize)> {
    let mut counts: HashMap<&T, usize> = HashMap::new();
    let mut order: Vec<&T> = Vec::new();
    for item in transactions.iter().flatten() {
        let count = counts.entry(item).or_insert_with(|| {
            order.push(item);
            0
        });
        *count += 1;
    }

    let mut ranked: Vec<(T, usize)> = order
        .into_iter()
        .map(|item| (item.clone(), counts[item]))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked.truncate(limit);
    ranked
}

#[derive(Debug, Clone)]
pub struct AnalysisReport<T> {
    pub name: String,
    pub total_transactions: usize,
    pub min_support_count: usize,
    pub itemsets: FrequentItemsets<T>,
    pub rules: Vec<Rule<T>>,
    pub transaction_stats: Option<TransactionStats>,
    pub rule_stats: Option<RuleStats>,
}

impl<T: Item> AnalysisReport<T> {
    fn empty(name: &str, min_support_count: usize) -> Self {
        Self {
            name: name.to_string(),
            total_transactions: 0,
            min_support_count,
            itemsets: FrequentItemsets::new(),
            rules: Vec::new(),
            transaction_stats: None,
            rule_stats: None,
        }
    }
}

/// Mines `transactions` under `config` and ranks the resulting rules,
/// logging the run as it goes.
#[instrument(skip(transactions, config), fields(transaction_count = transactions.len()))]
pub fn run_analysis<T: Item>(
    transactions: &[Vec<T>],
    config: &MiningConfig,
    name: &str,
) -> Result<AnalysisReport<T>, AnalysisError> {
    config.validate()?;
    let total = transactions.len();
    let min_support_count = config.min_support_count(total);

    let Some(transaction_stats) = TransactionStats::of(transactions) else {
        warn!(analysis = name, "no transactions to analyse");
        return Ok(AnalysisReport::empty(name, min_support_count));
    };

    info!(
        analysis = name,
        transactions = total,
        min_len = transaction_stats.min_len,
        max_len = transaction_stats.max_len,
        mean_len = transaction_stats.mean_len,
        multi_item = transaction_stats.multi_item,
        "transaction statistics"
    );
    for (item, count) in top_items(transactions, 10) {
        info!(
            ?item,
            count,
            share = count as f64 / total as f64,
            "frequent item"
        );
    }
    info!(
        min_support = config.min_support,
        min_support_count,
        min_confidence = config.min_confidence,
        min_lift = config.min_lift,
        min_quality_score = config.min_quality_score,
        "mining frequent itemsets"
    );

    let itemsets = config.miner(total).mine(transactions)?;
    info!(itemsets = itemsets.len(), "frequent itemsets found");
    for (size, level) in itemsets.by_size() {
        info!(size, itemsets = level.len(), "itemsets by size");
        if size <= 3 {
            let mut sample = level;
            sample.sort_by(|a, b| b.1.cmp(&a.1));
            for (itemset, count) in sample.into_iter().take(5) {
                info!(size, itemset = ?itemset.items(), count, "sample itemset");
            }
        }
    }

    let rules = association_rules(&itemsets, total, &config.thresholds());
    let rule_stats = RuleStats::of(&rules);
    info!(rules = rules.len(), "association rules after quality filter");
    if let Some(stats) = &rule_stats {
        info!(
            lift_min = stats.lift.min,
            lift_max = stats.lift.max,
            lift_avg = stats.lift.mean,
            confidence_min = stats.confidence.min,
            confidence_max = stats.confidence.max,
            confidence_avg = stats.confidence.mean,
            quality_min = stats.quality_score.min,
            quality_max = stats.quality_score.max,
            quality_avg = stats.quality_score.mean,
            "rule quality"
        );
    }

    Ok(AnalysisReport {
        name: name.to_string(),
        total_transactions: total,
        min_support_count,
        itemsets,
        rules,
        transaction_stats: Some(transaction_stats),
        rule_stats,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fp::Itemset;

    fn trips() -> Vec<Vec<&'static str>> {
        vec![
            vec!["A", "B"],
            vec!["A", "B", "C"],
            vec!["A"],
            vec!["B", "C"],
            vec!["B"],
        ]
    }

    #[test]
    fn transaction_stats() {
        let stats = TransactionStats::of(&trips()).unwrap();
        assert_eq!(stats.count, 5);
        assert_eq!(stats.min_len, 1);
        assert_eq!(stats.max_len, 3);
        assert!((stats.mean_len - 1.8).abs() < 1e-9);
        assert_eq!(stats.multi_item, 3);

        let none: Vec<Vec<u8>> = Vec::new();
        assert!(TransactionStats::of(&none).is_none());
    }

    #[test]
    fn top_items_ranked() {
        assert_eq!(top_items(&trips(), 2), vec![("B", 4), ("A", 3)]);
    }

    #[test]
    fn run_scenario() {
        let mut config = MiningConfig::new(0.4, 0.5);
        config.min_lift = 0.8;

        let report = run_analysis(&trips(), &config, "scenario").unwrap();
        assert_eq!(report.min_support_count, 2);
        assert_eq!(report.itemsets.len(), 5);
        assert_eq!(report.rules.len(), 4);
        assert_eq!(report.rules[0].antecedent, Itemset::new(vec!["C"]));

        let stats = report.rule_stats.unwrap();
        assert!((stats.confidence.max - 1.0).abs() < 1e-9);
        assert!((stats.confidence.min - 0.5).abs() < 1e-9);
    }

    #[test]
    fn empty_input_is_not_an_error() {
        let none: Vec<Vec<String>> = Vec::new();
        let report = run_analysis(&none, &MiningConfig::district(), "empty").unwrap();
        assert!(report.itemsets.is_empty());
        assert!(report.rules.is_empty());
        assert!(report.rule_stats.is_none());
    }

    #[test]
    fn invalid_config_rejected() {
        let config = MiningConfig::new(1.5, 0.5);
        assert!(matches!(
            run_analysis(&trips(), &config, "bad"),
            Err(AnalysisError::Config(_))
        ));
    }
}
