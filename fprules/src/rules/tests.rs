use super::*;
use crate::fp::{fp_growth, FrequentItemsets, Itemset};

const EPS: f64 = 1e-9;

fn set(items: &[&'static str]) -> Itemset<&'static str> {
    Itemset::new(items.to_vec())
}

fn scenario() -> (FrequentItemsets<&'static str>, usize) {
    let transactions = vec![
        vec!["A", "B"],
        vec!["A", "B", "C"],
        vec!["A"],
        vec!["B", "C"],
        vec!["B"],
    ];
    (fp_growth(&transactions, 2).unwrap(), transactions.len())
}

fn find<'a>(
    rules: &'a [Rule<&'static str>],
    a: &[&'static str],
    c: &[&'static str],
) -> Option<&'a Rule<&'static str>> {
    rules
        .iter()
        .find(|r| r.antecedent == set(a) && r.consequent == set(c))
}

fn rule(quality: f64, lift: f64, tag: &'static str) -> Rule<&'static str> {
    Rule {
        antecedent: set(&[tag]),
        consequent: set(&["z"]),
        support: 0.1,
        confidence: quality / lift,
        lift,
        quality_score: quality,
        complexity: 2,
    }
}

#[test]
fn test_rule_metrics() {
    let (itemsets, total) = scenario();
    let thresholds = RuleThresholds::new(0.5).with_min_lift(0.8);
    let rules = association_rules(&itemsets, total, &thresholds);

    let a_b = find(&rules, &["A"], &["B"]).unwrap();
    assert!((a_b.support - 0.4).abs() < EPS);
    assert!((a_b.confidence - 2.0 / 3.0).abs() < EPS);
    assert!((a_b.lift - (2.0 / 3.0) / 0.8).abs() < EPS);
    assert!((a_b.quality_score - a_b.confidence * a_b.lift).abs() < EPS);
    assert_eq!(a_b.complexity, 2);

    let b_a = find(&rules, &["B"], &["A"]).unwrap();
    assert!((b_a.confidence - 0.5).abs() < EPS);
    assert!((b_a.lift - 0.5 / 0.6).abs() < EPS);

    assert_eq!(a_b.itemset(), set(&["A", "B"]));
}

#[test]
fn test_rules_ranked_by_quality_then_lift() {
    let (itemsets, total) = scenario();
    let thresholds = RuleThresholds::new(0.5).with_min_lift(0.8);
    let rules = association_rules(&itemsets, total, &thresholds);

    let order: Vec<_> = rules
        .iter()
        .map(|r| (r.antecedent.clone(), r.consequent.clone()))
        .collect();
    assert_eq!(
        order,
        vec![
            (set(&["C"]), set(&["B"])),
            (set(&["B"]), set(&["C"])),
            (set(&["A"]), set(&["B"])),
            (set(&["B"]), set(&["A"])),
        ]
    );
}

#[test]
fn test_default_lift_threshold_prunes_negative_association() {
    let (itemsets, total) = scenario();
    // min_lift defaults to 1.0: A⇒B and B⇒A (lift ≈ 0.833) are gone.
    let rules = association_rules(&itemsets, total, &RuleThresholds::new(0.5));

    assert_eq!(rules.len(), 2);
    assert!(find(&rules, &["A"], &["B"]).is_none());
    assert!(find(&rules, &["C"], &["B"]).is_some());
}

#[test]
fn test_missing_subsets_are_skipped() {
    let mut itemsets = FrequentItemsets::new();
    itemsets.insert(set(&["x", "y"]), 2);
    itemsets.insert(set(&["x"]), 4);

    // {y} is absent, so only x ⇒ y can be scored, and its consequent is
    // missing too.
    let rules = generate_rules(&itemsets, 10, &RuleThresholds::new(0.0).with_min_lift(0.0));
    assert!(rules.is_empty());

    itemsets.insert(set(&["y"]), 2);
    let rules = generate_rules(&itemsets, 10, &RuleThresholds::new(0.0).with_min_lift(0.0));
    assert_eq!(rules.len(), 2);
}

#[test]
fn test_zero_support_guards() {
    let mut itemsets = FrequentItemsets::new();
    itemsets.insert(set(&["x", "y"]), 0);
    itemsets.insert(set(&["x"]), 0);
    itemsets.insert(set(&["y"]), 3);

    let thresholds = RuleThresholds::new(0.0).with_min_lift(0.0);
    let rules = generate_rules(&itemsets, 10, &thresholds);

    // x ⇒ y: antecedent support 0, skipped. y ⇒ x: consequent support 0,
    // lift defined as 0.
    assert_eq!(rules.len(), 1);
    assert_eq!(rules[0].antecedent, set(&["y"]));
    assert_eq!(rules[0].lift, 0.0);

    assert!(generate_rules(&itemsets, 0, &thresholds).is_empty());
}

#[test]
fn test_confidence_above_one_discarded() {
    let mut itemsets = FrequentItemsets::new();
    // Inconsistent counts, as duplicate-inflated input can produce.
    itemsets.insert(set(&["x", "y"]), 5);
    itemsets.insert(set(&["x"]), 4);
    itemsets.insert(set(&["y"]), 8);

    let rules = generate_rules(&itemsets, 10, &RuleThresholds::new(0.0).with_min_lift(0.0));
    assert_eq!(rules.len(), 1);
    assert_eq!(rules[0].antecedent, set(&["y"]));
}

#[test]
fn test_three_itemset_yields_six_splits() {
    let transactions = vec![vec!["p", "q", "r"]; 4];
    let itemsets = fp_growth(&transactions, 2).unwrap();
    assert_eq!(itemsets.len(), 7);

    let rules = generate_rules(&itemsets, 4, &RuleThresholds::new(1.0));
    // 3 pairs × 2 splits + 6 splits of the triple.
    assert_eq!(rules.len(), 12);
    assert!(rules.iter().all(|r| (r.confidence - 1.0).abs() < EPS));
    assert!(rules.iter().all(|r| r.complexity == r.itemset().len()));
}

#[test]
fn test_quality_filter_is_stable_and_truncates() {
    let rules = vec![
        rule(0.5, 2.0, "a"),
        rule(0.9, 1.5, "b"),
        rule(0.5, 2.0, "c"),
        rule(0.9, 3.0, "d"),
        rule(0.1, 1.2, "e"),
    ];

    let thresholds = RuleThresholds::new(0.0).with_min_quality_score(0.2);
    let ranked = filter_by_quality(rules.clone(), &thresholds);
    let tags: Vec<_> = ranked.iter().map(|r| r.antecedent.items()[0]).collect();
    assert_eq!(tags, vec!["d", "b", "a", "c"]);

    let top = filter_by_quality(rules, &thresholds.with_max_rules(2));
    let tags: Vec<_> = top.iter().map(|r| r.antecedent.items()[0]).collect();
    assert_eq!(tags, vec!["d", "b"]);
}

#[test]
fn test_quality_filter_rechecks_lift() {
    let rules = vec![rule(0.9, 0.9, "low"), rule(0.9, 1.1, "high")];
    let ranked = filter_by_quality(rules, &RuleThresholds::new(0.0));
    assert_eq!(ranked.len(), 1);
    assert_eq!(ranked[0].antecedent, set(&["high"]));
}

#[test]
fn test_rule_display() {
    let r = Rule::new(set(&["a"]), set(&["b", "c"]), 0.25, 0.5, 2.0);
    assert_eq!(
        r.to_string(),
        "{a} => {b, c} (support 0.2500, confidence 0.5000, lift 2.0000, quality 1.0000)"
    );
}
