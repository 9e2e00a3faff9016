use crate::fp::{Item, Itemset};
use std::fmt::{self, Display};

/// An association rule `antecedent ⇒ consequent`.
#[derive(Debug, Clone, PartialEq)]
pub struct Rule<T> {
    pub antecedent: Itemset<T>,
    pub consequent: Itemset<T>,
    /// Fraction of transactions containing antecedent ∪ consequent.
    pub support: f64,
    pub confidence: f64,
    /// 0 when the consequent never occurs.
    pub lift: f64,
    /// `confidence × lift`.
    pub quality_score: f64,
    /// `|antecedent| + |consequent|`.
    pub complexity: usize,
}

impl<T: Item> Rule<T> {
    pub fn new(
        antecedent: Itemset<T>,
        consequent: Itemset<T>,
        support: f64,
        confidence: f64,
        lift: f64,
    ) -> Self {
        let complexity = antecedent.len() + consequent.len();
        Self {
            antecedent,
            consequent,
            support,
            confidence,
            lift,
            quality_score: confidence * lift,
            complexity,
        }
    }

    /// The itemset the rule was split from.
    pub fn itemset(&self) -> Itemset<T> {
        self.antecedent.union(&self.consequent)
    }
}

impl<T: Display> Display for Rule<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} => {} (support {:.4}, confidence {:.4}, lift {:.4}, quality {:.4})",
            self.antecedent,
            self.consequent,
            self.support,
            self.confidence,
            self.lift,
            self.quality_score
        )
    }
}
