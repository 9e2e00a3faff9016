use crate::error::ConfigError;
use crate::fp::{DuplicatePolicy, FpGrowth};
use crate::rules::RuleThresholds;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Thresholds of one analysis run.
///
/// `min_support` is a fraction; the engine only ever sees the absolute count
/// from [`MiningConfig::min_support_count`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MiningConfig {
    pub min_support: f64,
    pub min_confidence: f64,
    #[serde(default = "default_min_lift")]
    pub min_lift: f64,
    #[serde(default)]
    pub min_quality_score: f64,
    #[serde(default)]
    pub max_rules: Option<usize>,
    #[serde(default)]
    pub duplicates: DuplicatePolicy,
    /// Mine sibling branches on the rayon pool.
    #[serde(default = "default_parallel")]
    pub parallel: bool,
    /// Upper bound on FP-tree nodes allocated across one run.
    #[serde(default)]
    pub node_budget: Option<usize>,
}

fn default_min_lift() -> f64 {
    1.0
}

fn default_parallel() -> bool {
    true
}

impl MiningConfig {
    pub fn new(min_support: f64, min_confidence: f64) -> Self {
        Self {
            min_support,
            min_confidence,
            min_lift: default_min_lift(),
            min_quality_score: 0.0,
            max_rules: None,
            duplicates: DuplicatePolicy::default(),
            parallel: default_parallel(),
            node_budget: None,
        }
    }

    /// District analysis: rare patterns allowed, strong lift required.
    pub fn district() -> Self {
        Self {
            min_support: 0.01,
            min_confidence: 0.5,
            min_lift: 1.5,
            min_quality_score: 0.4,
            max_rules: Some(500),
            duplicates: DuplicatePolicy::default(),
            parallel: default_parallel(),
            node_budget: None,
        }
    }

    /// Road analysis.
    pub fn road() -> Self {
        Self {
            min_support: 0.012,
            min_confidence: 0.7,
            min_lift: 1.3,
            min_quality_score: 0.5,
            max_rules: Some(1000),
            duplicates: DuplicatePolicy::default(),
            parallel: default_parallel(),
            node_budget: None,
        }
    }

    pub fn preset(name: &str) -> Option<Self> {
        match name {
            "district" => Some(Self::district()),
            "road" | "road_name" => Some(Self::road()),
            _ => None,
        }
    }

    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: MiningConfig = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&source)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        check_fraction("min_support", self.min_support)?;
        check_fraction("min_confidence", self.min_confidence)?;
        if !(self.min_lift.is_finite() && self.min_lift >= 0.0) {
            return Err(ConfigError::OutOfRange {
                field: "min_lift",
                value: self.min_lift,
                expected: "[0, inf)",
            });
        }
        if !self.min_quality_score.is_finite() {
            return Err(ConfigError::OutOfRange {
                field: "min_quality_score",
                value: self.min_quality_score,
                expected: "finite reals",
            });
        }
        if self.max_rules == Some(0) {
            return Err(ConfigError::ZeroMaxRules);
        }
        if self.node_budget == Some(0) {
            return Err(ConfigError::ZeroNodeBudget);
        }
        Ok(())
    }

    pub fn min_support_count(&self, num_transactions: usize) -> usize {
        support_count(self.min_support, num_transactions)
    }

    pub fn thresholds(&self) -> RuleThresholds {
        RuleThresholds {
            min_confidence: self.min_confidence,
            min_lift: self.min_lift,
            min_quality_score: self.min_quality_score,
            max_rules: self.max_rules,
        }
    }

    pub fn miner(&self, num_transactions: usize) -> FpGrowth {
        let miner = FpGrowth::new(self.min_support_count(num_transactions))
            .duplicates(self.duplicates)
            .parallel(self.parallel);
        match self.node_budget {
            Some(max_nodes) => miner.node_budget(max_nodes),
            None => miner,
        }
    }
}

/// `max(1, floor(min_support × num_transactions))`.
pub fn support_count(min_support: f64, num_transactions: usize) -> usize {
    ((min_support * num_transactions as f64).floor() as usize).max(1)
}

fn check_fraction(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value > 0.0 && value <= 1.0 {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            field,
            value,
            expected: "(0, 1]",
        })
    }
}
