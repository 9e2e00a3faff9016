//! FP-Growth frequent itemset mining and association rule ranking.
//!
//! [`fp`] builds a shared-prefix tree over a batch of transactions and
//! recursively extracts every itemset reaching an absolute support count.
//! [`rules`] splits those itemsets into scored, filtered and ranked
//! association rules. The remaining modules load records, carry the
//! configuration and drive a logged end-to-end run.

pub mod analysis;
pub mod config;
pub mod data;
pub mod error;
pub mod fp;
pub mod rules;

#[cfg(feature = "python")]
mod python;

pub use analysis::{run_analysis, AnalysisReport};
pub use config::MiningConfig;
pub use error::{AnalysisError, ConfigError, LoadError};
pub use fp::{fp_growth, DuplicatePolicy, FpGrowth, FrequentItemsets, Itemset, MiningError};
pub use rules::{association_rules, generate_rules, filter_by_quality, Rule, RuleThresholds};
