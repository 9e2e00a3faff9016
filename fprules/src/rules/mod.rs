pub mod generate;
pub mod quality;
pub mod rule;

#[cfg(test)]
mod tests;

pub use generate::{generate_rules, RuleThresholds};
pub use quality::{association_rules, filter_by_quality};
pub use rule::Rule;
