pub mod budget;
pub mod builder;
pub mod combinations;
pub mod frequency;
pub mod index;
pub mod mining;
pub mod storage;
pub mod tree;


pub use budget::{MiningError, NodeBudget};
pub use frequency::{DuplicatePolicy, FrequencyTable};
pub use index::{ItemId, ItemIndex};
pub use mining::{fp_growth, FpGrowth};
pub use storage::{FrequentItemsets, Item, Itemset};
pub use tree::{FPNode, FPTree};
