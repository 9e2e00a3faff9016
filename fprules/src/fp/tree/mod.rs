// Tree module - FP-Tree arena and its header-chain operations

mod tree;
mod tree_ops;

pub use tree::{FPNode, FPTree, HeaderEntry};
pub use tree_ops::Chain;
