use crate::fp::index::ItemId;
use std::collections::HashMap;

/// A node of the arena. `parent` and `next_same_item` are plain indices and
/// own nothing; a node is owned by the arena and reached from its parent's
/// `children` map.
#[derive(Debug, Clone)]
pub struct FPNode {
    pub item: Option<ItemId>,
    pub count: usize,
    pub parent: Option<usize>,
    pub children: HashMap<ItemId, usize>,
    pub next_same_item: Option<usize>,
}

/// First and last node of one item's header chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderEntry {
    pub head: usize,
    pub tail: usize,
}

#[derive(Debug, Clone)]
pub struct FPTree {
    pub nodes: Vec<FPNode>,
    pub header_table: HashMap<ItemId, HeaderEntry>,
    pub root_index: usize,
}

impl FPNode {
    pub fn new_root() -> Self {
        Self {
            item: None,
            count: 0,
            parent: None,
            children: HashMap::new(),
            next_same_item: None,
        }
    }

    pub fn new_item(item: ItemId, count: usize, parent: usize) -> Self {
        Self {
            item: Some(item),
            count,
            parent: Some(parent),
            children: HashMap::new(),
            next_same_item: None,
        }
    }
}

impl Default for FPTree {
    fn default() -> Self {
        Self::new()
    }
}

impl FPTree {
    pub fn new() -> Self {
        Self {
            nodes: vec![FPNode::new_root()],
            header_table: HashMap::new(),
            root_index: 0,
        }
    }

    /// Number of item-carrying nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.header_table.is_empty()
    }
}
