use super::tree::{FPNode, FPTree, HeaderEntry};
use crate::fp::index::ItemId;

/// Walks one item's header chain in insertion order.
pub struct Chain<'a> {
    tree: &'a FPTree,
    next: Option<usize>,
}

impl Iterator for Chain<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        let current = self.next?;
        self.next = self.tree.nodes[current].next_same_item;
        Some(current)
    }
}

impl FPTree {
    /// Inserts an already canonicalized path, adding `count` to every node on
    /// it. Returns the number of nodes created.
    pub fn insert_transaction(&mut self, transaction: &[ItemId], count: usize) -> usize {
        let mut current_index = self.root_index;
        let mut created = 0;

        for &item in transaction {
            if let Some(&child_index) = self.nodes[current_index].children.get(&item) {
                self.nodes[child_index].count += count;
                current_index = child_index;
            } else {
                let new_index = self.nodes.len();
                self.nodes.push(FPNode::new_item(item, count, current_index));
                self.nodes[current_index].children.insert(item, new_index);
                self.link(item, new_index);
                created += 1;
                current_index = new_index;
            }
        }

        created
    }

    fn link(&mut self, item: ItemId, node_index: usize) {
        match self.header_table.get_mut(&item) {
            Some(entry) => {
                self.nodes[entry.tail].next_same_item = Some(node_index);
                entry.tail = node_index;
            }
            None => {
                self.header_table.insert(
                    item,
                    HeaderEntry {
                        head: node_index,
                        tail: node_index,
                    },
                );
            }
        }
    }

    pub fn chain(&self, item: ItemId) -> Chain<'_> {
        Chain {
            tree: self,
            next: self.header_table.get(&item).map(|entry| entry.head),
        }
    }

    /// Total count of `item` across its whole header chain.
    pub fn item_support(&self, item: ItemId) -> usize {
        self.chain(item).map(|idx| self.nodes[idx].count).sum()
    }

    /// Conditional pattern base of `item`: for every node on its chain, the
    /// root-to-parent path paired with that node's count. Nodes hanging
    /// directly off the root yield nothing.
    pub fn prefix_paths(&self, item: ItemId) -> Vec<(Vec<ItemId>, usize)> {
        self.chain(item)
            .filter_map(|idx| {
                let mut path = Vec::new();
                let mut current = self.nodes[idx].parent;

                while let Some(i) = current {
                    if let Some(ancestor) = self.nodes[i].item {
                        path.push(ancestor);
                    }
                    current = self.nodes[i].parent;
                }

                path.reverse();
                (!path.is_empty()).then_some((path, self.nodes[idx].count))
            })
            .collect()
    }
}
