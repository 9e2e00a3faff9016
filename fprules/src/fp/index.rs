use super::storage::Item;
use std::collections::HashMap;

/// Dense id assigned to an item label for the duration of one mining call.
pub type ItemId = usize;

/// Maps item labels to dense ids in first-seen order, and back.
#[derive(Debug, Clone)]
pub struct ItemIndex<T> {
    ids: HashMap<T, ItemId>,
    labels: Vec<T>,
}

impl<T: Item> Default for ItemIndex<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Item> ItemIndex<T> {
    pub fn new() -> Self {
        Self {
            ids: HashMap::new(),
            labels: Vec::new(),
        }
    }

    pub fn id_of(&mut self, item: &T) -> ItemId {
        if let Some(&id) = self.ids.get(item) {
            return id;
        }
        let id = self.labels.len();
        self.ids.insert(item.clone(), id);
        self.labels.push(item.clone());
        id
    }

    pub fn get(&self, item: &T) -> Option<ItemId> {
        self.ids.get(item).copied()
    }

    pub fn label(&self, id: ItemId) -> &T {
        &self.labels[id]
    }

    pub fn to_ids(&mut self, items: &[T]) -> Vec<ItemId> {
        items.iter().map(|item| self.id_of(item)).collect()
    }

    pub fn to_labels(&self, ids: &[ItemId]) -> Vec<T> {
        ids.iter().map(|&id| self.labels[id].clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_follow_first_seen_order() {
        let mut index = ItemIndex::new();
        assert_eq!(index.to_ids(&["b", "a", "b", "c"]), vec![0, 1, 0, 2]);
        assert_eq!(index.len(), 3);
        assert_eq!(index.get(&"c"), Some(2));
        assert_eq!(index.get(&"z"), None);
        assert_eq!(index.to_labels(&[2, 0]), vec!["c", "b"]);
    }
}
