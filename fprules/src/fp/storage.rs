use std::collections::{BTreeMap, HashMap};
use std::fmt::{self, Debug, Display};
use std::hash::Hash;

/// Anything usable as an item label.
pub trait Item: Clone + Eq + Hash + Ord + Debug + Send + Sync {}

impl<T: Clone + Eq + Hash + Ord + Debug + Send + Sync> Item for T {}

/// Order-irrelevant set of distinct items.
///
/// Items are kept sorted and de-duplicated, so equality and hashing depend
/// only on membership.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Itemset<T>(Vec<T>);

impl<T: Item> Itemset<T> {
    pub fn new(mut items: Vec<T>) -> Self {
        items.sort_unstable();
        items.dedup();
        Self(items)
    }

    pub fn items(&self) -> &[T] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, item: &T) -> bool {
        self.0.binary_search(item).is_ok()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.0.iter()
    }

    /// Items of `self` that are not in `other`.
    pub fn difference(&self, other: &Itemset<T>) -> Itemset<T> {
        Itemset(
            self.0
                .iter()
                .filter(|item| !other.contains(item))
                .cloned()
                .collect(),
        )
    }

    pub fn union(&self, other: &Itemset<T>) -> Itemset<T> {
        let mut items = self.0.clone();
        items.extend(other.0.iter().cloned());
        Itemset::new(items)
    }

    pub fn is_subset(&self, other: &Itemset<T>) -> bool {
        self.0.iter().all(|item| other.contains(item))
    }

    pub fn into_vec(self) -> Vec<T> {
        self.0
    }
}

impl<T: Item> FromIterator<T> for Itemset<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Itemset::new(iter.into_iter().collect())
    }
}

impl<T: Item> From<Vec<T>> for Itemset<T> {
    fn from(items: Vec<T>) -> Self {
        Itemset::new(items)
    }
}

impl<'a, T> IntoIterator for &'a Itemset<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl<T: Display> Display for Itemset<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, item) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", item)?;
        }
        write!(f, "}}")
    }
}

/// Itemset → support count map, in discovery order.
///
/// Re-inserting a key overwrites its count and keeps its original position.
#[derive(Debug, Clone)]
pub struct FrequentItemsets<T> {
    entries: Vec<(Itemset<T>, usize)>,
    index: HashMap<Itemset<T>, usize>,
}

impl<T: Item> Default for FrequentItemsets<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Item> FrequentItemsets<T> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            index: HashMap::with_capacity(capacity),
        }
    }

    pub fn insert(&mut self, itemset: Itemset<T>, count: usize) {
        match self.index.get(&itemset) {
            Some(&pos) => self.entries[pos].1 = count,
            None => {
                self.index.insert(itemset.clone(), self.entries.len());
                self.entries.push((itemset, count));
            }
        }
    }

    pub fn get(&self, itemset: &Itemset<T>) -> Option<usize> {
        self.index.get(itemset).map(|&pos| self.entries[pos].1)
    }

    pub fn contains(&self, itemset: &Itemset<T>) -> bool {
        self.index.contains_key(itemset)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Itemset<T>, usize)> {
        self.entries.iter().map(|(itemset, count)| (itemset, *count))
    }

    /// Itemsets grouped by size, each group in discovery order.
    pub fn by_size(&self) -> BTreeMap<usize, Vec<(&Itemset<T>, usize)>> {
        let mut levels: BTreeMap<usize, Vec<(&Itemset<T>, usize)>> = BTreeMap::new();
        for (itemset, count) in self.iter() {
            levels.entry(itemset.len()).or_default().push((itemset, count));
        }
        levels
    }

    pub fn max_itemset_size(&self) -> usize {
        self.entries.iter().map(|(itemset, _)| itemset.len()).max().unwrap_or(0)
    }
}

impl<T: Item> Extend<(Itemset<T>, usize)> for FrequentItemsets<T> {
    fn extend<I: IntoIterator<Item = (Itemset<T>, usize)>>(&mut self, iter: I) {
        for (itemset, count) in iter {
            self.insert(itemset, count);
        }
    }
}

impl<T: Item> FromIterator<(Itemset<T>, usize)> for FrequentItemsets<T> {
    fn from_iter<I: IntoIterator<Item = (Itemset<T>, usize)>>(iter: I) -> Self {
        let mut map = FrequentItemsets::new();
        map.extend(iter);
        map
    }
}

impl<T: Item> IntoIterator for FrequentItemsets<T> {
    type Item = (Itemset<T>, usize);
    type IntoIter = std::vec::IntoIter<(Itemset<T>, usize)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// Order-insensitive equality: same keys, same counts.
impl<T: Item> PartialEq for FrequentItemsets<T> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .iter()
                .all(|(itemset, count)| other.get(itemset) == Some(count))
    }
}

impl<T: Item> Eq for FrequentItemsets<T> {}
