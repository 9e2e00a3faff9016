use std::sync::atomic::{AtomicUsize, Ordering};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MiningError {
    #[error("node budget exceeded: requested {requested} nodes, {available} available")]
    NodeBudgetExceeded { requested: usize, available: usize },
}

/// Caps the number of tree nodes allocated across every recursion level of
/// one mining call. Shared by all branches, including parallel ones.
#[derive(Debug)]
pub struct NodeBudget {
    max_nodes: usize,
    used: AtomicUsize,
}

impl NodeBudget {
    pub fn new(max_nodes: usize) -> Self {
        Self {
            max_nodes,
            used: AtomicUsize::new(0),
        }
    }

    pub fn unlimited() -> Self {
        Self::new(usize::MAX)
    }

    pub fn charge(&self, nodes: usize) -> Result<(), MiningError> {
        let before = self.used.fetch_add(nodes, Ordering::SeqCst);
        if before.saturating_add(nodes) > self.max_nodes {
            self.used.fetch_sub(nodes, Ordering::SeqCst);
            return Err(MiningError::NodeBudgetExceeded {
                requested: nodes,
                available: self.max_nodes.saturating_sub(before),
            });
        }
        Ok(())
    }

    pub fn used(&self) -> usize {
        self.used.load(Ordering::SeqCst)
    }

    pub fn available(&self) -> usize {
        self.max_nodes.saturating_sub(self.used())
    }
}
