//! ledger.rs
//! The memo table for one evaluation call.

use crate::graph::NodeId;

/// Why a resolved value fell back to 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZeroCause {
    /// The walk re-entered a node still on its path.
    Cycle,
    /// The walk reached a percent entry whose reference names nothing.
    MissingReference,
}

/// A memoized resolution.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Resolved {
    pub value: f64,
    /// Reference hops from this node to where its walk ended.
    pub height: usize,
    /// Set when the chain beneath this node ended in a zero-fallback.
    pub zeroed_by: Option<ZeroCause>,
}

/// Resolved values, indexed densely by node.
///
/// A slot stays `None` until the node has been fully resolved. Storing the
/// height alongside the value lets a later walk that meets this node at depth
/// `d` apply the depth bound as if it had walked the whole chain itself.
#[derive(Debug, Clone, Default)]
pub struct Ledger {
    values: Vec<Option<Resolved>>,
    truncated: Vec<bool>,
}

impl Ledger {
    pub fn with_capacity(size: usize) -> Self {
        Self { values: vec![None; size], truncated: vec![false; size] }
    }

    #[inline(always)]
    pub fn get(&self, node: NodeId) -> Option<Resolved> {
        self.values.get(node.index()).copied().flatten()
    }

    #[inline(always)]
    pub fn insert(&mut self, node: NodeId, resolved: Resolved) {
        let idx = node.index();
        if idx >= self.values.len() {
            self.resize(idx + 1);
        }
        self.values[idx] = Some(resolved);
    }

    /// Records that resolving `node` from itself ran past the depth bound.
    pub fn note_truncation(&mut self, node: NodeId) {
        let idx = node.index();
        if idx >= self.truncated.len() {
            self.resize(idx + 1);
        }
        self.truncated[idx] = true;
    }

    pub fn was_truncated(&self, node: NodeId) -> bool {
        self.truncated.get(node.index()).copied().unwrap_or(false)
    }

    pub fn zeroed_by(&self, node: NodeId) -> Option<ZeroCause> {
        self.get(node).and_then(|r| r.zeroed_by)
    }

    fn resize(&mut self, size: usize) {
        self.values.resize(size, None);
        self.truncated.resize(size, false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_grows_storage() {
        let mut ledger = Ledger::default();
        assert_eq!(ledger.get(NodeId::new(3)), None);

        ledger.insert(NodeId::new(3), Resolved { value: 12.5, height: 2, zeroed_by: None });
        assert_eq!(ledger.get(NodeId::new(3)).map(|r| (r.value, r.height)), Some((12.5, 2)));
        assert_eq!(ledger.get(NodeId::new(0)), None);
        assert_eq!(ledger.zeroed_by(NodeId::new(3)), None);
    }

    #[test]
    fn test_flags_are_independent_of_values() {
        let mut ledger = Ledger::with_capacity(2);
        ledger.note_truncation(NodeId::new(1));
        ledger.insert(NodeId::new(0), Resolved { value: 0.0, height: 1, zeroed_by: Some(ZeroCause::Cycle) });

        assert!(ledger.was_truncated(NodeId::new(1)));
        assert!(!ledger.was_truncated(NodeId::new(0)));
        assert_eq!(ledger.zeroed_by(NodeId::new(0)), Some(ZeroCause::Cycle));
        assert_eq!(ledger.zeroed_by(NodeId::new(1)), None);
    }
}
