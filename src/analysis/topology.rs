use crate::graph::{NodeId, ReferenceGraph};
use petgraph::algo::tarjan_scc;
use smallvec::{smallvec, SmallVec};
use std::collections::{HashSet, VecDeque};

/// Finds every reference cycle in the graph.
///
/// A cycle is a strongly connected component with more than one node, or a
/// single node that references itself. Members of each cycle are returned in
/// snapshot order, and cycles are ordered by their first member.
pub fn cycles(graph: &ReferenceGraph) -> Vec<Vec<NodeId>> {
    let mut found: Vec<Vec<NodeId>> = tarjan_scc(&graph.graph)
        .into_iter()
        .filter(|scc| scc.len() > 1 || graph.reference_of(scc[0]) == Some(scc[0]))
        .map(|mut scc| {
            scc.sort();
            scc
        })
        .collect();
    found.sort_by_key(|scc| scc[0]);
    found
}

/// Identifies every entry whose value depends (transitively) on the start nodes,
/// including the start nodes themselves. Used to decide what an edit invalidates.
pub fn downstream_from(graph: &ReferenceGraph, start_nodes: &[NodeId]) -> HashSet<NodeId> {
    let mut visited = HashSet::new();
    let mut queue = VecDeque::from(start_nodes.to_vec());

    while let Some(node) = queue.pop_front() {
        if visited.insert(node) {
            queue.extend(graph.dependents_of(node));
        }
    }
    visited
}

/// Reference chains are short in practice; most never spill to the heap.
pub type Chain = SmallVec<[NodeId; 8]>;

/// Follows references from `start` until the chain ends, revisits a node, or
/// `max_len` nodes have been collected. The start node is always first.
pub fn reference_chain(graph: &ReferenceGraph, start: NodeId, max_len: usize) -> Chain {
    let mut chain: Chain = smallvec![start];
    let mut seen = HashSet::from([start]);
    let mut current = start;

    while chain.len() < max_len {
        match graph.reference_of(current) {
            Some(next) if seen.insert(next) => {
                chain.push(next);
                current = next;
            }
            _ => break,
        }
    }
    chain
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{Entry, EntryType, Frequency};

    fn pct(id: &str, name: &str, reference: &str) -> Entry {
        Entry::percent(id, EntryType::Expense, name, 50.0, reference)
    }

    #[test]
    fn test_mutual_and_self_cycles() {
        // Shape: A <-> B, C -> C, D -> A (feeds the cycle but is not on it)
        let entries = vec![
            pct("a", "A", "B"),
            pct("b", "B", "A"),
            pct("c", "C", "C"),
            pct("d", "D", "A"),
        ];
        let g = ReferenceGraph::build(&entries);

        let found = cycles(&g);
        assert_eq!(found, vec![vec![NodeId::new(0), NodeId::new(1)], vec![NodeId::new(2)]]);
    }

    #[test]
    fn test_acyclic_graph_has_no_cycles() {
        let entries = vec![
            Entry::amount("s", EntryType::Income, "Salary", 100.0, Frequency::Monthly),
            pct("t", "Tax", "Salary"),
            pct("u", "Surtax", "Tax"),
        ];
        let g = ReferenceGraph::build(&entries);
        assert!(cycles(&g).is_empty());
    }

    #[test]
    fn test_downstream_diamond() {
        // Shape: Salary <- Tax, Salary <- Pension, Tax <- Surtax
        let entries = vec![
            Entry::amount("s", EntryType::Income, "Salary", 100.0, Frequency::Monthly),
            pct("t", "Tax", "Salary"),
            pct("p", "Pension", "Salary"),
            pct("u", "Surtax", "Tax"),
            Entry::amount("r", EntryType::Expense, "Rent", 10.0, Frequency::Monthly),
        ];
        let g = ReferenceGraph::build(&entries);

        let affected = downstream_from(&g, &[NodeId::new(0)]);
        assert_eq!(affected.len(), 4);
        assert!(!affected.contains(&NodeId::new(4)));

        let affected = downstream_from(&g, &[NodeId::new(1)]);
        assert_eq!(affected, HashSet::from([NodeId::new(1), NodeId::new(3)]));
    }

    #[test]
    fn test_reference_chain_stops_on_revisit() {
        let entries = vec![pct("a", "A", "B"), pct("b", "B", "C"), pct("c", "C", "A")];
        let g = ReferenceGraph::build(&entries);

        let chain = reference_chain(&g, NodeId::new(0), 10);
        assert_eq!(chain.as_slice(), &[NodeId::new(0), NodeId::new(1), NodeId::new(2)]);

        let capped = reference_chain(&g, NodeId::new(0), 2);
        assert_eq!(capped.len(), 2);
    }
}
