//! dag.rs
//! The percent-of-reference links between entries, made explicit.
//!
//! Nodes are entry positions in the snapshot (node `i` is `entries[i]`).
//! An edge `a -> b` with weight `p` means "entry a is p% of entry b".
//! Every node has at most one outgoing edge, so the graph is a functional
//! graph: cycles are possible, fan-in is unbounded.

use crate::store::{Entry, ValueMode};
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;
use std::collections::HashMap;

pub type NodeId = NodeIndex;

/// Lowercased, trimmed form of a name used as the lookup key.
pub fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}

/// A percent entry whose reference does not resolve to any entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingReference {
    pub entry_id: String,
    pub reference: String,
}

/// Several entries sharing one lookup key. `winner` is the entry lookups resolve to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateName {
    pub name: String,
    pub entry_ids: Vec<String>,
    pub winner: String,
}

#[derive(Debug, Clone)]
pub struct ReferenceGraph<'a> {
    entries: &'a [Entry],
    pub(crate) graph: DiGraph<(), f64>,
    name_index: HashMap<String, NodeId>,
    missing: Vec<MissingReference>,
    duplicates: Vec<DuplicateName>,
}

impl<'a> ReferenceGraph<'a> {
    pub fn build(entries: &'a [Entry]) -> Self {
        let mut graph = DiGraph::with_capacity(entries.len(), entries.len());
        for _ in entries {
            graph.add_node(());
        }

        // 1. Name index. Later entries overwrite earlier ones (last write wins).
        let mut name_index: HashMap<String, NodeId> = HashMap::with_capacity(entries.len());
        let mut holders: HashMap<String, Vec<NodeId>> = HashMap::new();
        for (i, entry) in entries.iter().enumerate() {
            let key = normalize_name(&entry.name);
            if key.is_empty() {
                continue;
            }
            let node = NodeId::new(i);
            name_index.insert(key.clone(), node);
            holders.entry(key).or_default().push(node);
        }

        let mut duplicates: Vec<DuplicateName> = holders
            .into_iter()
            .filter(|(_, nodes)| nodes.len() > 1)
            .map(|(name, nodes)| {
                let winner = entries[nodes[nodes.len() - 1].index()].id.clone();
                DuplicateName {
                    entry_ids: nodes.iter().map(|n| entries[n.index()].id.clone()).collect(),
                    name,
                    winner,
                }
            })
            .collect();
        duplicates.sort_by(|a, b| a.name.cmp(&b.name));

        // 2. Reference edges
        let mut missing = Vec::new();
        for (i, entry) in entries.iter().enumerate() {
            if entry.value_mode != ValueMode::Percent {
                continue;
            }
            match name_index.get(&normalize_name(&entry.reference)) {
                Some(&target) => {
                    graph.add_edge(NodeId::new(i), target, entry.value);
                }
                None => missing.push(MissingReference {
                    entry_id: entry.id.clone(),
                    reference: entry.reference.clone(),
                }),
            }
        }

        Self { entries, graph, name_index, missing, duplicates }
    }

    pub fn entries(&self) -> &'a [Entry] {
        self.entries
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn entry(&self, node: NodeId) -> &'a Entry {
        &self.entries[node.index()]
    }

    /// Resolves a name the same way percent entries do.
    pub fn lookup(&self, name: &str) -> Option<NodeId> {
        self.name_index.get(&normalize_name(name)).copied()
    }

    /// The node with the given entry id. If ids repeat, the last one wins.
    pub fn node_for_id(&self, id: &str) -> Option<NodeId> {
        self.entries.iter().rposition(|e| e.id == id).map(NodeId::new)
    }

    /// The entry this node takes a percentage of, if any.
    pub fn reference_of(&self, node: NodeId) -> Option<NodeId> {
        self.graph.neighbors_directed(node, Direction::Outgoing).next()
    }

    /// Entries defined as a percentage of this node.
    pub fn dependents_of(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.graph.neighbors_directed(node, Direction::Incoming)
    }

    pub fn missing_references(&self) -> &[MissingReference] {
        &self.missing
    }

    pub fn duplicate_names(&self) -> &[DuplicateName] {
        &self.duplicates
    }

    pub fn nodes(&self) -> impl Iterator<Item = NodeId> {
        (0..self.entries.len()).map(NodeId::new)
    }
}
