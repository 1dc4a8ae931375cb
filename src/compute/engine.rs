//! A synchronous, single-threaded valuation engine.
//!
//! Resolves every entry to a canonical monthly value. Percent entries recurse
//! into the entry they reference. Two guards keep the recursion finite: a node
//! met again on the current path (a cycle) contributes 0 for that occurrence,
//! and a node reached deeper than `max_depth` contributes 0 as well.

use crate::analysis::topology;
use crate::compute::ledger::{Ledger, Resolved, ZeroCause};
use crate::compute::totals::Aggregates;
use crate::config::EngineConfig;
use crate::graph::{NodeId, ReferenceGraph};
use crate::store::{Entry, ValueMode};
use std::collections::{BTreeSet, HashMap, HashSet};

pub use crate::graph::{DuplicateName, MissingReference};

/// Everything the engine silently zeroed or had to pick arbitrarily.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Diagnostics {
    pub missing_references: Vec<MissingReference>,
    /// Entry ids of each reference cycle, in snapshot order.
    pub cycles: Vec<Vec<String>>,
    /// Entries whose own reference chain is longer than the depth bound.
    pub depth_truncated: Vec<String>,
    /// Entries that are neither on a cycle nor missing their own reference,
    /// but resolve to 0 because their chain leads into one.
    pub zeroed_upstream: Vec<String>,
    pub duplicate_names: Vec<DuplicateName>,
}

impl Diagnostics {
    pub fn is_clean(&self) -> bool {
        self.missing_references.is_empty()
            && self.cycles.is_empty()
            && self.depth_truncated.is_empty()
            && self.zeroed_upstream.is_empty()
            && self.duplicate_names.is_empty()
    }

    /// Ids of every entry named by any diagnostic.
    pub fn flagged_entries(&self) -> BTreeSet<&str> {
        let mut flagged = BTreeSet::new();
        flagged.extend(self.missing_references.iter().map(|m| m.entry_id.as_str()));
        flagged.extend(self.cycles.iter().flatten().map(String::as_str));
        flagged.extend(self.depth_truncated.iter().map(String::as_str));
        flagged.extend(self.zeroed_upstream.iter().map(String::as_str));
        flagged.extend(self.duplicate_names.iter().flat_map(|d| d.entry_ids.iter().map(String::as_str)));
        flagged
    }
}

/// The output of one evaluation call.
#[derive(Debug, Clone, PartialEq)]
pub struct Valuation {
    /// Monthly value per entry, aligned with the snapshot order.
    monthly: Vec<f64>,
    by_id: HashMap<String, f64>,
    pub totals: Aggregates,
    pub diagnostics: Diagnostics,
}

impl Valuation {
    /// Monthly value of the entry with this id.
    pub fn get(&self, entry_id: &str) -> Option<f64> {
        self.by_id.get(entry_id).copied()
    }

    /// Monthly values in snapshot order.
    pub fn monthly_values(&self) -> &[f64] {
        &self.monthly
    }

    pub fn by_id(&self) -> &HashMap<String, f64> {
        &self.by_id
    }

    pub fn len(&self) -> usize {
        self.monthly.len()
    }

    pub fn is_empty(&self) -> bool {
        self.monthly.is_empty()
    }
}

/// Result of one walk through a node.
#[derive(Debug, Clone, Copy)]
struct Walk {
    value: f64,
    height: usize,
    /// The depth guard fired somewhere beneath this node.
    truncated: bool,
    zeroed_by: Option<ZeroCause>,
}

impl Walk {
    const ZERO: Walk = Walk { value: 0.0, height: 0, truncated: false, zeroed_by: None };
    const TRUNCATED: Walk = Walk { truncated: true, ..Walk::ZERO };

    const fn zeroed(cause: ZeroCause) -> Walk {
        Walk { zeroed_by: Some(cause), ..Walk::ZERO }
    }
}

/// Resolves a snapshot over its reference graph.
///
/// The depth bound is measured per root chain, not per walk: a memoized node
/// remembers how many hops remain beneath it, so an entry resolves to 0 exactly
/// when its own chain is longer than `max_depth`, whichever root reached it first.
pub struct ValuationEngine<'g, 'a> {
    graph: &'g ReferenceGraph<'a>,
    max_depth: usize,
}

impl<'g, 'a> ValuationEngine<'g, 'a> {
    pub fn new(graph: &'g ReferenceGraph<'a>, config: &EngineConfig) -> Self {
        Self { graph, max_depth: config.max_depth }
    }

    /// Resolves every node as a root, in snapshot order.
    ///
    /// Returns the monthly value per node. Roots whose own reference chain runs
    /// past the depth bound resolve to 0 and are flagged in the ledger.
    pub fn compute(&self, ledger: &mut Ledger) -> Vec<f64> {
        let mut on_path = vec![false; self.graph.node_count()];
        let mut monthly = Vec::with_capacity(self.graph.node_count());

        for node in self.graph.nodes() {
            monthly.push(self.resolve_root(node, ledger, &mut on_path));
        }
        monthly
    }

    fn resolve_root(&self, node: NodeId, ledger: &mut Ledger, on_path: &mut [bool]) -> f64 {
        let walk = self.resolve(node, 0, ledger, on_path);
        if walk.truncated {
            ledger.note_truncation(node);
            tracing::warn!(
                entry = %self.graph.entry(node).id,
                max_depth = self.max_depth,
                "reference chain exceeds depth bound, resolving to 0"
            );
        }
        walk.value
    }

    fn resolve(&self, node: NodeId, depth: usize, ledger: &mut Ledger, on_path: &mut [bool]) -> Walk {
        // 1. Memoized. The remaining height still counts against the bound.
        if let Some(memo) = ledger.get(node) {
            if depth + memo.height > self.max_depth {
                return Walk::TRUNCATED;
            }
            return Walk { value: memo.value, height: memo.height, truncated: false, zeroed_by: memo.zeroed_by };
        }

        // 2. Re-entered while still on the path: this occurrence counts as 0.
        if on_path[node.index()] {
            tracing::debug!(entry = %self.graph.entry(node).id, "reference cycle short-circuited to 0");
            return Walk::zeroed(ZeroCause::Cycle);
        }

        // 3. Depth guard
        if depth > self.max_depth {
            tracing::debug!(entry = %self.graph.entry(node).id, depth, "depth bound reached");
            return Walk::TRUNCATED;
        }

        on_path[node.index()] = true;
        let entry = self.graph.entry(node);
        let walk = match entry.value_mode {
            ValueMode::Amount => Walk { value: entry.frequency.to_monthly(entry.value), ..Walk::ZERO },
            ValueMode::Percent => match self.graph.reference_of(node) {
                Some(target) => {
                    let parent = self.resolve(target, depth + 1, ledger, on_path);
                    Walk {
                        value: parent.value * entry.value / 100.0,
                        height: parent.height + 1,
                        truncated: parent.truncated,
                        zeroed_by: parent.zeroed_by,
                    }
                }
                None => Walk::zeroed(ZeroCause::MissingReference),
            },
        };
        on_path[node.index()] = false;

        // A truncated walk says nothing about this node's own value.
        if !walk.truncated {
            ledger.insert(node, Resolved { value: walk.value, height: walk.height, zeroed_by: walk.zeroed_by });
        }
        walk
    }
}

/// Evaluates a snapshot: per-entry monthly values, aggregates and diagnostics.
pub fn evaluate(entries: &[Entry], config: &EngineConfig) -> Valuation {
    let graph = ReferenceGraph::build(entries);
    let mut ledger = Ledger::with_capacity(graph.node_count());
    let monthly = ValuationEngine::new(&graph, config).compute(&mut ledger);

    let by_id = entries.iter().zip(&monthly).map(|(e, v)| (e.id.clone(), *v)).collect();
    let totals = Aggregates::from_entries(entries, &monthly);
    let diagnostics = collect_diagnostics(&graph, &ledger);

    if !diagnostics.is_clean() {
        tracing::warn!(
            missing = diagnostics.missing_references.len(),
            cycles = diagnostics.cycles.len(),
            truncated = diagnostics.depth_truncated.len(),
            zeroed_upstream = diagnostics.zeroed_upstream.len(),
            duplicates = diagnostics.duplicate_names.len(),
            "valuation completed with zero-fallbacks"
        );
    }
    tracing::debug!(entries = entries.len(), net = totals.net, "valuation complete");

    Valuation { monthly, by_id, totals, diagnostics }
}

fn collect_diagnostics(graph: &ReferenceGraph, ledger: &Ledger) -> Diagnostics {
    let id_of = |node: NodeId| graph.entry(node).id.clone();

    let cycle_nodes = topology::cycles(graph);
    let on_cycle: HashSet<NodeId> = cycle_nodes.iter().flatten().copied().collect();
    let missing: HashSet<&str> = graph.missing_references().iter().map(|m| m.entry_id.as_str()).collect();

    // Zeroed by a cause further down the chain, not at the entry itself.
    let zeroed_upstream = graph
        .nodes()
        .filter(|&n| ledger.zeroed_by(n).is_some())
        .filter(|n| !on_cycle.contains(n) && !missing.contains(graph.entry(*n).id.as_str()))
        .map(id_of)
        .collect();

    Diagnostics {
        missing_references: graph.missing_references().to_vec(),
        cycles: cycle_nodes
            .into_iter()
            .map(|scc| scc.into_iter().map(id_of).collect())
            .collect(),
        depth_truncated: graph.nodes().filter(|&n| ledger.was_truncated(n)).map(id_of).collect(),
        zeroed_upstream,
        duplicate_names: graph.duplicate_names().to_vec(),
    }
}
