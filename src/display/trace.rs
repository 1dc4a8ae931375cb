//! src/display/trace.rs
//!
//! Renders how an entry's monthly value was derived, following its
//! percent-of-reference chain down to an amount, a missing name, or a cycle.

use crate::analysis::topology;
use crate::compute::Valuation;
use crate::graph::{NodeId, ReferenceGraph};
use crate::store::ValueMode;
use std::collections::HashMap;
use std::fmt::Write;

pub fn format_trace(graph: &ReferenceGraph, valuation: &Valuation, entry_id: &str) -> String {
    let mut tracer = Tracer { graph, valuation, visited_at_level: HashMap::new(), output: String::new() };

    match graph.node_for_id(entry_id) {
        Some(node) => {
            let _ = writeln!(tracer.output, "RESOLUTION TRACE for entry '{}':", graph.entry(node).name);
            let _ = writeln!(tracer.output, "--------------------------------------------------");
            tracer.trace_chain(node);
            tracer.print_dependents(node);
        }
        None => {
            let _ = writeln!(tracer.output, "Error: Unknown entry id '{}'", entry_id);
        }
    }
    tracer.output
}

struct Tracer<'g, 'a> {
    graph: &'g ReferenceGraph<'a>,
    valuation: &'g Valuation,
    visited_at_level: HashMap<NodeId, usize>,
    output: String,
}

impl<'g, 'a> Tracer<'g, 'a> {
    fn trace_chain(&mut self, start: NodeId) {
        // A chain can visit each node at most once before it repeats.
        let chain = topology::reference_chain(self.graph, start, self.graph.node_count());
        let mut prefix = String::new();

        for (i, &node) in chain.iter().enumerate() {
            let level = i + 1;
            self.visited_at_level.insert(node, level);
            let line = self.describe(node, level);
            let _ = writeln!(self.output, "{}{}", prefix, line);
            prefix = Self::child_prefix(&prefix);
        }

        // How the chain ended: a back-edge, a dangling name, or an amount.
        let Some(&last) = chain.last() else { return };
        let entry = self.graph.entry(last);
        if entry.value_mode != ValueMode::Percent {
            return;
        }
        match self.graph.reference_of(last) {
            Some(next) => match self.visited_at_level.get(&next) {
                Some(&first_seen) => {
                    let _ = writeln!(self.output, "{}-> (Cycle back to L{}, counts as 0)", prefix, first_seen);
                }
                None => {
                    let _ = writeln!(self.output, "{}-> (Chain continues past L{})", prefix, chain.len());
                }
            },
            None => {
                let _ = writeln!(self.output, "{}-> (Missing reference '{}', counts as 0)", prefix, entry.reference);
            }
        }
    }

    fn describe(&self, node: NodeId, level: usize) -> String {
        let entry = self.graph.entry(node);
        let value = self.format_value(&entry.id);
        let truncated = if self.valuation.diagnostics.depth_truncated.contains(&entry.id) {
            " [DEPTH LIMIT]"
        } else {
            ""
        };

        match entry.value_mode {
            ValueMode::Amount => format!(
                "[L{}] {}{}{} -> Amount({:.3} {})",
                level, entry.name, value, truncated, entry.value, entry.frequency
            ),
            ValueMode::Percent => format!(
                "[L{}] {}{}{} = {}% of {}",
                level, entry.name, value, truncated, entry.value, entry.reference
            ),
        }
    }

    fn print_dependents(&mut self, node: NodeId) {
        let mut dependents: Vec<NodeId> = topology::downstream_from(self.graph, &[node])
            .into_iter()
            .filter(|&n| n != node)
            .collect();
        if dependents.is_empty() {
            return;
        }
        dependents.sort();

        let _ = writeln!(self.output, "|");
        let _ = writeln!(self.output, "`-- Used by:");
        for (i, &dep) in dependents.iter().enumerate() {
            let connector = if i == dependents.len() - 1 { "`--" } else { "|--" };
            let entry = self.graph.entry(dep);
            let value = self.format_value(&entry.id);
            let _ = writeln!(self.output, "    {} {}{}", connector, entry.name, value);
        }
    }

    fn format_value(&self, entry_id: &str) -> String {
        match self.valuation.get(entry_id) {
            Some(v) => format!(" [{:.3}]", v),
            None => " [?]".to_string(),
        }
    }

    fn child_prefix(current: &str) -> String {
        format!("{}`-- ", current.replace("`-- ", "    "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compute::evaluate;
    use crate::config::EngineConfig;
    use crate::store::{Entry, EntryType, Frequency};

    fn trace(entries: &[Entry], id: &str) -> String {
        let valuation = evaluate(entries, &EngineConfig::default());
        let graph = ReferenceGraph::build(entries);
        format_trace(&graph, &valuation, id)
    }

    #[test]
    fn test_chain_to_amount() {
        let entries = vec![
            Entry::amount("s", EntryType::Income, "Salary", 75_000.0, Frequency::Yearly),
            Entry::percent("t", EntryType::Expense, "Tax", 30.0, "Salary"),
            Entry::percent("u", EntryType::Expense, "Surtax", 10.0, "Tax"),
        ];
        let out = trace(&entries, "t");

        assert!(out.starts_with("RESOLUTION TRACE for entry 'Tax':"));
        assert!(out.contains("[L1] Tax [1875.000] = 30% of Salary"), "{}", out);
        assert!(out.contains("`-- [L2] Salary [6250.000] -> Amount(75000.000 yearly)"), "{}", out);
        assert!(out.contains("`-- Used by:"));
        assert!(out.contains("`-- Surtax [187.500]"), "{}", out);
    }

    #[test]
    fn test_cycle_and_missing_are_marked() {
        let entries = vec![
            Entry::percent("a", EntryType::Expense, "A", 50.0, "B"),
            Entry::percent("b", EntryType::Expense, "B", 50.0, "A"),
            Entry::percent("g", EntryType::Expense, "G", 50.0, "Ghost"),
        ];

        let out = trace(&entries, "a");
        assert!(out.contains("`-- [L2] B [0.000] = 50% of A"), "{}", out);
        assert!(out.contains("-> (Cycle back to L1, counts as 0)"), "{}", out);

        let out = trace(&entries, "g");
        assert!(out.contains("-> (Missing reference 'Ghost', counts as 0)"), "{}", out);
        assert!(!out.contains("Used by"));
    }

    #[test]
    fn test_unknown_entry() {
        assert_eq!(trace(&[], "nope"), "Error: Unknown entry id 'nope'\n");
    }
}
