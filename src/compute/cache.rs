//! Cross-call reuse of a whole evaluation, keyed by a structural fingerprint.
//!
//! The cache is an explicit value owned by the caller; dropping it or calling
//! [`EvaluationCache::clear`] is the only lifetime management there is.

use crate::compute::engine::{evaluate, Valuation};
use crate::config::EngineConfig;
use crate::store::Entry;
use std::fmt::Write;

/// Concatenates every field that can change an evaluation's output, per entry,
/// in snapshot order. Any add, remove, reorder or edit yields a new fingerprint.
///
/// Free-text fields are length-prefixed, so a `|` or `;` inside a name or
/// reference cannot shift a value into the neighbouring field.
pub fn fingerprint(entries: &[Entry]) -> String {
    let mut key = String::with_capacity(entries.len() * 48);
    for e in entries {
        push_text(&mut key, &e.id);
        let _ = write!(key, "{:?}|", e.entry_type);
        push_text(&mut key, &e.name);
        let _ = write!(key, "{:?}|{}|{}|", e.value_mode, e.value.to_bits(), e.frequency);
        push_text(&mut key, &e.reference);
        let _ = write!(key, "{}|", e.is_wealth_building);
        match e.target_account.as_deref() {
            Some(target) => push_text(&mut key, target),
            None => key.push_str("~|"),
        }
        key.push(';');
    }
    key
}

#[inline]
fn push_text(key: &mut String, text: &str) {
    let _ = write!(key, "{}:{}|", text.len(), text);
}

#[derive(Debug, Clone, Default)]
pub struct EvaluationCache {
    key: Option<(String, EngineConfig)>,
    valuation: Option<Valuation>,
    hits: u64,
    misses: u64,
}

impl EvaluationCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached valuation when the snapshot and config are unchanged,
    /// recomputing otherwise.
    pub fn evaluate(&mut self, entries: &[Entry], config: &EngineConfig) -> &Valuation {
        let fp = fingerprint(entries);
        let fresh = matches!(&self.key, Some((k, c)) if *k == fp && c == config) && self.valuation.is_some();

        if fresh {
            self.hits += 1;
            tracing::debug!(hits = self.hits, "valuation cache hit");
        } else {
            self.misses += 1;
            tracing::debug!(misses = self.misses, entries = entries.len(), "valuation cache miss");
            self.valuation = Some(evaluate(entries, config));
            self.key = Some((fp, config.clone()));
        }

        self.valuation.get_or_insert_with(|| evaluate(entries, config))
    }

    pub fn clear(&mut self) {
        self.key = None;
        self.valuation = None;
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn misses(&self) -> u64 {
        self.misses
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{EntryType, Frequency};

    fn snapshot() -> Vec<Entry> {
        vec![
            Entry::amount("s", EntryType::Income, "Salary", 6000.0, Frequency::Monthly),
            Entry::percent("t", EntryType::Expense, "Tax", 25.0, "Salary"),
        ]
    }

    #[test]
    fn test_unchanged_snapshot_hits() {
        let mut cache = EvaluationCache::new();
        let config = EngineConfig::default();
        let entries = snapshot();

        let first = cache.evaluate(&entries, &config).get("t");
        let second = cache.evaluate(&entries, &config).get("t");
        assert_eq!(first, Some(1500.0));
        assert_eq!(first, second);
        assert_eq!((cache.hits(), cache.misses()), (1, 1));
    }

    #[test]
    fn test_edit_invalidates() {
        let mut cache = EvaluationCache::new();
        let config = EngineConfig::default();
        let mut entries = snapshot();
        cache.evaluate(&entries, &config);

        entries[0].value = 8000.0;
        assert_eq!(cache.evaluate(&entries, &config).get("t"), Some(2000.0));
        assert_eq!(cache.misses(), 2);
    }

    #[test]
    fn test_type_change_invalidates() {
        let mut cache = EvaluationCache::new();
        let config = EngineConfig::default();
        let mut entries = snapshot();
        assert_eq!(cache.evaluate(&entries, &config).totals.expense, 1500.0);

        entries[1].entry_type = EntryType::Investment;
        assert_eq!(cache.evaluate(&entries, &config).totals.expense, 0.0);
    }

    #[test]
    fn test_config_change_invalidates() {
        let mut cache = EvaluationCache::new();
        let entries = snapshot();
        cache.evaluate(&entries, &EngineConfig::default());
        cache.evaluate(&entries, &EngineConfig { max_depth: 0, ..EngineConfig::default() });
        assert_eq!(cache.misses(), 2);
    }

    #[test]
    fn test_delimiters_in_text_do_not_collide() {
        let mut moved = Entry::amount("x", EntryType::Allocation, "X", 100.0, Frequency::Monthly);
        moved.reference = "R|true".into();
        moved.target_account = Some(String::new());

        let mut flagged = Entry::amount("x", EntryType::Allocation, "X", 100.0, Frequency::Monthly).wealth_building();
        flagged.reference = "R".into();
        flagged.target_account = Some("false|".into());

        assert_ne!(fingerprint(&[moved.clone()]), fingerprint(&[flagged.clone()]));

        let mut cache = EvaluationCache::new();
        let config = EngineConfig::default();
        assert_eq!(cache.evaluate(&[moved], &config).totals.wealth_building, 0.0);
        assert_eq!(cache.evaluate(&[flagged], &config).totals.wealth_building, 100.0);
        assert_eq!(cache.misses(), 2);
    }

    #[test]
    fn test_fingerprint_tracks_removal() {
        let entries = snapshot();
        assert_ne!(fingerprint(&entries), fingerprint(&entries[..1]));
        assert_eq!(fingerprint(&entries), fingerprint(&snapshot()));
    }
}
