use crate::analysis::parse_value;
use crate::compute::EvaluationCache;
use crate::config::EngineConfig;
use crate::display::trace;
use crate::graph::ReferenceGraph;
use crate::projection::WealthProjector;
use crate::store::{Frequency, Snapshot};
use pyo3::exceptions::{PyKeyError, PyValueError};
use pyo3::prelude::*;
use std::collections::HashMap;

fn parse_frequency(text: &str) -> PyResult<Frequency> {
    text.parse::<Frequency>().map_err(PyValueError::new_err)
}

#[pyfunction]
pub fn to_monthly(value: f64, frequency: &str) -> PyResult<f64> {
    Ok(parse_frequency(frequency)?.to_monthly(value))
}

#[pyfunction]
pub fn from_monthly(value: f64, view: &str) -> PyResult<f64> {
    Ok(parse_frequency(view)?.from_monthly(value))
}

/// A budget snapshot plus the evaluation cache that serves queries on it.
#[pyclass(name = "_Budget")]
#[derive(Debug, Clone)]
pub struct PyBudget {
    snapshot: Snapshot,
    config: EngineConfig,
    cache: EvaluationCache,
}

#[pymethods]
impl PyBudget {
    #[new]
    #[pyo3(signature = (snapshot_json, config_json=None))]
    pub fn new(snapshot_json: &str, config_json: Option<&str>) -> PyResult<Self> {
        let snapshot = Snapshot::from_json_str(snapshot_json).map_err(|e| PyValueError::new_err(e.to_string()))?;
        let config = match config_json {
            Some(json) => EngineConfig::from_json_str(json).map_err(|e| PyValueError::new_err(e.to_string()))?,
            None => EngineConfig::default(),
        };
        Ok(Self { snapshot, config, cache: EvaluationCache::new() })
    }

    pub fn monthly_values(&mut self) -> Vec<(String, f64)> {
        let valuation = self.cache.evaluate(&self.snapshot.rows, &self.config);
        self.snapshot.rows.iter().map(|e| e.id.clone()).zip(valuation.monthly_values().iter().copied()).collect()
    }

    #[pyo3(signature = (view="monthly"))]
    pub fn totals(&mut self, view: &str) -> PyResult<HashMap<&'static str, f64>> {
        let view = parse_frequency(view)?;
        let t = self.cache.evaluate(&self.snapshot.rows, &self.config).totals.in_view(view);
        Ok(HashMap::from([
            ("income", t.income),
            ("expense", t.expense),
            ("investment", t.investment),
            ("allocation", t.allocation),
            ("wealthBuilding", t.wealth_building),
            ("net", t.net),
        ]))
    }

    /// Ids of entries that resolved through a zero-fallback or a duplicate name.
    pub fn flagged_entries(&mut self) -> Vec<String> {
        let valuation = self.cache.evaluate(&self.snapshot.rows, &self.config);
        valuation.diagnostics.flagged_entries().into_iter().map(str::to_string).collect()
    }

    pub fn project_account(&mut self, account_id: &str, years: f64) -> PyResult<f64> {
        let account = self
            .snapshot
            .accounts
            .iter()
            .find(|a| a.id == account_id)
            .ok_or_else(|| PyKeyError::new_err(format!("No account with id '{}'", account_id)))?;
        let valuation = self.cache.evaluate(&self.snapshot.rows, &self.config);
        let projector = WealthProjector::from_valuation(&self.snapshot.accounts, &self.snapshot.rows, valuation, &self.config);
        Ok(projector.project_account_value(account, years))
    }

    pub fn net_worth(&mut self) -> f64 {
        self.projector_query(|p| p.net_worth())
    }

    /// Months until the target is reached, or `None` when it never is.
    pub fn time_to_target(&mut self, target: f64) -> Option<u32> {
        self.projector_query(|p| p.time_to_target(target).months())
    }

    #[pyo3(signature = (withdrawal_rate=None))]
    pub fn passive_income(&mut self, withdrawal_rate: Option<f64>) -> f64 {
        self.projector_query(|p| match withdrawal_rate {
            Some(rate) => p.passive_income_at(rate),
            None => p.passive_income(),
        })
    }

    pub fn trace(&mut self, entry_id: &str) -> String {
        let valuation = self.cache.evaluate(&self.snapshot.rows, &self.config);
        let graph = ReferenceGraph::build(&self.snapshot.rows);
        trace::format_trace(&graph, valuation, entry_id)
    }

    /// Applies editor text to an entry, returning `(mode, value, reference)`.
    pub fn set_value(&mut self, entry_id: &str, text: &str) -> PyResult<(String, f64, String)> {
        let entry = self
            .snapshot
            .rows
            .iter_mut()
            .find(|e| e.id == entry_id)
            .ok_or_else(|| PyKeyError::new_err(format!("No entry with id '{}'", entry_id)))?;
        let parsed = parse_value(text, entry);
        parsed.apply_to(entry);
        Ok((format!("{:?}", entry.value_mode).to_lowercase(), entry.value, entry.reference.clone()))
    }

    pub fn entry_count(&self) -> usize {
        self.snapshot.rows.len()
    }
}

impl PyBudget {
    fn projector_query<T>(&mut self, query: impl FnOnce(&WealthProjector) -> T) -> T {
        let valuation = self.cache.evaluate(&self.snapshot.rows, &self.config);
        let projector = WealthProjector::from_valuation(&self.snapshot.accounts, &self.snapshot.rows, valuation, &self.config);
        query(&projector)
    }
}
