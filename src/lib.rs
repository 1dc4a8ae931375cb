//! Budget valuation and wealth projection core.
//!
//! Entries (income, expenses, investments, allocations) are resolved to
//! monthly values through their percent-of-reference links, aggregated, and
//! fed into per-account compound growth projections.
//!
//! With the `python` feature this crate also builds the `_core` Python module.

pub mod analysis;
pub mod compute;
pub mod config;
pub mod graph;
pub mod projection;
pub mod store;
pub mod validation;

pub mod display {
    pub mod trace;
}

#[cfg(feature = "python")]
mod bindings {
    pub mod python;
}

pub use compute::{evaluate, Aggregates, Diagnostics, EvaluationCache, Valuation};
pub use config::{ConfigError, EngineConfig};
pub use projection::{TimeToTarget, WealthProjector};
pub use store::{Account, AccountRegistry, AccountType, DeleteOutcome, Entry, EntryType, Frequency, Snapshot, ValueMode};

#[cfg(feature = "python")]
use pyo3::prelude::*;

// --- Module Definition ---
/// Defines the `_core` Python module. The leading underscore marks it as the
/// compiled component behind a pure-Python wrapper.
#[cfg(feature = "python")]
#[pymodule]
fn _core(_py: Python, m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<bindings::python::PyBudget>()?;
    m.add_function(wrap_pyfunction!(bindings::python::to_monthly, m)?)?;
    m.add_function(wrap_pyfunction!(bindings::python::from_monthly, m)?)?;
    Ok(())
}
