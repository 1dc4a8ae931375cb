//! The explicit reference graph between entries.
pub mod dag;

// Re-export key types for convenient access
pub use dag::{normalize_name, DuplicateName, MissingReference, NodeId, ReferenceGraph};
