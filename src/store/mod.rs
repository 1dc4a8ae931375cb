//! The data model: entries, accounts, and the account registry.
pub mod registry;
pub mod types;

pub use registry::{AccountRegistry, DeleteOutcome, DeletePlan};
pub use types::{Account, AccountType, Entry, EntryType, Frequency, Snapshot, ValueMode};
