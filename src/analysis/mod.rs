//! Pure helpers over entries and the reference graph.
pub mod frequency;
pub mod parse;
pub mod topology;

pub use frequency::{from_monthly, to_monthly};
pub use parse::{parse_value, ParsedValue};
