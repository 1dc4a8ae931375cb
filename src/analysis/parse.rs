//! Parses the free-text value an editor types into an entry's value cell.
//!
//! Accepted shapes:
//! - `30% of Salary`, `30 % @Salary`, `30%Salary` -> percent of a named entry
//! - `30%` -> percent, keeping the entry's current reference
//! - anything containing `@Name` -> percent of `Name`, keeping the current value
//! - everything else -> an amount (currency symbols and separators ignored)

use crate::store::{Entry, ValueMode};

#[derive(Debug, Clone, PartialEq)]
pub struct ParsedValue {
    pub mode: ValueMode,
    pub value: f64,
    pub reference: String,
}

impl ParsedValue {
    /// Writes the parsed cell back into `entry`.
    pub fn apply_to(self, entry: &mut Entry) {
        entry.value_mode = self.mode;
        entry.value = self.value;
        entry.reference = self.reference;
    }
}

pub fn parse_value(input: &str, current: &Entry) -> ParsedValue {
    let text = input.trim();

    if let Some((pct, rest)) = split_percent(text) {
        let rest = rest.trim_start();
        if rest.is_empty() {
            return ParsedValue { mode: ValueMode::Percent, value: pct, reference: current.reference.clone() };
        }
        if let Some(name) = reference_after_percent(rest) {
            return ParsedValue { mode: ValueMode::Percent, value: pct, reference: name.to_string() };
        }
    }

    if let Some(name) = at_reference(text) {
        return ParsedValue { mode: ValueMode::Percent, value: current.value, reference: name.to_string() };
    }

    ParsedValue { mode: ValueMode::Amount, value: parse_amount(text), reference: String::new() }
}

/// Splits `"<number> %<rest>"` into the number and whatever follows the `%`.
fn split_percent(text: &str) -> Option<(f64, &str)> {
    let digits_end = unsigned_decimal_len(text);
    if digits_end == 0 {
        return None;
    }
    let pct: f64 = text[..digits_end].parse().ok()?;
    let rest = text[digits_end..].trim_start().strip_prefix('%')?;
    Some((pct, rest))
}

/// Length of a leading `\d+(\.\d+)?`.
fn unsigned_decimal_len(text: &str) -> usize {
    let bytes = text.as_bytes();
    let int_len = bytes.iter().take_while(|b| b.is_ascii_digit()).count();
    if int_len == 0 {
        return 0;
    }
    if bytes.get(int_len) == Some(&b'.') {
        let frac_len = bytes[int_len + 1..].iter().take_while(|b| b.is_ascii_digit()).count();
        if frac_len > 0 {
            return int_len + 1 + frac_len;
        }
    }
    int_len
}

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

fn is_word(s: &str) -> bool {
    !s.is_empty() && s.chars().all(is_word_char)
}

/// Accepts `of Name`, `of @Name`, `@Name` or a bare `Name` after the `%`.
fn reference_after_percent(rest: &str) -> Option<&str> {
    let lowered = rest.to_ascii_lowercase();
    let mut candidate = rest;
    if lowered.starts_with("of") {
        let after = &rest[2..];
        // "of" only counts as a keyword when something separates it from the name.
        if after.starts_with(char::is_whitespace) || after.starts_with('@') {
            candidate = after.trim_start();
        }
    }
    let candidate = candidate.strip_prefix('@').unwrap_or(candidate);
    is_word(candidate).then_some(candidate)
}

/// Finds the first `@Name` anywhere in the text.
fn at_reference(text: &str) -> Option<&str> {
    let start = text.find('@')? + 1;
    let tail = &text[start..];
    let len = tail.find(|c: char| !is_word_char(c)).unwrap_or(tail.len());
    (len > 0).then(|| &tail[..len])
}

/// Keeps digits, `.` and `-`, then reads the longest numeric prefix.
fn parse_amount(text: &str) -> f64 {
    let cleaned: String = text.chars().filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-').collect();
    (1..=cleaned.len())
        .rev()
        .find_map(|end| cleaned[..end].parse::<f64>().ok())
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}
