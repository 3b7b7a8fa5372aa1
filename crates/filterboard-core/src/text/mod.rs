//! Tolerant JSON front-end for hand-edited filter text.
//!
//! Accepts a bare array, an object with a `filters` array, or the brace-less
//! `"filters": [ ... ]` fragment the mirror itself emits. Common authoring
//! mistakes (unquoted top-level key, comments, trailing commas) are caught
//! up front with a precise location; real parse failures are localized from
//! the parser's reported position.

mod scan;

#[cfg(test)]
mod parse_tests;

use std::fmt;

use serde_json::Value;

use crate::codec;

/// A located, human-readable rejection of hand-edited filter text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Byte offset into the raw text.
    pub offset: usize,
    /// 1-based line number.
    pub line: usize,
    /// Human message.
    pub message: String,
}

impl Diagnostic {
    fn new(raw: &str, offset: usize, message: impl Into<String>) -> Self {
        let offset = offset.min(raw.len());
        Self {
            offset,
            line: line_of_offset(raw, offset),
            message: message.into(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {}", self.line, self.message)
    }
}

/// Result of successfully applying hand-edited text.
#[derive(Debug, Clone, PartialEq)]
pub enum Applied {
    /// The text was empty: an explicit clear-all, not an error.
    Cleared,
    /// A clean entry array, ready for the document assembler.
    Filters(Vec<Value>),
}

/// Parses raw filter text into a clean entry array.
///
/// # Errors
///
/// Returns a [`Diagnostic`] locating the first problem found; the caller
/// must leave the group tree untouched in that case.
pub fn parse_filter_text(raw: &str) -> Result<Applied, Diagnostic> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(Applied::Cleared);
    }

    // Pre-screen for the common hand-editing mistakes, so they are reported
    // as what they are rather than as a generic parse failure.
    if let Some(offset) = unquoted_filters_key(raw) {
        return Err(Diagnostic::new(
            raw,
            offset,
            "top-level \"filters\" key must be quoted",
        ));
    }
    if let Some(offset) = scan::find_comment(raw) {
        return Err(Diagnostic::new(
            raw,
            offset,
            "comments are not allowed in filter JSON",
        ));
    }
    if let Some(offset) = scan::find_trailing_comma(raw) {
        return Err(Diagnostic::new(
            raw,
            offset,
            "trailing comma before a closing bracket",
        ));
    }

    let leading = raw.len() - raw.trim_start().len();
    let value = if trimmed.starts_with("\"filters\"") || trimmed.starts_with("'filters'") {
        // The mirror's own fragment form: wrap in braces, parse, unwrap.
        let wrapped = format!("{{{trimmed}}}");
        match serde_json::from_str::<Value>(&wrapped) {
            Ok(value) => value,
            Err(err) => return Err(parse_error_diagnostic(raw, &wrapped, &err, leading, 1)),
        }
    } else {
        match serde_json::from_str::<Value>(trimmed) {
            Ok(value) => value,
            Err(err) => return Err(parse_error_diagnostic(raw, trimmed, &err, leading, 0)),
        }
    };

    let entries = match value {
        Value::Array(entries) => Some(entries),
        Value::Object(mut obj) => match obj.remove("filters") {
            Some(Value::Array(entries)) => Some(entries),
            _ => None,
        },
        _ => None,
    };
    let Some(mut entries) = entries else {
        return Err(Diagnostic::new(
            raw,
            0,
            "expected a JSON array or \"filters\": [ ... ]",
        ));
    };

    // Clean up stray ORs at the edges before handing off.
    while entries.first().is_some_and(codec::is_separator) {
        entries.remove(0);
    }
    while entries.last().is_some_and(codec::is_separator) {
        entries.pop();
    }

    Ok(Applied::Filters(entries))
}

/// Detects an unquoted `filters:` key on the first non-blank line, returning
/// that line's starting byte offset.
fn unquoted_filters_key(text: &str) -> Option<usize> {
    let mut offset = 0;
    for line in text.split_inclusive('\n') {
        let content = line.trim_end_matches(['\n', '\r']);
        if content.trim().is_empty() {
            offset += line.len();
            continue;
        }
        let rest = content.trim_start().strip_prefix("filters")?;
        if rest.trim_start().starts_with(':') {
            return Some(offset);
        }
        return None;
    }
    None
}

/// Converts the parser's reported line/column into a diagnostic against the
/// raw text. `shift` compensates for a synthetic wrapping brace, `leading`
/// for trimmed leading whitespace.
fn parse_error_diagnostic(
    raw: &str,
    parsed: &str,
    err: &serde_json::Error,
    leading: usize,
    shift: usize,
) -> Diagnostic {
    if err.line() == 0 {
        return Diagnostic::new(raw, 0, err.to_string());
    }
    let in_parsed = offset_of_line_col(parsed, err.line(), err.column());
    let offset = in_parsed.saturating_sub(shift) + leading;
    Diagnostic::new(raw, offset, err.to_string())
}

/// 1-based line number of a byte offset. Counts raw bytes so an offset that
/// lands inside a multi-byte character still resolves.
fn line_of_offset(text: &str, offset: usize) -> usize {
    let end = offset.min(text.len());
    text.as_bytes()[..end].iter().filter(|&&b| b == b'\n').count() + 1
}

/// Byte offset of a 1-based line/column position.
fn offset_of_line_col(text: &str, line: usize, column: usize) -> usize {
    let mut remaining = line.saturating_sub(1);
    let mut offset = 0;
    for (index, b) in text.bytes().enumerate() {
        if remaining == 0 {
            break;
        }
        if b == b'\n' {
            remaining -= 1;
            offset = index + 1;
        }
    }
    (offset + column.saturating_sub(1)).min(text.len())
}
