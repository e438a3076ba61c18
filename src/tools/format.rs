//! Text rendering shared by tool handlers and the CLI.

use crate::index::Record;
use std::fmt::Write as _;

/// Longest body excerpt shown under a result line.
const SUMMARY_CHARS: usize = 160;

/// Appends one numbered fragment: title, category and page, then a short excerpt.
pub(crate) fn write_record(output: &mut String, number: usize, record: &Record) {
    let _ = writeln!(
        output,
        "{}. `{}` ({}) - {} › {}",
        number, record.title, record.category, record.page, record.location
    );
    if let Some(summary) = record.summary() {
        let _ = writeln!(output, "   {}", truncate(summary, SUMMARY_CHARS));
    }
}

/// Cuts text to at most `max` characters, marking the cut with an ellipsis.
pub(crate) fn truncate(text: &str, max: usize) -> std::borrow::Cow<'_, str> {
    match text.char_indices().nth(max) {
        Some((cut, _)) => format!("{}…", &text[..cut]).into(),
        None => text.into(),
    }
}

/// Appends the "and N more" footer when results were cut off by `limit`.
pub(crate) fn write_remaining(output: &mut String, total: usize, shown: usize) {
    if total > shown {
        let _ = writeln!(
            output,
            "\n… and {} more (raise `limit` to see them)",
            total - shown
        );
    }
}
