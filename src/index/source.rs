//! Decoding of search index source text.
//!
//! The generator writes the index as a script, `var documenterSearchIndex = {"docs": [...]}`,
//! so the client widget can pick it up as a global. Plain JSON is accepted too.

use crate::error::ParseError;
use regex::Regex;
use std::sync::LazyLock;

static ASSIGNMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?:var|let|const)\s+[A-Za-z_$][A-Za-z0-9_$]*\s*=\s*")
        .expect("assignment pattern is valid")
});

/// How the payload was wrapped in the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    /// A bare JSON object
    Json,
    /// A JavaScript global assignment around the JSON object
    Script,
}

/// Strips an optional script assignment and returns the JSON payload.
///
/// Input that already starts like a JSON value is returned as is, so a wrongly
/// shaped document is reported by its shape rather than as a bad script.
pub(crate) fn json_payload(source: &str) -> Result<(&str, SourceFormat), ParseError> {
    let trimmed = source.trim_start_matches('\u{feff}').trim_start();
    if trimmed.starts_with(['{', '[']) {
        return Ok((trimmed, SourceFormat::Json));
    }

    let Some(prefix) = ASSIGNMENT.find(trimmed) else {
        let preview: String = trimmed.chars().take(40).collect();
        return Err(ParseError::Script(format!("no assignment found near `{}`", preview)));
    };

    let payload = trimmed[prefix.end()..].trim_end();
    let payload = payload.strip_suffix(';').unwrap_or(payload).trim_end();
    if payload.is_empty() {
        return Err(ParseError::Script("assignment has no value".to_string()));
    }

    Ok((payload, SourceFormat::Script))
}
