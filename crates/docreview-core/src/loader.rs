// parse fetched resources: edit list JSON, continue sentinel, local input files

use crate::model::{Edit, EditList};
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// Body substituted when the edit-list resource cannot be fetched
pub const EMPTY_EDIT_LIST: &str = r#"{"alteracoes":[]}"#;

/// Parse the edit-list resource.
///
/// Malformed JSON never blocks a review: it is logged and treated as an
/// empty edit set. A missing or `null` `alteracoes` key is also empty.
pub fn parse_edit_list(raw: &str) -> Vec<Edit> {
    match serde_json::from_str::<EditList>(raw) {
        Ok(list) => list.edits.unwrap_or_default(),
        Err(e) => {
            tracing::warn!(error = %e, "failed to parse edit list, continuing without edits");
            Vec::new()
        }
    }
}

/// Strict variant of [`parse_edit_list`] for offline commands, where a bad
/// file should be reported instead of silently ignored.
pub fn parse_edit_list_strict(raw: &str) -> Result<Vec<Edit>> {
    let list: EditList = serde_json::from_str(raw).context("parse edit list JSON")?;
    Ok(list.edits.unwrap_or_default())
}

/// Parse the continue sentinel the way `parseInt` reads a leading integer:
/// leading whitespace and an optional sign are accepted, parsing stops at the
/// first non-digit, and text with no leading digits yields `None`.
pub fn parse_continue_flag(raw: &str) -> Option<i64> {
    let trimmed = raw.trim_start();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let digits: &str = {
        let end = rest
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(rest.len());
        &rest[..end]
    };

    if digits.is_empty() {
        return None;
    }

    // Saturate rather than fail on absurdly long sentinels; only zero/non-zero matters
    let magnitude = digits.parse::<i64>().unwrap_or(i64::MAX);
    Some(if negative { -magnitude } else { magnitude })
}

/// Read a document and an edit-list file from disk
pub fn load_local_inputs(document: &Path, edits: &Path) -> Result<(String, Vec<Edit>)> {
    let text = fs::read_to_string(document)
        .with_context(|| format!("Failed to read document: {}", document.display()))?;
    let raw = fs::read_to_string(edits)
        .with_context(|| format!("Failed to read edit list: {}", edits.display()))?;
    let edits = parse_edit_list_strict(&raw)
        .with_context(|| format!("Failed to parse edit list: {}", edits.display()))?;
    Ok((text, edits))
}
