//! Callback envelope handling.
//!
//! Responses look like `callback_json8({...})`, sometimes with a trailing
//! `;`. Only the outermost wrapper is removed; parentheses inside the JSON
//! are left alone.

use super::types::{ScanPage, ScansResponse};
use super::MetadataError;

/// Strip `<callback>(` ... `)` from a response body.
pub fn strip_callback_envelope<'a>(
    body: &'a str,
    callback: &str,
) -> Result<&'a str, MetadataError> {
    let trimmed = body.trim();

    let inner = trimmed
        .strip_prefix(callback)
        .map(str::trim_start)
        .and_then(|rest| rest.strip_prefix('('))
        .ok_or_else(|| {
            MetadataError::Envelope(format!(
                "expected body to start with {}(, got {:?}",
                callback,
                snippet(trimmed)
            ))
        })?;

    let inner = inner.strip_suffix(';').unwrap_or(inner).trim_end();
    inner.strip_suffix(')').ok_or_else(|| {
        MetadataError::Envelope(format!(
            "expected body to end with ), got {:?}",
            snippet_end(trimmed)
        ))
    })
}

/// Unwrap and decode a metadata response body.
pub fn decode_scan_page(body: &str, callback: &str) -> Result<ScanPage, MetadataError> {
    let json = strip_callback_envelope(body, callback)?;
    let response: ScansResponse = serde_json::from_str(json)?;
    Ok(response.into())
}

fn snippet(s: &str) -> String {
    s.chars().take(40).collect()
}

fn snippet_end(s: &str) -> String {
    let chars: Vec<char> = s.chars().collect();
    chars[chars.len().saturating_sub(40)..].iter().collect()
}
