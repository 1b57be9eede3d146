//! Error body parsing.
//!
//! Failed requests return `{"detail": [{"msg": "...", ...}, ...]}`. Only the
//! first entry's `msg` is surfaced; anything else (a plain string detail,
//! HTML from a proxy, an empty body) yields `None` so the caller falls back
//! to its per-operation message.

use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: Vec<ErrorEntry>,
}

#[derive(Debug, Deserialize)]
struct ErrorEntry {
    msg: Option<String>,
}

/// Returns the first structured detail message in an error response body.
pub fn extract_error_message(body: &[u8]) -> Option<String> {
    let parsed: ErrorBody = serde_json::from_slice(body).ok()?;
    parsed
        .detail
        .into_iter()
        .next()?
        .msg
        .filter(|m| !m.is_empty())
}
