//! Cross-source correlation.
//!
//! Scans the accumulated run record for repeated identifier-like tokens
//! across independent collector outputs. The heuristics are deliberately
//! lexical: a token is interesting when it contains `@` (email-like) or is
//! all digits with length >= 7 (phone-like). Long numeric IDs slip in as
//! false positives and punctuated phone numbers slip out; that trade-off
//! is the contract. Anything stricter (a real email/phone grammar) can be
//! substituted here without touching the orchestrator.

use std::collections::{BTreeMap, BTreeSet};

use serde_json::Value;

use crate::models::CollectorOutcome;

const MIN_DIGIT_RUN: usize = 7;

/// Build the correlation index: normalized token -> ordered, duplicate-free
/// list of originating targets.
///
/// Pure function of the entries. Sources are appended in entry-processing
/// order; tokens within one entry count once regardless of repetition.
pub fn correlate(entries: &[CollectorOutcome]) -> BTreeMap<String, Vec<String>> {
    let mut index: BTreeMap<String, Vec<String>> = BTreeMap::new();

    for entry in entries {
        let blob = match entry.payload.as_ref().map(candidate_blob) {
            Some(blob) => blob,
            None => continue, // failure entries carry no text
        };

        let tokens: BTreeSet<&str> = blob.split_whitespace().collect();
        for token in tokens {
            if !is_interesting(token) {
                continue;
            }
            let key = normalize(token);
            let sources = index.entry(key).or_default();
            if !sources.iter().any(|s| s == &entry.target) {
                sources.push(entry.target.clone());
            }
        }
    }

    index
}

/// The text the heuristics run over: the payload's free text plus the
/// stringified values of its key/value metadata. Payloads with neither
/// contribute their compact JSON form.
fn candidate_blob(payload: &Value) -> String {
    let text = payload.get("text").and_then(Value::as_str);
    let meta = payload
        .get("meta")
        .or_else(|| payload.get("metadata"))
        .and_then(Value::as_object);

    if text.is_none() && meta.is_none() {
        return payload.to_string();
    }

    let mut blob = text.unwrap_or_default().to_string();
    if let Some(meta) = meta {
        for value in meta.values() {
            blob.push(' ');
            match value {
                Value::String(s) => blob.push_str(s),
                other => blob.push_str(&other.to_string()),
            }
        }
    }
    blob
}

fn is_interesting(token: &str) -> bool {
    token.contains('@')
        || (token.len() >= MIN_DIGIT_RUN && token.chars().all(|c| c.is_ascii_digit()))
}

fn normalize(token: &str) -> String {
    token.trim().to_lowercase()
}
