// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Keyword parsing and frequency scoring

use super::types::KeywordScore;

/// Split a comma-separated keyword list
///
/// Each entry is trimmed and lower-cased; empty entries are dropped.
/// Duplicates are kept so they are scored separately.
pub fn parse_keywords(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|k| k.trim().to_lowercase())
        .filter(|k| !k.is_empty())
        .collect()
}

/// Count non-overlapping occurrences of `keyword` in `text`
///
/// Scans left to right and resumes after each match, so `"aaa"` holds
/// `"aa"` once.
pub fn count_occurrences(text: &str, keyword: &str) -> usize {
    if keyword.is_empty() {
        return 0;
    }
    text.matches(keyword).count()
}

/// Score `text` against normalized `keywords`
///
/// The text is lower-cased once; the result has one entry per keyword in
/// input order.
pub fn score(text: &str, keywords: &[String]) -> Vec<KeywordScore> {
    if keywords.is_empty() {
        return Vec::new();
    }

    let normalized = text.to_lowercase();
    keywords
        .iter()
        .map(|keyword| KeywordScore::new(keyword.clone(), count_occurrences(&normalized, keyword)))
        .collect()
}
