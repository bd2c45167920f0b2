// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Core types for the crawl pipeline

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Occurrence count of a single keyword in a page's text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeywordScore {
    /// The normalized keyword
    pub keyword: String,
    /// Non-overlapping occurrences in the lower-cased page text
    pub count: usize,
}

impl KeywordScore {
    pub fn new(keyword: impl Into<String>, count: usize) -> Self {
        Self {
            keyword: keyword.into(),
            count,
        }
    }
}

/// One row per successful crawl
///
/// Built once at the end of a successful pipeline run and never mutated
/// afterwards. `scores[i].keyword == keywords[i]` for every `i`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrawlRecord {
    /// The exact input URL
    pub url: String,
    /// Normalized keywords in input order, duplicates preserved
    pub keywords: Vec<String>,
    /// One score per keyword, same order
    pub scores: Vec<KeywordScore>,
    /// Serialized document markup as retrieved
    #[serde(rename = "rawHTML")]
    pub raw_html: String,
    /// Record assembly instant, used as the retrieval sort key
    pub crawl_time: DateTime<Utc>,
}

impl CrawlRecord {
    /// Total occurrences across all keywords
    pub fn total_count(&self) -> usize {
        self.scores.iter().map(|s| s.count).sum()
    }
}

/// Pipeline stage a failure originated from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CrawlStage {
    Validate,
    Fetch,
    Status,
    Decode,
    Extract,
    Persist,
}

impl CrawlStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Validate => "validation_error",
            Self::Fetch => "network_error",
            Self::Status => "http_status_error",
            Self::Decode => "decode_error",
            Self::Extract => "parse_error",
            Self::Persist => "persistence_error",
        }
    }
}

impl fmt::Display for CrawlStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors that terminate a crawl
///
/// Every variant is terminal; nothing is retried.
#[derive(Debug, Error)]
pub enum CrawlError {
    /// Missing or malformed input
    #[error("Invalid input: {0}")]
    Validation(String),

    /// The request could not complete (DNS, connect, timeout)
    #[error("Failed to fetch URL: {0}")]
    Network(String),

    /// The server answered with a non-success status
    #[error("Failed to fetch URL: status code {code}")]
    HttpStatus {
        /// Upstream HTTP status code
        code: u16,
    },

    /// Transport decompression failed
    #[error("Failed to decompress response: {0}")]
    Decode(String),

    /// The body could not be treated as an HTML document
    #[error("Failed to parse HTML: {0}")]
    Parse(String),

    /// The store write failed or timed out
    #[error("Failed to save crawl result: {0}")]
    Persistence(String),
}

impl CrawlError {
    /// The pipeline stage this error terminated
    pub fn stage(&self) -> CrawlStage {
        match self {
            Self::Validation(_) => CrawlStage::Validate,
            Self::Network(_) => CrawlStage::Fetch,
            Self::HttpStatus { .. } => CrawlStage::Status,
            Self::Decode(_) => CrawlStage::Decode,
            Self::Parse(_) => CrawlStage::Extract,
            Self::Persistence(_) => CrawlStage::Persist,
        }
    }
}
