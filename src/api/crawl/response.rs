// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Results listing response

use serde::{Deserialize, Serialize};

use crate::crawl::CrawlRecord;

/// Response body for GET /results
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrawlResultsResponse {
    /// Most recent records, newest first
    pub results: Vec<CrawlRecord>,

    /// Number of records returned
    pub result_count: usize,

    /// Limit applied to the query
    pub limit: usize,
}

impl CrawlResultsResponse {
    pub fn new(results: Vec<CrawlRecord>, limit: usize) -> Self {
        Self {
            result_count: results.len(),
            results,
            limit,
        }
    }
}
