// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Crawl submission form

use serde::{Deserialize, Serialize};

/// Form body for POST /submit
///
/// Missing fields deserialize as empty strings so the crawler's own
/// validation reports them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CrawlSubmitRequest {
    /// Page to crawl
    #[serde(default)]
    pub url: String,

    /// Comma-separated keywords
    #[serde(default)]
    pub keywords: String,
}
