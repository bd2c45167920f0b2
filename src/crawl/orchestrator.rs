// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Crawl pipeline orchestration
//!
//! validate → fetch → decode → extract → score → persist, strictly in
//! sequence. The first failure ends the crawl and nothing after it runs.

use chrono::Utc;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::time::timeout;
use tracing::{debug, info, warn};
use url::Url;

use super::client::PageClient;
use super::config::CrawlerConfig;
use super::decoder::decode;
use super::extractor::{extract_text, PageStats};
use super::scorer::{parse_keywords, score};
use super::store::CrawlStore;
use super::types::{CrawlError, CrawlRecord};

/// Runs single-page crawls against an injected client and store
///
/// Holds no per-crawl state; one instance serves concurrent crawls.
pub struct Crawler {
    client: Arc<dyn PageClient>,
    store: Arc<dyn CrawlStore>,
    persist_timeout: Duration,
}

impl Crawler {
    pub fn new(
        client: Arc<dyn PageClient>,
        store: Arc<dyn CrawlStore>,
        config: &CrawlerConfig,
    ) -> Self {
        Self {
            client,
            store,
            persist_timeout: Duration::from_secs(config.persist_timeout_secs),
        }
    }

    /// Override the store write bound
    pub fn with_persist_timeout(mut self, persist_timeout: Duration) -> Self {
        self.persist_timeout = persist_timeout;
        self
    }

    /// The store records are written to
    pub fn store(&self) -> &Arc<dyn CrawlStore> {
        &self.store
    }

    /// Crawl `url` and score it against comma-separated `raw_keywords`
    pub async fn crawl(&self, url: &str, raw_keywords: &str) -> Result<CrawlRecord, CrawlError> {
        let start = Instant::now();

        let keywords = validate(url, raw_keywords).map_err(|e| {
            warn!("Crawl request rejected: {}", e);
            e
        })?;
        info!("Attempting to crawl URL: {}", url);
        debug!("Processing keywords: {:?}", keywords);

        let response = self.client.get(url).await.map_err(|e| {
            warn!("Error fetching {}: {}", url, e);
            e
        })?;

        if !response.is_success() {
            warn!(
                "Error: received status code {} for URL: {}",
                response.status, url
            );
            return Err(CrawlError::HttpStatus {
                code: response.status,
            });
        }

        let decoded = decode(&response.body, response.content_encoding.as_deref()).map_err(|e| {
            warn!("Error decoding body of {}: {}", url, e);
            e
        })?;
        debug!(
            "Decoded {} bytes ({:?}) into {} bytes",
            response.body.len(),
            response.content_encoding,
            decoded.len()
        );

        let page = extract_text(&decoded).map_err(|e| {
            warn!("Error parsing HTML from {}: {}", url, e);
            e
        })?;
        debug!(
            "Extracted {} chars using rule {}",
            page.text.len(),
            page.rule
        );

        let scores = score(&page.text, &keywords);
        for entry in &scores {
            info!("Keyword '{}' found {} times", entry.keyword, entry.count);
        }

        let record = CrawlRecord {
            url: url.to_string(),
            keywords,
            scores,
            raw_html: page.raw_html,
            crawl_time: Utc::now(),
        };

        self.persist(&record).await?;
        info!(
            "Successfully saved page to database with {} keywords in {}ms",
            record.keywords.len(),
            start.elapsed().as_millis()
        );
        log_page_stats(url, &page.stats);

        Ok(record)
    }

    async fn persist(&self, record: &CrawlRecord) -> Result<(), CrawlError> {
        match timeout(self.persist_timeout, self.store.insert(record.clone())).await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(e)) => {
                warn!("Error saving crawl of {}: {}", record.url, e);
                Err(CrawlError::Persistence(e.to_string()))
            }
            Err(_) => {
                warn!(
                    "Saving crawl of {} timed out after {:?}",
                    record.url, self.persist_timeout
                );
                Err(CrawlError::Persistence(format!(
                    "write timed out after {:?}",
                    self.persist_timeout
                )))
            }
        }
    }
}

/// Check the inputs and return the normalized keyword list
pub fn validate(url: &str, raw_keywords: &str) -> Result<Vec<String>, CrawlError> {
    if url.trim().is_empty() {
        return Err(CrawlError::Validation("URL is required".to_string()));
    }

    let parsed = Url::parse(url)
        .map_err(|e| CrawlError::Validation(format!("URL is not valid: {}", e)))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(CrawlError::Validation(format!(
            "URL scheme must be http or https, got {}",
            parsed.scheme()
        )));
    }

    let keywords = parse_keywords(raw_keywords);
    if keywords.is_empty() {
        return Err(CrawlError::Validation("Keywords are required".to_string()));
    }

    Ok(keywords)
}

fn log_page_stats(url: &str, stats: &PageStats) {
    info!(
        url,
        elements = stats.elements,
        links = stats.links,
        images = stats.images,
        paragraphs = stats.paragraphs,
        divs = stats.divs,
        spans = stats.spans,
        headers = stats.headers,
        forms = stats.forms,
        "Page statistics"
    );
}
