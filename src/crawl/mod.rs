// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Single-page keyword crawling
//!
//! ## Architecture
//!
//! ```text
//! URL + keywords → Crawler → PageClient → bytes + Content-Encoding
//!                     ↓
//!                  decoder → extractor → scorer → CrawlRecord → CrawlStore
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! let config = CrawlerConfig::from_env();
//! let client = Arc::new(ReqwestPageClient::new(&config)?);
//! let store = Arc::new(MemoryCrawlStore::new());
//! let crawler = Crawler::new(client, store, &config);
//!
//! let record = crawler.crawl("https://example.com", "rust, crawler").await?;
//! ```

pub mod client;
pub mod config;
pub mod decoder;
pub mod extractor;
pub mod orchestrator;
pub mod scorer;
pub mod store;
pub mod types;

pub use client::{PageClient, PageResponse, ReqwestPageClient};
pub use config::CrawlerConfig;
pub use decoder::{decode, ContentEncoding};
pub use extractor::{extract_text, ContentRule, ExtractedPage, PageStats};
pub use orchestrator::Crawler;
pub use scorer::{parse_keywords, score};
pub use store::{CrawlStore, JsonlCrawlStore, MemoryCrawlStore};
pub use types::{CrawlError, CrawlRecord, CrawlStage, KeywordScore};
