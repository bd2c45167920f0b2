// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod api;
pub mod cli;
pub mod crawl;

pub use crawl::{
    CrawlError, CrawlRecord, CrawlStore, Crawler, CrawlerConfig, KeywordScore, PageClient,
};
