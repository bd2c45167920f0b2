// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Outbound HTTP client used by the crawler

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::header::{self, HeaderMap, HeaderValue};
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

use super::config::CrawlerConfig;
use super::types::CrawlError;

pub const ACCEPT: &str =
    "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,*/*;q=0.8";
pub const ACCEPT_LANGUAGE: &str = "en-US,en;q=0.5";
pub const ACCEPT_ENCODING: &str = "gzip, deflate, br";

/// Response as seen by the pipeline
///
/// `body` is only populated for success statuses; non-success bodies are
/// never read.
#[derive(Debug, Clone)]
pub struct PageResponse {
    pub status: u16,
    /// Raw `Content-Encoding` header value, if any
    pub content_encoding: Option<String>,
    pub body: Bytes,
}

impl PageResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// HTTP GET of a single page
#[async_trait]
pub trait PageClient: Send + Sync {
    /// Fetch `url` with browser-like headers
    ///
    /// Transport failures (DNS, connect, timeout) are `CrawlError::Network`.
    /// Any status, success or not, is returned as a `PageResponse`.
    async fn get(&self, url: &str) -> Result<PageResponse, CrawlError>;
}

/// Browser-like header set sent with every crawl request
pub fn browser_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(header::ACCEPT, HeaderValue::from_static(ACCEPT));
    headers.insert(
        header::ACCEPT_LANGUAGE,
        HeaderValue::from_static(ACCEPT_LANGUAGE),
    );
    headers.insert(
        header::ACCEPT_ENCODING,
        HeaderValue::from_static(ACCEPT_ENCODING),
    );
    headers.insert(header::CONNECTION, HeaderValue::from_static("keep-alive"));
    headers.insert(
        header::UPGRADE_INSECURE_REQUESTS,
        HeaderValue::from_static("1"),
    );
    headers
}

/// `PageClient` backed by reqwest
///
/// Only reqwest's `deflate` decompression is enabled. Deflate bodies are
/// inflated here and lose their `Content-Encoding` header; gzip and br
/// bodies arrive compressed with the header intact for the decoder.
pub struct ReqwestPageClient {
    client: Client,
}

impl ReqwestPageClient {
    pub fn new(config: &CrawlerConfig) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.fetch_timeout_secs))
            .user_agent(config.user_agent.as_str())
            .default_headers(browser_headers())
            .build()?;

        Ok(Self { client })
    }
}

#[async_trait]
impl PageClient for ReqwestPageClient {
    async fn get(&self, url: &str) -> Result<PageResponse, CrawlError> {
        debug!("Sending request to {} with headers: {:?}", url, browser_headers());

        let response = self.client.get(url).send().await.map_err(network_error)?;

        let status = response.status();
        debug!("Response status code: {}", status.as_u16());
        debug!("Response headers: {:?}", response.headers());

        let content_encoding = response
            .headers()
            .get(header::CONTENT_ENCODING)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.to_string());

        if !status.is_success() {
            return Ok(PageResponse {
                status: status.as_u16(),
                content_encoding,
                body: Bytes::new(),
            });
        }

        let body = response.bytes().await.map_err(body_error)?;

        Ok(PageResponse {
            status: status.as_u16(),
            content_encoding,
            body,
        })
    }
}

fn network_error(e: reqwest::Error) -> CrawlError {
    if e.is_timeout() {
        CrawlError::Network(format!("request timed out: {}", e))
    } else {
        CrawlError::Network(e.to_string())
    }
}

/// Body read failures; a deflate stream that fails to inflate is a decode error
fn body_error(e: reqwest::Error) -> CrawlError {
    if e.is_decode() {
        CrawlError::Decode(format!("invalid deflate stream: {}", e))
    } else {
        network_error(e)
    }
}
