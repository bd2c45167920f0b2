// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Configuration for the crawler
//!
//! Defaults, environment overrides and an optional TOML file.

use serde::{Deserialize, Serialize};
use std::env;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Configuration for crawling and serving results
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Total bound on the outbound page fetch in seconds (default: 30)
    pub fetch_timeout_secs: u64,
    /// Bound on the store write in seconds (default: 5)
    pub persist_timeout_secs: u64,
    /// User-Agent sent with every request
    pub user_agent: String,
    /// Records returned by the results listing (default: 10)
    pub results_limit: usize,
    /// JSON-lines store file; in-memory store when unset
    pub store_path: Option<PathBuf>,
    /// Listen address for the HTTP server (default: 127.0.0.1:8080)
    pub bind_addr: String,
}

impl CrawlerConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            fetch_timeout_secs: env::var("CRAWL_FETCH_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.fetch_timeout_secs),
            persist_timeout_secs: env::var("CRAWL_PERSIST_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.persist_timeout_secs),
            user_agent: env::var("CRAWL_USER_AGENT").unwrap_or(defaults.user_agent),
            results_limit: env::var("CRAWL_RESULTS_LIMIT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.results_limit),
            store_path: env::var("CRAWL_STORE_PATH")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from),
            bind_addr: env::var("CRAWL_BIND_ADDR").unwrap_or(defaults.bind_addr),
        }
    }

    /// Parse configuration from TOML; missing keys take their defaults
    pub fn from_toml_str(contents: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&contents)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), String> {
        if self.fetch_timeout_secs == 0 {
            return Err("fetch_timeout_secs must be at least 1".to_string());
        }
        if self.persist_timeout_secs == 0 {
            return Err("persist_timeout_secs must be at least 1".to_string());
        }
        if self.results_limit == 0 {
            return Err("results_limit must be at least 1".to_string());
        }
        if self.user_agent.trim().is_empty() {
            return Err("user_agent must not be empty".to_string());
        }
        if self.bind_addr.parse::<SocketAddr>().is_err() {
            return Err(format!("bind_addr is not a socket address: {}", self.bind_addr));
        }
        Ok(())
    }
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            fetch_timeout_secs: 30,
            persist_timeout_secs: 5,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            results_limit: 10,
            store_path: None,
            bind_addr: "127.0.0.1:8080".to_string(),
        }
    }
}
