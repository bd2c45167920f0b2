// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Crawl record persistence
//!
//! The store is the only state shared between crawls. Implementations must
//! be safe for concurrent use through a shared handle.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use std::fs::OpenOptions;
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use super::types::CrawlRecord;

/// Durable sink for crawl records
#[async_trait]
pub trait CrawlStore: Send + Sync {
    /// Store one record
    async fn insert(&self, record: CrawlRecord) -> Result<()>;

    /// Up to `limit` records, newest `crawl_time` first
    async fn query_top_recent(&self, limit: usize) -> Result<Vec<CrawlRecord>>;
}

/// Newest first; ties keep the later-inserted record first
fn top_recent(records: impl DoubleEndedIterator<Item = CrawlRecord>, limit: usize) -> Vec<CrawlRecord> {
    let mut sorted: Vec<CrawlRecord> = records.rev().collect();
    sorted.sort_by(|a, b| b.crawl_time.cmp(&a.crawl_time));
    sorted.truncate(limit);
    sorted
}

/// In-memory storage for crawl records
#[derive(Clone, Default)]
pub struct MemoryCrawlStore {
    records: Arc<RwLock<Vec<CrawlRecord>>>,
}

impl MemoryCrawlStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl CrawlStore for MemoryCrawlStore {
    async fn insert(&self, record: CrawlRecord) -> Result<()> {
        debug!("Storing crawl record for {}", record.url);
        self.records.write().await.push(record);
        Ok(())
    }

    async fn query_top_recent(&self, limit: usize) -> Result<Vec<CrawlRecord>> {
        let records = self.records.read().await;
        Ok(top_recent(records.iter().cloned(), limit))
    }
}

/// Append-only JSON-lines file of crawl records
///
/// Each record is written by one blocking `write_all` that runs to
/// completion even when the caller stops waiting, so a cancelled insert
/// never leaves half a line behind. Reads and writes share one file lock.
pub struct JsonlCrawlStore {
    path: PathBuf,
    file_lock: Arc<Mutex<()>>,
}

impl JsonlCrawlStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            file_lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Run blocking file work under the file lock on the blocking pool
    async fn with_file_lock<T, F>(&self, work: F) -> Result<T>
    where
        F: FnOnce(&Path) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let path = self.path.clone();
        let file_lock = Arc::clone(&self.file_lock);
        tokio::task::spawn_blocking(move || {
            let _guard = file_lock
                .lock()
                .map_err(|_| anyhow!("crawl store lock poisoned"))?;
            work(&path)
        })
        .await
        .map_err(|e| anyhow!("crawl store task failed: {}", e))?
    }
}

/// Append `line` on a line of its own
///
/// A file whose last line lacks its newline (a crash mid-write) is
/// terminated first, so the torn line stays isolated and is skipped on read.
fn append_line(path: &Path, line: &[u8]) -> Result<()> {
    let mut file = OpenOptions::new()
        .create(true)
        .read(true)
        .append(true)
        .open(path)
        .map_err(|e| anyhow!("cannot open {}: {}", path.display(), e))?;

    let mut pending = Vec::with_capacity(line.len() + 1);
    if file.metadata()?.len() > 0 {
        let mut last = [0u8; 1];
        file.seek(SeekFrom::End(-1))?;
        file.read_exact(&mut last)?;
        if last[0] != b'\n' {
            warn!("Terminating torn last line of {}", path.display());
            pending.push(b'\n');
        }
    }
    pending.extend_from_slice(line);

    file.write_all(&pending)?;
    file.flush()?;
    Ok(())
}

#[async_trait]
impl CrawlStore for JsonlCrawlStore {
    async fn insert(&self, record: CrawlRecord) -> Result<()> {
        let mut line = serde_json::to_vec(&record)?;
        line.push(b'\n');

        self.with_file_lock(move |path| append_line(path, &line))
            .await?;

        debug!("Appended crawl record for {} to {}", record.url, self.path.display());
        Ok(())
    }

    async fn query_top_recent(&self, limit: usize) -> Result<Vec<CrawlRecord>> {
        let contents = self
            .with_file_lock(|path| match std::fs::read_to_string(path) {
                Ok(contents) => Ok(Some(contents)),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
                Err(e) => Err(e.into()),
            })
            .await?;
        let Some(contents) = contents else {
            info!("No crawl store at {} yet", self.path.display());
            return Ok(Vec::new());
        };

        let mut records = Vec::new();
        for (index, line) in contents.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<CrawlRecord>(line) {
                Ok(record) => records.push(record),
                Err(e) => warn!(
                    "Skipping unreadable record on line {} of {}: {}",
                    index + 1,
                    self.path.display(),
                    e
                ),
            }
        }

        Ok(top_recent(records.into_iter(), limit))
    }
}
