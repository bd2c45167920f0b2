// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Command-line interface

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

use crate::api::{start_server, AppState};
use crate::crawl::{
    CrawlRecord, CrawlStore, Crawler, CrawlerConfig, JsonlCrawlStore, MemoryCrawlStore,
    ReqwestPageClient,
};

/// Keyword crawler
#[derive(Parser, Debug)]
#[command(name = "keyword-crawler")]
#[command(version)]
#[command(about = "Fetch a page, score it against keywords and keep the results", long_about = None)]
pub struct Cli {
    /// TOML configuration file; environment variables apply when absent
    #[arg(long, global = true, env = "CRAWL_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Serve the submit and results endpoints (default)
    Serve(ServeArgs),

    /// Crawl one page and print the record as JSON
    Crawl(CrawlArgs),
}

#[derive(Args, Debug, Default)]
pub struct ServeArgs {
    /// Listen address
    #[arg(long)]
    pub bind: Option<String>,

    /// JSON-lines store file
    #[arg(long)]
    pub store: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct CrawlArgs {
    /// Page to crawl
    #[arg(long)]
    pub url: String,

    /// Comma-separated keywords
    #[arg(long)]
    pub keywords: String,

    /// JSON-lines store file
    #[arg(long)]
    pub store: Option<PathBuf>,

    /// Keep the raw HTML in the printed record
    #[arg(long)]
    pub include_html: bool,
}

impl Cli {
    /// Resolve configuration: TOML file if given, otherwise the environment
    pub fn load_config(&self) -> Result<CrawlerConfig> {
        match &self.config {
            Some(path) => CrawlerConfig::load(path),
            None => Ok(CrawlerConfig::from_env()),
        }
    }
}

/// Execute CLI command
pub async fn execute(cli: Cli) -> Result<()> {
    let mut config = cli.load_config()?;
    match cli.command {
        None => serve(config, ServeArgs::default()).await,
        Some(Commands::Serve(args)) => serve(config, args).await,
        Some(Commands::Crawl(args)) => {
            if args.store.is_some() {
                config.store_path = args.store.clone();
            }
            crawl_once(config, args).await
        }
    }
}

/// Build the crawler with the store the configuration selects
pub fn build_crawler(config: &CrawlerConfig) -> Result<Crawler> {
    config.validate().map_err(anyhow::Error::msg)?;

    let store: Arc<dyn CrawlStore> = match &config.store_path {
        Some(path) => {
            info!("Using JSON-lines crawl store at {}", path.display());
            Arc::new(JsonlCrawlStore::new(path.clone()))
        }
        None => {
            info!("Using in-memory crawl store");
            Arc::new(MemoryCrawlStore::new())
        }
    };
    let client = Arc::new(ReqwestPageClient::new(config)?);

    Ok(Crawler::new(client, store, config))
}

async fn serve(mut config: CrawlerConfig, args: ServeArgs) -> Result<()> {
    if let Some(bind) = args.bind {
        config.bind_addr = bind;
    }
    if args.store.is_some() {
        config.store_path = args.store;
    }

    let crawler = Arc::new(build_crawler(&config)?);
    let addr = config.bind_addr.parse()?;
    start_server(AppState::new(crawler, config.results_limit), addr).await
}

async fn crawl_once(config: CrawlerConfig, args: CrawlArgs) -> Result<()> {
    let crawler = build_crawler(&config)?;
    let record = crawler.crawl(&args.url, &args.keywords).await?;
    println!("{}", render_record(record, args.include_html)?);
    Ok(())
}

fn render_record(mut record: CrawlRecord, include_html: bool) -> Result<String> {
    if !include_html {
        record.raw_html.clear();
    }
    Ok(serde_json::to_string_pretty(&record)?)
}
