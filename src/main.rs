// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::Result;
use clap::Parser;
use keyword_crawler::cli::{self, Cli};
use std::env;

#[tokio::main]
async fn main() -> Result<()> {
    if dotenv::dotenv().is_err() {
        eprintln!("Warning: .env file not found");
    }

    // Initialize tracing subscriber for logging
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info");
    }
    tracing_subscriber::fmt::init();

    cli::execute(Cli::parse()).await
}
