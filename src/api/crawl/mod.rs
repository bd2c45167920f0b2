// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Crawl submission and results endpoints

pub mod handler;
pub mod request;
pub mod response;

pub use handler::{results_handler, submit_handler, submit_redirect_handler};
pub use request::CrawlSubmitRequest;
pub use response::CrawlResultsResponse;
