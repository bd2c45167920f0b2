// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Crawl endpoint handlers

use axum::{
    extract::State,
    response::Redirect,
    Form, Json,
};
use tracing::{debug, info};

use super::request::CrawlSubmitRequest;
use super::response::CrawlResultsResponse;
use crate::api::errors::ApiError;
use crate::api::http_server::AppState;
use crate::crawl::CrawlStore;

/// POST /submit - Crawl a page and score it
///
/// # Form fields
/// - `url`: Page to crawl (required)
/// - `keywords`: Comma-separated keywords (required)
///
/// # Response
/// - 303 See Other to `/results` once the record is stored
///
/// # Errors
/// - 400 Bad Request: missing or invalid url / keywords
/// - 502 Bad Gateway: page unreachable or non-success status
/// - 422 Unprocessable Entity: body could not be decoded or parsed
/// - 500 Internal Server Error: record could not be stored
pub async fn submit_handler(
    State(state): State<AppState>,
    Form(request): Form<CrawlSubmitRequest>,
) -> Result<Redirect, ApiError> {
    debug!("Crawl request: {:?}", request);

    let record = state.crawler.crawl(&request.url, &request.keywords).await?;

    info!(
        "Crawl of {} stored with {} total matches, redirecting to results",
        record.url,
        record.total_count()
    );
    Ok(Redirect::to("/results"))
}

/// GET /submit - Only POST submits; everything else goes back to the index
pub async fn submit_redirect_handler() -> Redirect {
    debug!("Non-POST request to /submit, redirecting to index");
    Redirect::to("/")
}

/// GET /results - Most recent crawl records, newest first
pub async fn results_handler(
    State(state): State<AppState>,
) -> Result<Json<CrawlResultsResponse>, ApiError> {
    let results = state
        .crawler
        .store()
        .query_top_recent(state.results_limit)
        .await
        .map_err(|e| ApiError::Store(e.to_string()))?;

    Ok(Json(CrawlResultsResponse::new(results, state.results_limit)))
}
