// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use axum::{
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use std::{net::SocketAddr, sync::Arc};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::crawl::{results_handler, submit_handler, submit_redirect_handler};
use crate::crawl::Crawler;

#[derive(Clone)]
pub struct AppState {
    pub crawler: Arc<Crawler>,
    pub results_limit: usize,
}

impl AppState {
    pub fn new(crawler: Arc<Crawler>, results_limit: usize) -> Self {
        Self {
            crawler,
            results_limit,
        }
    }
}

pub fn create_app(state: AppState) -> Router {
    Router::new()
        // Endpoint index
        .route("/", get(index_handler))
        // Health check
        .route("/health", get(health_handler))
        // Crawl submission
        .route("/submit", get(submit_redirect_handler).post(submit_handler))
        // Recent results
        .route("/results", get(results_handler))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

pub async fn start_server(state: AppState, addr: SocketAddr) -> anyhow::Result<()> {
    let app = create_app(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!("Server running at http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

async fn index_handler() -> Json<Value> {
    Json(json!({
        "service": "keyword-crawler",
        "endpoints": {
            "POST /submit": "form fields `url` and `keywords` (comma-separated)",
            "GET /results": "most recent crawl records, newest first",
            "GET /health": "liveness check",
        }
    }))
}

async fn health_handler() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
