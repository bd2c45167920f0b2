// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::crawl::{CrawlError, CrawlStage};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub error_type: String,
    pub message: String,
    /// Upstream status for `http_status_error`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<u16>,
}

#[derive(Debug)]
pub enum ApiError {
    Crawl(CrawlError),
    Store(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Crawl(e) => match e.stage() {
                CrawlStage::Validate => StatusCode::BAD_REQUEST,
                CrawlStage::Fetch | CrawlStage::Status => StatusCode::BAD_GATEWAY,
                CrawlStage::Decode | CrawlStage::Extract => StatusCode::UNPROCESSABLE_ENTITY,
                CrawlStage::Persist => StatusCode::INTERNAL_SERVER_ERROR,
            },
            ApiError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn to_response(&self) -> ErrorResponse {
        match self {
            ApiError::Crawl(e) => ErrorResponse {
                error_type: e.stage().to_string(),
                message: e.to_string(),
                code: match e {
                    CrawlError::HttpStatus { code } => Some(*code),
                    _ => None,
                },
            },
            ApiError::Store(msg) => ErrorResponse {
                error_type: "store_error".to_string(),
                message: format!("Failed to fetch results: {}", msg),
                code: None,
            },
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Crawl(e) => write!(f, "{}", e),
            ApiError::Store(msg) => write!(f, "Store error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl From<CrawlError> for ApiError {
    fn from(e: CrawlError) -> Self {
        ApiError::Crawl(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status_code(), Json(self.to_response())).into_response()
    }
}
