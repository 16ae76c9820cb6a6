// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Course search API endpoint handler

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};
use tracing::{debug, warn};

use super::request::CoursesQuery;
use super::response::CoursesApiResponse;
use crate::api::http_server::AppState;
use crate::search::SearchError;

/// GET /resources/courses - Search free courses across all platforms
///
/// # Query parameters
/// - `q`: Search term (required, non-blank)
/// - `lang`: Search language, `es` or `en` (default `en`)
/// - `num_items`: Items per platform (default 6, must be positive)
///
/// # Response
/// `results` mapping with one entry per platform (coursera, edx, udemy,
/// youtube), each carrying its `courses` list and a `redirect_url` for
/// running the same search on the platform itself. Failed platforms
/// show zero courses; the endpoint never fails because one upstream did.
///
/// # Errors
/// - 400 Bad Request: blank query or non-positive num_items
pub async fn courses_handler(
    State(state): State<AppState>,
    Query(params): Query<CoursesQuery>,
) -> Result<Json<CoursesApiResponse>, (StatusCode, Json<Value>)> {
    debug!("Course search request: {:?}", params.q);

    let plan = params
        .plan(state.search_service.default_num_items())
        .map_err(|e| {
            warn!("Course search validation failed: {}", e);
            (StatusCode::BAD_REQUEST, Json(json!({ "detail": e })))
        })?;

    let results = state.search_service.search(&plan).await.map_err(|e| {
        let status = match e {
            SearchError::InvalidQuery { .. } => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(json!({ "detail": e.to_string() })))
    })?;

    Ok(Json(CoursesApiResponse::new(results)))
}
