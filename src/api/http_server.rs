// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! HTTP front door
//!
//! Axum server exposing the course search endpoint plus a welcome route,
//! with permissive CORS.

use axum::{routing::get, Json, Router};
use serde_json::json;
use std::{net::SocketAddr, sync::Arc};
use tower_http::cors::{Any, CorsLayer};

use super::courses::courses_handler;
use crate::search::CourseSearchService;

/// Shared state handed to every request handler
#[derive(Clone)]
pub struct AppState {
    pub search_service: Arc<CourseSearchService>,
}

/// Build the application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root_handler))
        .route("/resources/courses", get(courses_handler))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

/// Bind and serve until the process is stopped
pub async fn start_server(
    search_service: CourseSearchService,
    addr: SocketAddr,
) -> Result<(), Box<dyn std::error::Error>> {
    let state = AppState {
        search_service: Arc::new(search_service),
    };

    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("API server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

async fn root_handler() -> Json<serde_json::Value> {
    Json(json!({ "message": "Welcome to the Free Courses API! 🚀" }))
}
