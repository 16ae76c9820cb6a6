// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::{anyhow, Result};
use free_course_search::{api, CourseSearchService, SearchConfig};
use std::{env, net::SocketAddr};

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    // Initialize tracing subscriber for logging
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info");
    }
    tracing_subscriber::fmt::init();

    let config = SearchConfig::from_env();
    config.validate().map_err(|e| anyhow!(e))?;

    if !config.has_youtube_key() {
        tracing::warn!("YOUTUBE_API_KEY not set; YouTube results will be empty");
    }

    let service = CourseSearchService::new(&config);

    let host = env::var("API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port = env::var("API_PORT").unwrap_or_else(|_| "8000".to_string());
    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;

    api::start_server(service, addr)
        .await
        .map_err(|e| anyhow!("server error: {}", e))
}
