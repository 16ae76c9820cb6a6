// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Course search orchestration
//!
//! Fans a single query out to all platform adapters concurrently,
//! bounds each one with a deadline, and assembles the unified response.
//! A failed or slow platform degrades to an empty course list; it never
//! fails the aggregation.

use std::collections::HashMap;
use std::time::Duration;
use tracing::{info, warn};

use super::config::SearchConfig;
use super::coursera::CourseraProvider;
use super::edx::EdxProvider;
use super::provider::CourseProvider;
use super::types::{
    Course, Platform, PlatformQuery, PlatformResult, SearchError, SearchPlan, SearchResults,
};
use super::udemy::UdemyProvider;
use super::youtube::YoutubeProvider;

/// Aggregation service over the fixed set of platform adapters
pub struct CourseSearchService {
    providers: Vec<Box<dyn CourseProvider>>,
    timeout: Duration,
    config: SearchConfig,
}

impl CourseSearchService {
    /// Create a service with the four production adapters
    pub fn new(config: &SearchConfig) -> Self {
        let providers: Vec<Box<dyn CourseProvider>> = vec![
            Box::new(CourseraProvider::new()),
            Box::new(EdxProvider::new()),
            Box::new(UdemyProvider::new()),
            Box::new(YoutubeProvider::new(config.youtube_api_key.clone())),
        ];

        Self {
            providers,
            timeout: Duration::from_secs(config.request_timeout_secs),
            config: config.clone(),
        }
    }

    /// Create a service over arbitrary adapters (used by tests)
    pub fn with_providers(providers: Vec<Box<dyn CourseProvider>>, timeout: Duration) -> Self {
        Self {
            providers,
            timeout,
            config: SearchConfig::default(),
        }
    }

    /// Default per-platform item count from configuration
    pub fn default_num_items(&self) -> usize {
        self.config.default_num_items
    }

    /// Search all platforms concurrently and assemble the unified result
    ///
    /// Fails only on an invalid (blank) query; individual adapter
    /// failures degrade to an empty course list for that platform.
    pub async fn search(&self, plan: &SearchPlan) -> Result<SearchResults, SearchError> {
        let query = plan.query.trim();
        if query.is_empty() {
            return Err(SearchError::InvalidQuery {
                reason: "query cannot be empty".to_string(),
            });
        }

        let futures: Vec<_> = self
            .providers
            .iter()
            .map(|provider| {
                let params = plan.platform_query(provider.platform());
                async move {
                    (
                        provider.platform(),
                        self.run_provider(provider.as_ref(), query, params).await,
                    )
                }
            })
            .collect();

        // Join semantics: every adapter reaches a terminal outcome
        // before the response is assembled
        let outcomes = futures::future::join_all(futures).await;
        let mut by_platform: HashMap<Platform, Vec<Course>> = outcomes.into_iter().collect();

        let mut assemble = |platform: Platform| PlatformResult {
            courses: by_platform.remove(&platform).unwrap_or_default(),
            redirect_url: plan.platform_query(platform).redirect_url.clone(),
        };

        let results = SearchResults {
            coursera: assemble(Platform::Coursera),
            edx: assemble(Platform::Edx),
            udemy: assemble(Platform::Udemy),
            youtube: assemble(Platform::Youtube),
        };

        info!(
            "Course search complete: {} courses for '{}'",
            results.total_courses(),
            query
        );

        Ok(results)
    }

    /// Run one adapter under the deadline, degrading every failure mode
    /// to an empty course list
    async fn run_provider(
        &self,
        provider: &dyn CourseProvider,
        query: &str,
        params: &PlatformQuery,
    ) -> Vec<Course> {
        let platform = provider.platform();

        if !provider.is_available() {
            warn!("{} adapter unavailable, returning no courses", platform);
            return vec![];
        }

        match tokio::time::timeout(
            self.timeout,
            provider.search(query, &params.lang, params.num_items),
        )
        .await
        {
            Ok(Ok(courses)) => {
                info!("{} returned {} courses", platform, courses.len());
                courses
            }
            Ok(Err(e)) => {
                warn!("{} search failed: {}", platform, e);
                vec![]
            }
            Err(_) => {
                warn!(
                    "{} search timed out after {}s",
                    platform,
                    self.timeout.as_secs()
                );
                vec![]
            }
        }
    }
}
