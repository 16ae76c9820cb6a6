// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! edX platform adapter
//!
//! Queries edX's hosted Algolia search index. Transient failures
//! (timeouts, HTTP 429) are retried with backoff before the adapter
//! gives up; everything else fails immediately.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;
use std::time::Duration;
use tracing::{debug, warn};
use uuid::Uuid;

use super::provider::CourseProvider;
use super::types::{clean_title, is_absolute_url, Course, Platform, SearchError};

const EDX_API_URL: &str = "https://igsyv1z1xi-dsn.algolia.net/1/indexes/*/queries";
const EDX_APP_ID: &str = "IGSYV1Z1XI";
// Public frontend search key shipped in edX's own web client
const EDX_API_KEY: &str = "6658746ce52e30dacfdd8ba5f8e8cf18";

const MAX_RETRIES: u32 = 2;
const MAX_ITEMS_LIMIT: usize = 50;

const PRODUCT_FILTER: &str = "(product:\"Course\" OR product:\"Program\" OR \
     product:\"Executive Education\" OR product:\"2U Degree\") \
     AND (blocked_in:null OR NOT blocked_in:\"CO\") \
     AND (allowed_in:null OR allowed_in:\"CO\")";

/// edX search adapter
pub struct EdxProvider {
    client: Client,
    endpoint: String,
}

impl EdxProvider {
    /// Create a new edX adapter against the production index
    pub fn new() -> Self {
        Self::with_endpoint(EDX_API_URL)
    }

    /// Create an adapter pointed at a custom endpoint (test harnesses)
    pub fn with_endpoint(endpoint: impl Into<String>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(15))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            endpoint: endpoint.into(),
        }
    }

    /// One request attempt; the retry policy lives in `search`
    async fn attempt(
        &self,
        query: &str,
        lang: &str,
        num_items: usize,
    ) -> Result<EdxResponse, SearchError> {
        let body = json!({
            "requests": [{
                "indexName": "product",
                "clickAnalytics": false,
                "facetFilters": [
                    ["availability:Available now"],
                    [format!("language:{}", lang)]
                ],
                "facets": [
                    "availability",
                    "language",
                    "learning_type",
                    "level",
                    "product",
                    "program_type",
                    "skills.skill",
                    "subject",
                ],
                "filters": PRODUCT_FILTER,
                "hitsPerPage": num_items.min(MAX_ITEMS_LIMIT),
                "maxValuesPerFacet": 100,
                "query": query,
                "page": 0
            }]
        });

        let response = self
            .client
            .post(&self.endpoint)
            .query(&[
                (
                    "x-algolia-agent",
                    "Algolia for JavaScript (5.0.0); Search (5.0.0)",
                ),
                ("x-algolia-api-key", EDX_API_KEY),
                ("x-algolia-application-id", EDX_APP_ID),
            ])
            .header(
                "User-Agent",
                "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36",
            )
            .header("Accept", "application/json")
            .header("Connection", "keep-alive")
            .header("postman-token", Uuid::new_v4().to_string())
            .header("Referer", "https://www.edx.org/")
            .header("Origin", "https://www.edx.org")
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    SearchError::Timeout { timeout_ms: 15000 }
                } else {
                    SearchError::ApiError {
                        status: 0,
                        message: e.to_string(),
                    }
                }
            })?;

        let status = response.status();

        if status == 429 {
            return Err(SearchError::RateLimited {
                retry_after_secs: 60,
            });
        }

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(SearchError::ApiError {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json()
            .await
            .map_err(|e| SearchError::InvalidResponse {
                message: format!("JSON parse error: {}", e),
            })
    }
}

impl Default for EdxProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CourseProvider for EdxProvider {
    async fn search(
        &self,
        query: &str,
        lang: &str,
        num_items: usize,
    ) -> Result<Vec<Course>, SearchError> {
        let num_items = num_items.min(MAX_ITEMS_LIMIT);

        let mut attempt = 0;
        let data = loop {
            match self.attempt(query, lang, num_items).await {
                Ok(data) => break data,
                // Transient classes are retried; the rest give up immediately
                Err(SearchError::Timeout { .. }) if attempt < MAX_RETRIES => {
                    warn!("edX request timed out (attempt {})", attempt + 1);
                    tokio::time::sleep(Duration::from_secs(1)).await;
                }
                Err(SearchError::RateLimited { .. }) if attempt < MAX_RETRIES => {
                    warn!("edX rate limited (attempt {})", attempt + 1);
                    tokio::time::sleep(Duration::from_secs(1 << attempt)).await;
                }
                Err(e) => return Err(e),
            }
            attempt += 1;
        };

        let hits = data
            .results
            .into_iter()
            .next()
            .map(|r| r.hits)
            .ok_or_else(|| SearchError::InvalidResponse {
                message: "edX response missing results".to_string(),
            })?;

        let mut courses: Vec<Course> = hits
            .into_iter()
            .filter_map(|item| {
                let hit: EdxHit = match serde_json::from_value(item) {
                    Ok(hit) => hit,
                    Err(e) => {
                        debug!("Skipping malformed edX item: {}", e);
                        return None;
                    }
                };
                map_hit(hit)
            })
            .collect();

        courses.truncate(num_items);
        Ok(courses)
    }

    fn platform(&self) -> Platform {
        Platform::Edx
    }
}

/// Map one index hit to a `Course`, or skip it
fn map_hit(hit: EdxHit) -> Option<Course> {
    let title = clean_title(hit.title.as_deref()?)?;
    let url = hit.marketing_url.filter(|u| is_absolute_url(u))?;

    let (provider, provider_img) = match hit.owners.unwrap_or_default().into_iter().next() {
        Some(owner) => (owner.name, owner.logo_image_url),
        None => (None, None),
    };

    let duration = hit
        .weeks_to_complete
        .filter(|&w| w > 0)
        .map(|w| format!("{} weeks", w));

    let skills = hit
        .skills
        .map(|skills| skills.into_iter().filter_map(|s| s.skill).collect());

    // Upstream provides no ratings; level strings pass through as-is
    Some(Course {
        title,
        url,
        image_url: hit.card_image_url,
        duration,
        provider,
        provider_img,
        difficulty: hit.level.and_then(|l| l.into_iter().next()),
        avg_rating: None,
        count_rating: None,
        skills,
        published_date: None,
    })
}

#[derive(Debug, serde::Deserialize)]
struct EdxResponse {
    results: Vec<EdxResults>,
}

#[derive(Debug, serde::Deserialize)]
struct EdxResults {
    #[serde(default)]
    hits: Vec<serde_json::Value>,
}

#[derive(Debug, serde::Deserialize)]
struct EdxHit {
    title: Option<String>,
    marketing_url: Option<String>,
    card_image_url: Option<String>,
    weeks_to_complete: Option<u64>,
    owners: Option<Vec<EdxOwner>>,
    level: Option<Vec<String>>,
    skills: Option<Vec<EdxSkill>>,
}

#[derive(Debug, serde::Deserialize)]
struct EdxOwner {
    name: Option<String>,
    #[serde(rename = "logoImageUrl")]
    logo_image_url: Option<String>,
}

#[derive(Debug, serde::Deserialize)]
struct EdxSkill {
    skill: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_hit() -> EdxHit {
        serde_json::from_value(serde_json::json!({
            "title": "CS50's Introduction to Computer Science",
            "marketing_url": "https://www.edx.org/learn/computer-science/cs50",
            "card_image_url": "https://img.edx.org/cs50.jpg",
            "weeks_to_complete": 12,
            "owners": [
                {"name": "Harvard University", "logoImageUrl": "https://img.edx.org/harvard.png"}
            ],
            "level": ["Introductory"],
            "skills": [{"skill": "C"}, {"skill": "Python"}]
        }))
        .unwrap()
    }

    #[test]
    fn test_provider_creation() {
        let provider = EdxProvider::new();
        assert_eq!(provider.platform(), Platform::Edx);
        assert!(provider.is_available());
    }

    #[test]
    fn test_map_hit_full() {
        let course = map_hit(sample_hit()).unwrap();
        assert_eq!(course.title, "CS50's Introduction to Computer Science");
        assert_eq!(course.duration.as_deref(), Some("12 weeks"));
        assert_eq!(course.provider.as_deref(), Some("Harvard University"));
        assert_eq!(
            course.provider_img.as_deref(),
            Some("https://img.edx.org/harvard.png")
        );
        // edX level strings are forwarded untransformed
        assert_eq!(course.difficulty.as_deref(), Some("Introductory"));
        assert_eq!(
            course.skills,
            Some(vec!["C".to_string(), "Python".to_string()])
        );
        assert!(course.avg_rating.is_none());
        assert!(course.count_rating.is_none());
    }

    #[test]
    fn test_map_hit_no_owners() {
        let mut hit = sample_hit();
        hit.owners = Some(vec![]);

        let course = map_hit(hit).unwrap();
        assert!(course.provider.is_none());
        assert!(course.provider_img.is_none());
    }

    #[test]
    fn test_map_hit_zero_weeks() {
        let mut hit = sample_hit();
        hit.weeks_to_complete = Some(0);
        assert!(map_hit(hit).unwrap().duration.is_none());
    }

    #[test]
    fn test_map_hit_missing_title_skipped() {
        let mut hit = sample_hit();
        hit.title = None;
        assert!(map_hit(hit).is_none());
    }

    #[test]
    fn test_map_hit_missing_url_skipped() {
        let mut hit = sample_hit();
        hit.marketing_url = None;
        assert!(map_hit(hit).is_none());
    }

    #[test]
    fn test_response_deserialization() {
        let json = r#"{
            "results": [{
                "hits": [
                    {"title": "Course A", "marketing_url": "https://www.edx.org/a"}
                ]
            }]
        }"#;

        let response: EdxResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.results[0].hits.len(), 1);
    }

    #[test]
    fn test_response_missing_hits_defaults_empty() {
        let response: EdxResponse = serde_json::from_str(r#"{"results": [{}]}"#).unwrap();
        assert!(response.results[0].hits.is_empty());
    }
}
