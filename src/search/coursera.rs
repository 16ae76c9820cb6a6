// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Coursera platform adapter
//!
//! Queries Coursera's GraphQL search gateway for free courses and maps
//! the product hits into the shared `Course` shape.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;
use std::time::Duration;
use tracing::debug;
use uuid::Uuid;

use super::provider::CourseProvider;
use super::types::{clean_title, round_rating, Course, Platform, SearchError};

const COURSERA_API_URL: &str = "https://www.coursera.org/graphql-gateway?opname=Search";

const SEARCH_QUERY: &str = "query Search($requests: [Search_Request!]!) {
    SearchResult {
        search(requests: $requests) {
            elements {
                ... on Search_ProductHit {
                    name
                    url
                    imageUrl
                    productDifficultyLevel
                    productDuration
                    avgProductRating
                    numProductRatings
                    skills
                    partners
                    partnerLogos
                }
            }
        }
    }
}";

/// Coursera search adapter
pub struct CourseraProvider {
    client: Client,
    endpoint: String,
}

impl CourseraProvider {
    /// Create a new Coursera adapter against the production endpoint
    pub fn new() -> Self {
        Self::with_endpoint(COURSERA_API_URL)
    }

    /// Create an adapter pointed at a custom endpoint (test harnesses)
    pub fn with_endpoint(endpoint: impl Into<String>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            endpoint: endpoint.into(),
        }
    }
}

impl Default for CourseraProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CourseProvider for CourseraProvider {
    async fn search(
        &self,
        query: &str,
        lang: &str,
        num_items: usize,
    ) -> Result<Vec<Course>, SearchError> {
        let body = json!([{
            "operationName": "Search",
            "variables": {
                "requests": [{
                    "entityType": "PRODUCTS",
                    "limit": num_items,
                    "facets": ["topic", "language"],
                    "sortBy": "BEST_MATCH",
                    "maxValuesPerFacet": 1000,
                    "facetFilters": [[format!("language:{}", lang), "price:Free"]],
                    "cursor": "0",
                    "query": query,
                }]
            },
            "query": SEARCH_QUERY,
        }]);

        let response = self
            .client
            .post(&self.endpoint)
            .header("User-Agent", "PostmanRuntime/7.43.3")
            .header("Accept", "application/json")
            .header("Connection", "keep-alive")
            .header("postman-token", Uuid::new_v4().to_string())
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    SearchError::Timeout { timeout_ms: 30000 }
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

        // The gateway answers with a JSON array of one operation result
        let data: Vec<CourseraResponse> =
            response
                .json()
                .await
                .map_err(|e| SearchError::InvalidResponse {
                    message: format!("JSON parse error: {}", e),
                })?;

        let elements = data
            .into_iter()
            .next()
            .and_then(|r| r.data.search_result.search.into_iter().next())
            .map(|s| s.elements)
            .ok_or_else(|| SearchError::InvalidResponse {
                message: "Coursera response missing search elements".to_string(),
            })?;

        let mut courses: Vec<Course> = elements
            .into_iter()
            .filter_map(|item| {
                let hit: CourseraHit = match serde_json::from_value(item) {
                    Ok(hit) => hit,
                    Err(e) => {
                        debug!("Skipping malformed Coursera item: {}", e);
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
        Platform::Coursera
    }
}

/// Map one product hit to a `Course`, or skip it
fn map_hit(hit: CourseraHit) -> Option<Course> {
    let title = clean_title(hit.name.as_deref()?)?;
    let path = hit.url.filter(|p| !p.is_empty())?;
    let url = format!("https://www.coursera.org{}", path);

    let difficulty = hit.product_difficulty_level.map(|d| d.to_lowercase());
    let duration = hit
        .product_duration
        .map(|d| d.to_lowercase().replace('_', " "));

    let mut partners = hit.partners.unwrap_or_default();
    let mut partner_logos = hit.partner_logos.unwrap_or_default();
    let provider = if partners.is_empty() {
        None
    } else {
        Some(partners.remove(0))
    };
    let provider_img = if partner_logos.is_empty() {
        None
    } else {
        Some(partner_logos.remove(0))
    };

    Some(Course {
        title,
        url,
        image_url: hit.image_url,
        duration,
        provider,
        provider_img,
        difficulty,
        avg_rating: hit.avg_product_rating.map(round_rating),
        count_rating: hit.num_product_ratings,
        skills: hit.skills,
        published_date: None,
    })
}

#[derive(Debug, serde::Deserialize)]
struct CourseraResponse {
    data: CourseraData,
}

#[derive(Debug, serde::Deserialize)]
struct CourseraData {
    #[serde(rename = "SearchResult")]
    search_result: CourseraSearchResult,
}

#[derive(Debug, serde::Deserialize)]
struct CourseraSearchResult {
    search: Vec<CourseraSearch>,
}

#[derive(Debug, serde::Deserialize)]
struct CourseraSearch {
    elements: Vec<serde_json::Value>,
}

#[derive(Debug, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct CourseraHit {
    name: Option<String>,
    url: Option<String>,
    image_url: Option<String>,
    product_difficulty_level: Option<String>,
    product_duration: Option<String>,
    avg_product_rating: Option<f64>,
    num_product_ratings: Option<u64>,
    skills: Option<Vec<String>>,
    partners: Option<Vec<String>>,
    partner_logos: Option<Vec<String>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_hit() -> CourseraHit {
        serde_json::from_value(serde_json::json!({
            "name": "Machine Learning",
            "url": "/learn/machine-learning",
            "imageUrl": "https://img.coursera.org/ml.jpg",
            "productDifficultyLevel": "BEGINNER",
            "productDuration": "ONE_TO_THREE_MONTHS",
            "avgProductRating": 4.666666,
            "numProductRatings": 12345,
            "skills": ["Regression", "Classification"],
            "partners": ["Stanford University"],
            "partnerLogos": ["https://img.coursera.org/stanford.png"]
        }))
        .unwrap()
    }

    #[test]
    fn test_provider_creation() {
        let provider = CourseraProvider::new();
        assert_eq!(provider.platform(), Platform::Coursera);
        assert!(provider.is_available());
    }

    #[test]
    fn test_map_hit_full() {
        let course = map_hit(sample_hit()).unwrap();
        assert_eq!(course.title, "Machine Learning");
        assert_eq!(
            course.url,
            "https://www.coursera.org/learn/machine-learning"
        );
        assert_eq!(course.difficulty.as_deref(), Some("beginner"));
        assert_eq!(course.duration.as_deref(), Some("one to three months"));
        assert_eq!(course.provider.as_deref(), Some("Stanford University"));
        assert_eq!(
            course.provider_img.as_deref(),
            Some("https://img.coursera.org/stanford.png")
        );
        assert_eq!(course.avg_rating, Some(4.7));
        assert_eq!(course.count_rating, Some(12345));
        assert_eq!(course.skills.as_ref().map(Vec::len), Some(2));
    }

    #[test]
    fn test_map_hit_missing_title_skipped() {
        let mut hit = sample_hit();
        hit.name = None;
        assert!(map_hit(hit).is_none());

        let mut hit = sample_hit();
        hit.name = Some("   ".to_string());
        assert!(map_hit(hit).is_none());
    }

    #[test]
    fn test_map_hit_missing_url_skipped() {
        let mut hit = sample_hit();
        hit.url = None;
        assert!(map_hit(hit).is_none());

        let mut hit = sample_hit();
        hit.url = Some(String::new());
        assert!(map_hit(hit).is_none());
    }

    #[test]
    fn test_map_hit_empty_partner_arrays() {
        let mut hit = sample_hit();
        hit.partners = Some(vec![]);
        hit.partner_logos = None;

        let course = map_hit(hit).unwrap();
        assert!(course.provider.is_none());
        assert!(course.provider_img.is_none());
    }

    #[test]
    fn test_response_deserialization() {
        let json = r#"[{
            "data": {
                "SearchResult": {
                    "search": [{
                        "elements": [
                            {"name": "Course A", "url": "/learn/a"},
                            {"name": "Course B", "url": "/learn/b"}
                        ]
                    }]
                }
            }
        }]"#;

        let data: Vec<CourseraResponse> = serde_json::from_str(json).unwrap();
        assert_eq!(data[0].data.search_result.search[0].elements.len(), 2);
    }
}
