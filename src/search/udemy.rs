// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Udemy platform adapter
//!
//! Queries Udemy's GraphQL course search for free courses and maps the
//! nested course objects into the shared `Course` shape.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;
use std::time::Duration;
use tracing::debug;

use super::provider::CourseProvider;
use super::types::{clean_title, is_absolute_url, round_rating, Course, Platform, SearchError};

const UDEMY_API_URL: &str = "https://www.udemy.com/api/2024-01/graphql/";

const SEARCH_QUERY: &str = "
query SrpMxCourseSearch($query: String!, $page: NonNegativeInt!, $pageSize: MaxResultsPerPage!, $sortOrder: CourseSearchSortType, $filters: CourseSearchFilters, $context: CourseSearchContext) {
  courseSearch(
    query: $query
    page: $page
    pageSize: $pageSize
    sortOrder: $sortOrder
    filters: $filters
    context: $context
  ) {
    count
    results {
      course {
        durationInSeconds
        headline
        id
        images { height125 px100x100 px240x135 px304x171 px480x270 px50x50 }
        instructors { id name }
        isFree
        learningOutcomes
        level
        updatedOn
        locale
        rating { average count }
        title
        urlCourseLanding
      }
    }
    page
    pageCount
    metadata {
      querySuggestion { query type }
      originalQuery
      associatedTopic { id url }
    }
  }
}
";

/// Udemy search adapter
pub struct UdemyProvider {
    client: Client,
    endpoint: String,
}

impl UdemyProvider {
    /// Create a new Udemy adapter against the production endpoint
    pub fn new() -> Self {
        Self::with_endpoint(UDEMY_API_URL)
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

impl Default for UdemyProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CourseProvider for UdemyProvider {
    async fn search(
        &self,
        query: &str,
        lang: &str,
        num_items: usize,
    ) -> Result<Vec<Course>, SearchError> {
        let body = json!({
            "query": SEARCH_QUERY,
            "variables": {
                "page": 0,
                "query": query,
                "sortOrder": "RELEVANCE",
                "pageSize": num_items,
                "context": {
                    "triggerType": "USER_QUERY"
                },
                "filters": {
                    "price": ["FREE"],
                    "language": [lang]
                }
            },
        });

        let response = self
            .client
            .post(&self.endpoint)
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

        let data: UdemyResponse =
            response
                .json()
                .await
                .map_err(|e| SearchError::InvalidResponse {
                    message: format!("JSON parse error: {}", e),
                })?;

        let mut courses: Vec<Course> = data
            .data
            .course_search
            .results
            .into_iter()
            .filter_map(|item| {
                let result: UdemyResult = match serde_json::from_value(item) {
                    Ok(result) => result,
                    Err(e) => {
                        debug!("Skipping malformed Udemy item: {}", e);
                        return None;
                    }
                };
                map_course(result.course?)
            })
            .collect();

        courses.truncate(num_items);
        Ok(courses)
    }

    fn platform(&self) -> Platform {
        Platform::Udemy
    }
}

/// Format a duration in seconds as "<H>h <M>m"
///
/// Integer division throughout; leftover seconds are truncated, not
/// rounded, matching the observable output of the original service.
fn format_duration_secs(secs: u64) -> String {
    let hours = secs / 3600;
    let minutes = (secs % 3600) / 60;
    format!("{}h {}m", hours, minutes)
}

/// Map one course object to a `Course`, or skip it
fn map_course(course: UdemyCourse) -> Option<Course> {
    let title = clean_title(course.title.as_deref()?)?;
    let url = course.url_course_landing.filter(|u| is_absolute_url(u))?;

    let duration = course
        .duration_in_seconds
        .filter(|&s| s > 0)
        .map(format_duration_secs);

    let provider = course
        .instructors
        .unwrap_or_default()
        .into_iter()
        .next()
        .and_then(|i| i.name);

    let difficulty = course
        .level
        .map(|l| l.to_lowercase().replace('_', " "));

    let (avg_rating, count_rating) = match course.rating {
        Some(rating) => (rating.average.map(round_rating), rating.count),
        None => (None, None),
    };

    Some(Course {
        title,
        url,
        image_url: course.images.and_then(|i| i.px240x135),
        duration,
        provider,
        provider_img: None,
        difficulty,
        avg_rating,
        count_rating,
        skills: course.learning_outcomes,
        published_date: None,
    })
}

#[derive(Debug, serde::Deserialize)]
struct UdemyResponse {
    data: UdemyData,
}

#[derive(Debug, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct UdemyData {
    course_search: UdemyCourseSearch,
}

#[derive(Debug, serde::Deserialize)]
struct UdemyCourseSearch {
    #[serde(default)]
    results: Vec<serde_json::Value>,
}

#[derive(Debug, serde::Deserialize)]
struct UdemyResult {
    course: Option<UdemyCourse>,
}

#[derive(Debug, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct UdemyCourse {
    title: Option<String>,
    url_course_landing: Option<String>,
    images: Option<UdemyImages>,
    duration_in_seconds: Option<u64>,
    instructors: Option<Vec<UdemyInstructor>>,
    level: Option<String>,
    rating: Option<UdemyRating>,
    learning_outcomes: Option<Vec<String>>,
}

#[derive(Debug, serde::Deserialize)]
struct UdemyImages {
    px240x135: Option<String>,
}

#[derive(Debug, serde::Deserialize)]
struct UdemyInstructor {
    name: Option<String>,
}

#[derive(Debug, serde::Deserialize)]
struct UdemyRating {
    average: Option<f64>,
    count: Option<u64>,
}
