// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Core types for free-course search

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

/// A normalized course record produced by a platform adapter.
///
/// Every adapter maps its upstream shape into this one. `title` and `url`
/// are the only required fields; absent optional fields are omitted from
/// serialized JSON so "not provided" stays distinguishable from empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    /// Course title (non-empty, trimmed)
    pub title: String,
    /// Absolute URL of the course landing page
    pub url: String,
    /// Cover image URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    /// Human-readable duration; units vary by platform ("4 weeks", "2h 15m")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    /// Institution, instructor, or channel offering the course
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    /// Logo URL of the provider
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider_img: Option<String>,
    /// Difficulty level as reported upstream
    #[serde(skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<String>,
    /// Average rating, rounded to one decimal place
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avg_rating: Option<f64>,
    /// Number of ratings behind `avg_rating`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count_rating: Option<u64>,
    /// Skills or learning outcomes, upstream order
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skills: Option<Vec<String>>,
    /// Publish date (YouTube only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published_date: Option<NaiveDate>,
}

/// The fixed set of platforms the aggregator fans out to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Platform {
    Coursera,
    Edx,
    Udemy,
    Youtube,
}

impl Platform {
    /// All platforms, in response insertion order
    pub const ALL: [Platform; 4] = [
        Platform::Coursera,
        Platform::Edx,
        Platform::Udemy,
        Platform::Youtube,
    ];

    /// Platform name as used in the response mapping and logs
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Coursera => "coursera",
            Platform::Edx => "edx",
            Platform::Udemy => "udemy",
            Platform::Youtube => "youtube",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-platform parameters derived by the front door for one search.
#[derive(Debug, Clone, PartialEq)]
pub struct PlatformQuery {
    /// Platform-specific language selector ("English", "EN", "full course", ...)
    pub lang: String,
    /// Maximum number of items to return for this platform
    pub num_items: usize,
    /// Pre-built "search on this platform" link, forwarded untouched
    pub redirect_url: String,
}

/// Aggregator input: the raw query plus one parameter set per platform.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchPlan {
    /// Free-text search query (validated non-blank before dispatch)
    pub query: String,
    pub coursera: PlatformQuery,
    pub edx: PlatformQuery,
    pub udemy: PlatformQuery,
    pub youtube: PlatformQuery,
}

impl SearchPlan {
    /// Parameter set for one platform
    pub fn platform_query(&self, platform: Platform) -> &PlatformQuery {
        match platform {
            Platform::Coursera => &self.coursera,
            Platform::Edx => &self.edx,
            Platform::Udemy => &self.udemy,
            Platform::Youtube => &self.youtube,
        }
    }
}

/// Outcome for one platform: normalized courses plus the fallback link.
///
/// Never carries an error — a failed platform shows up as zero courses
/// alongside its still-valid redirect URL.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlatformResult {
    /// Courses in upstream relevance order (possibly empty)
    pub courses: Vec<Course>,
    /// Link to run the same search on the platform itself
    pub redirect_url: String,
}

/// The unified response: one `PlatformResult` per platform.
///
/// Serializes to a JSON mapping with exactly the keys
/// coursera/edx/udemy/youtube, in that order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResults {
    pub coursera: PlatformResult,
    pub edx: PlatformResult,
    pub udemy: PlatformResult,
    pub youtube: PlatformResult,
}

impl SearchResults {
    /// Result bundle for one platform
    pub fn platform(&self, platform: Platform) -> &PlatformResult {
        match platform {
            Platform::Coursera => &self.coursera,
            Platform::Edx => &self.edx,
            Platform::Udemy => &self.udemy,
            Platform::Youtube => &self.youtube,
        }
    }

    /// Total course count across all platforms (logging convenience)
    pub fn total_courses(&self) -> usize {
        Platform::ALL
            .iter()
            .map(|p| self.platform(*p).courses.len())
            .sum()
    }
}

/// Errors that can occur during course search operations
#[derive(Debug, Error)]
pub enum SearchError {
    /// Invalid search query (the only error surfaced past the aggregator)
    #[error("Invalid query: {reason}")]
    InvalidQuery {
        /// Reason the query is invalid
        reason: String,
    },

    /// Upstream request timed out
    #[error("Request timed out after {timeout_ms}ms")]
    Timeout {
        /// Timeout duration in milliseconds
        timeout_ms: u64,
    },

    /// Rate limited by the upstream platform
    #[error("Rate limited, retry after {retry_after_secs}s")]
    RateLimited {
        /// Seconds to wait before retrying
        retry_after_secs: u64,
    },

    /// Transport failure or non-2xx status from the upstream platform
    #[error("Upstream API error: {status} - {message}")]
    ApiError {
        /// HTTP status code (0 when the request never completed)
        status: u16,
        /// Error message
        message: String,
    },

    /// Top-level response did not have the expected shape
    #[error("Unexpected response shape: {message}")]
    InvalidResponse {
        /// What failed to parse
        message: String,
    },

    /// No API key configured for the platform
    #[error("No API key configured for {platform}")]
    NoApiKey {
        /// Platform missing its key
        platform: Platform,
    },
}

/// Trim a raw upstream title, rejecting blank ones.
pub(crate) fn clean_title(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// A course URL must be absolute; relative upstream paths are a mapping bug.
pub(crate) fn is_absolute_url(url: &str) -> bool {
    Url::parse(url).is_ok()
}

/// Round a rating to one decimal place.
pub(crate) fn round_rating(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal_course() -> Course {
        Course {
            title: "Rust for Beginners".to_string(),
            url: "https://example.com/rust".to_string(),
            image_url: None,
            duration: None,
            provider: None,
            provider_img: None,
            difficulty: None,
            avg_rating: None,
            count_rating: None,
            skills: None,
            published_date: None,
        }
    }

    #[test]
    fn test_course_serialization_skips_absent_fields() {
        let json = serde_json::to_string(&minimal_course()).unwrap();
        assert!(json.contains("\"title\""));
        assert!(json.contains("\"url\""));
        assert!(!json.contains("image_url"));
        assert!(!json.contains("avg_rating"));
        assert!(!json.contains("published_date"));
    }

    #[test]
    fn test_course_serialization_keeps_empty_skills() {
        let mut course = minimal_course();
        course.skills = Some(vec![]);
        let json = serde_json::to_string(&course).unwrap();
        // Present-but-empty is not the same as absent
        assert!(json.contains("\"skills\":[]"));
    }

    #[test]
    fn test_course_deserialization() {
        let json = r#"{
            "title": "Python for Data Science",
            "url": "https://coursera.org/learn/python-data-science",
            "duration": "4 weeks",
            "avg_rating": 4.5,
            "skills": ["Python", "Pandas"]
        }"#;

        let course: Course = serde_json::from_str(json).unwrap();
        assert_eq!(course.title, "Python for Data Science");
        assert_eq!(course.duration.as_deref(), Some("4 weeks"));
        assert_eq!(course.avg_rating, Some(4.5));
        assert_eq!(
            course.skills,
            Some(vec!["Python".to_string(), "Pandas".to_string()])
        );
        assert!(course.difficulty.is_none());
    }

    #[test]
    fn test_platform_names() {
        assert_eq!(Platform::Coursera.as_str(), "coursera");
        assert_eq!(Platform::Edx.as_str(), "edx");
        assert_eq!(Platform::Udemy.as_str(), "udemy");
        assert_eq!(Platform::Youtube.as_str(), "youtube");
        assert_eq!(Platform::Youtube.to_string(), "youtube");
    }

    #[test]
    fn test_search_results_key_order() {
        let empty = |url: &str| PlatformResult {
            courses: vec![],
            redirect_url: url.to_string(),
        };
        let results = SearchResults {
            coursera: empty("https://coursera.org/search?query=x"),
            edx: empty("https://www.edx.org/search?q=x"),
            udemy: empty("https://www.udemy.com/courses/search/?q=x"),
            youtube: empty("https://www.youtube.com/results?search_query=x"),
        };

        let json = serde_json::to_string(&results).unwrap();
        let coursera = json.find("\"coursera\"").unwrap();
        let edx = json.find("\"edx\"").unwrap();
        let udemy = json.find("\"udemy\"").unwrap();
        let youtube = json.find("\"youtube\"").unwrap();
        assert!(coursera < edx && edx < udemy && udemy < youtube);
    }

    #[test]
    fn test_total_courses() {
        let mut results = SearchResults {
            coursera: PlatformResult {
                courses: vec![minimal_course(), minimal_course()],
                redirect_url: "https://coursera.org".to_string(),
            },
            edx: PlatformResult {
                courses: vec![],
                redirect_url: "https://www.edx.org".to_string(),
            },
            udemy: PlatformResult {
                courses: vec![minimal_course()],
                redirect_url: "https://www.udemy.com".to_string(),
            },
            youtube: PlatformResult {
                courses: vec![],
                redirect_url: "https://www.youtube.com".to_string(),
            },
        };
        assert_eq!(results.total_courses(), 3);

        results.youtube.courses.push(minimal_course());
        assert_eq!(results.total_courses(), 4);
    }

    #[test]
    fn test_clean_title() {
        assert_eq!(clean_title("  Rust 101  "), Some("Rust 101".to_string()));
        assert_eq!(clean_title("Rust"), Some("Rust".to_string()));
        assert_eq!(clean_title("   "), None);
        assert_eq!(clean_title(""), None);
    }

    #[test]
    fn test_is_absolute_url() {
        assert!(is_absolute_url("https://www.coursera.org/learn/python"));
        assert!(is_absolute_url("http://youtube.com/watch?v=abc"));
        assert!(!is_absolute_url("/learn/python"));
        assert!(!is_absolute_url("learn python"));
    }

    #[test]
    fn test_round_rating() {
        assert_eq!(round_rating(4.666666), 4.7);
        assert_eq!(round_rating(4.64), 4.6);
        assert_eq!(round_rating(4.0), 4.0);
        assert_eq!(round_rating(3.25), 3.3);
    }

    #[test]
    fn test_search_error_display() {
        let error = SearchError::RateLimited {
            retry_after_secs: 60,
        };
        assert!(error.to_string().contains("60"));

        let error = SearchError::ApiError {
            status: 500,
            message: "Internal error".to_string(),
        };
        assert!(error.to_string().contains("500"));

        let error = SearchError::NoApiKey {
            platform: Platform::Youtube,
        };
        assert!(error.to_string().contains("youtube"));
    }
}
