// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Course search API response types

use serde::Serialize;

use crate::search::SearchResults;

/// Response body for GET /resources/courses
#[derive(Debug, Clone, Serialize)]
pub struct CoursesApiResponse {
    /// Per-platform results keyed coursera/edx/udemy/youtube
    pub results: SearchResults,
}

impl CoursesApiResponse {
    pub fn new(results: SearchResults) -> Self {
        Self { results }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::PlatformResult;

    #[test]
    fn test_response_serialization() {
        let empty = |url: &str| PlatformResult {
            courses: vec![],
            redirect_url: url.to_string(),
        };
        let response = CoursesApiResponse::new(SearchResults {
            coursera: empty("https://coursera.org/search?query=x"),
            edx: empty("https://www.edx.org/search?q=x"),
            udemy: empty("https://www.udemy.com/courses/search/?q=x"),
            youtube: empty("https://www.youtube.com/results?search_query=x"),
        });

        let json = serde_json::to_value(&response).unwrap();
        let results = &json["results"];
        assert!(results["coursera"]["courses"].as_array().unwrap().is_empty());
        assert_eq!(
            results["youtube"]["redirect_url"],
            "https://www.youtube.com/results?search_query=x"
        );
    }
}
