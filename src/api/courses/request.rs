// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Course search request types and per-platform parameter derivation

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::Deserialize;

use crate::search::{PlatformQuery, SearchPlan};

/// Characters left unencoded in redirect-URL query values: unreserved
/// characters plus `/`
const QUERY_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'_')
    .remove(b'.')
    .remove(b'-')
    .remove(b'~')
    .remove(b'/');

/// Supported search languages
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub enum Language {
    #[serde(rename = "es")]
    Spanish,
    #[default]
    #[serde(rename = "en")]
    English,
}

impl Language {
    /// Language facet value for Coursera and edX
    pub fn facet_name(&self) -> &'static str {
        match self {
            Language::Spanish => "Spanish",
            Language::English => "English",
        }
    }

    /// Upper-cased locale code for Udemy's language filter
    pub fn udemy_code(&self) -> &'static str {
        match self {
            Language::Spanish => "ES",
            Language::English => "EN",
        }
    }

    /// Phrase appended to the YouTube search query
    pub fn youtube_phrase(&self) -> &'static str {
        match self {
            Language::Spanish => "curso completo español",
            Language::English => "full course",
        }
    }

    /// Same phrase with `+` separators, for the YouTube redirect URL
    pub fn youtube_phrase_plus(&self) -> &'static str {
        match self {
            Language::Spanish => "curso+completo+español",
            Language::English => "full+course",
        }
    }
}

/// Query parameters for GET /resources/courses
#[derive(Debug, Clone, Deserialize)]
pub struct CoursesQuery {
    /// Free-text search term
    pub q: String,
    /// Search language (default: en)
    #[serde(default)]
    pub lang: Language,
    /// Number of items per platform (default from configuration)
    pub num_items: Option<usize>,
}

impl CoursesQuery {
    /// Validate the request and derive the per-platform search plan
    pub fn plan(&self, default_num_items: usize) -> Result<SearchPlan, String> {
        let query = self.q.trim();
        if query.is_empty() {
            return Err("Search query cannot be empty".to_string());
        }

        let num_items = self.num_items.unwrap_or(default_num_items);
        if num_items == 0 {
            return Err("num_items must be positive".to_string());
        }

        let encoded = utf8_percent_encode(query, QUERY_ENCODE_SET).to_string();
        let lang = self.lang;

        let platform_query = |lang: &str, redirect_url: String| PlatformQuery {
            lang: lang.to_string(),
            num_items,
            redirect_url,
        };

        Ok(SearchPlan {
            query: query.to_string(),
            coursera: platform_query(
                lang.facet_name(),
                format!(
                    "https://coursera.org/search?query={}&language={}",
                    encoded,
                    lang.facet_name()
                ),
            ),
            edx: platform_query(
                lang.facet_name(),
                format!(
                    "https://www.edx.org/search?q={}&language={}&availability=Available+now",
                    encoded,
                    lang.facet_name()
                ),
            ),
            udemy: platform_query(
                lang.udemy_code(),
                format!(
                    "https://www.udemy.com/courses/search/?lang={}&price=price-free&q={}",
                    lang.udemy_code(),
                    encoded
                ),
            ),
            youtube: platform_query(
                lang.youtube_phrase(),
                format!(
                    "https://www.youtube.com/results?search_query={}+{}",
                    encoded,
                    lang.youtube_phrase_plus()
                ),
            ),
        })
    }
}
