// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! YouTube platform adapter
//!
//! Two-stage fetch against the YouTube Data API v3: a search call for
//! long-duration videos matching the query plus a language phrase, then
//! a batch details call over the returned identifiers for durations,
//! thumbnails, and channel names.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate};
use regex::Regex;
use reqwest::Client;
use std::sync::LazyLock;
use std::time::Duration;
use tracing::debug;

use super::provider::CourseProvider;
use super::types::{clean_title, Course, Platform, SearchError};

const YOUTUBE_API_BASE: &str = "https://www.googleapis.com/youtube/v3";

const MAX_ITEMS_LIMIT: usize = 50;

static ISO_DURATION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^PT(?:(\d+)H)?(?:(\d+)M)?(?:(\d+)S)?").expect("valid duration regex")
});

/// YouTube search adapter (requires a Data API key)
pub struct YoutubeProvider {
    api_key: String,
    client: Client,
    base_url: String,
}

impl YoutubeProvider {
    /// Create a new YouTube adapter against the production API
    ///
    /// # Arguments
    /// * `api_key` - YouTube Data API v3 key; empty makes the adapter
    ///   unavailable
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, YOUTUBE_API_BASE)
    }

    /// Create an adapter pointed at a custom API base (test harnesses)
    pub fn with_base_url(api_key: String, base_url: impl Into<String>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(15))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            api_key,
            client,
            base_url: base_url.into(),
        }
    }

    /// Stage one: search for long videos, returning their identifiers
    async fn search_video_ids(
        &self,
        query: &str,
        lang: &str,
        num_items: usize,
    ) -> Result<Vec<String>, SearchError> {
        let response = self
            .client
            .get(format!("{}/search", self.base_url))
            .query(&[
                ("part", "snippet"),
                ("maxResults", &num_items.min(MAX_ITEMS_LIMIT).to_string()),
                ("q", &format!("{} {}", query, lang)),
                ("type", "video"),
                ("videoDuration", "long"),
                ("order", "relevance"),
                ("key", &self.api_key),
            ])
            .send()
            .await
            .map_err(map_transport_error)?;

        let data: SearchListResponse = check_status(response).await?;

        Ok(data
            .items
            .into_iter()
            .filter_map(|item| item.id.and_then(|id| id.video_id))
            .collect())
    }

    /// Stage two: batch details lookup over the identifier list
    async fn fetch_video_details(
        &self,
        video_ids: &[String],
    ) -> Result<Vec<serde_json::Value>, SearchError> {
        let response = self
            .client
            .get(format!("{}/videos", self.base_url))
            .query(&[
                ("part", "snippet,contentDetails,player"),
                ("id", &video_ids.join(",")),
                ("key", &self.api_key),
            ])
            .send()
            .await
            .map_err(map_transport_error)?;

        let data: VideoListResponse = check_status(response).await?;
        Ok(data.items)
    }
}

fn map_transport_error(e: reqwest::Error) -> SearchError {
    if e.is_timeout() {
        SearchError::Timeout { timeout_ms: 15000 }
    } else {
        SearchError::ApiError {
            status: 0,
            message: e.to_string(),
        }
    }
}

/// Status triage shared by both stages
async fn check_status<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, SearchError> {
    let status = response.status();

    if status == 429 {
        return Err(SearchError::RateLimited {
            retry_after_secs: 60,
        });
    }

    if status == 401 || status == 403 {
        return Err(SearchError::NoApiKey {
            platform: Platform::Youtube,
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

#[async_trait]
impl CourseProvider for YoutubeProvider {
    async fn search(
        &self,
        query: &str,
        lang: &str,
        num_items: usize,
    ) -> Result<Vec<Course>, SearchError> {
        if self.api_key.is_empty() {
            return Err(SearchError::NoApiKey {
                platform: Platform::Youtube,
            });
        }

        let num_items = num_items.min(MAX_ITEMS_LIMIT);

        // Details depend on the identifiers, so the calls are sequential
        let video_ids = self.search_video_ids(query, lang, num_items).await?;
        if video_ids.is_empty() {
            return Ok(vec![]);
        }

        let items = self.fetch_video_details(&video_ids).await?;

        let mut courses: Vec<Course> = items
            .into_iter()
            .filter_map(|item| {
                let video: YoutubeVideo = match serde_json::from_value(item) {
                    Ok(video) => video,
                    Err(e) => {
                        debug!("Skipping malformed YouTube item: {}", e);
                        return None;
                    }
                };
                map_video(video)
            })
            .collect();

        courses.truncate(num_items);
        Ok(courses)
    }

    fn platform(&self) -> Platform {
        Platform::Youtube
    }

    fn is_available(&self) -> bool {
        !self.api_key.is_empty()
    }
}

/// Convert an ISO-8601 duration token (`PT#H#M#S`, each component
/// optional) to the human-readable convention the other adapters use:
/// hours+minutes when hours > 0, else minutes, else seconds.
fn convert_iso_duration(iso: &str) -> Option<String> {
    if !iso.starts_with("PT") {
        return None;
    }

    let caps = ISO_DURATION_RE.captures(iso)?;
    let component = |i: usize| -> u64 {
        caps.get(i)
            .and_then(|m| m.as_str().parse().ok())
            .unwrap_or(0)
    };
    let (hours, minutes, seconds) = (component(1), component(2), component(3));

    if hours > 0 {
        Some(format!("{}h {}m", hours, minutes))
    } else if minutes > 0 {
        Some(format!("{}m", minutes))
    } else {
        Some(format!("{}s", seconds))
    }
}

/// Map one detailed video item to a `Course`, or skip it
fn map_video(video: YoutubeVideo) -> Option<Course> {
    let video_id = video.id.filter(|id| !id.is_empty())?;
    let snippet = video.snippet?;
    let title = clean_title(snippet.title.as_deref()?)?;

    // High-resolution thumbnail with medium/default fallback
    let image_url = snippet.thumbnails.and_then(|t| {
        t.high
            .and_then(|v| v.url)
            .or_else(|| t.medium.and_then(|v| v.url))
            .or_else(|| t.default.and_then(|v| v.url))
    });

    let duration = video
        .content_details
        .and_then(|d| d.duration)
        .as_deref()
        .and_then(convert_iso_duration);

    let published_date = snippet
        .published_at
        .as_deref()
        .and_then(parse_publish_date);

    Some(Course {
        title,
        url: format!("https://youtube.com/watch?v={}", video_id),
        image_url,
        duration,
        provider: snippet.channel_title,
        provider_img: None,
        difficulty: None,
        avg_rating: None,
        count_rating: None,
        skills: None,
        published_date,
    })
}

/// Date part of an RFC 3339 publish timestamp
fn parse_publish_date(raw: &str) -> Option<NaiveDate> {
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.date_naive())
}

#[derive(Debug, serde::Deserialize)]
struct SearchListResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Debug, serde::Deserialize)]
struct SearchItem {
    id: Option<SearchItemId>,
}

#[derive(Debug, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchItemId {
    video_id: Option<String>,
}

#[derive(Debug, serde::Deserialize)]
struct VideoListResponse {
    #[serde(default)]
    items: Vec<serde_json::Value>,
}

#[derive(Debug, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct YoutubeVideo {
    id: Option<String>,
    snippet: Option<YoutubeSnippet>,
    content_details: Option<YoutubeContentDetails>,
}

#[derive(Debug, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct YoutubeSnippet {
    title: Option<String>,
    channel_title: Option<String>,
    published_at: Option<String>,
    thumbnails: Option<YoutubeThumbnails>,
}

#[derive(Debug, serde::Deserialize)]
struct YoutubeThumbnails {
    high: Option<YoutubeThumbnail>,
    medium: Option<YoutubeThumbnail>,
    default: Option<YoutubeThumbnail>,
}

#[derive(Debug, serde::Deserialize)]
struct YoutubeThumbnail {
    url: Option<String>,
}

#[derive(Debug, serde::Deserialize)]
struct YoutubeContentDetails {
    duration: Option<String>,
}
