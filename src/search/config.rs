// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Configuration for course search functionality

use std::env;

/// Configuration for the course search service
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// YouTube Data API v3 key (empty = YouTube adapter unavailable)
    pub youtube_api_key: String,
    /// Per-adapter deadline in seconds, covering the adapter's own retries
    pub request_timeout_secs: u64,
    /// Default number of courses per platform when the request omits it
    pub default_num_items: usize,
}

impl SearchConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self {
            youtube_api_key: env::var("YOUTUBE_API_KEY").unwrap_or_default(),
            request_timeout_secs: env::var("SEARCH_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(30),
            default_num_items: env::var("DEFAULT_NUM_ITEMS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(6),
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        // Note: a missing YouTube key is not a configuration error;
        // that platform degrades to empty results instead
        if self.request_timeout_secs == 0 {
            return Err("Search timeout must be greater than 0".to_string());
        }
        if self.default_num_items == 0 {
            return Err("Default item count must be greater than 0".to_string());
        }
        Ok(())
    }

    /// Check if the YouTube adapter has a key to work with
    pub fn has_youtube_key(&self) -> bool {
        !self.youtube_api_key.is_empty()
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            youtube_api_key: String::new(),
            request_timeout_secs: 30,
            default_num_items: 6,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SearchConfig::default();
        assert_eq!(config.request_timeout_secs, 30);
        assert_eq!(config.default_num_items, 6);
        assert!(!config.has_youtube_key());
        // Still valid without a YouTube key
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_has_youtube_key() {
        let mut config = SearchConfig::default();
        assert!(!config.has_youtube_key());

        config.youtube_api_key = "key".to_string();
        assert!(config.has_youtube_key());
    }

    #[test]
    fn test_config_validation_zero_timeout() {
        let mut config = SearchConfig::default();
        config.request_timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_zero_num_items() {
        let mut config = SearchConfig::default();
        config.default_num_items = 0;
        assert!(config.validate().is_err());
    }
}
