// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Free-course search module
//!
//! Aggregates course search results from four platforms behind one
//! unified query:
//! - One adapter per platform (Coursera, edX, Udemy, YouTube), each
//!   normalizing its upstream shape into the shared `Course` record
//! - Concurrent fan-out with per-adapter deadlines
//! - Graceful degradation: a failed platform yields zero courses, never
//!   an error for the whole request

pub mod config;
pub mod coursera;
pub mod edx;
pub mod provider;
pub mod service;
pub mod types;
pub mod udemy;
pub mod youtube;

// Re-export commonly used types
pub use config::SearchConfig;
pub use provider::CourseProvider;
pub use service::CourseSearchService;
pub use types::{
    Course, Platform, PlatformQuery, PlatformResult, SearchError, SearchPlan, SearchResults,
};
