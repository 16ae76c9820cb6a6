// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Free-course search aggregation service
//!
//! Aggregates free-course search results from Coursera, edX, Udemy, and
//! YouTube behind one unified query endpoint. Each platform has its own
//! adapter normalizing the upstream response shape into a shared course
//! record; the aggregation service fans out to all adapters concurrently
//! and degrades failed platforms to empty results instead of failing the
//! whole request.

pub mod api;
pub mod search;

pub use search::{
    Course, CourseProvider, CourseSearchService, Platform, PlatformResult, SearchConfig,
    SearchError, SearchPlan, SearchResults,
};
