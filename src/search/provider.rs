// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Course provider trait definition

use async_trait::async_trait;

use super::types::{Course, Platform, SearchError};

/// Trait implemented by each platform adapter.
///
/// An adapter translates one upstream platform's API into the shared
/// `Course` shape. The aggregation service depends only on this trait,
/// never on platform internals.
#[async_trait]
pub trait CourseProvider: Send + Sync {
    /// Search the platform for free courses
    ///
    /// # Arguments
    /// * `query` - Free-text query, non-blank
    /// * `lang` - Platform-specific language selector derived by the caller
    /// * `num_items` - Maximum number of courses to return; adapters clamp
    ///   this to their platform's upstream limit
    ///
    /// # Returns
    /// Courses in upstream relevance order, never more than `num_items`
    async fn search(
        &self,
        query: &str,
        lang: &str,
        num_items: usize,
    ) -> Result<Vec<Course>, SearchError>;

    /// Which platform this adapter serves
    fn platform(&self) -> Platform;

    /// Whether the adapter can run at all (e.g. has its API key)
    fn is_available(&self) -> bool {
        true
    }
}
