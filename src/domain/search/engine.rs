// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::query::{CandidateUrl, Query};
use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum SearchError {
    #[error("Search engine error: {0}")]
    EngineError(String),
    #[error("Network error: {0}")]
    NetworkError(String),
    #[error("Rate limit exceeded")]
    RateLimitExceeded,
    #[error("Blocked by anti-bot page")]
    Blocked,
    #[error("Invalid query: {0}")]
    InvalidQuery(String),
}

#[async_trait]
pub trait SearchEngine: Send + Sync {
    /// Discover candidate URLs for a query, in engine result order.
    async fn discover(&self, query: &Query, limit: usize) -> Result<Vec<CandidateUrl>, SearchError>;

    /// Get the name of the search engine
    fn name(&self) -> &str;
}
