// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::query::{CandidateUrl, Query};
use crate::domain::search::engine::{SearchEngine, SearchError};
use crate::engines::traits::{FetchFailure, FetchFailureReason, PageFetcher};
use crate::utils::url_utils::parse_http_url;
use async_trait::async_trait;
use scraper::{Html, Selector};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info, warn};
use url::Url;

/// Selector used when every engine-specific selector comes back empty.
pub const FALLBACK_SELECTOR: &str = "a[href]";

/// Placeholder replaced by the encoded query in endpoint templates.
pub const QUERY_PLACEHOLDER: &str = "{q}";

const BLOCK_MARKERS: &[&str] = &["captcha", "<title>robot check</title>", "unusual traffic"];

/// Per-engine knowledge of a result page: where links live and how the
/// engine wraps them.
pub trait ResultSelectors: Send + Sync {
    /// Engine name used in logs and candidate tags.
    fn engine(&self) -> &'static str;

    /// Endpoint template with a `{q}` placeholder.
    fn default_endpoint(&self) -> &'static str;

    /// Prioritized CSS selectors for result anchors.
    fn primary_selectors(&self) -> &'static [&'static str];

    /// Target of an engine redirect wrapper, if `href` is one.
    fn unwrap_redirect(&self, _href: &str) -> Option<String> {
        None
    }

    /// Whether a link points back into the engine itself.
    fn is_internal(&self, _url: &Url) -> bool {
        false
    }

    /// Whether the page is an anti-bot interstitial.
    fn is_blocked(&self, html: &str) -> bool {
        let lower = html.to_lowercase();
        BLOCK_MARKERS.iter().any(|marker| lower.contains(marker))
    }
}

/// Scrapes an HTML result page through the shared fetcher.
pub struct HtmlSearchEngine<S> {
    name: String,
    endpoint: String,
    selectors: S,
    fetcher: Arc<dyn PageFetcher>,
}

impl<S: ResultSelectors> HtmlSearchEngine<S> {
    pub fn new(selectors: S, fetcher: Arc<dyn PageFetcher>) -> Self {
        Self {
            name: selectors.engine().to_string(),
            endpoint: selectors.default_endpoint().to_string(),
            selectors,
            fetcher,
        }
    }

    /// Overrides the endpoint template, e.g. to point at a mirror.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Result page URL for `query`.
    pub fn build_url(&self, query: &Query) -> String {
        let encoded: String = url::form_urlencoded::byte_serialize(query.as_str().as_bytes()).collect();
        self.endpoint.replace(QUERY_PLACEHOLDER, &encoded)
    }

    /// Extracts candidate URLs from a result page, in document order.
    ///
    /// Relative links, engine-internal links and fragment-only duplicates
    /// are dropped; the list is capped at `limit`. The first primary
    /// selector with a usable link wins, otherwise every anchor is tried.
    pub fn parse_results(&self, html: &str, page_url: &Url, query: &Query, limit: usize) -> Vec<CandidateUrl> {
        let document = Html::parse_document(html);

        let primary = self
            .selectors
            .primary_selectors()
            .iter()
            .map(|raw| self.candidates(&document, raw, page_url, query, limit))
            .find(|found| !found.is_empty());

        match primary {
            Some(found) => found,
            None => {
                debug!(engine = %self.name, "primary selectors yielded nothing, using fallback");
                self.candidates(&document, FALLBACK_SELECTOR, page_url, query, limit)
            }
        }
    }

    /// Usable candidates among the anchors matched by `raw`.
    fn candidates(&self, document: &Html, raw: &str, page_url: &Url, query: &Query, limit: usize) -> Vec<CandidateUrl> {
        let Ok(selector) = Selector::parse(raw) else {
            return Vec::new();
        };

        let mut seen = HashSet::new();
        let mut out = Vec::new();
        for href in document
            .select(&selector)
            .filter_map(|el| el.value().attr("href"))
            .map(str::trim)
            .filter(|href| !href.is_empty())
        {
            if out.len() >= limit {
                break;
            }
            let target = self
                .selectors
                .unwrap_redirect(href)
                .unwrap_or_else(|| href.to_string());
            let Some(url) = parse_http_url(&target) else {
                continue;
            };
            if self.is_internal(&url, page_url) {
                continue;
            }
            let mut key = url.clone();
            key.set_fragment(None);
            if !seen.insert(key.to_string()) {
                continue;
            }
            out.push(CandidateUrl::new(url.to_string(), query.clone(), self.name.clone(), out.len()));
        }
        out
    }

    fn is_internal(&self, url: &Url, page_url: &Url) -> bool {
        let same_origin = url.host_str() == page_url.host_str()
            && url.port_or_known_default() == page_url.port_or_known_default();
        same_origin || self.selectors.is_internal(url)
    }

    fn map_failure(&self, failure: FetchFailure) -> SearchError {
        match failure.reason {
            FetchFailureReason::Status(429) => SearchError::RateLimitExceeded,
            FetchFailureReason::Timeout(_) | FetchFailureReason::Connect(_) => {
                SearchError::NetworkError(failure.to_string())
            }
            _ => SearchError::EngineError(failure.to_string()),
        }
    }
}

#[async_trait]
impl<S: ResultSelectors> SearchEngine for HtmlSearchEngine<S> {
    async fn discover(&self, query: &Query, limit: usize) -> Result<Vec<CandidateUrl>, SearchError> {
        // Validate input
        if query.as_str().is_empty() {
            return Err(SearchError::InvalidQuery("empty query".to_string()));
        }

        let url = self.build_url(query);
        info!(engine = %self.name, %url, "searching");

        let page = self
            .fetcher
            .fetch(&url)
            .await
            .map_err(|failure| self.map_failure(failure))?;

        let results = self.parse_results(&page.body, &page.final_url, query, limit);
        if results.is_empty() && self.selectors.is_blocked(&page.body) {
            warn!(engine = %self.name, "anti-bot page detected");
            return Err(SearchError::Blocked);
        }

        debug!(engine = %self.name, count = results.len(), "search results parsed");
        Ok(results)
    }

    fn name(&self) -> &str {
        &self.name
    }
}
