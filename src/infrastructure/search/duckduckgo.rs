// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::infrastructure::search::html_engine::ResultSelectors;
use crate::utils::url_utils::host_matches_domain;
use url::Url;

const DDG_ORIGIN: &str = "https://duckduckgo.com";

/// DuckDuckGo HTML (no-JS) result page layout.
///
/// Result anchors are `a.result__a` pointing at `/l/?uddg=<percent-encoded>`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DuckDuckGoSelectors;

impl DuckDuckGoSelectors {
    /// Extract the `uddg` target from a DuckDuckGo redirect link.
    pub fn decode_redirect(href: &str) -> Option<String> {
        let absolute = if href.starts_with("//") {
            format!("https:{}", href)
        } else if href.starts_with('/') {
            format!("{}{}", DDG_ORIGIN, href)
        } else {
            href.to_string()
        };

        let parsed = Url::parse(&absolute).ok()?;
        let is_ddg = parsed
            .host_str()
            .is_some_and(|host| host_matches_domain(host, "duckduckgo.com"));
        if !is_ddg || !parsed.path().starts_with("/l/") {
            return None;
        }

        parsed
            .query_pairs()
            .find(|(key, _)| key == "uddg")
            .map(|(_, value)| value.into_owned())
            .filter(|value| !value.is_empty())
    }
}

impl ResultSelectors for DuckDuckGoSelectors {
    fn engine(&self) -> &'static str {
        "duckduckgo"
    }

    fn default_endpoint(&self) -> &'static str {
        "https://html.duckduckgo.com/html/?q={q}"
    }

    fn primary_selectors(&self) -> &'static [&'static str] {
        &["a.result__a", "a[href][rel='nofollow']"]
    }

    fn unwrap_redirect(&self, href: &str) -> Option<String> {
        Self::decode_redirect(href)
    }

    fn is_internal(&self, url: &Url) -> bool {
        url.host_str()
            .is_some_and(|host| host_matches_domain(host, "duckduckgo.com"))
    }

    fn is_blocked(&self, html: &str) -> bool {
        let lower = html.to_lowercase();
        lower.contains("anomaly-modal") || lower.contains("captcha") || lower.contains("bots use duckduckgo")
    }
}
