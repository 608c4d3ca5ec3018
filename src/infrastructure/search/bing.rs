// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::infrastructure::search::html_engine::ResultSelectors;
use crate::utils::url_utils::host_matches_domain;
use base64::engine::general_purpose::URL_SAFE;
use base64::Engine as _;
use url::Url;

const INTERNAL_DOMAINS: &[&str] = &["bing.com", "microsoft.com", "msn.com", "bingj.com"];

/// Bing result page layout.
///
/// Organic results sit in `li.b_algo`; anchors are usually wrapped in
/// `/ck/a?u=a1<base64>` click-tracking redirects.
#[derive(Debug, Clone, Copy, Default)]
pub struct BingSelectors;

impl BingSelectors {
    /// Decode a Bing click-tracking URL into its target.
    ///
    /// The `u` parameter is `a1` followed by unpadded URL-safe base64.
    /// Anything else is returned unchanged.
    pub fn decode_bing_url(url: &str) -> String {
        let Ok(parsed_url) = Url::parse(url) else {
            return url.to_string();
        };
        let is_click_url = parsed_url
            .host_str()
            .is_some_and(|host| host_matches_domain(host, "bing.com"))
            && parsed_url.path() == "/ck/a";
        if !is_click_url {
            return url.to_string();
        }

        if let Some(u_param) = parsed_url.query_pairs().find(|(key, _)| key == "u") {
            if let Some(encoded) = u_param.1.strip_prefix("a1") {
                // Add padding if needed
                let padding = "=".repeat((4 - encoded.len() % 4) % 4);
                let padded_encoded = format!("{}{}", encoded, padding);

                if let Ok(decoded_bytes) = URL_SAFE.decode(padded_encoded) {
                    if let Ok(decoded_str) = String::from_utf8(decoded_bytes) {
                        return decoded_str;
                    }
                }
            }
        }
        url.to_string()
    }
}

impl ResultSelectors for BingSelectors {
    fn engine(&self) -> &'static str {
        "bing"
    }

    fn default_endpoint(&self) -> &'static str {
        "https://www.bing.com/search?q={q}"
    }

    fn primary_selectors(&self) -> &'static [&'static str] {
        &["li.b_algo h2 a", "h2 a"]
    }

    fn unwrap_redirect(&self, href: &str) -> Option<String> {
        let decoded = Self::decode_bing_url(href);
        (decoded != href).then_some(decoded)
    }

    fn is_internal(&self, url: &Url) -> bool {
        url.host_str()
            .is_some_and(|host| INTERNAL_DOMAINS.iter().any(|d| host_matches_domain(host, d)))
    }
}
