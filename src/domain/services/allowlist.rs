// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::config::settings::AllowlistSettings;
use crate::domain::models::query::{AllowedUrl, CandidateUrl};
use crate::utils::url_utils::{host_matches_domain, parse_http_url};

/// 默认拒绝的路径片段
pub const DEFAULT_DENY_PATHS: &[&str] = &[
    "login",
    "cart",
    "checkout",
    "track",
    "seller",
    "support",
    "help",
    "mailto:",
    "account",
    "orders",
    "wishlist",
    "entrar",
    "minha-conta",
];

/// 超过该长度的URL通常是跟踪链接
pub const MAX_URL_LEN: usize = 512;

/// 白名单过滤器
///
/// 纯函数判断，不做任何 I/O。域名白名单为空时进入全局模式，
/// 只按路径拒绝列表过滤
#[derive(Debug, Clone)]
pub struct AllowlistFilter {
    domains: Vec<String>,
    deny_paths: Vec<String>,
}

impl AllowlistFilter {
    pub fn new<D, P>(domains: D, deny_paths: P) -> Self
    where
        D: IntoIterator,
        D::Item: AsRef<str>,
        P: IntoIterator,
        P::Item: AsRef<str>,
    {
        let normalize = |s: &str| s.trim().to_lowercase();
        Self {
            domains: domains
                .into_iter()
                .map(|d| normalize(d.as_ref()))
                .filter(|d| !d.is_empty())
                .collect(),
            deny_paths: deny_paths
                .into_iter()
                .map(|p| normalize(p.as_ref()))
                .filter(|p| !p.is_empty())
                .collect(),
        }
    }

    pub fn from_settings(settings: &AllowlistSettings) -> Self {
        Self::new(&settings.domains, &settings.deny_paths)
    }

    /// 是否为全局模式（未配置域名白名单）
    pub fn is_global(&self) -> bool {
        self.domains.is_empty()
    }

    /// 判断URL是否允许抓取
    pub fn allowed(&self, url: &str) -> bool {
        if url.len() > MAX_URL_LEN {
            return false;
        }
        let Some(parsed) = parse_http_url(url) else {
            return false;
        };

        let path = parsed.path().to_lowercase();
        if self.deny_paths.iter().any(|bad| path.contains(bad.as_str())) {
            return false;
        }

        if self.domains.is_empty() {
            return true;
        }

        let host = parsed.host_str().unwrap_or_default();
        self.domains
            .iter()
            .any(|domain| host_matches_domain(host, domain))
    }

    /// 类型化的过滤：通过时返回 `AllowedUrl`
    pub fn admit(&self, candidate: &CandidateUrl) -> Option<AllowedUrl> {
        if !self.allowed(&candidate.url) {
            return None;
        }
        parse_http_url(&candidate.url).map(|url| AllowedUrl::new(url, candidate.query.clone()))
    }
}

impl Default for AllowlistFilter {
    fn default() -> Self {
        Self::new(Vec::<String>::new(), DEFAULT_DENY_PATHS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::query::Query;

    fn shops() -> AllowlistFilter {
        AllowlistFilter::new(["amazon.com.br", "kabum.com.br"], DEFAULT_DENY_PATHS)
    }

    #[test]
    fn test_global_mode_permits_any_host() {
        let filter = AllowlistFilter::default();
        assert!(filter.is_global());
        assert!(filter.allowed("https://random-store.example/produto/42"));
    }

    #[test]
    fn test_denylisted_path_rejected() {
        let filter = AllowlistFilter::default();
        assert!(!filter.allowed("https://shop.example/cart/3"));
        assert!(!filter.allowed("https://shop.example/Minha-Conta/pedidos"));
        assert!(!filter.allowed("https://shop.example/user/LOGIN?next=/"));
    }

    #[test]
    fn test_deny_list_checks_path_only() {
        let filter = AllowlistFilter::default();
        assert!(filter.allowed("https://help-center-store.example/produto/1"));
        assert!(filter.allowed("https://shop.example/produto/1?ref=cart"));
    }

    #[test]
    fn test_domain_suffix_match() {
        let filter = shops();
        assert!(filter.allowed("https://www.amazon.com.br/dp/B0C"));
        assert!(filter.allowed("https://kabum.com.br/produto/1"));
        assert!(!filter.allowed("https://notamazon.com.br/dp/B0C"));
        assert!(!filter.allowed("https://shopee.com.br/item/1"));
    }

    #[test]
    fn test_non_http_and_relative_rejected() {
        let filter = AllowlistFilter::default();
        assert!(!filter.allowed("/search?q=tv"));
        assert!(!filter.allowed("ftp://files.example/x"));
        assert!(!filter.allowed(""));
    }

    #[test]
    fn test_overlong_url_rejected() {
        let filter = AllowlistFilter::default();
        let long = format!("https://shop.example/p?{}", "x".repeat(MAX_URL_LEN));
        assert!(!filter.allowed(&long));
    }

    #[test]
    fn test_allowed_is_deterministic() {
        let filter = shops();
        let urls = [
            "https://www.amazon.com.br/dp/B0C",
            "https://www.amazon.com.br/checkout",
            "https://elsewhere.example/p",
        ];
        let first: Vec<bool> = urls.iter().map(|u| filter.allowed(u)).collect();
        for _ in 0..10 {
            let again: Vec<bool> = urls.iter().map(|u| filter.allowed(u)).collect();
            assert_eq!(first, again);
        }
    }

    #[test]
    fn test_admit_keeps_query() {
        let filter = shops();
        let candidate = CandidateUrl::new(
            "https://www.kabum.com.br/produto/9",
            Query::new("ssd nvme 1tb"),
            "bing",
            0,
        );
        let allowed = filter.admit(&candidate).expect("should be admitted");
        assert_eq!(allowed.host(), "www.kabum.com.br");
        assert_eq!(allowed.query().as_str(), "ssd nvme 1tb");

        let denied = CandidateUrl::new("https://www.kabum.com.br/login", Query::new("x"), "bing", 1);
        assert!(filter.admit(&denied).is_none());
    }
}
