// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};
use std::fmt;
use url::Url;

/// 搜索查询
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Query(String);

impl Query {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into().trim().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Query {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// 搜索发现的候选URL
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateUrl {
    /// 原始URL
    pub url: String,
    /// 来源查询
    pub query: Query,
    /// 产生该结果的搜索引擎
    pub engine: String,
    /// 在引擎结果中的位置（从 0 开始）
    pub rank: usize,
}

impl CandidateUrl {
    pub fn new(url: impl Into<String>, query: Query, engine: impl Into<String>, rank: usize) -> Self {
        Self {
            url: url.into(),
            query,
            engine: engine.into(),
            rank,
        }
    }
}

/// 通过白名单过滤的URL
///
/// 只能由 `AllowlistFilter::admit` 构造
#[derive(Debug, Clone, PartialEq)]
pub struct AllowedUrl {
    url: Url,
    query: Query,
}

impl AllowedUrl {
    pub(crate) fn new(url: Url, query: Query) -> Self {
        Self { url, query }
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn as_str(&self) -> &str {
        self.url.as_str()
    }

    pub fn host(&self) -> &str {
        self.url.host_str().unwrap_or_default()
    }

    pub fn query(&self) -> &Query {
        &self.query
    }
}
