// Copyright 2025 Kirky.X
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// 抓取失败原因
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchFailureReason {
    /// 超时
    #[error("timeout after {0:?}")]
    Timeout(Duration),
    /// 连接失败
    #[error("connection failed: {0}")]
    Connect(String),
    /// 非 2xx 状态码（已跟随重定向）
    #[error("unexpected status {0}")]
    Status(u16),
    /// 读取响应体失败
    #[error("failed to read body: {0}")]
    Body(String),
    /// URL 无法请求
    #[error("invalid url: {0}")]
    InvalidUrl(String),
    /// 其他错误
    #[error("request failed: {0}")]
    Other(String),
}

impl FetchFailureReason {
    /// 将 reqwest 错误归类
    pub fn from_reqwest(err: &reqwest::Error, timeout: Duration) -> Self {
        if err.is_timeout() {
            Self::Timeout(timeout)
        } else if err.is_connect() {
            Self::Connect(err.to_string())
        } else if let Some(status) = err.status() {
            Self::Status(status.as_u16())
        } else if err.is_body() || err.is_decode() {
            Self::Body(err.to_string())
        } else if err.is_builder() {
            Self::InvalidUrl(err.to_string())
        } else {
            Self::Other(err.to_string())
        }
    }
}

/// 抓取失败
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{url}: {reason}")]
pub struct FetchFailure {
    pub url: String,
    pub reason: FetchFailureReason,
}

impl FetchFailure {
    pub fn new(url: impl Into<String>, reason: FetchFailureReason) -> Self {
        Self {
            url: url.into(),
            reason,
        }
    }
}

/// 成功抓取的页面
#[derive(Debug, Clone, PartialEq)]
pub struct FetchedPage {
    pub requested_url: String,
    /// 跟随重定向后的最终地址
    pub final_url: Url,
    pub status: u16,
    pub body: String,
    /// 请求耗时（毫秒）
    pub elapsed_ms: u64,
}

/// 单次抓取的结果
pub type FetchResult = Result<FetchedPage, FetchFailure>;

/// 页面抓取特质
///
/// 编排器和搜索引擎共用同一条 HTTP 路径。实现不做隐式重试，
/// 任何错误都以 `FetchFailure` 返回
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// 抓取单个页面
    async fn fetch(&self, url: &str) -> FetchResult;

    /// 引擎名称
    fn name(&self) -> &'static str;
}
