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

use crate::config::settings::FetchSettings;
use crate::engines::traits::{FetchFailure, FetchFailureReason, FetchResult, FetchedPage, PageFetcher};
use crate::utils::errors::RunError;
use crate::utils::url_utils::parse_http_url;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE};
use std::time::{Duration, Instant};
use tracing::debug;

const ACCEPT_HTML: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";

/// 抓取引擎
///
/// 基于reqwest实现的HTTP抓取引擎，客户端在每次运行开始时构建一次
pub struct ReqwestEngine {
    client: reqwest::Client,
    timeout: Duration,
}

impl ReqwestEngine {
    /// 根据抓取配置构建客户端
    ///
    /// # 参数
    ///
    /// * `settings` - 抓取配置（超时、User-Agent、Accept-Language、重定向次数）
    pub fn new(settings: &FetchSettings) -> Result<Self, RunError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_HTML));
        if !settings.accept_language.trim().is_empty() {
            let value = HeaderValue::from_str(settings.accept_language.trim())
                .map_err(|e| RunError::Client(format!("Accept-Language: {}", e)))?;
            headers.insert(ACCEPT_LANGUAGE, value);
        }

        let client = reqwest::Client::builder()
            .user_agent(settings.user_agent.as_str())
            .default_headers(headers)
            .timeout(settings.timeout())
            .redirect(reqwest::redirect::Policy::limited(settings.max_redirects))
            .cookie_store(true)
            .build()
            .map_err(|e| RunError::Client(e.to_string()))?;

        Ok(Self {
            client,
            timeout: settings.timeout(),
        })
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

#[async_trait]
impl PageFetcher for ReqwestEngine {
    /// 执行HTTP抓取
    ///
    /// 超时、连接错误、非 2xx 状态码都返回 `FetchFailure`，不重试
    async fn fetch(&self, url: &str) -> FetchResult {
        if parse_http_url(url).is_none() {
            return Err(FetchFailure::new(
                url,
                FetchFailureReason::InvalidUrl(url.to_string()),
            ));
        }

        let start = Instant::now();
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchFailure::new(url, FetchFailureReason::from_reqwest(&e, self.timeout)))?;

        let status = response.status();
        let final_url = response.url().clone();
        if !status.is_success() {
            return Err(FetchFailure::new(
                url,
                FetchFailureReason::Status(status.as_u16()),
            ));
        }

        let body = response
            .text()
            .await
            .map_err(|e| FetchFailure::new(url, FetchFailureReason::from_reqwest(&e, self.timeout)))?;

        let elapsed_ms = start.elapsed().as_millis() as u64;
        debug!(url, final_url = %final_url, status = status.as_u16(), elapsed_ms, "fetched page");

        Ok(FetchedPage {
            requested_url: url.to_string(),
            final_url,
            status: status.as_u16(),
            body,
            elapsed_ms,
        })
    }

    fn name(&self) -> &'static str {
        "reqwest"
    }
}

#[cfg(test)]
#[path = "reqwest_engine_test.rs"]
mod tests;
