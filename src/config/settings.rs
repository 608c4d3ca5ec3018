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

use crate::domain::models::price::Currency;
use crate::domain::services::fingerprint::FingerprintScheme;
use crate::domain::services::metadata_extractor::MoneyPatternKind;
use crate::domain::services::politeness::{DelayRange, PolitenessPolicy};
use crate::utils::errors::ConfigurationError;
use crate::utils::url_utils::parse_http_url;
use config::{Config, Environment, File};
use serde::Deserialize;
use std::time::Duration;
use validator::Validate;

/// 默认浏览器标识
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/120.0 Safari/537.36";

/// 应用程序配置设置
///
/// 包含发现、白名单、抓取、礼貌延迟、搜索引擎、指纹、记录和目录发布等所有配置项
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(default)]
pub struct Settings {
    /// 发现配置
    #[validate(nested)]
    pub discovery: DiscoverySettings,
    /// 白名单配置
    pub allowlist: AllowlistSettings,
    /// 抓取配置
    #[validate(nested)]
    pub fetch: FetchSettings,
    /// 礼貌延迟配置
    pub politeness: PolitenessSettings,
    /// 搜索引擎配置
    pub search: SearchSettings,
    /// 元数据提取配置
    pub extraction: ExtractionSettings,
    /// 指纹配置
    pub fingerprint: FingerprintSettings,
    /// 记录配置
    pub record: RecordSettings,
    /// 目录发布配置，缺省时不发布
    #[validate(nested)]
    pub catalog: Option<CatalogSettings>,
}

/// 发现配置设置
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(default)]
pub struct DiscoverySettings {
    /// 本次运行的查询集合
    pub queries: Vec<String>,
    /// 每次运行的最大记录数
    #[validate(range(min = 1, max = 10000))]
    pub max_items: usize,
    /// 每个查询保留的候选URL数
    #[validate(range(min = 1, max = 100))]
    pub results_per_query: usize,
    /// 随机种子，缺省时使用系统熵
    pub seed: Option<u64>,
}

impl Default for DiscoverySettings {
    fn default() -> Self {
        Self {
            queries: Vec::new(),
            max_items: 20,
            results_per_query: 20,
            seed: None,
        }
    }
}

/// 白名单配置设置
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AllowlistSettings {
    /// 允许的域名，为空时全局模式
    pub domains: Vec<String>,
    /// 路径中禁止出现的片段
    pub deny_paths: Vec<String>,
}

impl Default for AllowlistSettings {
    fn default() -> Self {
        Self {
            domains: Vec::new(),
            deny_paths: crate::domain::services::allowlist::DEFAULT_DENY_PATHS
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

/// 抓取配置设置
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(default)]
pub struct FetchSettings {
    /// 单次请求超时时间（毫秒）
    #[validate(range(min = 1))]
    pub timeout_ms: u64,
    #[validate(length(min = 1))]
    pub user_agent: String,
    pub accept_language: String,
    /// 最大重定向次数
    #[validate(range(max = 20))]
    pub max_redirects: usize,
}

impl FetchSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            timeout_ms: 25_000,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            accept_language: "pt-BR,pt;q=0.9,en;q=0.8".to_string(),
            max_redirects: 10,
        }
    }
}

/// 礼貌延迟配置设置
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PolitenessSettings {
    /// 每次抓取后的随机延迟
    pub fetch_delay_ms: DelayRange,
    /// 查询之间的随机延迟
    pub query_delay_ms: DelayRange,
    /// 同一主机两次请求的最小间隔（毫秒），0 表示不限制
    pub per_host_interval_ms: u64,
}

impl PolitenessSettings {
    pub fn policy(&self) -> PolitenessPolicy {
        PolitenessPolicy::new(self.fetch_delay_ms, self.query_delay_ms)
    }

    pub fn per_host_interval(&self) -> Duration {
        Duration::from_millis(self.per_host_interval_ms)
    }
}

impl Default for PolitenessSettings {
    fn default() -> Self {
        let policy = PolitenessPolicy::default();
        Self {
            fetch_delay_ms: policy.fetch_delay,
            query_delay_ms: policy.query_delay,
            per_host_interval_ms: 1000,
        }
    }
}

/// 搜索引擎类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EngineKind {
    Bing,
    Duckduckgo,
    Generic,
}

/// 引擎轮换方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rotation {
    #[default]
    RoundRobin,
    Random,
}

/// 单个搜索引擎配置
#[derive(Debug, Clone, Deserialize)]
pub struct EngineSettings {
    pub kind: EngineKind,
    /// 结果页模板，`{q}` 为编码后的查询；Bing 和 DuckDuckGo 可省略
    pub endpoint: Option<String>,
    /// 日志和摘要中使用的名称
    pub name: Option<String>,
}

impl EngineSettings {
    pub fn new(kind: EngineKind) -> Self {
        Self {
            kind,
            endpoint: None,
            name: None,
        }
    }
}

/// 搜索配置设置
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    pub engines: Vec<EngineSettings>,
    pub rotation: Rotation,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            engines: vec![
                EngineSettings::new(EngineKind::Bing),
                EngineSettings::new(EngineKind::Duckduckgo),
            ],
            rotation: Rotation::default(),
        }
    }
}

/// 元数据提取配置设置
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ExtractionSettings {
    /// 在可见文本中查找价格时使用的货币模式
    pub money_pattern: MoneyPatternKind,
}

/// 指纹配置设置
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FingerprintSettings {
    pub scheme: FingerprintScheme,
}

/// 记录配置设置
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RecordSettings {
    /// 价格文本无法识别货币时的默认货币
    pub default_currency: Currency,
    /// 分类路径
    pub categories: Vec<String>,
    /// 追加到目标链接的联盟参数，例如 `tag=loja-20`
    pub affiliate_query: Option<String>,
}

impl Default for RecordSettings {
    fn default() -> Self {
        Self {
            default_currency: Currency::default(),
            categories: vec!["Afiliados".to_string()],
            affiliate_query: None,
        }
    }
}

/// 目录发布配置设置
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CatalogSettings {
    /// 商店根地址
    #[validate(url)]
    pub base_url: String,
    #[validate(length(min = 1))]
    pub consumer_key: String,
    #[validate(length(min = 1))]
    pub consumer_secret: String,
    /// 外部商品按钮文字，缺省时为 `Comprar na {商户}`
    #[serde(default)]
    pub button_text: Option<String>,
    /// 请求超时时间（毫秒）
    #[serde(default = "default_catalog_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_catalog_timeout_ms() -> u64 {
    40_000
}

impl CatalogSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Settings {
    /// 创建新的配置实例
    ///
    /// 依次合并默认值、`config/default`、`config/{APP_ENVIRONMENT}` 和
    /// `PRODSCOUT__` 前缀的环境变量
    pub fn new() -> Result<Self, ConfigurationError> {
        let env = std::env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "default".to_string());
        Self::from_builder(
            Config::builder()
                .add_source(File::with_name("config/default").required(false))
                .add_source(File::with_name(&format!("config/{}", env)).required(false)),
        )
    }

    /// 从指定文件加载配置，环境变量仍然覆盖文件中的值
    pub fn from_file(path: &str) -> Result<Self, ConfigurationError> {
        Self::from_builder(Config::builder().add_source(File::with_name(path)))
    }

    fn from_builder(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> Result<Self, ConfigurationError> {
        let settings: Settings = builder
            .add_source(
                Environment::with_prefix("PRODSCOUT")
                    .prefix_separator("__")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("discovery.queries")
                    .with_list_parse_key("allowlist.domains")
                    .with_list_parse_key("allowlist.deny_paths")
                    .with_list_parse_key("record.categories")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;
        Ok(settings)
    }

    /// 运行前的完整校验，失败时不应发生任何网络请求
    pub fn validate_for_run(&self) -> Result<(), ConfigurationError> {
        self.validate()
            .map_err(|e| ConfigurationError::invalid("settings", e.to_string()))?;

        if self.discovery.queries.iter().all(|q| q.trim().is_empty()) {
            return Err(ConfigurationError::Missing("discovery.queries"));
        }
        if self.search.engines.is_empty() {
            return Err(ConfigurationError::Missing("search.engines"));
        }
        for (index, engine) in self.search.engines.iter().enumerate() {
            let field = format!("search.engines[{}].endpoint", index);
            match (&engine.kind, &engine.endpoint) {
                (EngineKind::Generic, None) => {
                    return Err(ConfigurationError::invalid(field, "generic engine needs an endpoint"))
                }
                (_, Some(endpoint)) => {
                    if !endpoint.contains("{q}") {
                        return Err(ConfigurationError::invalid(field, "missing {q} placeholder"));
                    }
                    if parse_http_url(&endpoint.replace("{q}", "q")).is_none() {
                        return Err(ConfigurationError::invalid(field, "not an http(s) URL"));
                    }
                }
                _ => {}
            }
        }
        for (field, range) in [
            ("politeness.fetch_delay_ms", &self.politeness.fetch_delay_ms),
            ("politeness.query_delay_ms", &self.politeness.query_delay_ms),
        ] {
            if !range.is_valid() {
                return Err(ConfigurationError::invalid(field, "min_ms greater than max_ms"));
            }
        }
        if let Some(affiliate) = &self.record.affiliate_query {
            if affiliate.trim().is_empty() || affiliate.contains(['?', '#']) {
                return Err(ConfigurationError::invalid(
                    "record.affiliate_query",
                    "expected key=value pairs",
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "settings_test.rs"]
mod tests;
