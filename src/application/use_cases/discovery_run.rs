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

use crate::{
    application::dto::batch::OutputBatch,
    config::settings::Settings,
    domain::{
        models::{
            product_record::ProductRecord,
            query::Query,
            run_summary::{FailureStage, RunState, RunSummary},
        },
        services::{
            allowlist::AllowlistFilter,
            fingerprint::dedup,
            metadata_extractor::{MetadataExtractor, MoneyPattern},
            politeness::{pause, HostGate, PolitenessPolicy},
            record_builder::RecordFactory,
        },
    },
    engines::{reqwest_engine::ReqwestEngine, traits::PageFetcher},
    infrastructure::search::{factory::SearchEngineFactory, search_engine_router::SearchEngineRouter},
    utils::errors::RunError,
};
use chrono::Utc;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::Serialize;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// 一次运行的结果
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub state: RunState,
    pub batch: OutputBatch,
    pub summary: RunSummary,
}

/// 发现运行
///
/// 状态流转 `Idle → Running → Completed | Aborted`，配置无效时直接 `Aborted`。单个逻辑工作者，
/// 查询、发现和抓取全部顺序执行
pub struct DiscoveryRun {
    settings: Settings,
    fetcher: Arc<dyn PageFetcher>,
    router: SearchEngineRouter,
    allowlist: AllowlistFilter,
    extractor: MetadataExtractor,
    factory: RecordFactory,
    policy: PolitenessPolicy,
    gate: HostGate,
    cancel: CancellationToken,
    state: RunState,
}

impl DiscoveryRun {
    /// 根据配置创建运行，使用 reqwest 抓取器和配置中的搜索引擎
    ///
    /// 配置无效时直接返回错误，不会构建任何客户端
    pub fn from_settings(settings: Settings) -> Result<Self, RunError> {
        settings.validate_for_run()?;
        let fetcher: Arc<dyn PageFetcher> = Arc::new(ReqwestEngine::new(&settings.fetch)?);
        let router = SearchEngineFactory::create_router(&settings.search, fetcher.clone());
        Ok(Self::with_components(settings, fetcher, router))
    }

    /// 使用注入的抓取器和搜索路由器创建运行
    pub fn with_components(settings: Settings, fetcher: Arc<dyn PageFetcher>, router: SearchEngineRouter) -> Self {
        Self {
            allowlist: AllowlistFilter::from_settings(&settings.allowlist),
            extractor: MetadataExtractor::new(MoneyPattern::from(settings.extraction.money_pattern)),
            factory: RecordFactory::new(settings.fingerprint.scheme, &settings.record),
            policy: settings.politeness.policy(),
            gate: HostGate::new(settings.politeness.per_host_interval()),
            cancel: CancellationToken::new(),
            state: RunState::Idle,
            settings,
            fetcher,
            router,
        }
    }

    /// 使用外部取消令牌
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// 取消令牌，取消后在下一个URL边界停止
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    /// 执行一次运行
    ///
    /// 每个URL的失败只记录不中断；取消时保留已完成的记录并去重
    pub async fn run(&mut self) -> Result<RunReport, RunError> {
        if self.state != RunState::Idle {
            return Err(RunError::AlreadyStarted);
        }
        if let Err(e) = self.settings.validate_for_run() {
            self.state = RunState::Aborted;
            return Err(e.into());
        }
        self.state = RunState::Running;

        let mut rng = match self.settings.discovery.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let mut queries: Vec<Query> = self
            .settings
            .discovery
            .queries
            .iter()
            .map(|q| Query::new(q.as_str()))
            .filter(|q| !q.as_str().is_empty())
            .collect();
        queries.shuffle(&mut rng);

        let max_items = self.settings.discovery.max_items;
        let per_query = self.settings.discovery.results_per_query;
        info!(queries = queries.len(), max_items, "discovery run started");

        let mut summary = RunSummary::default();
        let mut collected: Vec<ProductRecord> = Vec::new();
        let mut aborted = false;

        'run: for (index, query) in queries.iter().enumerate() {
            if self.cancel.is_cancelled() {
                aborted = true;
                break;
            }
            if collected.len() >= max_items {
                break;
            }
            if index > 0 && !pause(self.policy.between_queries(&mut rng), &self.cancel).await {
                aborted = true;
                break;
            }

            let Some(engine) = self.router.select(index, &mut rng) else {
                break;
            };
            summary.queries += 1;
            info!(%query, engine = engine.name(), "running query");

            let candidates = match engine.discover(query, per_query).await {
                Ok(candidates) => candidates,
                Err(e) => {
                    warn!(%query, engine = engine.name(), error = %e, "search failed");
                    summary.record_failure(FailureStage::Search, query.as_str(), e.to_string());
                    continue;
                }
            };
            summary.discovered += candidates.len();

            let allowed: Vec<_> = candidates
                .iter()
                .filter_map(|candidate| self.allowlist.admit(candidate))
                .collect();
            summary.allowed += allowed.len();
            summary.rejected += candidates.len() - allowed.len();
            debug!(%query, discovered = candidates.len(), allowed = allowed.len(), "candidates filtered");

            for target in allowed {
                if self.cancel.is_cancelled() {
                    aborted = true;
                    break 'run;
                }
                if collected.len() >= max_items {
                    break 'run;
                }

                tokio::select! {
                    _ = self.cancel.cancelled() => {
                        aborted = true;
                        break 'run;
                    }
                    _ = self.gate.wait(target.host()) => {}
                }

                summary.fetched += 1;
                debug!(url = target.as_str(), "fetching");
                match self.fetcher.fetch(target.as_str()).await {
                    Ok(page) => {
                        if !self.allowlist.allowed(page.final_url.as_str()) {
                            debug!(url = target.as_str(), final_url = %page.final_url, "redirected outside allowlist");
                            summary.incomplete += 1;
                        } else {
                            let metadata = self.extractor.extract(&page.body, Some(&page.final_url));
                            match self.factory.build(query, &page.final_url, metadata, Utc::now()) {
                                Some(record) => {
                                    debug!(url = %record.url, title = %record.title, "record extracted");
                                    summary.extracted += 1;
                                    collected.push(record);
                                }
                                None => {
                                    debug!(url = target.as_str(), "page lacks title or price/image");
                                    summary.incomplete += 1;
                                }
                            }
                        }
                    }
                    Err(failure) => {
                        warn!(url = %failure.url, reason = %failure.reason, "fetch failed");
                        summary.record_failure(FailureStage::Fetch, failure.url, failure.reason.to_string());
                    }
                }

                if collected.len() >= max_items {
                    break 'run;
                }
                if !pause(self.policy.after_fetch(&mut rng), &self.cancel).await {
                    aborted = true;
                    break 'run;
                }
            }
        }

        let total = collected.len();
        let items = dedup(collected);
        summary.deduplicated = total - items.len();
        summary.emitted = items.len();

        self.state = if aborted { RunState::Aborted } else { RunState::Completed };
        info!(
            state = ?self.state,
            queries = summary.queries,
            discovered = summary.discovered,
            allowed = summary.allowed,
            rejected = summary.rejected,
            fetched = summary.fetched,
            extracted = summary.extracted,
            deduplicated = summary.deduplicated,
            emitted = summary.emitted,
            failures = summary.failures.len(),
            "discovery run finished"
        );

        Ok(RunReport {
            state: self.state,
            batch: OutputBatch::new(items),
            summary,
        })
    }
}

#[cfg(test)]
#[path = "discovery_run_test.rs"]
mod tests;
