// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::config::settings::{EngineKind, EngineSettings, SearchSettings};
use crate::domain::search::engine::SearchEngine;
use crate::engines::traits::PageFetcher;
use crate::infrastructure::search::bing::BingSelectors;
use crate::infrastructure::search::duckduckgo::DuckDuckGoSelectors;
use crate::infrastructure::search::generic::GenericSelectors;
use crate::infrastructure::search::html_engine::{HtmlSearchEngine, ResultSelectors};
use crate::infrastructure::search::search_engine_router::SearchEngineRouter;
use std::sync::Arc;
use tracing::info;

/// 搜索引擎工厂
///
/// 根据配置创建引擎，所有引擎共用同一个抓取器
pub struct SearchEngineFactory;

impl SearchEngineFactory {
    /// 创建单个搜索引擎
    pub fn create_engine(settings: &EngineSettings, fetcher: Arc<dyn PageFetcher>) -> Arc<dyn SearchEngine> {
        match settings.kind {
            EngineKind::Bing => Self::configure(BingSelectors, settings, fetcher),
            EngineKind::Duckduckgo => Self::configure(DuckDuckGoSelectors, settings, fetcher),
            EngineKind::Generic => Self::configure(GenericSelectors, settings, fetcher),
        }
    }

    fn configure<S: ResultSelectors + 'static>(
        selectors: S,
        settings: &EngineSettings,
        fetcher: Arc<dyn PageFetcher>,
    ) -> Arc<dyn SearchEngine> {
        let mut engine = HtmlSearchEngine::new(selectors, fetcher);
        if let Some(endpoint) = &settings.endpoint {
            engine = engine.with_endpoint(endpoint.clone());
        }
        if let Some(name) = &settings.name {
            engine = engine.with_name(name.clone());
        }
        Arc::new(engine)
    }

    /// 根据搜索配置创建路由器
    pub fn create_router(settings: &SearchSettings, fetcher: Arc<dyn PageFetcher>) -> SearchEngineRouter {
        let engines: Vec<Arc<dyn SearchEngine>> = settings
            .engines
            .iter()
            .map(|engine| Self::create_engine(engine, fetcher.clone()))
            .collect();
        let router = SearchEngineRouter::new(engines, settings.rotation);
        info!(engines = ?router.engine_names(), rotation = ?settings.rotation, "search engines configured");
        router
    }
}
