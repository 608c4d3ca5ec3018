// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 搜索服务模块
///
/// 结果页抓取的搜索引擎：Bing、DuckDuckGo 和通用模板
/// 以及按查询轮换引擎的路由器
pub mod bing;
pub mod duckduckgo;
pub mod factory;
pub mod generic;
pub mod html_engine;
pub mod search_engine_router;

pub use factory::SearchEngineFactory;
pub use search_engine_router::SearchEngineRouter;
