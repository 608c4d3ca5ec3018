// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::config::settings::Rotation;
use crate::domain::search::engine::SearchEngine;
use rand::Rng;
use std::sync::Arc;

/// 搜索引擎路由器
///
/// 按轮询或随机方式为每个查询选择一个引擎。轮询由查询序号决定，
/// 因此路由器本身不持有可变状态
#[derive(Clone)]
pub struct SearchEngineRouter {
    /// 搜索引擎列表
    engines: Vec<Arc<dyn SearchEngine>>,
    /// 轮换方式
    rotation: Rotation,
}

impl SearchEngineRouter {
    /// 创建新的搜索引擎路由器
    pub fn new(engines: Vec<Arc<dyn SearchEngine>>, rotation: Rotation) -> Self {
        Self { engines, rotation }
    }

    pub fn is_empty(&self) -> bool {
        self.engines.is_empty()
    }

    /// 为第 `query_index` 个查询选择引擎
    pub fn select<R: Rng + ?Sized>(&self, query_index: usize, rng: &mut R) -> Option<Arc<dyn SearchEngine>> {
        if self.engines.is_empty() {
            return None;
        }
        let index = match self.rotation {
            Rotation::RoundRobin => query_index % self.engines.len(),
            Rotation::Random => rng.random_range(0..self.engines.len()),
        };
        self.engines.get(index).cloned()
    }

    /// 所有引擎名称
    pub fn engine_names(&self) -> Vec<String> {
        self.engines.iter().map(|e| e.name().to_string()).collect()
    }
}

impl std::fmt::Debug for SearchEngineRouter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchEngineRouter")
            .field("engines", &self.engine_names())
            .field("rotation", &self.rotation)
            .finish()
    }
}
