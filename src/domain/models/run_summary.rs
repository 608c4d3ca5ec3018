// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};

/// 运行状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunState {
    Idle,
    Running,
    Completed,
    Aborted,
}

/// 失败发生的阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureStage {
    Search,
    Fetch,
}

/// 单个失败记录
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FailureRecord {
    pub stage: FailureStage,
    /// 失败的URL或查询
    pub target: String,
    pub reason: String,
}

/// 运行摘要
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    /// 已执行的查询数
    pub queries: usize,
    /// 搜索得到的候选URL数
    pub discovered: usize,
    /// 通过白名单的URL数
    pub allowed: usize,
    /// 被白名单拒绝的URL数
    pub rejected: usize,
    /// 发起的抓取次数
    pub fetched: usize,
    /// 满足输出条件的候选记录数
    pub extracted: usize,
    /// 页面缺少标题或价格/图片而被跳过的数量
    pub incomplete: usize,
    /// 去重移除的记录数
    pub deduplicated: usize,
    /// 最终输出的记录数
    pub emitted: usize,
    pub failures: Vec<FailureRecord>,
}

impl RunSummary {
    pub fn record_failure(&mut self, stage: FailureStage, target: impl Into<String>, reason: impl Into<String>) {
        self.failures.push(FailureRecord {
            stage,
            target: target.into(),
            reason: reason.into(),
        });
    }

    pub fn transient_failures(&self) -> usize {
        self.failures
            .iter()
            .filter(|f| f.stage == FailureStage::Fetch)
            .count()
    }
}
