// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use governor::{DefaultKeyedRateLimiter, Quota, RateLimiter};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// 随机延迟区间（毫秒，闭区间）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DelayRange {
    pub min_ms: u64,
    pub max_ms: u64,
}

impl DelayRange {
    pub const ZERO: Self = Self::new(0, 0);

    pub const fn new(min_ms: u64, max_ms: u64) -> Self {
        Self { min_ms, max_ms }
    }

    pub fn is_valid(&self) -> bool {
        self.min_ms <= self.max_ms
    }

    /// 在区间内均匀采样
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Duration {
        if self.max_ms <= self.min_ms {
            return Duration::from_millis(self.min_ms);
        }
        Duration::from_millis(rng.random_range(self.min_ms..=self.max_ms))
    }
}

/// 礼貌抓取策略：抓取后短延迟，查询之间长延迟
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PolitenessPolicy {
    pub fetch_delay: DelayRange,
    pub query_delay: DelayRange,
}

impl PolitenessPolicy {
    pub fn new(fetch_delay: DelayRange, query_delay: DelayRange) -> Self {
        Self {
            fetch_delay,
            query_delay,
        }
    }

    pub fn after_fetch<R: Rng + ?Sized>(&self, rng: &mut R) -> Duration {
        self.fetch_delay.sample(rng)
    }

    pub fn between_queries<R: Rng + ?Sized>(&self, rng: &mut R) -> Duration {
        self.query_delay.sample(rng)
    }
}

impl Default for PolitenessPolicy {
    fn default() -> Self {
        Self::new(DelayRange::new(1000, 2200), DelayRange::new(2000, 4000))
    }
}

/// 按主机的最小请求间隔
///
/// 每个主机一个令牌桶，容量为 1，补充周期为最小间隔
pub struct HostGate {
    limiter: Option<DefaultKeyedRateLimiter<String>>,
}

impl HostGate {
    /// 间隔为零时不做限制
    pub fn new(min_interval: Duration) -> Self {
        Self {
            limiter: Quota::with_period(min_interval).map(RateLimiter::keyed),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.limiter.is_some()
    }

    /// 等待直到该主机可以再次请求
    pub async fn wait(&self, host: &str) {
        if let Some(limiter) = &self.limiter {
            limiter.until_key_ready(&host.to_ascii_lowercase()).await;
        }
    }
}

impl std::fmt::Debug for HostGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HostGate")
            .field("enabled", &self.is_enabled())
            .finish()
    }
}

/// 可取消的休眠，被取消时返回 false
pub async fn pause(duration: Duration, cancel: &CancellationToken) -> bool {
    if duration.is_zero() {
        return !cancel.is_cancelled();
    }
    tokio::select! {
        _ = cancel.cancelled() => false,
        _ = tokio::time::sleep(duration) => true,
    }
}
