// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::price::{Currency, Price};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// 产品指纹
///
/// 由记录的规范字段计算出的 SHA-256 十六进制摘要
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FingerprintId(String);

impl FingerprintId {
    pub fn from_digest(hex_digest: String) -> Self {
        Self(hex_digest)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FingerprintId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// 规范化后的产品记录
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRecord {
    pub fingerprint: FingerprintId,
    pub sku: String,
    /// 目标（联盟）链接
    pub url: String,
    pub merchant_domain: String,
    pub title: String,
    pub slug: String,
    pub image: Option<String>,
    pub price_text: Option<String>,
    pub price: Option<f64>,
    /// 价格文本是否被成功解析；为 false 时 `price` 为 0
    #[serde(default)]
    pub price_parsed: bool,
    pub currency: Option<Currency>,
    pub description: Option<String>,
    pub brand: Option<String>,
    pub query: String,
    pub discovered_at: DateTime<Utc>,
    pub categories: Vec<String>,
    pub tags: Vec<String>,
}

impl ProductRecord {
    /// 去重时使用的价格键，没有价格文本的记录排在最后
    pub fn price_key(&self) -> f64 {
        self.price.unwrap_or(f64::INFINITY)
    }

    pub fn set_price(&mut self, price: Option<Price>) {
        match price {
            Some(price) => {
                self.price = Some(price.amount);
                self.price_parsed = price.parsed;
                self.currency = Some(price.currency);
                self.price_text = Some(price.raw);
            }
            None => {
                self.price = None;
                self.price_parsed = false;
                self.currency = None;
                self.price_text = None;
            }
        }
    }
}
