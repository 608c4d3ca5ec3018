// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::product_record::{FingerprintId, ProductRecord};
use crate::utils::text::canonical_token;
use crate::utils::url_utils::{parse_http_url, strip_fragment};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::fmt;

/// 指纹方案
///
/// 两种方案互不兼容，一次运行只使用其中一种
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FingerprintScheme {
    /// 规范化URL的哈希，用于抓取阶段去重
    #[default]
    UrlHash,
    /// 品牌|标题|商户 的哈希，用于入库阶段去重
    BrandTitleMerchant,
}

impl FingerprintScheme {
    /// 参与哈希的规范化键
    pub fn canonical_key(&self, record: &ProductRecord) -> String {
        match self {
            Self::UrlHash => canonical_url(&record.url),
            Self::BrandTitleMerchant => {
                let merchant = canonical_token(&record.merchant_domain);
                let merchant = merchant.strip_prefix("www.").unwrap_or(&merchant);
                format!(
                    "{}|{}|{}",
                    canonical_token(record.brand.as_deref().unwrap_or_default()),
                    canonical_token(&record.title),
                    merchant
                )
            }
        }
    }

    pub fn fingerprint(&self, record: &ProductRecord) -> FingerprintId {
        let digest = Sha256::digest(self.canonical_key(record).as_bytes());
        FingerprintId::from_digest(hex::encode(digest))
    }
}

impl fmt::Display for FingerprintScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UrlHash => f.write_str("url_hash"),
            Self::BrandTitleMerchant => f.write_str("brand_title_merchant"),
        }
    }
}

/// Computes the identity of `record` under `scheme`.
pub fn fingerprint(scheme: FingerprintScheme, record: &ProductRecord) -> FingerprintId {
    scheme.fingerprint(record)
}

fn canonical_url(raw: &str) -> String {
    // Url already lower-cases the host
    match parse_http_url(raw) {
        Some(mut url) => {
            url.set_fragment(None);
            url.to_string()
        }
        None => strip_fragment(raw.trim()),
    }
}

/// 按指纹去重
///
/// 每组保留价格最低的记录（无价格视为正无穷，价格相同保留先出现者），
/// 输出顺序为各组首次出现的顺序。对已去重的结果再次调用不会改变结果。
pub fn dedup(records: Vec<ProductRecord>) -> Vec<ProductRecord> {
    let mut slots: HashMap<FingerprintId, usize> = HashMap::with_capacity(records.len());
    let mut kept: Vec<ProductRecord> = Vec::with_capacity(records.len());

    for record in records {
        match slots.get(&record.fingerprint) {
            Some(&index) => {
                if record.price_key() < kept[index].price_key() {
                    kept[index] = record;
                }
            }
            None => {
                slots.insert(record.fingerprint.clone(), kept.len());
                kept.push(record);
            }
        }
    }

    kept
}
