// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::config::settings::RecordSettings;
use crate::domain::models::page_metadata::PageMetadata;
use crate::domain::models::product_record::{FingerprintId, ProductRecord};
use crate::domain::models::query::Query;
use crate::domain::services::fingerprint::FingerprintScheme;
use crate::domain::services::price_parser::PriceParser;
use crate::utils::text::slugify;
use crate::utils::url_utils::merchant_domain;
use chrono::{DateTime, Utc};
use url::Url;

/// slug 最大长度
pub const SLUG_MAX_LEN: usize = 80;
/// SKU 中使用的指纹位数
const SKU_FINGERPRINT_LEN: usize = 12;

/// 记录工厂
///
/// 把页面元数据组装成产品记录，并应用指纹方案、分类和联盟参数
#[derive(Debug, Clone)]
pub struct RecordFactory {
    scheme: FingerprintScheme,
    price_parser: PriceParser,
    categories: Vec<String>,
    affiliate_query: Option<String>,
}

impl RecordFactory {
    pub fn new(scheme: FingerprintScheme, settings: &RecordSettings) -> Self {
        Self {
            scheme,
            price_parser: PriceParser::new(settings.default_currency),
            categories: settings.categories.clone(),
            affiliate_query: settings.affiliate_query.clone(),
        }
    }

    /// 组装记录；不满足输出条件时返回 None
    pub fn build(
        &self,
        query: &Query,
        page_url: &Url,
        metadata: PageMetadata,
        discovered_at: DateTime<Utc>,
    ) -> Option<ProductRecord> {
        if !metadata.is_emittable() {
            return None;
        }
        let title = metadata.title?;
        let merchant = merchant_domain(page_url);
        let label = merchant_label(&merchant);

        let price = metadata
            .price_text
            .as_deref()
            .map(|raw| self.price_parser.parse(raw, metadata.price_currency.as_deref()));

        let mut tags = vec![query.as_str().to_string()];
        if !label.is_empty() && !tags.contains(&label) {
            tags.push(label.clone());
        }

        let mut record = ProductRecord {
            fingerprint: FingerprintId::from_digest(String::new()),
            sku: String::new(),
            url: self.target_url(page_url),
            merchant_domain: merchant,
            slug: slugify(&title, SLUG_MAX_LEN),
            title,
            image: metadata.image,
            price_text: None,
            price: None,
            price_parsed: false,
            currency: None,
            description: metadata.description,
            brand: metadata.brand,
            query: query.as_str().to_string(),
            discovered_at,
            categories: self.categories.clone(),
            tags,
        };
        record.set_price(price);
        record.fingerprint = self.scheme.fingerprint(&record);
        record.sku = sku(&label, &record.fingerprint);
        Some(record)
    }

    /// 最终页面地址，附加联盟参数（同名参数被替换）
    pub fn target_url(&self, page_url: &Url) -> String {
        let Some(affiliate) = self.affiliate_query.as_deref() else {
            return page_url.to_string();
        };
        let extra: Vec<(String, String)> = url::form_urlencoded::parse(affiliate.as_bytes())
            .into_owned()
            .collect();
        if extra.is_empty() {
            return page_url.to_string();
        }

        let kept: Vec<(String, String)> = page_url
            .query_pairs()
            .into_owned()
            .filter(|(key, _)| extra.iter().all(|(k, _)| k != key))
            .collect();

        let mut url = page_url.clone();
        url.query_pairs_mut()
            .clear()
            .extend_pairs(kept.iter().chain(extra.iter()));
        url.to_string()
    }
}

/// 商户域名第一段（小写）
fn merchant_label(domain: &str) -> String {
    domain.split('.').next().unwrap_or_default().to_lowercase()
}

/// `AFF-{商户}-{指纹前 12 位}`
fn sku(label: &str, fingerprint: &FingerprintId) -> String {
    let merchant = if label.is_empty() { "AFF".to_string() } else { label.to_uppercase() };
    let digest: String = fingerprint
        .as_str()
        .chars()
        .take(SKU_FINGERPRINT_LEN)
        .collect::<String>()
        .to_uppercase();
    format!("AFF-{}-{}", merchant, digest)
}
