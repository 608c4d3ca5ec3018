// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::product_record::ProductRecord;
use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

/// 短描述最多保留的字符数
const SHORT_DESCRIPTION_CHARS: usize = 160;

/// 目录仓库错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CatalogError {
    /// 目录服务返回非 2xx
    #[error("catalog rejected request with status {status}: {body}")]
    Rejected { status: u16, body: String },
    /// 网络错误
    #[error("catalog transport error: {0}")]
    Transport(String),
    /// 响应无法解析
    #[error("invalid catalog response: {0}")]
    InvalidResponse(String),
}

/// 写入目录的外部商品
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogProduct {
    pub name: String,
    pub sku: String,
    /// 外部商品链接
    pub external_url: String,
    pub button_text: String,
    pub images: Vec<String>,
    pub categories: Vec<String>,
    pub tags: Vec<String>,
    pub description: String,
    pub short_description: String,
    pub regular_price: Option<f64>,
    pub merchant_domain: String,
}

impl CatalogProduct {
    /// 由产品记录构造外部商品
    ///
    /// 未配置按钮文字时使用 `Comprar na {商户}`；缺少描述时生成默认描述
    pub fn from_record(record: &ProductRecord, button_text: Option<&str>) -> Self {
        let merchant = merchant_label(&record.merchant_domain);
        let button_text = match button_text {
            Some(text) if !text.trim().is_empty() => text.trim().to_string(),
            _ => format!("Comprar na {}", merchant),
        };

        let description = match record.description.as_deref().map(str::trim) {
            Some(text) if !text.is_empty() => text.to_string(),
            _ => format!(
                "<p>{}: oferta de parceiro. Clique em Comprar para ver detalhes na loja parceira.</p>",
                html_escape::encode_text(&record.title)
            ),
        };
        let short_description = match record.description.as_deref().map(str::trim) {
            Some(text) if !text.is_empty() => truncate_chars(text, SHORT_DESCRIPTION_CHARS),
            _ => format!(
                "{}: produto afiliado. Compare o preço e compre com segurança.",
                record.title
            ),
        };

        Self {
            name: record.title.clone(),
            sku: record.sku.clone(),
            external_url: record.url.clone(),
            button_text,
            images: record.image.iter().cloned().collect(),
            categories: record.categories.clone(),
            tags: record.tags.clone(),
            description,
            short_description,
            regular_price: record.price.filter(|p| *p > 0.0),
            merchant_domain: record.merchant_domain.clone(),
        }
    }
}

/// 商户域名第一段，首字母大写
fn merchant_label(domain: &str) -> String {
    let first = domain.split('.').next().unwrap_or_default();
    let mut chars = first.chars();
    match chars.next() {
        Some(c) => c.to_uppercase().chain(chars).collect(),
        None => "loja".to_string(),
    }
}

fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((cut, _)) => format!("{}…", text[..cut].trim_end()),
        None => text.to_string(),
    }
}

/// 写入结果
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UpsertOutcome {
    Created,
    Updated,
}

/// 目录仓库特质
///
/// 按 SKU 幂等写入外部商品
#[async_trait]
pub trait CatalogRepository: Send + Sync {
    /// 存在同 SKU 商品时更新，否则创建
    async fn upsert(&self, product: &CatalogProduct) -> Result<UpsertOutcome, CatalogError>;
}
