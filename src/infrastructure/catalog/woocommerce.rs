// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::config::settings::CatalogSettings;
use crate::domain::repositories::catalog_repository::{
    CatalogError, CatalogProduct, CatalogRepository, UpsertOutcome,
};
use async_trait::async_trait;
use reqwest::Method;
use serde::Deserialize;
use serde_json::{json, Value};
use std::collections::HashMap;
use tokio::sync::Mutex;
use tracing::{debug, info};

const API_PREFIX: &str = "/wp-json/wc/v3";
/// 错误响应体最多保留的字符数
const MAX_ERROR_BODY: usize = 400;
const MERCHANT_META_KEY: &str = "_prodscout_merchant_domain";

#[derive(Debug, Deserialize)]
struct IdOnly {
    id: u64,
}

#[derive(Debug, Deserialize)]
struct NamedTerm {
    id: u64,
    name: String,
}

/// WooCommerce REST 目录仓库
///
/// 按 SKU 查询商品，存在则 `PUT` 更新，否则 `POST` 创建外部商品。
/// 分类按名称查找，不存在时创建，结果在实例内缓存
pub struct WooCommerceCatalog {
    client: reqwest::Client,
    api_base: String,
    consumer_key: String,
    consumer_secret: String,
    category_ids: Mutex<HashMap<String, u64>>,
}

impl WooCommerceCatalog {
    pub fn new(settings: &CatalogSettings) -> Result<Self, CatalogError> {
        let client = reqwest::Client::builder()
            .timeout(settings.timeout())
            .build()
            .map_err(|e| CatalogError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            api_base: format!("{}{}", settings.base_url.trim_end_matches('/'), API_PREFIX),
            consumer_key: settings.consumer_key.clone(),
            consumer_secret: settings.consumer_secret.clone(),
            category_ids: Mutex::new(HashMap::new()),
        })
    }

    async fn request(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, &str)],
        body: Option<&Value>,
    ) -> Result<Value, CatalogError> {
        let url = format!("{}{}", self.api_base, path);
        let mut builder = self
            .client
            .request(method.clone(), &url)
            .query(&[
                ("consumer_key", self.consumer_key.as_str()),
                ("consumer_secret", self.consumer_secret.as_str()),
            ])
            .query(query);
        if let Some(body) = body {
            builder = builder.json(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| CatalogError::Transport(e.to_string()))?;
        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| CatalogError::Transport(e.to_string()))?;
        debug!(%method, path, status = status.as_u16(), "catalog request");

        if !status.is_success() {
            return Err(CatalogError::Rejected {
                status: status.as_u16(),
                body: text.chars().take(MAX_ERROR_BODY).collect(),
            });
        }
        serde_json::from_str(&text).map_err(|e| CatalogError::InvalidResponse(e.to_string()))
    }

    async fn find_by_sku(&self, sku: &str) -> Result<Option<u64>, CatalogError> {
        let found = self
            .request(Method::GET, "/products", &[("sku", sku), ("per_page", "1")], None)
            .await?;
        let items: Vec<IdOnly> =
            serde_json::from_value(found).map_err(|e| CatalogError::InvalidResponse(e.to_string()))?;
        Ok(items.first().map(|item| item.id))
    }

    /// 按名称查找分类，不存在时创建
    pub async fn ensure_category(&self, name: &str) -> Result<u64, CatalogError> {
        let key = name.to_lowercase();
        if let Some(id) = self.category_ids.lock().await.get(&key) {
            return Ok(*id);
        }

        let found = self
            .request(
                Method::GET,
                "/products/categories",
                &[("search", name), ("per_page", "1")],
                None,
            )
            .await?;
        let terms: Vec<NamedTerm> =
            serde_json::from_value(found).map_err(|e| CatalogError::InvalidResponse(e.to_string()))?;

        let id = match terms.first() {
            Some(term) if term.name.to_lowercase() == key => term.id,
            _ => {
                let created = self
                    .request(
                        Method::POST,
                        "/products/categories",
                        &[],
                        Some(&json!({ "name": name })),
                    )
                    .await?;
                let created: IdOnly = serde_json::from_value(created)
                    .map_err(|e| CatalogError::InvalidResponse(e.to_string()))?;
                info!(category = name, id = created.id, "catalog category created");
                created.id
            }
        };

        self.category_ids.lock().await.insert(key, id);
        Ok(id)
    }

    async fn payload(&self, product: &CatalogProduct) -> Result<Value, CatalogError> {
        let mut categories = Vec::with_capacity(product.categories.len());
        for name in &product.categories {
            categories.push(json!({ "id": self.ensure_category(name).await? }));
        }

        Ok(json!({
            "name": product.name,
            "type": "external",
            "regular_price": product
                .regular_price
                .map(|p| format!("{:.2}", p))
                .unwrap_or_default(),
            "external_url": product.external_url,
            "button_text": product.button_text,
            "description": product.description,
            "short_description": product.short_description,
            "images": product.images.iter().map(|src| json!({ "src": src })).collect::<Vec<_>>(),
            "categories": categories,
            "tags": product.tags.iter().map(|name| json!({ "name": name })).collect::<Vec<_>>(),
            "catalog_visibility": "visible",
            "status": "publish",
            "meta_data": [
                { "key": MERCHANT_META_KEY, "value": product.merchant_domain },
            ],
        }))
    }
}

#[async_trait]
impl CatalogRepository for WooCommerceCatalog {
    async fn upsert(&self, product: &CatalogProduct) -> Result<UpsertOutcome, CatalogError> {
        let mut payload = self.payload(product).await?;

        match self.find_by_sku(&product.sku).await? {
            Some(id) => {
                self.request(Method::PUT, &format!("/products/{}", id), &[], Some(&payload))
                    .await?;
                Ok(UpsertOutcome::Updated)
            }
            None => {
                payload["sku"] = json!(product.sku);
                self.request(Method::POST, "/products", &[], Some(&payload))
                    .await?;
                Ok(UpsertOutcome::Created)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn settings(base_url: &str) -> CatalogSettings {
        CatalogSettings {
            base_url: format!("{}/", base_url),
            consumer_key: "ck_test".to_string(),
            consumer_secret: "cs_test".to_string(),
            button_text: None,
            timeout_ms: 5_000,
        }
    }

    fn product() -> CatalogProduct {
        CatalogProduct {
            name: "SSD NVMe 1TB".to_string(),
            sku: "AFF-KABUM-0123456789AB".to_string(),
            external_url: "https://www.kabum.com.br/produto/1".to_string(),
            button_text: "Comprar na Kabum".to_string(),
            images: vec!["https://img.example/1.jpg".to_string()],
            categories: vec!["Afiliados".to_string()],
            tags: vec!["ssd".to_string()],
            description: "desc".to_string(),
            short_description: "short".to_string(),
            regular_price: Some(499.9),
            merchant_domain: "kabum.com.br".to_string(),
        }
    }

    async fn mount_category(server: &MockServer) {
        Mock::given(method("GET"))
            .and(path("/wp-json/wc/v3/products/categories"))
            .and(query_param("search", "Afiliados"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{ "id": 7, "name": "afiliados" }])))
            .expect(1)
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_creates_missing_product() {
        let server = MockServer::start().await;
        mount_category(&server).await;
        Mock::given(method("GET"))
            .and(path("/wp-json/wc/v3/products"))
            .and(query_param("sku", "AFF-KABUM-0123456789AB"))
            .and(query_param("consumer_key", "ck_test"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/wp-json/wc/v3/products"))
            .and(body_partial_json(json!({
                "type": "external",
                "sku": "AFF-KABUM-0123456789AB",
                "regular_price": "499.90",
                "categories": [{ "id": 7 }],
                "tags": [{ "name": "ssd" }],
                "status": "publish",
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "id": 99 })))
            .expect(1)
            .mount(&server)
            .await;

        let catalog = WooCommerceCatalog::new(&settings(&server.uri())).unwrap();
        assert_eq!(catalog.upsert(&product()).await.unwrap(), UpsertOutcome::Created);
    }

    #[tokio::test]
    async fn test_updates_existing_product() {
        let server = MockServer::start().await;
        mount_category(&server).await;
        Mock::given(method("GET"))
            .and(path("/wp-json/wc/v3/products"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{ "id": 42 }])))
            .mount(&server)
            .await;
        Mock::given(method("PUT"))
            .and(path("/wp-json/wc/v3/products/42"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": 42 })))
            .expect(2)
            .mount(&server)
            .await;

        let catalog = WooCommerceCatalog::new(&settings(&server.uri())).unwrap();
        assert_eq!(catalog.upsert(&product()).await.unwrap(), UpsertOutcome::Updated);
        // second upsert reuses the cached category id
        assert_eq!(catalog.upsert(&product()).await.unwrap(), UpsertOutcome::Updated);
    }

    #[tokio::test]
    async fn test_unknown_category_is_created() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/wp-json/wc/v3/products/categories"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{ "id": 3, "name": "Afiliados Antigos" }])))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/wp-json/wc/v3/products/categories"))
            .and(body_partial_json(json!({ "name": "Afiliados" })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "id": 11, "name": "Afiliados" })))
            .expect(1)
            .mount(&server)
            .await;

        let catalog = WooCommerceCatalog::new(&settings(&server.uri())).unwrap();
        assert_eq!(catalog.ensure_category("Afiliados").await.unwrap(), 11);
    }

    #[tokio::test]
    async fn test_rejection_carries_status_and_body() {
        let server = MockServer::start().await;
        mount_category(&server).await;
        Mock::given(method("GET"))
            .and(path("/wp-json/wc/v3/products"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/wp-json/wc/v3/products"))
            .respond_with(ResponseTemplate::new(400).set_body_string("{\"code\":\"product_invalid_sku\"}"))
            .mount(&server)
            .await;

        let catalog = WooCommerceCatalog::new(&settings(&server.uri())).unwrap();
        match catalog.upsert(&product()).await {
            Err(CatalogError::Rejected { status, body }) => {
                assert_eq!(status, 400);
                assert!(body.contains("product_invalid_sku"));
            }
            other => panic!("expected rejection, got {:?}", other),
        }
    }
}
