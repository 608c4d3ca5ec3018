// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::application::dto::batch::OutputBatch;
use crate::domain::repositories::catalog_repository::{
    CatalogProduct, CatalogRepository, UpsertOutcome,
};
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, warn};

/// 单条记录的发布失败
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PublishRejection {
    pub sku: String,
    pub error: String,
}

/// 批次发布结果
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PublishReport {
    pub created: usize,
    pub updated: usize,
    pub rejections: Vec<PublishRejection>,
}

impl PublishReport {
    pub fn published(&self) -> usize {
        self.created + self.updated
    }
}

/// 目录发布用例
pub struct CatalogPublisher<R: CatalogRepository + ?Sized> {
    repository: Arc<R>,
    button_text: Option<String>,
}

impl<R: CatalogRepository + ?Sized> CatalogPublisher<R> {
    pub fn new(repository: Arc<R>, button_text: Option<String>) -> Self {
        Self {
            repository,
            button_text,
        }
    }

    /// 逐条写入批次，单条失败不会中断其余记录
    pub async fn publish_batch(&self, batch: &OutputBatch) -> PublishReport {
        let mut report = PublishReport::default();

        for record in &batch.items {
            let product = CatalogProduct::from_record(record, self.button_text.as_deref());
            match self.repository.upsert(&product).await {
                Ok(UpsertOutcome::Created) => report.created += 1,
                Ok(UpsertOutcome::Updated) => report.updated += 1,
                Err(e) => {
                    warn!(sku = %product.sku, error = %e, "catalog upsert failed");
                    report.rejections.push(PublishRejection {
                        sku: product.sku.clone(),
                        error: e.to_string(),
                    });
                }
            }
        }

        info!(
            created = report.created,
            updated = report.updated,
            rejected = report.rejections.len(),
            "catalog batch published"
        );
        report
    }
}
