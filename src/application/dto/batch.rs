// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::product_record::ProductRecord;
use serde::{Deserialize, Serialize};

/// 输出批次 `{count, items}`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OutputBatch {
    pub count: usize,
    pub items: Vec<ProductRecord>,
}

impl OutputBatch {
    pub fn new(items: Vec<ProductRecord>) -> Self {
        Self {
            count: items.len(),
            items,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

impl From<Vec<ProductRecord>> for OutputBatch {
    fn from(items: Vec<ProductRecord>) -> Self {
        Self::new(items)
    }
}
