// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};

/// 从页面中提取的元数据，所有字段均可缺失
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageMetadata {
    pub title: Option<String>,
    pub image: Option<String>,
    pub description: Option<String>,
    pub price_text: Option<String>,
    /// 结构化价格标记中的货币代码
    pub price_currency: Option<String>,
    pub brand: Option<String>,
}

impl PageMetadata {
    /// 是否满足输出条件：标题非空，且价格或图片至少存在一个
    pub fn is_emittable(&self) -> bool {
        let has_title = self.title.as_deref().is_some_and(|t| !t.trim().is_empty());
        has_title && (self.price_text.is_some() || self.image.is_some())
    }
}
