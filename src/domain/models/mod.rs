// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域模型模块
///
/// 查询、候选URL、页面元数据、价格、产品记录与运行摘要
pub mod page_metadata;
pub mod price;
pub mod product_record;
pub mod query;
pub mod run_summary;
