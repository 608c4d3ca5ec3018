// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域层模块
///
/// 该模块包含系统的核心业务逻辑，包括：
/// - 领域模型（models）：查询、页面元数据、产品记录和运行摘要
/// - 仓库接口（repositories）：目录写入的抽象接口
/// - 搜索（search）：搜索引擎接口
/// - 服务（services）：白名单、提取、价格解析、指纹和礼貌延迟
///
/// 领域层不依赖于任何外部实现。
pub mod models;
pub mod repositories;
pub mod search;
pub mod services;
