// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 搜索领域模块
///
/// 定义搜索相关的领域模型和核心业务逻辑
/// 包含搜索引擎接口和搜索结果的领域表示
pub mod engine;
