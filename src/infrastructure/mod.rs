// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 基础设施层模块
///
/// 该模块包含系统的技术实现细节。
///
/// 包含的子模块：
/// - 目录（catalog）：WooCommerce REST 目录仓库
/// - 搜索（search）：基于结果页抓取的搜索引擎和路由器
///
/// 基础设施层依赖于领域层的抽象接口。
pub mod catalog;
pub mod search;
