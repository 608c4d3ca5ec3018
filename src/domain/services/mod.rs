// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域服务模块
///
/// 包含的服务：
/// - 白名单（allowlist）：判断URL是否允许抓取
/// - 指纹（fingerprint）：计算产品指纹并去重
/// - 元数据提取（metadata_extractor）：从HTML中提取标题、图片、描述和价格文本
/// - 礼貌策略（politeness）：随机延迟与按主机的请求间隔
/// - 价格解析（price_parser）：把价格文本规范化为数值和货币
/// - 记录组装（record_builder）：把页面元数据组装成产品记录
pub mod allowlist;
pub mod fingerprint;
pub mod metadata_extractor;
pub mod politeness;
pub mod price_parser;
pub mod record_builder;
