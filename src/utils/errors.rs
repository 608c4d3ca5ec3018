// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use thiserror::Error;

/// 配置错误类型
///
/// 在任何网络请求之前返回，属于致命错误
#[derive(Error, Debug)]
pub enum ConfigurationError {
    #[error("缺少必需配置: {0}")]
    Missing(&'static str),

    #[error("无效配置 {field}: {reason}")]
    Invalid { field: String, reason: String },

    #[error("配置加载失败: {0}")]
    Load(#[from] config::ConfigError),
}

impl ConfigurationError {
    pub fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Invalid {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// 运行错误类型
#[derive(Error, Debug)]
pub enum RunError {
    #[error("配置错误: {0}")]
    Configuration(#[from] ConfigurationError),

    #[error("运行已启动，不能重复执行")]
    AlreadyStarted,

    #[error("HTTP客户端初始化失败: {0}")]
    Client(String),
}
