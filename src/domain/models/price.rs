// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};
use std::fmt;

/// 货币
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    /// 巴西雷亚尔
    #[default]
    Brl,
    /// 美元
    Usd,
    /// 欧元
    Eur,
    /// 英镑
    Gbp,
}

impl Currency {
    /// ISO 4217 代码
    pub fn code(&self) -> &'static str {
        match self {
            Self::Brl => "BRL",
            Self::Usd => "USD",
            Self::Eur => "EUR",
            Self::Gbp => "GBP",
        }
    }

    /// 从 ISO 代码解析（不区分大小写）
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_ascii_uppercase().as_str() {
            "BRL" => Some(Self::Brl),
            "USD" => Some(Self::Usd),
            "EUR" => Some(Self::Eur),
            "GBP" => Some(Self::Gbp),
            _ => None,
        }
    }

    /// 从价格文本中的货币符号识别
    pub fn from_symbol(text: &str) -> Option<Self> {
        if text.contains("R$") {
            Some(Self::Brl)
        } else if text.contains("US$") {
            Some(Self::Usd)
        } else if text.contains('€') {
            Some(Self::Eur)
        } else if text.contains('£') {
            Some(Self::Gbp)
        } else if text.contains('$') {
            Some(Self::Usd)
        } else {
            None
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// 解析后的价格
///
/// 无法解析时 `amount` 为 0，`parsed` 为 false，原始文本保留用于审计
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Price {
    pub amount: f64,
    pub currency: Currency,
    pub raw: String,
    pub parsed: bool,
}

impl Price {
    pub fn unparsed(raw: impl Into<String>, currency: Currency) -> Self {
        Self {
            amount: 0.0,
            currency,
            raw: raw.into(),
            parsed: false,
        }
    }
}
