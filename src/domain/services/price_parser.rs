// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

//! Price normalization.
//!
//! Locale heuristic: when both `.` and `,` appear, `.` groups thousands and
//! `,` is the decimal mark. A lone `,` is decimal, a lone `.` is decimal, and
//! several `.` without a `,` are thousands separators. `"US$ 1,234.56"` is
//! therefore read as 1.23456; the parser is not general-purpose.

use crate::domain::models::price::{Currency, Price};
use once_cell::sync::Lazy;
use regex::Regex;

static NUMBER_RX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d[\d.,]*").unwrap());

/// 价格解析器
#[derive(Debug, Clone, Copy, Default)]
pub struct PriceParser {
    default_currency: Currency,
}

impl PriceParser {
    pub fn new(default_currency: Currency) -> Self {
        Self { default_currency }
    }

    /// 解析价格文本
    ///
    /// `currency_hint` 为结构化标记中的货币代码（如 `BRL`），文本中的符号优先
    pub fn parse(&self, raw: &str, currency_hint: Option<&str>) -> Price {
        let currency = Currency::from_symbol(raw)
            .or_else(|| currency_hint.and_then(Currency::from_code))
            .or_else(|| detect_code(raw))
            .unwrap_or(self.default_currency);

        match parse_amount(raw) {
            Some(amount) => Price {
                amount,
                currency,
                raw: raw.to_string(),
                parsed: true,
            },
            None => Price::unparsed(raw, currency),
        }
    }
}

/// 使用默认货币（BRL）解析
pub fn parse_price(raw: &str) -> Price {
    PriceParser::default().parse(raw, None)
}

fn detect_code(raw: &str) -> Option<Currency> {
    raw.split(|c: char| !c.is_ascii_alphabetic())
        .find_map(Currency::from_code)
}

fn parse_amount(raw: &str) -> Option<f64> {
    let compact: String = raw
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '\u{a0}')
        .collect();

    let number = NUMBER_RX.find(&compact)?.as_str();
    let number = number.trim_end_matches(['.', ',']);
    if number.is_empty() {
        return None;
    }

    let has_dot = number.contains('.');
    let commas = number.matches(',').count();
    let dots = number.matches('.').count();

    let normalized = if has_dot && commas > 0 {
        number.replace('.', "").replace(',', ".")
    } else if commas == 1 {
        number.replace(',', ".")
    } else if commas > 1 || dots > 1 {
        number.replace([',', '.'], "")
    } else {
        number.to_string()
    };

    normalized.parse::<f64>().ok().filter(|v| v.is_finite())
}
