// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 合并连续空白字符并去掉首尾空白
pub fn normalize_space(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// 非空文本归一化，结果为空时返回 None
pub fn non_empty(text: &str) -> Option<String> {
    let normalized = normalize_space(text);
    if normalized.is_empty() {
        None
    } else {
        Some(normalized)
    }
}

/// 生成 URL 友好的 slug
///
/// 先转写为 ASCII，再以连字符连接字母数字片段，最多 `max_len` 个字符
pub fn slugify(text: &str, max_len: usize) -> String {
    let ascii = deunicode::deunicode(text).to_lowercase();
    let joined = ascii
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("-");

    if joined.len() <= max_len {
        return joined;
    }
    joined[..max_len].trim_end_matches('-').to_string()
}

/// 指纹用的规范化：ASCII 转写、小写、合并空白
pub fn canonical_token(text: &str) -> String {
    normalize_space(&deunicode::deunicode(text).to_lowercase())
}
