// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::page_metadata::PageMetadata;
use crate::utils::text::non_empty;
use crate::utils::url_utils::{parse_http_url, resolve_url};
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{Html, Node, Selector};
use serde::Deserialize;
use url::Url;

/// Elements whose text never counts as visible page text.
const HIDDEN_ELEMENTS: &[&str] = &["script", "style", "noscript", "template", "head"];

const TITLE_META: &[&str] = &[r#"meta[property="og:title"]"#, r#"meta[name="og:title"]"#];
const IMAGE_META: &[&str] = &[r#"meta[property="og:image"]"#, r#"meta[name="og:image"]"#];
const STRUCTURED_DESCRIPTION_META: &[&str] = &[
    r#"meta[property="og:description"]"#,
    r#"meta[name="og:description"]"#,
];
const DESCRIPTION_META: &[&str] = &[r#"meta[name="description"]"#];
const PRICE_META: &[&str] = &[
    r#"meta[itemprop="price"]"#,
    r#"meta[property="product:price:amount"]"#,
    r#"meta[property="og:price:amount"]"#,
];
const CURRENCY_META: &[&str] = &[
    r#"meta[itemprop="priceCurrency"]"#,
    r#"meta[property="product:price:currency"]"#,
    r#"meta[property="og:price:currency"]"#,
];
const BRAND_META: &[&str] = &[
    r#"meta[property="product:brand"]"#,
    r#"meta[itemprop="brand"]"#,
    r#"meta[property="og:brand"]"#,
];

static MULTI_CURRENCY_RX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(?:R\$|US\$|€|£)\s?(?:\d{1,3}(?:[.,]\d{3})+|\d+)(?:[.,]\d{2})?").unwrap()
});
static BRL_RX: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)R\$\s*\d{1,3}(?:\.\d{3})*(?:,\d{2})?").unwrap());

/// Built-in money patterns selectable from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoneyPatternKind {
    #[default]
    MultiCurrency,
    Brl,
}

/// Currency-aware money pattern used to find a price in visible text.
///
/// Swappable per locale: the extractor only relies on `find`.
#[derive(Debug, Clone)]
pub struct MoneyPattern {
    name: &'static str,
    regex: Regex,
}

impl MoneyPattern {
    /// `R$`, `US$`, `€` and `£` prefixes with `.`/`,` as separators.
    pub fn multi_currency() -> Self {
        Self {
            name: "multi_currency",
            regex: MULTI_CURRENCY_RX.clone(),
        }
    }

    /// Brazilian real only, `1.234,56` grouping.
    pub fn brazilian_real() -> Self {
        Self {
            name: "brl",
            regex: BRL_RX.clone(),
        }
    }

    pub fn custom(name: &'static str, pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            name,
            regex: Regex::new(pattern)?,
        })
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// First match in `text`.
    pub fn find<'a>(&self, text: &'a str) -> Option<&'a str> {
        self.regex.find(text).map(|m| m.as_str())
    }
}

impl From<MoneyPatternKind> for MoneyPattern {
    fn from(kind: MoneyPatternKind) -> Self {
        match kind {
            MoneyPatternKind::MultiCurrency => Self::multi_currency(),
            MoneyPatternKind::Brl => Self::brazilian_real(),
        }
    }
}

impl Default for MoneyPattern {
    fn default() -> Self {
        Self::multi_currency()
    }
}

/// Extracts product metadata from raw HTML.
///
/// Malformed markup never fails: html5ever recovers what it can and the
/// extractor returns whatever fields it found.
#[derive(Debug, Clone, Default)]
pub struct MetadataExtractor {
    money: MoneyPattern,
}

impl MetadataExtractor {
    pub fn new(money: MoneyPattern) -> Self {
        Self { money }
    }

    pub fn money_pattern(&self) -> &MoneyPattern {
        &self.money
    }

    /// Parse `html` into optional title, image, description and price fields.
    ///
    /// `page_url` resolves relative image links; without it only absolute
    /// image URLs are kept.
    pub fn extract(&self, html: &str, page_url: Option<&Url>) -> PageMetadata {
        let document = Html::parse_document(html);

        let title = first_meta_content(&document, TITLE_META)
            .or_else(|| first_text(&document, "title"))
            .or_else(|| first_text(&document, "h1"))
            .or_else(|| first_text(&document, "h2"));

        let image = first_meta_content(&document, IMAGE_META)
            .and_then(|src| absolutize(&src, page_url));

        let description = first_meta_content(&document, STRUCTURED_DESCRIPTION_META)
            .or_else(|| first_meta_content(&document, DESCRIPTION_META));

        let price_text = first_meta_content(&document, PRICE_META).or_else(|| {
            let text = visible_text(&document);
            self.money.find(&text).and_then(non_empty)
        });

        PageMetadata {
            title,
            image,
            description,
            price_text,
            price_currency: first_meta_content(&document, CURRENCY_META),
            brand: first_meta_content(&document, BRAND_META),
        }
    }
}

fn first_meta_content(document: &Html, selectors: &[&str]) -> Option<String> {
    selectors.iter().find_map(|raw| {
        let selector = Selector::parse(raw).ok()?;
        document
            .select(&selector)
            .filter_map(|el| el.value().attr("content"))
            // CMS templates often double-escape meta attributes
            .find_map(|content| non_empty(&html_escape::decode_html_entities(content)))
    })
}

fn first_text(document: &Html, tag: &str) -> Option<String> {
    let selector = Selector::parse(tag).ok()?;
    document
        .select(&selector)
        .map(|el| el.text().collect::<String>())
        .find_map(|text| non_empty(&text))
}

fn absolutize(src: &str, page_url: Option<&Url>) -> Option<String> {
    if let Some(url) = parse_http_url(src) {
        return Some(url.to_string());
    }
    let base = page_url?;
    resolve_url(base, src.trim())
        .ok()
        .filter(|u| matches!(u.scheme(), "http" | "https"))
        .map(|u| u.to_string())
}

/// Text nodes outside script, style and head, joined by single spaces.
fn visible_text(document: &Html) -> String {
    let mut out = String::new();
    for node in document.tree.root().descendants() {
        let Node::Text(text) = node.value() else {
            continue;
        };
        let hidden = node.ancestors().any(|ancestor| match ancestor.value() {
            Node::Element(el) => HIDDEN_ELEMENTS.contains(&el.name()),
            _ => false,
        });
        if hidden {
            continue;
        }
        let chunk = text.trim();
        if !chunk.is_empty() {
            if !out.is_empty() {
                out.push(' ');
            }
            out.push_str(chunk);
        }
    }
    out
}
