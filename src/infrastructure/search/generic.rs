// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::infrastructure::search::html_engine::ResultSelectors;

/// Any HTML result page reachable through an endpoint template.
///
/// Only heading anchors are tried before the `a[href]` fallback.
#[derive(Debug, Clone, Copy, Default)]
pub struct GenericSelectors;

impl ResultSelectors for GenericSelectors {
    fn engine(&self) -> &'static str {
        "generic"
    }

    fn default_endpoint(&self) -> &'static str {
        ""
    }

    fn primary_selectors(&self) -> &'static [&'static str] {
        &["h2 a", "h3 a"]
    }
}
