// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use prodscout::config::settings::{EngineKind, EngineSettings, Settings};
use prodscout::domain::services::politeness::DelayRange;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// 商品详情页
pub fn product_page(title: &str, price: &str) -> String {
    format!(
        r#"<!doctype html>
<html>
  <head>
    <title>{title} | Loja</title>
    <meta property="og:title" content="{title}">
    <meta property="og:image" content="/img/produto.jpg">
    <meta property="og:description" content="Oferta {title}">
    <meta property="product:price:amount" content="{price}">
    <meta property="product:price:currency" content="BRL">
  </head>
  <body><h1>{title}</h1><span class="preco">R$ {price}</span></body>
</html>"#
    )
}

/// 通用结果页，每个链接一个 h2 标题
pub fn results_page(links: &[String]) -> String {
    let items: String = links
        .iter()
        .enumerate()
        .map(|(i, href)| format!(r#"<li><h2><a href="{}">Resultado {}</a></h2></li>"#, href, i))
        .collect();
    format!(
        r#"<html><body><a href="/preferences">Preferências</a><ol>{}</ol></body></html>"#,
        items
    )
}

/// 在搜索服务器上挂载结果页
pub async fn mount_results(server: &MockServer, links: &[String]) {
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_string(results_page(links)))
        .mount(server)
        .await;
}

/// 指向模拟搜索服务器、无延迟的运行配置
pub fn run_settings(search: &MockServer, queries: &[&str]) -> Settings {
    let mut settings = Settings::default();
    settings.discovery.queries = queries.iter().map(|q| q.to_string()).collect();
    settings.discovery.seed = Some(42);
    settings.allowlist.domains = vec!["127.0.0.1".to_string()];
    settings.fetch.timeout_ms = 1_000;
    settings.politeness.fetch_delay_ms = DelayRange::ZERO;
    settings.politeness.query_delay_ms = DelayRange::ZERO;
    settings.politeness.per_host_interval_ms = 0;
    settings.search.engines = vec![EngineSettings {
        kind: EngineKind::Generic,
        endpoint: Some(format!("{}/search?q={{q}}", search.uri())),
        name: Some("mock".to_string()),
    }];
    settings
}
