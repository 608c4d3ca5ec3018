// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::helpers::{mount_results, product_page, run_settings};
use prodscout::application::use_cases::discovery_run::DiscoveryRun;
use prodscout::application::use_cases::publish_batch::CatalogPublisher;
use prodscout::config::settings::CatalogSettings;
use prodscout::infrastructure::catalog::WooCommerceCatalog;
use serde_json::json;
use std::sync::Arc;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_discovered_batch_is_published_despite_rejection() {
    let search = MockServer::start().await;
    let merchant = MockServer::start().await;
    let store = MockServer::start().await;

    mount_results(
        &search,
        &[
            format!("{}/p/monitor", merchant.uri()),
            format!("{}/p/teclado", merchant.uri()),
        ],
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/p/monitor"))
        .respond_with(ResponseTemplate::new(200).set_body_string(product_page("Monitor 27", "1.299,00")))
        .mount(&merchant)
        .await;
    Mock::given(method("GET"))
        .and(path("/p/teclado"))
        .respond_with(ResponseTemplate::new(200).set_body_string(product_page("Teclado Mecânico", "349,90")))
        .mount(&merchant)
        .await;

    Mock::given(method("GET"))
        .and(path("/wp-json/wc/v3/products/categories"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{ "id": 5, "name": "Afiliados" }])))
        .expect(1)
        .mount(&store)
        .await;
    Mock::given(method("GET"))
        .and(path("/wp-json/wc/v3/products"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&store)
        .await;
    Mock::given(method("POST"))
        .and(path("/wp-json/wc/v3/products"))
        .and(body_partial_json(json!({ "name": "Teclado Mecânico" })))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({ "code": "woocommerce_rest_invalid_image" })))
        .mount(&store)
        .await;
    Mock::given(method("POST"))
        .and(path("/wp-json/wc/v3/products"))
        .and(body_partial_json(json!({
            "name": "Monitor 27",
            "type": "external",
            "regular_price": "1299.00",
            "categories": [{ "id": 5 }],
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "id": 77 })))
        .expect(1)
        .mount(&store)
        .await;

    let report = DiscoveryRun::from_settings(run_settings(&search, &["periféricos"]))
        .unwrap()
        .run()
        .await
        .unwrap();
    assert_eq!(report.batch.count, 2);

    let catalog_settings = CatalogSettings {
        base_url: store.uri(),
        consumer_key: "ck_live".to_string(),
        consumer_secret: "cs_live".to_string(),
        button_text: None,
        timeout_ms: 5_000,
    };
    let catalog = Arc::new(WooCommerceCatalog::new(&catalog_settings).unwrap());
    let published = CatalogPublisher::new(catalog, None)
        .publish_batch(&report.batch)
        .await;

    assert_eq!(published.created, 1);
    assert_eq!(published.updated, 0);
    assert_eq!(published.rejections.len(), 1);
    assert!(published.rejections[0].error.contains("woocommerce_rest_invalid_image"));

    let requests = store.received_requests().await.unwrap();
    assert!(requests
        .iter()
        .all(|r| r.url.query().unwrap_or_default().contains("consumer_key=ck_live")));
}
