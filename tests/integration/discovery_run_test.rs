// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::helpers::{mount_results, product_page, run_settings};
use prodscout::application::use_cases::discovery_run::DiscoveryRun;
use prodscout::domain::models::price::Currency;
use prodscout::domain::models::run_summary::{FailureStage, RunState};
use prodscout::domain::services::politeness::DelayRange;
use prodscout::utils::errors::{ConfigurationError, RunError};
use std::time::{Duration, Instant};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_end_to_end_one_timeout_one_record() {
    let search = MockServer::start().await;
    let merchant = MockServer::start().await;

    mount_results(
        &search,
        &[
            format!("{}/p/ssd-1tb", merchant.uri()),
            format!("{}/checkout/ssd-1tb", merchant.uri()),
            format!("{}/p/ssd-lento", merchant.uri()),
        ],
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/p/ssd-1tb"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(product_page("SSD NVMe 1TB", "1.234,56"))
                .insert_header("content-type", "text/html; charset=utf-8"),
        )
        .expect(1)
        .mount(&merchant)
        .await;
    Mock::given(method("GET"))
        .and(path("/checkout/ssd-1tb"))
        .respond_with(ResponseTemplate::new(200).set_body_string(product_page("Carrinho", "1,00")))
        .expect(0)
        .mount(&merchant)
        .await;
    Mock::given(method("GET"))
        .and(path("/p/ssd-lento"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(product_page("SSD Lento", "10,00"))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&merchant)
        .await;

    let mut settings = run_settings(&search, &["ssd nvme"]);
    settings.fetch.timeout_ms = 300;
    let mut run = DiscoveryRun::from_settings(settings).unwrap();
    let report = run.run().await.unwrap();

    assert_eq!(report.state, RunState::Completed);
    assert_eq!(report.batch.count, 1);

    let record = &report.batch.items[0];
    assert_eq!(record.title, "SSD NVMe 1TB");
    assert_eq!(record.price, Some(1234.56));
    assert_eq!(record.currency, Some(Currency::Brl));
    assert_eq!(record.url, format!("{}/p/ssd-1tb", merchant.uri()));
    assert_eq!(record.image, Some(format!("{}/img/produto.jpg", merchant.uri())));
    assert_eq!(record.query, "ssd nvme");
    assert_eq!(record.slug, "ssd-nvme-1tb");

    let summary = &report.summary;
    assert_eq!(summary.discovered, 3);
    assert_eq!(summary.allowed, 2);
    assert_eq!(summary.rejected, 1);
    assert_eq!(summary.fetched, 2);
    assert_eq!(summary.transient_failures(), 1);
    assert_eq!(summary.failures[0].stage, FailureStage::Fetch);
    assert!(summary.failures[0].target.ends_with("/p/ssd-lento"));
}

#[tokio::test]
async fn test_cancellation_after_first_fetch_keeps_record() {
    let search = MockServer::start().await;
    let merchant = MockServer::start().await;

    mount_results(
        &search,
        &[
            format!("{}/p/1", merchant.uri()),
            format!("{}/p/2", merchant.uri()),
            format!("{}/p/3", merchant.uri()),
        ],
    )
    .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string(product_page("Fone Bluetooth", "99,90")))
        .mount(&merchant)
        .await;

    let mut settings = run_settings(&search, &["fone"]);
    // long enough that the run is sleeping when the token fires
    settings.politeness.fetch_delay_ms = DelayRange::new(5_000, 5_000);
    let mut run = DiscoveryRun::from_settings(settings).unwrap();

    let cancel = run.cancellation_token();

    let started = Instant::now();
    let handle = tokio::spawn(async move { run.run().await });
    loop {
        let received = merchant.received_requests().await.unwrap_or_default();
        if received.iter().any(|r| r.url.path() == "/p/1") {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    cancel.cancel();

    let report = handle.await.unwrap().unwrap();
    assert!(started.elapsed() < Duration::from_secs(4));
    assert_eq!(report.state, RunState::Aborted);
    assert_eq!(report.summary.fetched, 1);
    assert_eq!(report.batch.count, 1);
    assert_eq!(report.batch.items[0].title, "Fone Bluetooth");
}

#[tokio::test]
async fn test_missing_queries_fail_before_network() {
    let search = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&search)
        .await;

    let settings = run_settings(&search, &[]);
    match DiscoveryRun::from_settings(settings) {
        Err(RunError::Configuration(ConfigurationError::Missing(field))) => {
            assert_eq!(field, "discovery.queries")
        }
        other => panic!("expected configuration error, got {:?}", other.err()),
    }
}

#[tokio::test]
async fn test_blocked_engine_is_recorded_as_search_failure() {
    let search = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("<html><body><form id=\"captcha\">Verify</form></body></html>"),
        )
        .mount(&search)
        .await;

    let report = DiscoveryRun::from_settings(run_settings(&search, &["tv 55"]))
        .unwrap()
        .run()
        .await
        .unwrap();

    assert_eq!(report.state, RunState::Completed);
    assert!(report.batch.is_empty());
    assert_eq!(report.summary.failures.len(), 1);
    assert_eq!(report.summary.failures[0].stage, FailureStage::Search);
    assert_eq!(report.summary.failures[0].target, "tv 55");
}
