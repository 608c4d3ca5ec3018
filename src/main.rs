// Copyright 2025 Kirky.X
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use prodscout::application::use_cases::discovery_run::DiscoveryRun;
use prodscout::application::use_cases::publish_batch::CatalogPublisher;
use prodscout::config::settings::Settings;
use prodscout::infrastructure::catalog::WooCommerceCatalog;
use prodscout::utils::telemetry;
use std::sync::Arc;
use tracing::{info, warn};

/// 主函数
///
/// 加载配置，执行一次发现运行，把批次 JSON 写到 stdout。
/// 配置了目录时再把批次发布到目录
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Initialize logging
    telemetry::init_telemetry();
    info!("Starting prodscout...");

    // 2. Load configuration
    let settings = match std::env::args().nth(1) {
        Some(path) => Settings::from_file(&path)?,
        None => Settings::new()?,
    };
    info!("Configuration loaded");

    // 3. Build the run; invalid configuration stops here
    let catalog_settings = settings.catalog.clone();
    let mut run = DiscoveryRun::from_settings(settings)?;

    let cancel = run.cancellation_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupt received, stopping after the current URL");
            cancel.cancel();
        }
    });

    // 4. Run discovery
    let report = run.run().await?;
    println!("{}", report.batch.to_json()?);
    info!(
        state = ?report.state,
        summary = %serde_json::to_string(&report.summary)?,
        "Run finished"
    );

    // 5. Publish to the catalog
    if let Some(catalog_settings) = catalog_settings {
        if report.batch.is_empty() {
            info!("Nothing to publish");
        } else {
            let catalog = Arc::new(WooCommerceCatalog::new(&catalog_settings)?);
            let publisher = CatalogPublisher::new(catalog, catalog_settings.button_text.clone());
            let published = publisher.publish_batch(&report.batch).await;
            for rejection in &published.rejections {
                warn!(sku = %rejection.sku, error = %rejection.error, "Record not published");
            }
            info!(
                created = published.created,
                updated = published.updated,
                rejected = published.rejections.len(),
                "Catalog updated"
            );
        }
    }

    Ok(())
}
