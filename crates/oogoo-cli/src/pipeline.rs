//! The run coordinator: fans out one walk per (category, page) under a
//! bounded admission limiter, filters results to the target day, and hands
//! them to the export and upload boundaries.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use chrono::{DateTime, Local, TimeDelta};
use tokio::sync::Semaphore;

use oogoo_core::{AppConfig, Category, ListingRecord, SITE_ORIGIN};
use oogoo_export::{sheet, DriveClient};
use oogoo_scraper::{DetailResolver, HeadlessChrome, ListingWalker};

const DRIVE_TIMEOUT_SECS: u64 = 60;

/// Runs the whole pipeline once. Walk failures degrade to missing records;
/// only export/upload failures and configuration faults surface as errors.
pub async fn run(config: &AppConfig, skip_upload: bool) -> anyhow::Result<()> {
    let day = target_day(Local::now());
    tracing::info!(%day, "starting listing collection");

    let limiter = Arc::new(Semaphore::new(config.max_concurrent_walks.max(1)));
    let mut tasks = Vec::new();
    for &category in Category::ALL {
        for page in 1..=config.pages_per_category {
            let limiter = Arc::clone(&limiter);
            let config = config.clone();
            tasks.push(tokio::spawn(async move {
                let records = walk_one(&config, limiter, category, page).await;
                (category, records)
            }));
        }
    }

    let mut by_category: HashMap<Category, Vec<ListingRecord>> = HashMap::new();
    for task in tasks {
        match task.await {
            Ok((category, records)) => {
                by_category.entry(category).or_default().extend(records);
            }
            Err(e) => tracing::error!(error = %e, "walk task panicked"),
        }
    }

    let mut files: Vec<PathBuf> = Vec::new();
    for &category in Category::ALL {
        let records: Vec<ListingRecord> = by_category
            .remove(&category)
            .unwrap_or_default()
            .into_iter()
            .filter(|record| record.published_on(&day))
            .collect();
        tracing::info!(%category, kept = records.len(), "filtered to target day");
        if records.is_empty() {
            continue;
        }

        let path = config.output_dir.join(format!("{}.csv", category.label()));
        sheet::write_category_csv(&records, &path)
            .with_context(|| format!("writing {}", path.display()))?;
        files.push(path);
    }

    if files.is_empty() {
        tracing::info!(%day, "no records for the target day; nothing to upload");
        return Ok(());
    }
    if skip_upload {
        tracing::info!(files = files.len(), "upload skipped by flag");
        return Ok(());
    }

    let drive = DriveClient::new(&config.drive, DRIVE_TIMEOUT_SECS)?;
    drive
        .upload_run(&day, &config.drive.parent_folder_id, &files)
        .await
        .context("uploading exports to Drive")?;
    tracing::info!(folder = %day, files = files.len(), "run complete");
    Ok(())
}

/// The day the run processes: yesterday relative to `now`.
fn target_day(now: DateTime<Local>) -> String {
    let yesterday = now - TimeDelta::try_days(1).expect("in-range constant");
    yesterday.format("%Y-%m-%d").to_string()
}

/// Walks one listing page behind the admission limiter. Owns its browser
/// end-to-end; any failure here costs only this page's records.
async fn walk_one(
    config: &AppConfig,
    limiter: Arc<Semaphore>,
    category: Category,
    page: u32,
) -> Vec<ListingRecord> {
    let Ok(_permit) = limiter.acquire_owned().await else {
        // The limiter lives for the whole run; closure is unreachable.
        return Vec::new();
    };

    let url = category.listing_url(page);
    tracing::info!(%category, page, %url, "walk admitted");

    let browser = match HeadlessChrome::launch(
        &config.user_agent,
        Duration::from_secs(config.navigation_timeout_secs),
    )
    .await
    {
        Ok(browser) => browser,
        Err(e) => {
            tracing::error!(%category, page, error = %e, "browser launch failed; skipping page");
            return Vec::new();
        }
    };

    let resolver = DetailResolver::new(
        SITE_ORIGIN,
        Duration::from_millis(config.detail_settle_ms),
        Duration::from_secs(config.description_timeout_secs),
    );
    let walker = ListingWalker::new(
        &browser,
        resolver,
        config.max_retries,
        Duration::from_millis(config.card_delay_ms),
        Duration::from_secs(config.selector_timeout_secs),
    );

    let records = walker.walk(&url).await;
    drop(walker);
    browser.close().await;

    tracing::info!(%category, page, records = records.len(), "walk finished");
    records
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn target_day_is_yesterday() {
        let now = Local.with_ymd_and_hms(2024, 7, 15, 0, 30, 0).unwrap();
        assert_eq!(target_day(now), "2024-07-14");
    }

    #[test]
    fn target_day_crosses_month_boundary() {
        let now = Local.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap();
        assert_eq!(target_day(now), "2024-02-29");
    }
}
