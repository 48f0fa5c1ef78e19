//! Pipeline controller: walk, visit, extract, write
//!
//! One browser, one tab, strictly sequential. The listing walk produces
//! entries, each entry is visited under the uniform retry policy, survivors
//! become records, and the records land in a single CSV write at the end.
//! An item that keeps failing is dropped; it never takes the run down.

use std::collections::HashSet;
use std::path::PathBuf;
use std::time::Duration;

use tracing::{info, warn};

use crate::browser::{self, BrowserHandle};
use crate::config::{DetailFetchMode, ScrapeConfig};
use crate::error::{ScrapeError, ScrapeResult};
use crate::extract::{self, ProductRecord, UNKNOWN};
use crate::listing::{self, ListingEntry};
use crate::progress::ProgressReporter;
use crate::renderer::{PageRenderer, RenderedPage};
use crate::retry::{RetryPolicy, with_retries};
use crate::sink;

/// Outcome summary of a completed run
#[derive(Debug, Clone)]
pub struct RunSummary {
    /// Distinct items discovered by the listing walk
    pub discovered: usize,
    /// Records extracted and written
    pub extracted: usize,
    pub output_path: PathBuf,
}

/// Run the full pipeline: launch, walk, extract, write, tear down
///
/// The browser is held for exactly the duration of the run and torn down
/// on every path out, success or failure.
pub async fn run(
    config: &ScrapeConfig,
    progress: &dyn ProgressReporter,
) -> ScrapeResult<RunSummary> {
    progress.report_initializing();
    let handle = browser::launch(config).await?;
    progress.report_browser_launched();

    let outcome = run_with_browser(&handle, config, progress).await;

    progress.report_cleanup_started();
    handle.close().await;

    outcome
}

async fn run_with_browser(
    handle: &BrowserHandle,
    config: &ScrapeConfig,
    progress: &dyn ProgressReporter,
) -> ScrapeResult<RunSummary> {
    let renderer = PageRenderer::new(handle.browser(), config).await?;

    let walk = listing::walk_listings(&renderer, config, progress).await;
    if walk.entries.is_empty() {
        return Err(ScrapeError::NoData {
            start_url: config.start_url().to_string(),
            pages_walked: walk.pages_walked,
        });
    }

    let discovered = walk.entries.len();
    info!(discovered, pages = walk.pages_walked, "listing walk complete");

    let policy = RetryPolicy::new(config.max_retries(), config.retry_backoff());
    let client = match config.detail_fetch() {
        DetailFetchMode::Http => Some(build_http_client(config)?),
        DetailFetchMode::Browser => None,
    };

    let total = walk.entries.len();
    let mut visited: HashSet<&str> = HashSet::new();
    let mut records: Vec<ProductRecord> = Vec::new();

    for (index, entry) in walk.entries.iter().enumerate() {
        if let Some(max_items) = config.max_items()
            && records.len() >= max_items
        {
            info!(max_items, "reached item limit");
            break;
        }
        // First occurrence of a canonical URL wins
        if !visited.insert(entry.url.as_str()) {
            continue;
        }

        progress.report_item_started(index, total, &entry.url);

        let fetched = with_retries(policy, "fetch product page", || async {
            let page = match &client {
                Some(client) => fetch_detail(client, &entry.url).await?,
                None => {
                    renderer
                        .render(&entry.url, extract::DETAIL_READY_SELECTOR)
                        .await?
                }
            };
            if page.html.is_empty() {
                return Err(ScrapeError::Extraction {
                    url: entry.url.clone(),
                    message: "empty document".to_string(),
                });
            }
            Ok(page)
        })
        .await;

        match fetched {
            Ok(page) => {
                let mut record = extract::extract(&page);
                apply_listing_overrides(&mut record, entry);
                progress.report_item_extracted(index, total, &record.name);
                records.push(record);
            }
            Err(e) => {
                progress.report_item_failed(&entry.url, &e.to_string());
                warn!(url = %entry.url, error = %e, "dropping item after retries");
            }
        }

        if index + 1 < total {
            config.load_delay().pause().await;
        }
    }

    if records.is_empty() {
        return Err(ScrapeError::NoData {
            start_url: config.start_url().to_string(),
            pages_walked: walk.pages_walked,
        });
    }

    sink::write_records(config.output_path(), &records)?;
    progress.report_completed(records.len(), discovered);

    Ok(RunSummary {
        discovered,
        extracted: records.len(),
        output_path: config.output_path().to_path_buf(),
    })
}

/// Fold listing-card knowledge into an extracted record
///
/// The card title and thumbnail come from the storefront's own grid markup
/// and are more reliable than detail-page extraction, so a usable card
/// value replaces the extracted one.
pub fn apply_listing_overrides(record: &mut ProductRecord, entry: &ListingEntry) {
    if !entry.title.is_empty() && entry.title != UNKNOWN {
        record.name = entry.title.clone();
    }
    if !entry.thumbnail.is_empty() {
        record.image = entry.thumbnail.clone();
    }
}

/// Fetch a detail page over plain HTTP, bypassing the browser
async fn fetch_detail(client: &reqwest::Client, url: &str) -> ScrapeResult<RenderedPage> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| fetch_error(url, &e))?;

    let status = response.status();
    if !status.is_success() {
        return Err(ScrapeError::Fetch {
            url: url.to_string(),
            message: format!("status {status}"),
        });
    }

    let final_url = response.url().to_string();
    let html = response.text().await.map_err(|e| fetch_error(url, &e))?;

    Ok(RenderedPage {
        url: final_url,
        html,
    })
}

fn fetch_error(url: &str, error: &reqwest::Error) -> ScrapeError {
    ScrapeError::Fetch {
        url: url.to_string(),
        message: error.to_string(),
    }
}

fn build_http_client(config: &ScrapeConfig) -> ScrapeResult<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent(config.user_agent())
        .timeout(Duration::from_secs(config.ready_timeout_secs()))
        .build()
        .map_err(|e| ScrapeError::Config(format!("failed to build HTTP client: {e}")))
}
