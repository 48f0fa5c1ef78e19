//! Listing walk: paginated traversal of the storefront's item grid
//!
//! Walks page by page, harvesting one [`ListingEntry`] per distinct item
//! and clicking the next-page control until it disappears. The walk never
//! fails: render failures end it with whatever was collected so far, down
//! to the empty outcome when the start page itself never renders.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Selector};
use tracing::{debug, info, warn};
use url::Url;

use crate::config::ScrapeConfig;
use crate::error::ScrapeResult;
use crate::extract::{UNKNOWN, element_text, image_source};
use crate::progress::ProgressReporter;
use crate::renderer::{PageRenderer, RenderedPage};
use crate::retry::{RetryPolicy, with_retries};
use crate::utils::{canonicalize, is_valid_url};

/// Listing pages are ready once at least one item card is in the DOM
pub const LISTING_READY_SELECTOR: &str = "[data-listing-id]";

/// Pagination control, either markup the storefront A/B tests between
pub const NEXT_CONTROL_SELECTOR: &str = "a[rel='next'], button[aria-label*='Next']";

// Hardcoded selectors should NEVER fail to parse - if they do, it's a
// compile-time bug.
static ITEM_ANCHOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("a[href*='/listing/']")
        .expect("BUG: hardcoded CSS selector 'a[href*='/listing/']' is invalid")
});

static ENTRY_TITLE: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("h3").expect("BUG: hardcoded CSS selector 'h3' is invalid")
});

static ENTRY_CAPTION: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("div[class*='text-caption']")
        .expect("BUG: hardcoded CSS selector 'div[class*='text-caption']' is invalid")
});

static ENTRY_PRICE: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("span[class*='currency-value']")
        .expect("BUG: hardcoded CSS selector 'span[class*='currency-value']' is invalid")
});

static ENTRY_IMG: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("img").expect("BUG: hardcoded CSS selector 'img' is invalid")
});

/// Real item links carry a numeric listing id; promo tiles reuse the
/// listing path without one
static ITEM_LINK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"/listing/\d+").expect("BUG: hardcoded regex '/listing/\\d+' is invalid")
});

/// One item discovered on a listing page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingEntry {
    /// Canonical product URL, query and fragment stripped
    pub url: String,
    pub title: String,
    pub price: String,
    /// Card thumbnail URL, empty when the card has none
    pub thumbnail: String,
}

/// Result of a listing walk
#[derive(Debug, Clone)]
pub struct WalkOutcome {
    /// Entries in discovery order, deduplicated by canonical URL
    pub entries: Vec<ListingEntry>,
    pub pages_walked: usize,
}

/// Harvest the item entries on one rendered listing page
///
/// `seen` carries canonical URLs across pages so an item surfacing on
/// several pages (or several times on one) yields a single entry.
#[must_use]
pub fn harvest_entries(page: &RenderedPage, seen: &mut HashSet<String>) -> Vec<ListingEntry> {
    let Ok(base) = Url::parse(&page.url) else {
        warn!(url = %page.url, "listing page has no parseable URL, skipping harvest");
        return Vec::new();
    };

    let doc = page.document();
    let mut entries = Vec::new();

    for anchor in doc.select(&ITEM_ANCHOR) {
        let Some(href) = anchor.value().attr("href") else {
            continue;
        };
        if !ITEM_LINK_RE.is_match(href) {
            continue;
        }
        let Some(url) = canonicalize(&base, href) else {
            continue;
        };
        // Joining keeps the scheme of an absolute href, so a javascript:
        // quick-view link can reach this point with a listing id in it
        if !is_valid_url(&url) {
            continue;
        }
        if !seen.insert(url.clone()) {
            continue;
        }

        entries.push(ListingEntry {
            url,
            title: first_text(anchor, &ENTRY_TITLE)
                .or_else(|| first_text(anchor, &ENTRY_CAPTION))
                .unwrap_or_else(|| UNKNOWN.to_string()),
            price: first_text(anchor, &ENTRY_PRICE).unwrap_or_else(|| UNKNOWN.to_string()),
            thumbnail: thumbnail_source(anchor).unwrap_or_default(),
        });
    }

    entries
}

fn first_text(scope: ElementRef, selector: &Selector) -> Option<String> {
    scope
        .select(selector)
        .next()
        .map(element_text)
        .filter(|text| !text.is_empty())
}

fn thumbnail_source(scope: ElementRef) -> Option<String> {
    scope
        .select(&ENTRY_IMG)
        .next()
        .and_then(|img| image_source(img.value()))
}

/// Rendering surface the walk drives
///
/// [`PageRenderer`] is the one real implementation; tests swap in scripted
/// pages so the pagination loop runs without a live tab.
trait Pager {
    async fn render(&self, url: &str, ready_selector: &str) -> ScrapeResult<RenderedPage>;
    async fn click_next(&self, selector: &str) -> ScrapeResult<bool>;
    async fn wait_for_ready(&self, selector: &str) -> ScrapeResult<()>;
    async fn settle(&self);
    async fn current_page(&self) -> ScrapeResult<RenderedPage>;
}

impl Pager for PageRenderer {
    async fn render(&self, url: &str, ready_selector: &str) -> ScrapeResult<RenderedPage> {
        PageRenderer::render(self, url, ready_selector).await
    }

    async fn click_next(&self, selector: &str) -> ScrapeResult<bool> {
        PageRenderer::click_next(self, selector).await
    }

    async fn wait_for_ready(&self, selector: &str) -> ScrapeResult<()> {
        PageRenderer::wait_for_ready(self, selector).await
    }

    async fn settle(&self) {
        PageRenderer::settle(self).await;
    }

    async fn current_page(&self) -> ScrapeResult<RenderedPage> {
        PageRenderer::current_page(self).await
    }
}

/// Walk the listing from the configured start URL until exhaustion
///
/// Every render inside the walk is retried, and a page failing its whole
/// budget ends the walk with the entries collected so far. A walk that dies
/// on page 14 still yields 13 pages of items; a start page that never
/// renders yields an empty outcome for the controller to report.
pub async fn walk_listings(
    renderer: &PageRenderer,
    config: &ScrapeConfig,
    progress: &dyn ProgressReporter,
) -> WalkOutcome {
    walk(renderer, config, progress).await
}

async fn walk<P: Pager>(
    pager: &P,
    config: &ScrapeConfig,
    progress: &dyn ProgressReporter,
) -> WalkOutcome {
    let policy = RetryPolicy::new(config.max_retries(), config.retry_backoff());

    let first = with_retries(policy, "render first listing page", || {
        pager.render(config.start_url(), LISTING_READY_SELECTOR)
    })
    .await;
    let mut page = match first {
        Ok(page) => page,
        Err(e) => {
            warn!(error = %e, "start page never rendered, nothing to walk");
            return WalkOutcome {
                entries: Vec::new(),
                pages_walked: 0,
            };
        }
    };

    let mut seen = HashSet::new();
    let mut entries: Vec<ListingEntry> = Vec::new();
    let mut pages_walked = 0usize;

    loop {
        pages_walked += 1;
        let harvested = harvest_entries(&page, &mut seen);
        info!(
            page = pages_walked,
            new = harvested.len(),
            total = entries.len() + harvested.len(),
            "harvested listing page"
        );
        entries.extend(harvested);
        progress.report_listing_page(pages_walked, entries.len());

        if let Some(max_pages) = config.max_pages()
            && pages_walked >= max_pages
        {
            info!(max_pages, "reached listing page limit");
            break;
        }

        // The click fires at most once per page; only the wait for the
        // swapped-in grid is retried. A second click against a grid that
        // mounted late would advance past it unharvested.
        match pager.click_next(NEXT_CONTROL_SELECTOR).await {
            Ok(true) => {}
            Ok(false) => {
                debug!("no next control, listing walk complete");
                break;
            }
            Err(e) => {
                warn!(error = %e, "pagination click failed, continuing with partial listing");
                break;
            }
        }

        match with_retries(policy, "render next listing page", || next_page(pager, config)).await {
            Ok(next) => page = next,
            Err(e) => {
                warn!(error = %e, "next page never rendered, continuing with partial listing");
                break;
            }
        }
    }

    WalkOutcome {
        entries,
        pages_walked,
    }
}

/// Re-poll readiness after a pagination click and snapshot the new page
///
/// The storefront swaps the grid in place, so the item-card selector going
/// ready is the only signal that the next page arrived. Contains no
/// clicking, so the retry wrapper re-runs it against the same page number.
async fn next_page<P: Pager>(pager: &P, config: &ScrapeConfig) -> ScrapeResult<RenderedPage> {
    config.load_delay().pause().await;
    pager.wait_for_ready(LISTING_READY_SELECTOR).await?;
    pager.settle().await;
    pager.current_page().await
}
