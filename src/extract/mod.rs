//! Field extraction from rendered product pages
//!
//! `extract` is pure and idempotent: the same HTML always yields the same
//! record, and a page where every field misses still yields a complete
//! record of defaults. Field-level parse failures resolve to defaults here;
//! they are never surfaced as errors.

mod record;
mod rules;
mod text;

pub use record::{
    BRAND_FALLBACK, CATEGORY_FALLBACK, CSV_HEADERS, DEFAULT_COUNT_IN_STOCK,
    DEFAULT_LOW_STOCK_THRESHOLD, ProductRecord, SEO_DESCRIPTION_MAX_CHARS, SUBCATEGORY_FALLBACK,
    TAG_TOKEN_LIMIT, UNKNOWN,
};

use scraper::Html;
use scraper::node::Element;

use crate::renderer::RenderedPage;
pub(crate) use rules::element_text;

/// Ready selector for product detail pages: the title heading renders early
/// and reliably
pub const DETAIL_READY_SELECTOR: &str = "h1";

/// Extract a complete product record from a rendered detail page
#[must_use]
pub fn extract(page: &RenderedPage) -> ProductRecord {
    let doc = page.document();

    let name = rules::NAME_RULE.resolve(&doc);
    let description = rules::DESCRIPTION_RULE.resolve(&doc);
    let (category, subcategory) = breadcrumb_categories(&doc);
    let (image, images) = gallery_images(&doc);
    let (review_name, review_rating, review_comment) = first_review(&doc);

    // Keywords metadata feeds both the tags and the SEO keywords; without
    // it, the description's own vocabulary stands in.
    let meta_keywords = rules::META_TAGS_RULE.resolve(&doc);
    let tags = if meta_keywords.is_empty() {
        text::tag_tokens(&description, record::TAG_TOKEN_LIMIT)
    } else {
        meta_keywords
    };
    let seo_keywords = tags.clone();

    let seo_title = {
        let title = rules::SEO_TITLE_RULE.resolve(&doc);
        if title.is_empty() { name.clone() } else { title }
    };
    let seo_description = {
        let meta = rules::META_DESCRIPTION_RULE.resolve(&doc);
        if meta.is_empty() {
            text::truncate_chars(&description, record::SEO_DESCRIPTION_MAX_CHARS)
        } else {
            meta
        }
    };

    ProductRecord {
        name,
        price: text::parse_price(&rules::PRICE_RULE.resolve(&doc)).unwrap_or(0.0),
        compare_price: doc
            .select(&rules::COMPARE_PRICE)
            .next()
            .and_then(|el| text::parse_price(&element_text(el))),
        description,
        category,
        subcategory,
        brand: rules::BRAND_RULE.resolve(&doc),
        image,
        images,
        count_in_stock: text::first_uint(&rules::STOCK_RULE.resolve(&doc))
            .unwrap_or(record::DEFAULT_COUNT_IN_STOCK),
        rating: text::leading_float(&rules::RATING_LABEL_RULE.resolve(&doc)).unwrap_or(0.0),
        num_reviews: text::digits_only(&rules::REVIEW_COUNT_RULE.resolve(&doc)).unwrap_or(0),
        tags,
        seo_title,
        seo_description,
        seo_keywords,
        review_name,
        review_rating,
        review_comment,
        ..ProductRecord::default()
    }
}

/// Category pair from the breadcrumb trail
///
/// Deep trails carry department and section as the third- and second-from-
/// last crumbs (the last crumb is the product itself). Two-crumb trails keep
/// the fixed department; anything shorter resolves to the full fixed pair.
fn breadcrumb_categories(doc: &Html) -> (String, String) {
    let crumbs: Vec<String> = doc
        .select(&rules::BREADCRUMB_LINKS)
        .map(element_text)
        .filter(|crumb| !crumb.is_empty())
        .collect();

    match crumbs.len() {
        n if n >= 3 => (crumbs[n - 3].clone(), crumbs[n - 2].clone()),
        2 => (record::CATEGORY_FALLBACK.to_string(), crumbs[0].clone()),
        _ => (
            record::CATEGORY_FALLBACK.to_string(),
            record::SUBCATEGORY_FALLBACK.to_string(),
        ),
    }
}

/// Primary image plus the comma-joined remainder of the gallery
fn gallery_images(doc: &Html) -> (String, String) {
    let sources: Vec<String> = doc
        .select(&rules::GALLERY_IMG)
        .filter_map(|img| image_source(img.value()))
        .collect();

    match sources.split_first() {
        Some((first, rest)) => (first.clone(), rest.join(",")),
        None => (String::new(), String::new()),
    }
}

/// `src` wins when it holds a real URL; lazy-loaded images keep theirs in
/// `data-src` until they scroll into view
pub(crate) fn image_source(el: &Element) -> Option<String> {
    non_empty_attr(el, "src").or_else(|| non_empty_attr(el, "data-src"))
}

fn non_empty_attr(el: &Element, name: &str) -> Option<String> {
    el.attr(name)
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

/// Reviewer name, star label token, and text of the most recent review
fn first_review(doc: &Html) -> (String, String, String) {
    let Some(list) = doc.select(&rules::REVIEWS_LIST).next() else {
        return (String::new(), String::new(), String::new());
    };
    let Some(item) = list.select(&rules::REVIEW_ITEM).next() else {
        return (String::new(), String::new(), String::new());
    };

    let reviewer = item
        .select(&rules::REVIEWER_NAME)
        .next()
        .map(element_text)
        .unwrap_or_default();
    let stars = item
        .select(&rules::REVIEW_STARS)
        .next()
        .and_then(|el| el.value().attr("aria-label"))
        .and_then(text::first_token)
        .map(str::to_string)
        .unwrap_or_default();
    let comment = item
        .select(&rules::REVIEW_TEXT)
        .next()
        .map(element_text)
        .unwrap_or_default();

    (reviewer, stars, comment)
}
