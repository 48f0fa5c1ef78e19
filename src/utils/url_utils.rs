//! URL manipulation utilities
//!
//! This module provides functions for resolving and canonicalizing item
//! URLs harvested from listing pages.

use url::Url;

/// Canonical form of an item URL: absolute, with query string and fragment
/// stripped
///
/// The same product is routinely linked with per-session query parameters
/// (`?ref=...`, click identifiers, ga tracking), so the canonical form is
/// the deduplication key for the whole pipeline.
#[must_use]
pub fn canonicalize(base: &Url, href: &str) -> Option<String> {
    let mut resolved = base.join(href).ok()?;
    resolved.set_query(None);
    resolved.set_fragment(None);
    Some(resolved.to_string())
}

/// Check if a URL is usable as a navigation target
#[must_use]
pub fn is_valid_url(url: &str) -> bool {
    if url.is_empty() {
        return false;
    }

    // Skip data URLs, javascript URLs, and other non-http schemes
    if url.starts_with("data:") || url.starts_with("javascript:") || url.starts_with("mailto:") {
        return false;
    }

    match Url::parse(url) {
        Ok(parsed) => {
            matches!(parsed.scheme(), "http" | "https")
        }
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("https://www.example.com/shop/CopperArt?page=2").expect("valid base URL")
    }

    #[test]
    fn strips_query_and_fragment() {
        let canonical = canonicalize(&base(), "/listing/123456/copper-lamp?ref=shop_home#reviews");
        assert_eq!(
            canonical.as_deref(),
            Some("https://www.example.com/listing/123456/copper-lamp")
        );
    }

    #[test]
    fn resolves_relative_against_base() {
        let canonical = canonicalize(&base(), "../listing/789");
        assert_eq!(
            canonical.as_deref(),
            Some("https://www.example.com/listing/789")
        );
    }

    #[test]
    fn absolute_href_ignores_base() {
        let canonical = canonicalize(&base(), "https://other.example.com/listing/42?x=1");
        assert_eq!(
            canonical.as_deref(),
            Some("https://other.example.com/listing/42")
        );
    }

    #[test]
    fn query_variants_share_one_canonical_form() {
        let a = canonicalize(&base(), "/listing/555?ref=search_grid");
        let b = canonicalize(&base(), "/listing/555?ref=shop_home&frs=1");
        assert_eq!(a, b);
    }

    #[test]
    fn rejects_non_http_schemes() {
        assert!(!is_valid_url("javascript:void(0)"));
        assert!(!is_valid_url("data:text/html,hello"));
        assert!(!is_valid_url("mailto:shop@example.com"));
        assert!(!is_valid_url(""));
        assert!(is_valid_url("https://www.example.com/listing/1"));
    }
}
