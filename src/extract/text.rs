//! Tolerant text parsing for scraped fragments
//!
//! Storefront text is noisy: prices carry currency symbols and thousands
//! separators, availability counts hide inside sentences, star ratings live
//! in accessibility labels. Every helper here returns `Option` so a field
//! that fails to parse resolves to its default instead of an error.

use regex::Regex;
use std::sync::LazyLock;

static DIGIT_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+").expect("BUG: hardcoded regex '\\d+' is invalid"));

static WORD_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\w+\b").expect("BUG: hardcoded regex '\\b\\w+\\b' is invalid"));

/// Parse a price fragment, tolerating a dollar sign and thousands separators
///
/// `"$1,234.56"` parses to `1234.56`; anything that still fails after
/// stripping resolves to `None`.
#[must_use]
pub fn parse_price(raw: &str) -> Option<f64> {
    raw.trim().replace(['$', ','], "").parse().ok()
}

/// First run of digits anywhere in the text
///
/// Availability copy reads like "Only 3 left in stock"; the count is the
/// first digit run, not the whole string.
#[must_use]
pub fn first_uint(raw: &str) -> Option<u32> {
    DIGIT_RUN.find(raw)?.as_str().parse().ok()
}

/// All digits in the text concatenated and parsed
///
/// Review counts render as "(1,234 reviews)"; stripping every non-digit
/// recovers the number across separator styles.
#[must_use]
pub fn digits_only(raw: &str) -> Option<u32> {
    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
    if digits.is_empty() {
        return None;
    }
    digits.parse().ok()
}

/// First whitespace-separated token of the text
#[must_use]
pub fn first_token(raw: &str) -> Option<&str> {
    raw.split_whitespace().next()
}

/// First token parsed as a float, for labels like "4.8 out of 5 stars"
#[must_use]
pub fn leading_float(raw: &str) -> Option<f64> {
    first_token(raw)?.parse().ok()
}

/// First `limit` distinct lowercase word tokens, comma-joined
///
/// Seeds the tags field from the description when the page carries no
/// keywords metadata. Duplicates are dropped so a repetitive description
/// still yields a usable tag list.
#[must_use]
pub fn tag_tokens(text: &str, limit: usize) -> String {
    let lowered = text.to_lowercase();
    let mut tokens: Vec<&str> = Vec::new();
    for m in WORD_TOKEN.find_iter(&lowered) {
        let token = m.as_str();
        if !tokens.contains(&token) {
            tokens.push(token);
            if tokens.len() == limit {
                break;
            }
        }
    }
    tokens.join(",")
}

/// Truncate to at most `max_chars` characters, never splitting a character
#[must_use]
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn price_tolerates_symbols_and_separators() {
        assert_eq!(parse_price("$12.50"), Some(12.50));
        assert_eq!(parse_price(" $1,234.56 "), Some(1234.56));
        assert_eq!(parse_price("45"), Some(45.0));
        assert_eq!(parse_price("Sale!"), None);
        assert_eq!(parse_price(""), None);
    }

    #[test]
    fn first_uint_finds_the_count_in_a_sentence() {
        assert_eq!(first_uint("Only 3 left in stock"), Some(3));
        assert_eq!(first_uint("12 available, ships in 4 days"), Some(12));
        assert_eq!(first_uint("In stock"), None);
    }

    #[test]
    fn digits_only_collapses_separators() {
        assert_eq!(digits_only("(1,234 reviews)"), Some(1234));
        assert_eq!(digits_only("87"), Some(87));
        assert_eq!(digits_only("no reviews yet"), None);
    }

    #[test]
    fn leading_float_reads_star_labels() {
        assert_eq!(leading_float("4.8 out of 5 stars"), Some(4.8));
        assert_eq!(leading_float("5 stars"), Some(5.0));
        assert_eq!(leading_float("Rated 4.8 stars"), None);
    }

    #[test]
    fn tag_tokens_are_distinct_and_capped() {
        let text = "Copper lamp, handmade copper lamp with copper shade";
        assert_eq!(tag_tokens(text, 10), "copper,lamp,handmade,with,shade");
        assert_eq!(tag_tokens(text, 3), "copper,lamp,handmade");
        assert_eq!(tag_tokens("", 10), "");
    }

    #[test]
    fn truncate_respects_character_boundaries() {
        assert_eq!(truncate_chars("héllo wörld", 5), "héllo");
        assert_eq!(truncate_chars("short", 160), "short");
    }
}
