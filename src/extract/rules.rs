//! Ordered fallback chains for extracted fields
//!
//! Each field resolves through its attempts in order: a specific selector
//! first, looser selectors after, a text-pattern scan where the page offers
//! no stable markup, and finally the field's documented default. The first
//! attempt yielding a non-empty value wins and later attempts never run.

use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;

use super::record::{BRAND_FALLBACK, UNKNOWN};

// Hardcoded selectors should NEVER fail to parse - if they do, it's a compile-time bug.

static PRODUCT_TITLE: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("h1[class*='text-title']")
        .expect("BUG: hardcoded CSS selector \"h1[class*='text-title']\" is invalid")
});

static PRICE_VALUE: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("span[class*='currency-value']")
        .expect("BUG: hardcoded CSS selector \"span[class*='currency-value']\" is invalid")
});

pub(crate) static COMPARE_PRICE: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("span[class*='compare-at-price']")
        .expect("BUG: hardcoded CSS selector \"span[class*='compare-at-price']\" is invalid")
});

static DESCRIPTION_PANEL: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("div[id*='content-toggle-product-details']")
        .expect("BUG: hardcoded CSS selector \"div[id*='content-toggle-product-details']\" is invalid")
});

static DESCRIPTION_LOOSE: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("div[class*='description']")
        .expect("BUG: hardcoded CSS selector \"div[class*='description']\" is invalid")
});

pub(crate) static BREADCRUMB_LINKS: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("nav[class*='breadcrumb'] a")
        .expect("BUG: hardcoded CSS selector \"nav[class*='breadcrumb'] a\" is invalid")
});

static SELLER_NAME: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("span[class*='seller-name']")
        .expect("BUG: hardcoded CSS selector \"span[class*='seller-name']\" is invalid")
});

static SHOP_LINK: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("a[href*='/shop/']")
        .expect("BUG: hardcoded CSS selector \"a[href*='/shop/']\" is invalid")
});

pub(crate) static GALLERY_IMG: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("img[class*='image']")
        .expect("BUG: hardcoded CSS selector \"img[class*='image']\" is invalid")
});

static AVAILABILITY: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("span[class*='availability']")
        .expect("BUG: hardcoded CSS selector \"span[class*='availability']\" is invalid")
});

static PARAGRAPH: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("p").expect("BUG: hardcoded CSS selector 'p' is invalid"));

static STAR_RATING: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("span[class*='star-rating']")
        .expect("BUG: hardcoded CSS selector \"span[class*='star-rating']\" is invalid")
});

static REVIEW_COUNT: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("span[class*='review-count']")
        .expect("BUG: hardcoded CSS selector \"span[class*='review-count']\" is invalid")
});

pub(crate) static REVIEWS_LIST: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("ol[class*='reviews']")
        .expect("BUG: hardcoded CSS selector \"ol[class*='reviews']\" is invalid")
});

pub(crate) static REVIEW_ITEM: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("li").expect("BUG: hardcoded CSS selector 'li' is invalid"));

pub(crate) static REVIEWER_NAME: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("span[class*='reviewer-name']")
        .expect("BUG: hardcoded CSS selector \"span[class*='reviewer-name']\" is invalid")
});

pub(crate) static REVIEW_STARS: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("span[class*='stars']")
        .expect("BUG: hardcoded CSS selector \"span[class*='stars']\" is invalid")
});

pub(crate) static REVIEW_TEXT: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("p[class*='review-text']")
        .expect("BUG: hardcoded CSS selector \"p[class*='review-text']\" is invalid")
});

static META_KEYWORDS: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("meta[name='keywords']")
        .expect("BUG: hardcoded CSS selector \"meta[name='keywords']\" is invalid")
});

static META_DESCRIPTION: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("meta[name='description']")
        .expect("BUG: hardcoded CSS selector \"meta[name='description']\" is invalid")
});

static DOC_TITLE: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("title").expect("BUG: hardcoded CSS selector 'title' is invalid")
});

static IN_STOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)in stock").expect("BUG: hardcoded regex 'in stock' is invalid"));

/// One rung of a fallback chain
pub(crate) enum Attempt {
    /// Inner text of the first element matching the selector
    Text(&'static LazyLock<Selector>),
    /// An attribute of the first element matching the selector
    Attr(&'static LazyLock<Selector>, &'static str),
    /// Inner text of the first matching element whose text matches the
    /// pattern, for content with no stable class hooks
    TextMatching(&'static LazyLock<Selector>, &'static LazyLock<Regex>),
}

/// Ordered attempts plus the value used when every attempt comes up empty
pub(crate) struct FieldRule {
    pub attempts: &'static [Attempt],
    pub default: &'static str,
}

impl FieldRule {
    /// Resolve the chain against a parsed document
    pub(crate) fn resolve(&self, doc: &Html) -> String {
        for attempt in self.attempts {
            let value = match attempt {
                Attempt::Text(selector) => doc.select(selector).next().map(element_text),
                Attempt::Attr(selector, name) => doc
                    .select(selector)
                    .next()
                    .and_then(|el| el.value().attr(name))
                    .map(|v| v.trim().to_string()),
                Attempt::TextMatching(selector, pattern) => doc
                    .select(selector)
                    .map(element_text)
                    .find(|text| pattern.is_match(text)),
            };
            if let Some(value) = value
                && !value.is_empty()
            {
                return value;
            }
        }
        self.default.to_string()
    }
}

/// Concatenated descendant text with fragments trimmed and space-joined
pub(crate) fn element_text(el: ElementRef<'_>) -> String {
    let mut out = String::new();
    for fragment in el.text() {
        let fragment = fragment.trim();
        if fragment.is_empty() {
            continue;
        }
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(fragment);
    }
    out
}

pub(crate) static NAME_RULE: FieldRule = FieldRule {
    attempts: &[Attempt::Text(&PRODUCT_TITLE)],
    default: UNKNOWN,
};

pub(crate) static PRICE_RULE: FieldRule = FieldRule {
    attempts: &[Attempt::Text(&PRICE_VALUE)],
    default: "",
};

pub(crate) static DESCRIPTION_RULE: FieldRule = FieldRule {
    attempts: &[
        Attempt::Text(&DESCRIPTION_PANEL),
        Attempt::Text(&DESCRIPTION_LOOSE),
    ],
    default: "",
};

pub(crate) static BRAND_RULE: FieldRule = FieldRule {
    attempts: &[Attempt::Text(&SELLER_NAME), Attempt::Text(&SHOP_LINK)],
    default: BRAND_FALLBACK,
};

pub(crate) static STOCK_RULE: FieldRule = FieldRule {
    attempts: &[
        Attempt::Text(&AVAILABILITY),
        Attempt::TextMatching(&PARAGRAPH, &IN_STOCK),
    ],
    default: "",
};

pub(crate) static RATING_LABEL_RULE: FieldRule = FieldRule {
    attempts: &[Attempt::Attr(&STAR_RATING, "aria-label")],
    default: "",
};

pub(crate) static REVIEW_COUNT_RULE: FieldRule = FieldRule {
    attempts: &[Attempt::Text(&REVIEW_COUNT)],
    default: "",
};

pub(crate) static META_TAGS_RULE: FieldRule = FieldRule {
    attempts: &[Attempt::Attr(&META_KEYWORDS, "content")],
    default: "",
};

pub(crate) static SEO_TITLE_RULE: FieldRule = FieldRule {
    attempts: &[Attempt::Text(&DOC_TITLE)],
    default: "",
};

pub(crate) static META_DESCRIPTION_RULE: FieldRule = FieldRule {
    attempts: &[Attempt::Attr(&META_DESCRIPTION, "content")],
    default: "",
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_matching_attempt_wins() {
        let doc = Html::parse_document(
            r#"<div id="wt-content-toggle-product-details-1">Panel text</div>
               <div class="listing-description">Loose text</div>"#,
        );
        assert_eq!(DESCRIPTION_RULE.resolve(&doc), "Panel text");
    }

    #[test]
    fn empty_match_falls_through_to_next_attempt() {
        let doc = Html::parse_document(
            r#"<div id="wt-content-toggle-product-details-1">   </div>
               <div class="listing-description">Loose text</div>"#,
        );
        assert_eq!(DESCRIPTION_RULE.resolve(&doc), "Loose text");
    }

    #[test]
    fn exhausted_chain_resolves_to_default() {
        let doc = Html::parse_document("<p>nothing relevant</p>");
        assert_eq!(NAME_RULE.resolve(&doc), "Unknown");
        assert_eq!(BRAND_RULE.resolve(&doc), "CopperArtMoroccan");
    }

    #[test]
    fn text_matching_scans_for_the_pattern() {
        let doc = Html::parse_document(
            r#"<p>Ships from Marrakesh</p>
               <p>Only 4 left and In Stock now</p>"#,
        );
        assert_eq!(STOCK_RULE.resolve(&doc), "Only 4 left and In Stock now");
    }

    #[test]
    fn attribute_attempts_read_the_attribute() {
        let doc = Html::parse_document(
            r#"<span class="wt-star-rating" aria-label="4.8 out of 5 stars"></span>"#,
        );
        assert_eq!(RATING_LABEL_RULE.resolve(&doc), "4.8 out of 5 stars");
    }

    #[test]
    fn element_text_joins_fragments() {
        let doc = Html::parse_document("<h1 class='wt-text-title'>Copper <em>Moroccan</em> Lamp</h1>");
        assert_eq!(NAME_RULE.resolve(&doc), "Copper Moroccan Lamp");
    }
}
