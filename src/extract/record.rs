//! Product record schema, defaults, and CSV row shape
//!
//! The schema is fixed: every record carries every field, and a field whose
//! extraction fails holds its documented default rather than being absent.

/// Placeholder for names and titles that could not be extracted
pub const UNKNOWN: &str = "Unknown";

/// Fixed fallback brand, the target shop's display name
pub const BRAND_FALLBACK: &str = "CopperArtMoroccan";

/// Fixed fallback category pair when breadcrumbs are missing or too short
///
/// Site knowledge, not a guess: the target shop sells lighting under the
/// Home & Living department, so records without usable breadcrumbs land in
/// the right part of the downstream catalog anyway.
pub const CATEGORY_FALLBACK: &str = "Home & Living";
pub const SUBCATEGORY_FALLBACK: &str = "Lighting";

/// Stock level assumed when the page shows no availability count
pub const DEFAULT_COUNT_IN_STOCK: u32 = 9;

/// Low-stock threshold expected by the downstream import
pub const DEFAULT_LOW_STOCK_THRESHOLD: u32 = 10;

/// Character cap for the SEO description fallback
pub const SEO_DESCRIPTION_MAX_CHARS: usize = 160;

/// How many description word tokens seed the tags fallback
pub const TAG_TOKEN_LIMIT: usize = 10;

/// CSV column headers in output order
///
/// The order is fixed by the downstream import and must not change.
pub const CSV_HEADERS: [&str; 23] = [
    "name",
    "description",
    "price",
    "comparePrice",
    "category",
    "subcategory",
    "brand",
    "image",
    "images",
    "countInStock",
    "lowStockThreshold",
    "rating",
    "numReviews",
    "isFeatured",
    "isActive",
    "tags",
    "sku",
    "seoTitle",
    "seoDescription",
    "seoKeywords",
    "reviewName",
    "reviewRating",
    "reviewComment",
];

/// One extracted product, schema-complete by construction
#[derive(Debug, Clone, PartialEq)]
pub struct ProductRecord {
    pub name: String,
    pub description: String,
    pub price: f64,
    /// Pre-sale price when the item is discounted; absent otherwise
    pub compare_price: Option<f64>,
    pub category: String,
    pub subcategory: String,
    pub brand: String,
    /// Primary gallery image URL
    pub image: String,
    /// Remaining gallery image URLs, comma-joined
    pub images: String,
    pub count_in_stock: u32,
    pub low_stock_threshold: u32,
    pub rating: f64,
    pub num_reviews: u32,
    pub is_featured: bool,
    pub is_active: bool,
    /// Comma-joined tag list
    pub tags: String,
    pub sku: String,
    pub seo_title: String,
    pub seo_description: String,
    pub seo_keywords: String,
    /// Name, star label, and text of the most recent review
    pub review_name: String,
    /// Raw first token of the review's star label, kept unparsed
    pub review_rating: String,
    pub review_comment: String,
}

impl Default for ProductRecord {
    fn default() -> Self {
        Self {
            name: UNKNOWN.to_string(),
            description: String::new(),
            price: 0.0,
            compare_price: None,
            category: CATEGORY_FALLBACK.to_string(),
            subcategory: SUBCATEGORY_FALLBACK.to_string(),
            brand: BRAND_FALLBACK.to_string(),
            image: String::new(),
            images: String::new(),
            count_in_stock: DEFAULT_COUNT_IN_STOCK,
            low_stock_threshold: DEFAULT_LOW_STOCK_THRESHOLD,
            rating: 0.0,
            num_reviews: 0,
            is_featured: false,
            is_active: true,
            tags: String::new(),
            sku: String::new(),
            seo_title: String::new(),
            seo_description: String::new(),
            seo_keywords: String::new(),
            review_name: String::new(),
            review_rating: String::new(),
            review_comment: String::new(),
        }
    }
}

impl ProductRecord {
    /// Serialize into CSV cells in [`CSV_HEADERS`] order
    ///
    /// Booleans become `TRUE`/`FALSE` and an absent compare price becomes an
    /// empty cell, matching the downstream import format.
    #[must_use]
    pub fn to_row(&self) -> [String; 23] {
        [
            self.name.clone(),
            self.description.clone(),
            self.price.to_string(),
            self.compare_price.map(|p| p.to_string()).unwrap_or_default(),
            self.category.clone(),
            self.subcategory.clone(),
            self.brand.clone(),
            self.image.clone(),
            self.images.clone(),
            self.count_in_stock.to_string(),
            self.low_stock_threshold.to_string(),
            self.rating.to_string(),
            self.num_reviews.to_string(),
            bool_cell(self.is_featured),
            bool_cell(self.is_active),
            self.tags.clone(),
            self.sku.clone(),
            self.seo_title.clone(),
            self.seo_description.clone(),
            self.seo_keywords.clone(),
            self.review_name.clone(),
            self.review_rating.clone(),
            self.review_comment.clone(),
        ]
    }
}

fn bool_cell(value: bool) -> String {
    if value { "TRUE" } else { "FALSE" }.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_record_is_schema_complete() {
        let record = ProductRecord::default();
        assert_eq!(record.name, "Unknown");
        assert_eq!(record.category, "Home & Living");
        assert_eq!(record.subcategory, "Lighting");
        assert_eq!(record.brand, "CopperArtMoroccan");
        assert_eq!(record.count_in_stock, 9);
        assert_eq!(record.low_stock_threshold, 10);
        assert!(record.is_active);
        assert!(!record.is_featured);
        assert!(record.compare_price.is_none());
    }

    #[test]
    fn row_matches_header_arity_and_format() {
        let record = ProductRecord {
            price: 45.5,
            compare_price: Some(60.0),
            ..ProductRecord::default()
        };
        let row = record.to_row();

        assert_eq!(row.len(), CSV_HEADERS.len());
        assert_eq!(row[2], "45.5");
        assert_eq!(row[3], "60");
        assert_eq!(row[13], "FALSE");
        assert_eq!(row[14], "TRUE");
    }

    #[test]
    fn absent_compare_price_serializes_empty() {
        let row = ProductRecord::default().to_row();
        assert_eq!(row[3], "");
    }
}
