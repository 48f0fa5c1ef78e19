//! Pipeline behavior that runs without a browser: listing-card overrides,
//! the error taxonomy the retry layer keys off, and the discovery-to-record
//! composition.

use std::collections::HashSet;

use shopscrape::error::ScrapeError;
use shopscrape::extract::{self, ProductRecord};
use shopscrape::listing::{ListingEntry, harvest_entries};
use shopscrape::pipeline::apply_listing_overrides;
use shopscrape::renderer::RenderedPage;

fn entry(title: &str, thumbnail: &str) -> ListingEntry {
    ListingEntry {
        url: "https://shop.example.com/listing/1".to_string(),
        title: title.to_string(),
        price: "$10.00".to_string(),
        thumbnail: thumbnail.to_string(),
    }
}

fn extracted_record() -> ProductRecord {
    ProductRecord {
        name: "Extracted Name".to_string(),
        image: "https://img.example/extracted.jpg".to_string(),
        ..ProductRecord::default()
    }
}

#[test]
fn card_title_replaces_extracted_name() {
    let mut record = extracted_record();
    apply_listing_overrides(&mut record, &entry("Card Title", ""));

    assert_eq!(record.name, "Card Title");
    assert_eq!(record.image, "https://img.example/extracted.jpg");
}

#[test]
fn placeholder_card_title_keeps_extracted_name() {
    let mut record = extracted_record();
    apply_listing_overrides(&mut record, &entry("Unknown", ""));
    assert_eq!(record.name, "Extracted Name");

    let mut record = extracted_record();
    apply_listing_overrides(&mut record, &entry("", ""));
    assert_eq!(record.name, "Extracted Name");
}

#[test]
fn card_thumbnail_replaces_extracted_image() {
    let mut record = extracted_record();
    apply_listing_overrides(&mut record, &entry("", "https://img.example/thumb.jpg"));

    assert_eq!(record.image, "https://img.example/thumb.jpg");
}

#[test]
fn discovery_extraction_and_overrides_compose() {
    let listing = RenderedPage {
        url: "https://shop.example.com/shop/AtlasCopperWorks".to_string(),
        html: r#"<html><body>
          <a href="/listing/88?ref=grid"><h3>Lamp</h3></a>
          <a href="/listing/88?ref=featured&pos=4"><h3>Lamp</h3></a>
        </body></html>"#
            .to_string(),
    };
    let mut seen = HashSet::new();
    let entries = harvest_entries(&listing, &mut seen);
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].url, "https://shop.example.com/listing/88");

    let detail = RenderedPage {
        url: entries[0].url.clone(),
        html: r#"<html><body>
          <h1 class="text-title">Lamp</h1>
          <span class="currency-value">$20</span>
        </body></html>"#
            .to_string(),
    };
    let mut record = extract::extract(&detail);
    apply_listing_overrides(&mut record, &entries[0]);

    assert_eq!(record.name, "Lamp");
    assert_eq!(record.price, 20.0);
    assert_eq!(record.compare_price, None);
    assert!(record.is_active);
    assert!(!record.is_featured);
}

#[test]
fn transient_and_permanent_errors_classify_correctly() {
    let transient = [
        ScrapeError::RenderTimeout {
            selector: "h1".to_string(),
            timeout_secs: 15,
        },
        ScrapeError::Render {
            url: "https://shop.example.com/listing/1".to_string(),
            message: "net::ERR_CONNECTION_RESET".to_string(),
        },
        ScrapeError::Extraction {
            url: "https://shop.example.com/listing/1".to_string(),
            message: "empty document".to_string(),
        },
        ScrapeError::Fetch {
            url: "https://shop.example.com/listing/1".to_string(),
            message: "status 503".to_string(),
        },
    ];
    for error in transient {
        assert!(error.is_transient(), "{error} should be transient");
    }

    let permanent = [
        ScrapeError::Browser("tab crashed".to_string()),
        ScrapeError::Config("bad delay window".to_string()),
        ScrapeError::NoData {
            start_url: "https://shop.example.com".to_string(),
            pages_walked: 4,
        },
    ];
    for error in permanent {
        assert!(!error.is_transient(), "{error} should be permanent");
    }
}

#[test]
fn no_data_error_names_the_start_url_and_page_count() {
    let error = ScrapeError::NoData {
        start_url: "https://shop.example.com/shop/AtlasCopperWorks".to_string(),
        pages_walked: 3,
    };
    let message = error.to_string();

    assert!(message.contains("https://shop.example.com/shop/AtlasCopperWorks"));
    assert!(message.contains('3'));
}
