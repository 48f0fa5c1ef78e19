//! CSV output format: header order, cell formatting, overwrite semantics

use shopscrape::extract::{CSV_HEADERS, ProductRecord};
use shopscrape::sink::write_records;
use tempfile::TempDir;

fn sample_record() -> ProductRecord {
    ProductRecord {
        name: "Copper Lamp".to_string(),
        price: 45.5,
        compare_price: Some(60.0),
        is_featured: true,
        ..ProductRecord::default()
    }
}

#[test]
fn header_row_matches_schema_order_exactly() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("products.csv");
    write_records(&path, &[sample_record()]).unwrap();

    let contents = std::fs::read_to_string(&path).unwrap();
    let first_line = contents.lines().next().unwrap();
    assert_eq!(first_line, CSV_HEADERS.join(","));
}

#[test]
fn rows_serialize_with_import_friendly_cells() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("products.csv");
    write_records(&path, &[sample_record(), ProductRecord::default()]).unwrap();

    let mut reader = csv::Reader::from_path(&path).unwrap();
    let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
    assert_eq!(rows.len(), 2);

    let sample = &rows[0];
    assert_eq!(sample.len(), CSV_HEADERS.len());
    assert_eq!(&sample[0], "Copper Lamp");
    assert_eq!(&sample[2], "45.5");
    assert_eq!(&sample[3], "60");
    assert_eq!(&sample[13], "TRUE");
    assert_eq!(&sample[14], "TRUE");

    // Absent compare price is an empty cell, not a zero
    let defaulted = &rows[1];
    assert_eq!(&defaulted[3], "");
    assert_eq!(&defaulted[13], "FALSE");
}

#[test]
fn nested_output_path_is_created() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("out").join("nested").join("products.csv");
    write_records(&path, &[sample_record()]).unwrap();

    assert!(path.exists());
}

#[test]
fn rerun_overwrites_instead_of_appending() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("products.csv");

    write_records(&path, &[sample_record(), sample_record()]).unwrap();
    write_records(&path, &[sample_record()]).unwrap();

    let mut reader = csv::Reader::from_path(&path).unwrap();
    assert_eq!(reader.records().count(), 1);
}
