//! CSV output sink
//!
//! One write at the end of a run: records accumulate in memory and land on
//! disk in a single pass, so a run that dies mid-walk leaves no partial
//! file behind.

use std::path::Path;

use tracing::info;

use crate::error::ScrapeResult;
use crate::extract::{CSV_HEADERS, ProductRecord};

/// Write all records to `path`, header row first
///
/// Overwrites any existing file. A missing parent directory is created so
/// a nested output path works on first run.
pub fn write_records(path: &Path, records: &[ProductRecord]) -> ScrapeResult<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }

    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(CSV_HEADERS)?;
    for record in records {
        writer.write_record(record.to_row())?;
    }
    writer.flush()?;

    info!(path = %path.display(), rows = records.len(), "wrote CSV output");
    Ok(())
}
