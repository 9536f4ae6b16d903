//! Tabular serialization of listing records: one CSV row per record,
//! nested structures JSON-encoded into their cells.

use std::io::Write;
use std::path::Path;

use oogoo_core::ListingRecord;

use crate::error::ExportError;

const HEADER: &[&str] = &[
    "brand",
    "price",
    "link",
    "model",
    "distance",
    "submitter",
    "submitter_relative_date",
    "specification",
    "description",
    "phone_number",
    "ad_id",
    "relative_date",
    "date_published",
];

/// Writes `records` to the CSV file at `path`.
///
/// # Errors
///
/// Returns [`ExportError`] if the file cannot be created or a row fails to
/// serialize.
pub fn write_category_csv(records: &[ListingRecord], path: &Path) -> Result<(), ExportError> {
    let file = std::fs::File::create(path)?;
    write_rows(records, file)
}

/// Writes the header and one row per record into `sink`.
///
/// # Errors
///
/// Returns [`ExportError`] if a row fails to serialize or the sink rejects
/// a write.
pub fn write_rows<W: Write>(records: &[ListingRecord], sink: W) -> Result<(), ExportError> {
    let mut writer = csv::Writer::from_writer(sink);
    writer.write_record(HEADER)?;

    for record in records {
        let specification =
            serde_json::to_string(&record.specification).map_err(|e| ExportError::Encode {
                context: "specification map".to_owned(),
                source: e,
            })?;
        let submitter_name = record
            .submitter
            .as_ref()
            .and_then(|s| s.name.as_deref())
            .unwrap_or_default();
        let submitter_date = record
            .submitter
            .as_ref()
            .and_then(|s| s.relative_date.as_deref())
            .unwrap_or_default();

        writer.write_record([
            record.brand.as_deref().unwrap_or_default(),
            record.price.as_deref().unwrap_or_default(),
            record.link.as_deref().unwrap_or_default(),
            record.title.model.as_deref().unwrap_or_default(),
            record.title.distance.as_deref().unwrap_or_default(),
            submitter_name,
            submitter_date,
            specification.as_str(),
            record.description.as_str(),
            record.phone_number.as_deref().unwrap_or_default(),
            record.ad_id.as_deref().unwrap_or_default(),
            record.relative_date.as_deref().unwrap_or_default(),
            record.date_published.as_deref().unwrap_or_default(),
        ])?;
    }

    writer.flush()?;
    Ok(())
}
