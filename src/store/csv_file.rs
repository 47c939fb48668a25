use crate::core::bank::BankRecord;
use anyhow::{Context, Result};
use std::fs::OpenOptions;
use std::path::Path;
use tracing::debug;

/// Writes all records to `file_path`, truncating any previous file.
/// Serialization emits the header row from the record's field names, so
/// the column order is the record's field order.
pub fn write_records<P: AsRef<Path>>(records: &[BankRecord], file_path: P) -> Result<()> {
    let path = file_path.as_ref();
    let file = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(path)
        .with_context(|| format!("Failed to create output CSV file: {}", path.display()))?;

    let mut writer = csv::Writer::from_writer(file);
    for record in records {
        writer
            .serialize(record)
            .with_context(|| format!("Failed to write record for '{}'", record.name))?;
    }
    writer
        .flush()
        .with_context(|| format!("Failed to flush output CSV file: {}", path.display()))?;

    debug!("Wrote {} records to {}", records.len(), path.display());
    Ok(())
}
