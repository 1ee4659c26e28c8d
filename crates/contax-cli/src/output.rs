//! CSV and JSON writers for command output.

use std::fs;
use std::io;
use std::path::Path;

use tracing::debug;

use contax_core::export::{build_table, record_columns, Table, Tabular, Tagged};
use contax_core::DocumentResult;

/// Timestamp format of the `extraction_date` column.
const EXTRACTION_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub fn extraction_date(document: &DocumentResult) -> String {
    document.processed_at.format(EXTRACTION_DATE_FORMAT).to_string()
}

/// Lay out one record list per document as a single table.
///
/// With `include_metadata` every row is tagged with its document's file
/// name and processing time.
pub fn document_table<'a, T, F>(documents: &'a [DocumentResult], select: F, include_metadata: bool) -> Table
where
    T: Tabular + 'a,
    F: Fn(&'a DocumentResult) -> &'a [T],
{
    let columns = record_columns(include_metadata);

    if include_metadata {
        let rows: Vec<Tagged<&T>> = documents
            .iter()
            .flat_map(|document| {
                let date = extraction_date(document);
                select(document)
                    .iter()
                    .map(move |row| Tagged::new(row, document.file_name.clone(), date.clone()))
            })
            .collect();
        build_table(&rows, &columns)
    } else {
        let rows: Vec<&T> = documents.iter().flat_map(|d| select(d).iter()).collect();
        build_table(&rows, &columns)
    }
}

fn write_table_to<W: io::Write>(mut wtr: csv::Writer<W>, table: &Table) -> anyhow::Result<W> {
    wtr.write_record(&table.columns)?;
    for row in &table.rows {
        wtr.write_record(row)?;
    }
    wtr.flush()?;
    Ok(wtr.into_inner().map_err(|e| e.into_error())?)
}

/// Write a table as CSV. Returns `false` without touching the file when
/// the table has no rows.
pub fn write_table(path: &Path, table: &Table) -> anyhow::Result<bool> {
    if table.is_empty() {
        debug!("No rows for {}, skipping", path.display());
        return Ok(false);
    }

    write_table_to(csv::Writer::from_path(path)?, table)?;
    debug!("Wrote {} rows to {}", table.rows.len(), path.display());
    Ok(true)
}

pub fn table_to_string(table: &Table) -> anyhow::Result<String> {
    let data = write_table_to(csv::Writer::from_writer(vec![]), table)?;
    Ok(String::from_utf8(data)?)
}

/// Write two-column rows under a header.
pub fn write_pairs(path: &Path, header: [&str; 2], rows: &[(String, String)]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;
    wtr.write_record(header)?;
    for (key, value) in rows {
        wtr.write_record([key, value])?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_json<T: serde::Serialize>(path: &Path, value: &T) -> anyhow::Result<()> {
    fs::write(path, serde_json::to_string_pretty(value)?)?;
    debug!("Wrote {}", path.display());
    Ok(())
}
