//! Column selection for flat tabular exports.
//!
//! Columns follow a fixed order. A column is included only when at least
//! one row carries it; missing columns are never synthesized.

use crate::models::record::{CleanRecord, DuplicateRecord, Field, RawRecord};

/// Record columns in export order.
pub const STANDARD_COLUMNS: [&str; 8] = [
    "first_name",
    "last_name",
    "mobile",
    "address",
    "email",
    "dateofbirth",
    "landline",
    "lastseen",
];

/// Per-document columns appended on request.
pub const METADATA_COLUMNS: [&str; 2] = ["file_name", "extraction_date"];

/// Columns appended to duplicate reports.
pub const DUPLICATE_COLUMNS: [&str; 2] = ["duplicate_key", "duplicate_count"];

/// A row that can be exported column by column.
pub trait Tabular {
    /// Cell value, or `None` when the row does not carry the column.
    fn cell(&self, column: &str) -> Option<String>;
}

impl Tabular for RawRecord {
    fn cell(&self, column: &str) -> Option<String> {
        self.get(Field::from_column(column)?).map(str::to_string)
    }
}

impl Tabular for CleanRecord {
    fn cell(&self, column: &str) -> Option<String> {
        Some(self.get(Field::from_column(column)?).to_string())
    }
}

impl Tabular for DuplicateRecord {
    fn cell(&self, column: &str) -> Option<String> {
        match column {
            "duplicate_key" => Some(self.duplicate_key.clone()),
            "duplicate_count" => Some(self.duplicate_count.to_string()),
            _ => self.record.cell(column),
        }
    }
}

impl<T: Tabular + ?Sized> Tabular for &T {
    fn cell(&self, column: &str) -> Option<String> {
        (**self).cell(column)
    }
}

/// A row tagged with the document it came from.
#[derive(Debug, Clone)]
pub struct Tagged<T> {
    pub row: T,
    pub file_name: String,
    pub extraction_date: String,
}

impl<T> Tagged<T> {
    pub fn new(row: T, file_name: impl Into<String>, extraction_date: impl Into<String>) -> Self {
        Self {
            row,
            file_name: file_name.into(),
            extraction_date: extraction_date.into(),
        }
    }
}

impl<T: Tabular> Tabular for Tagged<T> {
    fn cell(&self, column: &str) -> Option<String> {
        match column {
            "file_name" => Some(self.file_name.clone()),
            "extraction_date" => Some(self.extraction_date.clone()),
            _ => self.row.cell(column),
        }
    }
}

/// Rows laid out under a selected header.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    pub columns: Vec<&'static str>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Candidate columns for record exports.
pub fn record_columns(include_metadata: bool) -> Vec<&'static str> {
    let mut columns = STANDARD_COLUMNS.to_vec();
    if include_metadata {
        columns.extend(METADATA_COLUMNS);
    }
    columns
}

/// Candidate columns for duplicate exports.
pub fn duplicate_columns(include_metadata: bool) -> Vec<&'static str> {
    let mut columns = record_columns(include_metadata);
    columns.extend(DUPLICATE_COLUMNS);
    columns
}

/// Lay rows out under the candidate columns that at least one row carries.
pub fn build_table<T: Tabular>(rows: &[T], candidates: &[&'static str]) -> Table {
    let columns: Vec<&'static str> = candidates
        .iter()
        .copied()
        .filter(|column| rows.iter().any(|row| row.cell(column).is_some()))
        .collect();

    let rows = rows
        .iter()
        .map(|row| {
            columns
                .iter()
                .map(|column| row.cell(column).unwrap_or_default())
                .collect()
        })
        .collect();

    Table { columns, rows }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::record::EntityKind;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_raw_records_omit_absent_columns() {
        let mut jane = RawRecord::from_name("Jane Smith").unwrap();
        jane.set(EntityKind::Mobile, "0412345678".into());
        let mut john = RawRecord::from_name("John").unwrap();
        john.set(EntityKind::Email, "john@example.com".into());

        let table = build_table(&[jane, john], &record_columns(false));
        assert_eq!(table.columns, vec!["first_name", "last_name", "mobile", "email"]);
        assert_eq!(table.rows[0], vec!["Jane", "Smith", "0412345678", ""]);
        assert_eq!(table.rows[1], vec!["John", "", "", "john@example.com"]);
    }

    #[test]
    fn test_clean_records_have_every_column() {
        let table = build_table(&[CleanRecord::default()], &record_columns(false));
        assert_eq!(table.columns, STANDARD_COLUMNS.to_vec());
    }

    #[test]
    fn test_metadata_only_when_tagged() {
        let record = CleanRecord::default();

        let untagged = build_table(&[&record], &record_columns(true));
        assert!(!untagged.columns.contains(&"file_name"));

        let tagged = build_table(
            &[Tagged::new(&record, "scan.pdf", "2024-05-01 10:00:00")],
            &record_columns(true),
        );
        assert_eq!(&tagged.columns[8..], &["file_name", "extraction_date"]);
        assert_eq!(tagged.rows[0][8], "scan.pdf");
    }

    #[test]
    fn test_duplicate_columns() {
        let duplicate = DuplicateRecord {
            record: CleanRecord {
                mobile: "0412345678".into(),
                ..CleanRecord::default()
            },
            duplicate_key: "0412345678".into(),
            duplicate_count: 2,
        };

        let table = build_table(&[duplicate], &duplicate_columns(false));
        assert_eq!(table.columns.len(), 10);
        assert_eq!(table.rows[0][8], "0412345678");
        assert_eq!(table.rows[0][9], "2");
    }

    #[test]
    fn test_empty_rows() {
        let rows: Vec<CleanRecord> = Vec::new();
        let table = build_table(&rows, &record_columns(false));
        assert!(table.columns.is_empty());
        assert!(table.is_empty());
    }
}
