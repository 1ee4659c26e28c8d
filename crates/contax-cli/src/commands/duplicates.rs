//! Duplicates command - report records sharing a key field.

use std::fs;
use std::path::{Path, PathBuf};

use clap::Args;
use console::style;
use tracing::info;

use contax_core::contact::report_duplicates;
use contax_core::export::{build_table, duplicate_columns};
use contax_core::{CleanRecord, Field};

use crate::output::table_to_string;

/// Arguments for the duplicates command.
#[derive(Args)]
pub struct DuplicatesArgs {
    /// Records CSV, e.g. a batch run's filtered_data.csv
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Field used as the duplicate key (overrides config)
    #[arg(short, long)]
    key: Option<Field>,

    /// Leave records with an empty key out of the report
    #[arg(long)]
    skip_empty: bool,
}

pub async fn run(args: DuplicatesArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let mut config = super::load_config(config_path)?.duplicates;
    if let Some(key) = args.key {
        config.key_field = key;
    }
    if args.skip_empty {
        config.skip_empty_keys = true;
    }

    let records = read_records(&args.input)?;
    info!("Read {} records from {}", records.len(), args.input.display());

    let duplicates = report_duplicates(&records, &config);
    if duplicates.is_empty() {
        eprintln!(
            "{} No duplicate {} values among {} records",
            style("✓").green(),
            config.key_field,
            records.len()
        );
        return Ok(());
    }

    let table = build_table(&duplicates, &duplicate_columns(false));
    let output = table_to_string(&table)?;

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} {} duplicate records written to {}",
            style("!").yellow(),
            duplicates.len(),
            output_path.display()
        );
    } else {
        print!("{}", output);
    }

    Ok(())
}

/// Read clean records from a CSV with a header row.
///
/// Missing columns read as empty strings; extra columns are ignored.
fn read_records(path: &Path) -> anyhow::Result<Vec<CleanRecord>> {
    let mut rdr = csv::Reader::from_path(path)?;
    let mut records = Vec::new();
    for row in rdr.deserialize() {
        records.push(row?);
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_records_tolerates_partial_columns() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("records.csv");
        fs::write(
            &path,
            "first_name,last_name,mobile,file_name\nJane,Smith,0412345678,a.pdf\nJohn,,0412345678,b.pdf\n",
        )
        .unwrap();

        let records = read_records(&path).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].mobile, "0412345678");
        assert_eq!(records[1].last_name, "");
        assert_eq!(records[1].address, "");
    }
}
