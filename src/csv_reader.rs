// CSV loading for source tables

use anyhow::{Context, Result};
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

/// Raw CSV contents: header row plus string records
#[derive(Debug, Clone, PartialEq)]
pub struct CsvData {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Read CSV data from stdin
pub fn read_csv_from_stdin() -> Result<CsvData> {
    read_csv(io::stdin().lock())
}

/// Read CSV data from a file on disk
pub fn read_csv_from_path(path: &Path) -> Result<CsvData> {
    let file = File::open(path).with_context(|| format!("Failed to open '{}'", path.display()))?;
    read_csv(file).with_context(|| format!("Failed to read CSV from '{}'", path.display()))
}

/// Read CSV data from any reader. Records may be shorter or longer than the header.
pub fn read_csv<R: Read>(reader: R) -> Result<CsvData> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers: Vec<String> = rdr
        .headers()
        .context("Failed to read CSV header row")?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    if headers.is_empty() {
        anyhow::bail!("CSV input has no header row");
    }

    let mut rows = Vec::new();
    for (idx, record) in rdr.records().enumerate() {
        let record = record.with_context(|| format!("Failed to parse CSV record {}", idx + 1))?;
        rows.push(record.iter().map(|field| field.to_string()).collect());
    }

    Ok(CsvData { headers, rows })
}
