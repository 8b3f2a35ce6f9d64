//! CSV ingestion: a record-level check with the `csv` reader, then polars
//! reads the cleaned text as all-text columns and it becomes a [`Dataset`].

use std::collections::HashSet;
use std::io::Cursor;
use std::path::Path;

use chartgrid_cli::has_csv_extension;
use polars::prelude::*;
use thiserror::Error;

use crate::dataset::{Dataset, Row};
use crate::error_display::user_message_from_polars;

/// Errors surfaced at the ingestion boundary. None of them are fatal; the
/// previously loaded dataset stays in place.
#[derive(Error, Debug)]
pub enum IngestError {
    /// File name does not end in `.csv`
    #[error("Please upload a CSV file.")]
    Format(std::path::PathBuf),

    /// Reader failure or malformed content
    #[error("Error parsing CSV file. Please check the format. ({0})")]
    Parse(String),

    /// Header row only, or nothing at all
    #[error("The CSV file appears to be empty.")]
    EmptyData,
}

impl IngestError {
    fn from_polars(err: PolarsError) -> Self {
        match err {
            PolarsError::NoData(_) => IngestError::EmptyData,
            PolarsError::IO { ref error, .. } => IngestError::Parse(format!(
                "Failed to read the CSV file: {}",
                crate::error_display::user_message_from_io(error, None)
            )),
            other => IngestError::Parse(user_message_from_polars(&other)),
        }
    }
}

/// Header row on, schema inference off: every column is read as text.
fn read_options() -> CsvReadOptions {
    let mut options = CsvReadOptions::default();
    options.has_header = true;
    options.infer_schema_length = Some(0);
    options
}

/// Load a CSV file from disk.
pub fn load_csv(path: &Path) -> Result<Dataset, IngestError> {
    if !has_csv_extension(path) {
        tracing::debug!(path = %path.display(), "rejected non-csv file");
        return Err(IngestError::Format(path.to_path_buf()));
    }

    let bytes = std::fs::read(path).map_err(|e| {
        IngestError::Parse(format!(
            "Failed to read the CSV file: {}",
            crate::error_display::user_message_from_io(&e, None)
        ))
    })?;

    let dataset = parse(&bytes)?.with_source(path.to_path_buf());
    tracing::info!(
        path = %path.display(),
        rows = dataset.row_count(),
        columns = dataset.headers.len(),
        "loaded csv"
    );
    Ok(dataset)
}

/// Parse CSV text held in memory. No file-name check is applied.
pub fn load_csv_from_bytes(bytes: impl Into<Vec<u8>>) -> Result<Dataset, IngestError> {
    parse(&bytes.into())
}

fn parse(bytes: &[u8]) -> Result<Dataset, IngestError> {
    let checked = check_structure(bytes)?;
    let df = CsvReader::new(Cursor::new(checked.cleaned))
        .with_options(read_options())
        .finish()
        .map_err(IngestError::from_polars)?;
    dataset_from_frame(&df, checked.headers)
}

/// Source text with blank lines removed, plus the trimmed header names.
struct CheckedCsv {
    headers: Vec<String>,
    cleaned: Vec<u8>,
}

/// Record-level pass over the raw text: header names must be unique after
/// trimming, every record must have as many fields as the header, and
/// empty lines are dropped.
fn check_structure(bytes: &[u8]) -> Result<CheckedCsv, IngestError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(false)
        .from_reader(bytes);

    let header_record = reader.headers().map_err(record_error)?.clone();
    if header_record.is_empty() {
        return Err(IngestError::EmptyData);
    }
    let headers: Vec<String> = header_record.iter().map(|h| h.trim().to_string()).collect();

    let mut seen = HashSet::with_capacity(headers.len());
    for header in &headers {
        if !seen.insert(header.as_str()) {
            return Err(IngestError::Parse(format!(
                "Duplicate column name: {header}"
            )));
        }
    }

    let mut starts = vec![header_record.position().map_or(0, |p| p.byte() as usize)];
    for record in reader.records() {
        let record = record.map_err(record_error)?;
        if let Some(pos) = record.position() {
            starts.push(pos.byte() as usize);
        }
    }
    if starts.len() == 1 {
        return Err(IngestError::EmptyData);
    }

    // each record runs to the next record's first byte; the line breaks
    // (and any blank lines) in between are replaced by a single newline
    let mut cleaned = Vec::with_capacity(bytes.len());
    for (i, &start) in starts.iter().enumerate() {
        let end = starts.get(i + 1).copied().unwrap_or(bytes.len());
        let mut slice = &bytes[start..end];
        while let [b'\n' | b'\r', rest @ ..] = slice {
            slice = rest;
        }
        while let [rest @ .., b'\n' | b'\r'] = slice {
            slice = rest;
        }
        cleaned.extend_from_slice(slice);
        cleaned.push(b'\n');
    }

    Ok(CheckedCsv { headers, cleaned })
}

fn record_error(err: csv::Error) -> IngestError {
    match err.kind() {
        csv::ErrorKind::UnequalLengths {
            pos,
            expected_len,
            len,
        } => {
            let line = pos.as_ref().map(|p| p.line()).unwrap_or_default();
            IngestError::Parse(format!(
                "line {line}: expected {expected_len} fields but found {len}"
            ))
        }
        csv::ErrorKind::Utf8 { .. } => {
            IngestError::Parse("the file is not valid UTF-8 text".to_string())
        }
        _ => IngestError::Parse(err.to_string()),
    }
}

fn dataset_from_frame(df: &DataFrame, headers: Vec<String>) -> Result<Dataset, IngestError> {
    if df.height() == 0 {
        return Err(IngestError::EmptyData);
    }

    let mut rows = vec![Row::new(); df.height()];
    for (column, header) in df.get_columns().iter().zip(&headers) {
        let values = column.str().map_err(IngestError::from_polars)?;
        for (row, value) in rows.iter_mut().zip(values.into_iter()) {
            if let Some(value) = value {
                row.insert(header.clone(), value.to_string());
            }
        }
    }

    Ok(Dataset::new(headers, rows))
}
