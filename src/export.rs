//! Table export to CSV and the chart export notice.

use color_eyre::Result;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::chart_options::ChartType;
use crate::dataset::Dataset;

/// File name written by [`write_csv`].
pub const EXPORT_FILE_NAME: &str = "exported-data.csv";

/// Wrap a cell in double quotes, doubling embedded quotes.
fn quote_cell(text: &str) -> String {
    format!("\"{}\"", text.replace('"', "\"\""))
}

/// Serialize the dataset: unquoted header line, then one line per row with
/// every cell quoted. Missing cells are written as `""`. Lines are joined
/// by `\n` with no trailing newline.
pub fn to_csv_string(dataset: &Dataset) -> String {
    let mut lines = Vec::with_capacity(dataset.row_count() + 1);
    lines.push(dataset.headers.join(","));
    for row in &dataset.rows {
        let cells: Vec<String> = dataset
            .headers
            .iter()
            .map(|h| quote_cell(row.text(h)))
            .collect();
        lines.push(cells.join(","));
    }
    lines.join("\n")
}

/// Write `exported-data.csv` into `dir`. Returns `Ok(None)` without touching
/// the filesystem when the dataset has no rows.
pub fn write_csv(dataset: &Dataset, dir: &Path) -> Result<Option<PathBuf>> {
    if dataset.is_empty() {
        tracing::debug!("export skipped: no rows");
        return Ok(None);
    }

    let path = dir.join(EXPORT_FILE_NAME);
    let mut out = BufWriter::new(File::create(&path)?);
    out.write_all(to_csv_string(dataset).as_bytes())?;
    out.flush()?;

    tracing::info!(path = %path.display(), rows = dataset.row_count(), "exported csv");
    Ok(Some(path))
}

/// Status text for a chart export request. No image is produced.
pub fn chart_export_message(chart_type: ChartType, data_points: usize) -> String {
    format!(
        "Exporting {} chart with {} data points",
        chart_type.as_str(),
        data_points
    )
}
