//! Project dataset rows into bounded, chart-ready records.

use std::collections::HashMap;

use crate::classify::parse_float_prefix;
use crate::dataset::Row;

/// Number of leading rows charted by default. Keeps chart rendering small.
pub const DISPLAY_CAP: usize = 50;

/// One chart-ready record derived from a source row.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartRecord<'a> {
    /// 1-based position in the source.
    pub index: usize,
    /// First column's value, or "Row N".
    pub name: String,
    pub original: &'a Row,
    values: HashMap<String, f64>,
}

impl ChartRecord<'_> {
    /// Coerced value of a numeric column; 0 for columns not projected.
    pub fn value(&self, header: &str) -> f64 {
        self.values.get(header).copied().unwrap_or(0.0)
    }
}

/// Float-prefix coercion with 0 for blank, invalid or non-finite text.
pub fn coerce_cell(text: Option<&str>) -> f64 {
    text.and_then(parse_float_prefix).unwrap_or(0.0)
}

/// Project the first `cap` rows. Output order is source order; every
/// numeric field is finite.
pub fn project<'a>(
    rows: &'a [Row],
    headers: &[String],
    numeric_headers: &[String],
    cap: usize,
) -> Vec<ChartRecord<'a>> {
    let name_header = headers.first();
    rows.iter()
        .take(cap)
        .enumerate()
        .map(|(i, row)| {
            let index = i + 1;
            let name = name_header
                .and_then(|h| row.get(h))
                .map(str::to_string)
                .unwrap_or_else(|| format!("Row {index}"));
            let values = numeric_headers
                .iter()
                .map(|h| (h.clone(), coerce_cell(row.get(h))))
                .collect();
            ChartRecord {
                index,
                name,
                original: row,
                values,
            }
        })
        .collect()
}

/// `(index, value)` points of one column, for line/scatter plots.
pub fn series_points(records: &[ChartRecord<'_>], header: &str) -> Vec<(f64, f64)> {
    records
        .iter()
        .map(|r| (r.index as f64, r.value(header)))
        .collect()
}

/// Format a numeric axis tick.
pub fn format_axis_label(v: f64) -> String {
    if v.abs() >= 1e6 || (v.abs() < 1e-2 && v != 0.0) {
        format!("{:.2e}", v)
    } else {
        format!("{:.2}", v)
    }
}
