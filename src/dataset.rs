//! In-memory dataset: ordered headers plus rows keyed by header name.

use std::collections::HashMap;
use std::path::PathBuf;

/// One record of the loaded file. Empty cells are not stored.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    cells: HashMap<String, String>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a row from `(header, value)` pairs; empty values are dropped.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut row = Self::new();
        for (k, v) in pairs {
            row.insert(k.into(), v.into());
        }
        row
    }

    pub(crate) fn insert(&mut self, header: String, value: String) {
        if !value.is_empty() {
            self.cells.insert(header, value);
        }
    }

    /// Raw cell text, `None` when the cell is missing or empty.
    pub fn get(&self, header: &str) -> Option<&str> {
        self.cells.get(header).map(String::as_str)
    }

    /// Cell text or `""`.
    pub fn text(&self, header: &str) -> &str {
        self.get(header).unwrap_or("")
    }
}

/// A parsed CSV file. Never mutated after construction; replaced as a whole.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    pub headers: Vec<String>,
    pub rows: Vec<Row>,
    /// File the data came from, if any.
    pub source: Option<PathBuf>,
}

impl Dataset {
    pub fn new(headers: Vec<String>, rows: Vec<Row>) -> Self {
        Self {
            headers,
            rows,
            source: None,
        }
    }

    pub fn with_source(mut self, source: PathBuf) -> Self {
        self.source = Some(source);
        self
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// File name for display ("data.csv"), or "(memory)".
    pub fn display_name(&self) -> String {
        self.source
            .as_ref()
            .and_then(|p| p.file_name())
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "(memory)".to_string())
    }
}
