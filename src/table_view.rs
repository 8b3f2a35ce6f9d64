//! Table view state: quick filter, column sort, paging and row cursor.
//!
//! The view never copies rows; it holds the filtered and sorted row indices
//! into the session's dataset and recomputes them when the filter, sort or
//! dataset changes.

use std::cmp::Ordering;

use crate::classify::coerce_number;
use crate::dataset::{Dataset, Row};
use crate::pagination::{self, PageInfo};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortState {
    pub column: usize,
    pub descending: bool,
}

#[derive(Debug, Clone)]
pub struct TableView {
    filter: String,
    sort: Option<SortState>,
    /// Column under the cursor; target of sort requests.
    pub focused_column: usize,
    current_page: usize,
    page_size: usize,
    /// Row cursor within the current page.
    selected: usize,
    indices: Vec<usize>,
}

impl TableView {
    pub fn new(page_size: usize) -> Self {
        Self {
            filter: String::new(),
            sort: None,
            focused_column: 0,
            current_page: 1,
            page_size: page_size.max(1),
            selected: 0,
            indices: Vec::new(),
        }
    }

    /// Reset for a newly loaded dataset, keeping the page size.
    pub fn reset(&mut self, dataset: &Dataset) {
        *self = Self::new(self.page_size);
        self.refresh(dataset);
    }

    pub fn filter(&self) -> &str {
        &self.filter
    }

    pub fn sort(&self) -> Option<SortState> {
        self.sort
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Number of rows passing the filter.
    pub fn visible_count(&self) -> usize {
        self.indices.len()
    }

    pub fn page_info(&self) -> PageInfo {
        pagination::page_info(self.current_page, self.page_size, self.indices.len())
    }

    /// Dataset row indices shown on the current page.
    pub fn page_rows(&self) -> &[usize] {
        let info = self.page_info();
        if info.total_items == 0 {
            return &[];
        }
        &self.indices[info.start_item - 1..info.end_item]
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    /// Dataset index of the row under the cursor.
    pub fn selected_row(&self) -> Option<usize> {
        self.page_rows().get(self.selected).copied()
    }

    /// Recompute the visible indices. Page and cursor are clamped.
    pub fn refresh(&mut self, dataset: &Dataset) {
        let needle = self.filter.to_lowercase();
        let mut indices: Vec<usize> = dataset
            .rows
            .iter()
            .enumerate()
            .filter(|(_, row)| needle.is_empty() || row_matches(row, &dataset.headers, &needle))
            .map(|(i, _)| i)
            .collect();

        if let Some(sort) = self.sort {
            if let Some(header) = dataset.headers.get(sort.column) {
                indices.sort_by(|&a, &b| {
                    let ord = compare_cells(dataset.rows[a].get(header), dataset.rows[b].get(header));
                    if sort.descending {
                        ord.reverse()
                    } else {
                        ord
                    }
                });
            }
        }

        self.indices = indices;
        self.clamp(dataset.headers.len());
    }

    pub fn set_filter(&mut self, filter: &str, dataset: &Dataset) {
        if self.filter == filter {
            return;
        }
        self.filter = filter.to_string();
        self.current_page = 1;
        self.selected = 0;
        self.refresh(dataset);
    }

    /// Cycle the focused column through ascending, descending and unsorted.
    pub fn cycle_sort(&mut self, dataset: &Dataset) {
        let column = self.focused_column;
        self.sort = match self.sort {
            Some(s) if s.column == column && !s.descending => Some(SortState {
                column,
                descending: true,
            }),
            Some(s) if s.column == column => None,
            _ => Some(SortState {
                column,
                descending: false,
            }),
        };
        self.refresh(dataset);
    }

    pub fn focus_next_column(&mut self, column_count: usize) {
        if self.focused_column + 1 < column_count {
            self.focused_column += 1;
        }
    }

    pub fn focus_previous_column(&mut self) {
        self.focused_column = self.focused_column.saturating_sub(1);
    }

    pub fn go_to_page(&mut self, page: usize) {
        self.current_page = page;
        self.selected = 0;
        self.current_page = self.page_info().current_page;
    }

    pub fn next_page(&mut self) {
        self.go_to_page(self.current_page + 1);
    }

    pub fn previous_page(&mut self) {
        self.go_to_page(self.current_page.saturating_sub(1));
    }

    pub fn first_page(&mut self) {
        self.go_to_page(1);
    }

    pub fn last_page(&mut self) {
        self.go_to_page(self.page_info().total_pages);
    }

    /// Change page size and go back to the first page.
    pub fn set_page_size(&mut self, page_size: usize) {
        self.page_size = page_size.max(1);
        self.go_to_page(1);
    }

    pub fn select_next(&mut self) {
        let len = self.page_rows().len();
        if self.selected + 1 < len {
            self.selected += 1;
        } else if self.page_info().has_next() {
            self.next_page();
        }
    }

    pub fn select_previous(&mut self) {
        if self.selected > 0 {
            self.selected -= 1;
        } else if self.page_info().has_previous() {
            self.previous_page();
            self.selected = self.page_rows().len().saturating_sub(1);
        }
    }

    fn clamp(&mut self, column_count: usize) {
        self.current_page = self.page_info().current_page;
        self.selected = self.selected.min(self.page_rows().len().saturating_sub(1));
        self.focused_column = self.focused_column.min(column_count.saturating_sub(1));
        if self.sort.is_some_and(|s| s.column >= column_count) {
            self.sort = None;
        }
    }
}

/// Case-insensitive substring match over every cell of the row.
fn row_matches(row: &Row, headers: &[String], needle: &str) -> bool {
    headers
        .iter()
        .filter_map(|h| row.get(h))
        .any(|cell| cell.to_lowercase().contains(needle))
}

/// Numbers compare numerically, text case-insensitively, numbers before
/// text, missing cells last.
fn compare_cells(a: Option<&str>, b: Option<&str>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(a), Some(b)) => match (coerce_number(a), coerce_number(b)) {
            (Some(x), Some(y)) => x.total_cmp(&y),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => a.to_lowercase().cmp(&b.to_lowercase()),
        },
    }
}
