use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Cell, Paragraph, Row, StatefulWidget, Table, TableState, Widget},
};

use crate::cell_format::{format_cell, humanize_header, CellKind, CellTone, Currency};
use crate::config::Theme;
use crate::dataset::Dataset;
use crate::pagination::{visible_pages, PageInfo, PageToken};
use crate::table_view::TableView;

/// Paginated table of the current dataset with a pager footer.
pub struct DataTable<'a> {
    dataset: &'a Dataset,
    view: &'a TableView,
    kinds: &'a [CellKind],
    currency: Currency,
    row_numbers: bool,
    alternate_row_bg: Option<Color>,
    cell_padding: u16,
    header_fg: Color,
    focus_fg: Color,
    dimmed_fg: Color,
    active_fg: Color,
    inactive_fg: Color,
    highlight_fg: Color,
}

impl<'a> DataTable<'a> {
    pub fn new(dataset: &'a Dataset, view: &'a TableView, kinds: &'a [CellKind]) -> Self {
        Self {
            dataset,
            view,
            kinds,
            currency: Currency::default(),
            row_numbers: false,
            alternate_row_bg: None,
            cell_padding: 2,
            header_fg: Color::White,
            focus_fg: Color::Cyan,
            dimmed_fg: Color::DarkGray,
            active_fg: Color::Green,
            inactive_fg: Color::Red,
            highlight_fg: Color::Red,
        }
    }

    pub fn with_theme(mut self, theme: &Theme) -> Self {
        self.header_fg = theme.get("table_header");
        self.focus_fg = theme.get("primary");
        self.dimmed_fg = theme.get("dimmed");
        self.active_fg = theme.get("status_active");
        self.inactive_fg = theme.get("status_inactive");
        self.highlight_fg = theme.get("price_highlight");
        self
    }

    pub fn with_currency(mut self, currency: Currency) -> Self {
        self.currency = currency;
        self
    }

    pub fn with_row_numbers(mut self, row_numbers: bool) -> Self {
        self.row_numbers = row_numbers;
        self
    }

    pub fn with_alternate_row_bg(mut self, color: Option<Color>) -> Self {
        self.alternate_row_bg = color;
        self
    }

    fn tone_style(&self, tone: CellTone) -> Style {
        match tone {
            CellTone::Normal => Style::default(),
            CellTone::Positive => Style::default().fg(self.active_fg),
            CellTone::Negative => Style::default().fg(self.inactive_fg),
            CellTone::Highlight => Style::default()
                .fg(self.highlight_fg)
                .add_modifier(Modifier::BOLD),
            CellTone::Muted => Style::default().fg(self.dimmed_fg),
        }
    }

    fn header_title(&self, column: usize, header: &str) -> String {
        let arrow = match self.view.sort() {
            Some(s) if s.column == column && s.descending => " ▼",
            Some(s) if s.column == column => " ▲",
            _ => "",
        };
        format!("{}{}", humanize_header(header), arrow)
    }

    fn render_table(&self, area: Rect, buf: &mut Buffer) {
        let headers = &self.dataset.headers;
        let page_rows = self.view.page_rows();
        let first_item = self.view.page_info().start_item;

        // formatted cells for the visible page, column-major widths
        let mut widths: Vec<u16> = headers
            .iter()
            .enumerate()
            .map(|(i, h)| self.header_title(i, h).chars().count() as u16)
            .collect();
        let cells: Vec<Vec<(String, CellTone)>> = page_rows
            .iter()
            .map(|&row_index| {
                let row = &self.dataset.rows[row_index];
                headers
                    .iter()
                    .enumerate()
                    .map(|(col, header)| {
                        let kind = self.kinds.get(col).copied().unwrap_or(CellKind::Plain);
                        let formatted = format_cell(kind, row.get(header), self.currency);
                        widths[col] = widths[col].max(formatted.text.chars().count() as u16);
                        (formatted.text, formatted.tone)
                    })
                    .collect()
            })
            .collect();

        let number_width = if self.row_numbers {
            (first_item + cells.len()).to_string().len() as u16
        } else {
            0
        };

        // scroll horizontally so the focused column is on screen
        let available = area.width.saturating_sub(number_width);
        let focused = self.view.focused_column.min(headers.len().saturating_sub(1));
        let mut first_col = 0;
        while first_col < focused {
            let used: u16 = widths[first_col..=focused]
                .iter()
                .map(|w| w + self.cell_padding)
                .sum();
            if used <= available {
                break;
            }
            first_col += 1;
        }
        let mut used_width = 0;
        let mut last_col = first_col;
        while last_col < headers.len() {
            let w = widths[last_col];
            if used_width + w > available && last_col > first_col {
                break;
            }
            used_width += w + self.cell_padding;
            last_col += 1;
        }
        let visible = first_col..last_col;

        let mut constraints: Vec<Constraint> = Vec::new();
        if self.row_numbers {
            constraints.push(Constraint::Length(number_width));
        }
        constraints.extend(widths[visible.clone()].iter().map(|w| Constraint::Length(*w)));

        let rows: Vec<Row> = cells
            .into_iter()
            .enumerate()
            .map(|(i, row_cells)| {
                let mut row: Vec<Cell> = Vec::new();
                if self.row_numbers {
                    row.push(
                        Cell::from(format!("{:>width$}", first_item + i, width = number_width as usize))
                            .style(Style::default().fg(self.dimmed_fg)),
                    );
                }
                row.extend(
                    row_cells[visible.clone()]
                        .iter()
                        .map(|(text, tone)| Cell::from(text.clone()).style(self.tone_style(*tone))),
                );
                let row_style = match self.alternate_row_bg {
                    Some(bg) if i % 2 == 1 => Style::default().bg(bg),
                    _ => Style::default(),
                };
                Row::new(row).style(row_style)
            })
            .collect();

        let mut header_cells: Vec<Span> = Vec::new();
        if self.row_numbers {
            header_cells.push(Span::raw("#"));
        }
        header_cells.extend(visible.clone().map(|col| {
            let style = if col == focused {
                Style::default()
                    .fg(self.focus_fg)
                    .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
            } else {
                Style::default().fg(self.header_fg).add_modifier(Modifier::BOLD)
            };
            Span::styled(self.header_title(col, &headers[col]), style)
        }));

        let mut state = TableState::default();
        if !page_rows.is_empty() {
            state.select(Some(self.view.selected()));
        }

        StatefulWidget::render(
            Table::new(rows, constraints)
                .column_spacing(self.cell_padding)
                .header(Row::new(header_cells))
                .row_highlight_style(Style::default().add_modifier(Modifier::REVERSED)),
            area,
            buf,
            &mut state,
        );
    }
}

/// Footer text: item range, page window and page size.
pub fn pager_line(info: &PageInfo) -> Line<'static> {
    let mut spans = vec![Span::raw(format!(
        "Showing {}-{} of {}  ",
        info.start_item, info.end_item, info.total_items
    ))];
    for token in visible_pages(info.current_page, info.total_pages) {
        match token {
            PageToken::Page(n) if n == info.current_page => spans.push(Span::styled(
                format!("[{n}]"),
                Style::default().add_modifier(Modifier::BOLD),
            )),
            PageToken::Page(n) => spans.push(Span::raw(n.to_string())),
            PageToken::Ellipsis => spans.push(Span::raw("…")),
        }
        spans.push(Span::raw(" "));
    }
    spans.push(Span::raw(format!(" {} / page", info.page_size)));
    Line::from(spans)
}

impl Widget for &DataTable<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let [table_area, footer_area] = Layout::new(
            Direction::Vertical,
            [Constraint::Fill(1), Constraint::Length(1)],
        )
        .areas(area);

        if self.view.visible_count() == 0 {
            let message = if self.view.filter().is_empty() {
                "No rows".to_string()
            } else {
                format!("No rows match \"{}\"", self.view.filter())
            };
            Paragraph::new(message)
                .style(Style::default().fg(self.dimmed_fg))
                .centered()
                .render(table_area, buf);
        } else {
            self.render_table(table_area, buf);
        }

        Paragraph::new(pager_line(&self.view.page_info()))
            .style(Style::default().fg(self.dimmed_fg))
            .render(footer_area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell_format::CellFormatRegistry;
    use crate::dataset::Row as DataRow;
    use crate::pagination::page_info;

    fn text_of(buf: &Buffer) -> String {
        let area = buf.area;
        (0..area.height)
            .map(|y| {
                (0..area.width)
                    .map(|x| buf[(x, y)].symbol().to_string())
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn pager_shows_range_and_window() {
        let line = pager_line(&page_info(5, 10, 95));
        let text: String = line.spans.iter().map(|s| s.content.as_ref()).collect();
        assert!(text.starts_with("Showing 41-50 of 95"));
        assert!(text.contains("1 … 3 4 [5] 6 7 … 10"), "{text}");
        assert!(text.ends_with("10 / page"));
    }

    #[test]
    fn renders_humanized_headers_and_formatted_cells() {
        let ds = Dataset::new(
            vec!["name".into(), "joinDate".into(), "status".into()],
            vec![DataRow::from_pairs([
                ("name", "Alice"),
                ("joinDate", "2023-01-15"),
                ("status", "Active"),
            ])],
        );
        let mut view = TableView::new(10);
        view.refresh(&ds);
        let kinds = CellFormatRegistry::default().column_kinds(&ds.headers);

        let area = Rect::new(0, 0, 80, 5);
        let mut buf = Buffer::empty(area);
        DataTable::new(&ds, &view, &kinds).render(area, &mut buf);
        let text = text_of(&buf);
        assert!(text.contains("Join Date"), "{text}");
        assert!(text.contains("Jan 15, 2023"), "{text}");
        assert!(text.contains("Alice"));
        assert!(text.contains("Showing 1-1 of 1"));
    }

    #[test]
    fn empty_filter_result_shows_message() {
        let ds = Dataset::new(vec!["a".into()], vec![DataRow::from_pairs([("a", "1")])]);
        let mut view = TableView::new(10);
        view.set_filter("zzz", &ds);
        let kinds = vec![CellKind::Plain];
        let area = Rect::new(0, 0, 40, 4);
        let mut buf = Buffer::empty(area);
        DataTable::new(&ds, &view, &kinds).render(area, &mut buf);
        assert!(text_of(&buf).contains("No rows match"));
    }
}
