use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, Widget},
};

use crate::statistics::{format_stat, ColumnStats};

/// Per-column statistics table shown beside the chart.
pub struct StatsPanel<'a> {
    stats: &'a [(String, ColumnStats)],
    border_color: Color,
    header_color: Color,
    dimmed: Color,
}

impl<'a> StatsPanel<'a> {
    pub fn new(stats: &'a [(String, ColumnStats)]) -> Self {
        Self {
            stats,
            border_color: Color::Cyan,
            header_color: Color::White,
            dimmed: Color::DarkGray,
        }
    }

    pub fn with_colors(mut self, border: Color, header: Color, dimmed: Color) -> Self {
        self.border_color = border;
        self.header_color = header;
        self.dimmed = dimmed;
        self
    }
}

impl Widget for &StatsPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.border_color))
            .title(" Statistics ");

        if self.stats.is_empty() {
            Paragraph::new("No numeric columns")
                .style(Style::default().fg(self.dimmed))
                .centered()
                .block(block)
                .render(area, buf);
            return;
        }

        let header = Row::new(["Column", "Min", "Max", "Avg", "Sum", "Count"]).style(
            Style::default()
                .fg(self.header_color)
                .add_modifier(Modifier::BOLD),
        );
        let rows = self.stats.iter().map(|(name, s)| {
            Row::new(vec![
                Cell::from(name.clone()),
                Cell::from(format_stat(s.min)),
                Cell::from(format_stat(s.max)),
                Cell::from(format_stat(s.avg)),
                Cell::from(format_stat(s.sum)),
                Cell::from(s.count.to_string()),
            ])
        });
        let widths = [
            Constraint::Fill(2),
            Constraint::Fill(1),
            Constraint::Fill(1),
            Constraint::Fill(1),
            Constraint::Fill(1),
            Constraint::Length(5),
        ];

        Widget::render(Table::new(rows, widths).header(header).block(block), area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_stats_rows() {
        let stats = vec![(
            "age".to_string(),
            ColumnStats::from_values([30.0, 40.0]).unwrap(),
        )];
        let area = Rect::new(0, 0, 70, 5);
        let mut buf = Buffer::empty(area);
        StatsPanel::new(&stats).render(area, &mut buf);
        let text: String = (0..area.height)
            .flat_map(|y| (0..area.width).map(move |x| (x, y)))
            .map(|p| buf[p].symbol().to_string())
            .collect();
        assert!(text.contains("Statistics"));
        assert!(text.contains("age"));
        assert!(text.contains("35"));
        assert!(text.contains("70"));
    }
}
