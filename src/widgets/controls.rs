use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style, Stylize},
    widgets::{Paragraph, Widget},
};

/// Key hints for the upload screen
pub const UPLOAD_CONTROLS: &[(&str, &str)] = &[("Enter", "Load"), ("Esc", "Back"), ("^C", "Quit")];

/// Key hints for the table view
pub const TABLE_CONTROLS: &[(&str, &str)] = &[
    ("/", "Search"),
    ("s", "Sort"),
    ("[ ]", "Page"),
    ("p", "Page size"),
    ("C", "Currency"),
    ("e", "Export"),
    ("t", "Chart"),
    ("n", "New file"),
    ("q", "Quit"),
];

/// Key hints for the chart view
pub const CHART_CONTROLS: &[(&str, &str)] = &[
    ("c", "Type"),
    ("k", "Colors"),
    ("l", "Legend"),
    ("z", "Zero"),
    ("x", "Export"),
    ("t", "Table"),
    ("n", "New file"),
    ("q", "Quit"),
];

/// Bottom bar of key hints with an optional right-aligned row count
pub struct Controls<'a> {
    pub controls: &'a [(&'a str, &'a str)],
    pub row_count: Option<usize>,
    pub dimmed: bool,
    pub background: Color,
    pub key_color: Color,
}

impl<'a> Controls<'a> {
    pub fn new(controls: &'a [(&'a str, &'a str)]) -> Self {
        Self {
            controls,
            row_count: None,
            dimmed: false,
            background: Color::DarkGray,
            key_color: Color::Reset,
        }
    }

    pub fn with_row_count(mut self, row_count: usize) -> Self {
        self.row_count = Some(row_count);
        self
    }

    pub fn with_dimmed(mut self, dimmed: bool) -> Self {
        self.dimmed = dimmed;
        self
    }

    pub fn with_colors(mut self, background: Color, key_color: Color) -> Self {
        self.background = background;
        self.key_color = key_color;
        self
    }
}

impl Widget for &Controls<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let mut constraints = self
            .controls
            .iter()
            .fold(vec![], |mut acc, (key, action)| {
                acc.push(Constraint::Length(key.chars().count() as u16 + 2));
                acc.push(Constraint::Length(action.chars().count() as u16 + 1));
                acc
            });

        if self.row_count.is_some() {
            constraints.push(Constraint::Length(15));
        }
        constraints.push(Constraint::Fill(1));

        let layout = Layout::new(Direction::Horizontal, constraints).split(area);

        let base_style = if self.dimmed {
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default()
        };
        let key_style = if self.dimmed {
            base_style.bold()
        } else {
            base_style.fg(self.key_color).bold()
        };

        for (i, (key, action)) in self.controls.iter().enumerate() {
            let j = i * 2;
            Paragraph::new(*key)
                .style(key_style)
                .centered()
                .render(layout[j], buf);
            Paragraph::new(*action)
                .style(base_style.bg(self.background))
                .render(layout[j + 1], buf);
        }

        let mut fill_start_idx = self.controls.len() * 2;
        if let Some(count) = self.row_count {
            Paragraph::new(format!("Rows: {}", count))
                .style(base_style.bg(self.background))
                .right_aligned()
                .render(layout[fill_start_idx], buf);
            fill_start_idx += 1;
        }

        Paragraph::new("")
            .style(base_style.bg(self.background))
            .render(layout[fill_start_idx], buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(buf: &Buffer, y: u16) -> String {
        (0..buf.area.width)
            .map(|x| buf[(x, y)].symbol().to_string())
            .collect()
    }

    #[test]
    fn renders_keys_actions_and_rows() {
        let area = Rect::new(0, 0, 120, 1);
        let mut buf = Buffer::empty(area);
        Controls::new(TABLE_CONTROLS)
            .with_row_count(95)
            .render(area, &mut buf);
        let text = line(&buf, 0);
        assert!(text.contains("Search"));
        assert!(text.contains("Quit"));
        assert!(text.contains("Rows: 95"));
    }
}
