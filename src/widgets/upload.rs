use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Flex, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
};

use super::text_input::TextInput;

/// Start screen: path prompt for a `.csv` file and the last load error.
pub struct UploadPrompt<'a> {
    input: &'a TextInput,
    error: Option<&'a str>,
    border_color: Color,
    error_color: Color,
    dimmed: Color,
}

impl<'a> UploadPrompt<'a> {
    pub fn new(input: &'a TextInput) -> Self {
        Self {
            input,
            error: None,
            border_color: Color::Cyan,
            error_color: Color::Red,
            dimmed: Color::DarkGray,
        }
    }

    pub fn with_error(mut self, error: Option<&'a str>) -> Self {
        self.error = error;
        self
    }

    pub fn with_colors(mut self, border: Color, error: Color, dimmed: Color) -> Self {
        self.border_color = border;
        self.error_color = error;
        self.dimmed = dimmed;
        self
    }
}

impl Widget for &UploadPrompt<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let [column] = Layout::horizontal([Constraint::Max(72)])
            .flex(Flex::Center)
            .areas(area);
        let [panel] = Layout::vertical([Constraint::Length(10)])
            .flex(Flex::Center)
            .areas(column);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.border_color))
            .title(" Upload CSV ");
        let inner = block.inner(panel);
        block.render(panel, buf);

        let [intro, _, input_label, input_area, _, message] = Layout::new(
            Direction::Vertical,
            [
                Constraint::Length(2),
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Fill(1),
            ],
        )
        .areas(inner);

        Paragraph::new(vec![
            Line::from("Load a CSV file to view it as a table and a chart."),
            Line::from(Span::styled(
                "The first row must hold the column names.",
                Style::default().fg(self.dimmed),
            )),
        ])
        .render(intro, buf);

        Paragraph::new("Path to .csv file:")
            .style(Style::default().add_modifier(Modifier::BOLD))
            .render(input_label, buf);
        self.input.render(input_area, buf);

        if let Some(error) = self.error {
            Paragraph::new(error)
                .style(Style::default().fg(self.error_color))
                .wrap(Wrap { trim: true })
                .render(message, buf);
        }
    }
}
