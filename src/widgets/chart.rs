//! Chart view widget: bar, line or scatter plot of the projected records.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    symbols,
    text::Span,
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, LegendPosition, Paragraph, Widget},
};

use crate::chart_data::{format_axis_label, series_points, ChartRecord};
use crate::chart_options::{ChartOptions, ChartType};
use crate::config::Theme;

/// Series drawn for one chart: name and `(x, y)` points.
pub type Series = (String, Vec<(f64, f64)>);

/// Build the series for the chart type. Bar and line plot every numeric
/// column against the row index; scatter plots the second numeric column
/// (or the first again) against the first.
pub fn build_series(
    records: &[ChartRecord<'_>],
    numeric_headers: &[String],
    chart_type: ChartType,
) -> Vec<Series> {
    match chart_type {
        ChartType::Bar | ChartType::Line => numeric_headers
            .iter()
            .map(|h| (h.clone(), series_points(records, h)))
            .collect(),
        ChartType::Scatter => {
            let Some(x) = numeric_headers.first() else {
                return Vec::new();
            };
            let y = numeric_headers.get(1).unwrap_or(x);
            let points = records.iter().map(|r| (r.value(x), r.value(y))).collect();
            vec![("Data Points".to_string(), points)]
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Bounds {
    x: [f64; 2],
    y: [f64; 2],
}

fn bounds(series: &[Series], chart_type: ChartType, y_starts_at_zero: bool) -> Option<Bounds> {
    let points = series.iter().flat_map(|(_, pts)| pts.iter());
    let (mut x_min, mut x_max, mut y_min, mut y_max) = (
        f64::INFINITY,
        f64::NEG_INFINITY,
        f64::INFINITY,
        f64::NEG_INFINITY,
    );
    for &(x, y) in points {
        x_min = x_min.min(x);
        x_max = x_max.max(x);
        y_min = y_min.min(y);
        y_max = y_max.max(y);
    }
    if !x_min.is_finite() {
        return None;
    }

    // bars rise from y = 0
    let y_lo = if chart_type == ChartType::Bar || y_starts_at_zero {
        y_min.min(0.0)
    } else {
        y_min
    };
    let y_hi = if y_max > y_lo { y_max } else { y_lo + 1.0 };
    let (x_lo, x_hi) = if x_max > x_min {
        (x_min, x_max)
    } else {
        (x_min - 0.5, x_min + 0.5)
    };
    Some(Bounds {
        x: [x_lo, x_hi],
        y: [y_lo, y_hi],
    })
}

pub struct ChartView<'a> {
    records: &'a [ChartRecord<'a>],
    numeric_headers: &'a [String],
    options: &'a ChartOptions,
    series_colors: Vec<Color>,
    border_color: Color,
    text_primary: Color,
    text_secondary: Color,
}

impl<'a> ChartView<'a> {
    pub fn new(
        records: &'a [ChartRecord<'a>],
        numeric_headers: &'a [String],
        options: &'a ChartOptions,
    ) -> Self {
        Self {
            records,
            numeric_headers,
            options,
            series_colors: Vec::new(),
            border_color: Color::Cyan,
            text_primary: Color::White,
            text_secondary: Color::DarkGray,
        }
    }

    pub fn with_theme(mut self, theme: &Theme) -> Self {
        self.border_color = theme.get("table_border");
        self.text_primary = theme.get("text_primary");
        self.text_secondary = theme.get("text_secondary");
        self
    }

    pub fn with_series_colors(mut self, colors: Vec<Color>) -> Self {
        self.series_colors = colors;
        self
    }

    fn series_color(&self, i: usize) -> Color {
        if self.series_colors.is_empty() {
            Color::Reset
        } else {
            self.series_colors[i % self.series_colors.len()]
        }
    }

    /// Labels for the x axis: record names for bar/line, values for scatter.
    fn x_labels(&self, b: &Bounds) -> Vec<String> {
        match self.options.chart_type {
            ChartType::Scatter => vec![
                format_axis_label(b.x[0]),
                format_axis_label((b.x[0] + b.x[1]) / 2.0),
                format_axis_label(b.x[1]),
            ],
            ChartType::Bar | ChartType::Line => {
                let first = self.records.first().map(|r| r.name.clone());
                let mid = self.records.get(self.records.len() / 2).map(|r| r.name.clone());
                let last = self.records.last().map(|r| r.name.clone());
                let mut labels: Vec<String> = Vec::new();
                for label in [first, mid, last].into_iter().flatten() {
                    if labels.last() != Some(&label) {
                        labels.push(label);
                    }
                }
                labels
            }
        }
    }
}

impl Widget for &ChartView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.border_color))
            .title(format!(
                " {} ({} rows) ",
                self.options.display_title(),
                self.records.len()
            ));
        let inner = block.inner(area);
        block.render(area, buf);

        if self.numeric_headers.is_empty() {
            Paragraph::new("No numeric columns to chart")
                .style(Style::default().fg(self.text_secondary))
                .centered()
                .render(inner, buf);
            return;
        }

        let chart_type = self.options.chart_type;
        let series = build_series(self.records, self.numeric_headers, chart_type);
        let Some(b) = bounds(&series, chart_type, self.options.y_starts_at_zero) else {
            Paragraph::new("No data points")
                .style(Style::default().fg(self.text_secondary))
                .centered()
                .render(inner, buf);
            return;
        };

        let (graph_type, marker) = match chart_type {
            ChartType::Line => (GraphType::Line, symbols::Marker::Braille),
            ChartType::Scatter => (GraphType::Scatter, symbols::Marker::Dot),
            ChartType::Bar => (GraphType::Bar, symbols::Marker::HalfBlock),
        };

        let datasets: Vec<Dataset> = series
            .iter()
            .enumerate()
            .map(|(i, (name, points))| {
                Dataset::default()
                    .name(name.clone())
                    .marker(marker)
                    .graph_type(graph_type)
                    .style(Style::default().fg(self.series_color(i)))
                    .data(points)
            })
            .collect();

        let label_style = Style::default().fg(self.text_primary);
        let x_labels: Vec<Span> = self
            .x_labels(&b)
            .into_iter()
            .map(|l| Span::styled(l, label_style))
            .collect();
        let y_labels: Vec<Span> = [b.y[0], (b.y[0] + b.y[1]) / 2.0, b.y[1]]
            .into_iter()
            .map(|v| Span::styled(format_axis_label(v), label_style))
            .collect();

        let mut x_axis = Axis::default()
            .bounds(b.x)
            .style(label_style)
            .labels(x_labels);
        let mut y_axis = Axis::default()
            .bounds(b.y)
            .style(label_style)
            .labels(y_labels);
        if chart_type == ChartType::Scatter {
            if let Some(x) = self.numeric_headers.first() {
                x_axis = x_axis.title(x.clone());
                y_axis = y_axis.title(self.numeric_headers.get(1).unwrap_or(x).clone());
            }
        }

        let legend = if self.options.show_legend {
            Some(LegendPosition::TopRight)
        } else {
            None
        };
        Chart::new(datasets)
            .x_axis(x_axis)
            .y_axis(y_axis)
            .legend_position(legend)
            .render(inner, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart_data::project;
    use crate::dataset::Row;

    fn headers(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn rows() -> Vec<Row> {
        vec![
            Row::from_pairs([("name", "a"), ("x", "1"), ("y", "10")]),
            Row::from_pairs([("name", "b"), ("x", "2"), ("y", "-5")]),
        ]
    }

    #[test]
    fn bar_and_line_have_one_series_per_column() {
        let rows = rows();
        let numeric = headers(&["x", "y"]);
        let records = project(&rows, &headers(&["name", "x", "y"]), &numeric, 50);
        let series = build_series(&records, &numeric, ChartType::Line);
        assert_eq!(series.len(), 2);
        assert_eq!(series[1].1, vec![(1.0, 10.0), (2.0, -5.0)]);
    }

    #[test]
    fn scatter_plots_second_column_against_first() {
        let rows = rows();
        let numeric = headers(&["x", "y"]);
        let records = project(&rows, &headers(&["name", "x", "y"]), &numeric, 50);
        let series = build_series(&records, &numeric, ChartType::Scatter);
        assert_eq!(series.len(), 1);
        assert_eq!(series[0].1, vec![(1.0, 10.0), (2.0, -5.0)]);

        let single = headers(&["x"]);
        let series = build_series(&records, &single, ChartType::Scatter);
        assert_eq!(series[0].1, vec![(1.0, 1.0), (2.0, 2.0)]);
    }

    #[test]
    fn bounds_include_zero_for_bars() {
        let series = vec![("s".to_string(), vec![(1.0, 5.0), (2.0, 8.0)])];
        let b = bounds(&series, ChartType::Bar, false).unwrap();
        assert_eq!(b.y, [0.0, 8.0]);
        let b = bounds(&series, ChartType::Line, false).unwrap();
        assert_eq!(b.y, [5.0, 8.0]);
        let single = vec![("s".to_string(), vec![(1.0, 3.0)])];
        let b = bounds(&single, ChartType::Scatter, true).unwrap();
        assert_eq!(b.x, [0.5, 1.5]);
        assert!(bounds(&[], ChartType::Bar, true).is_none());
    }

    #[test]
    fn renders_message_without_numeric_columns() {
        let rows = rows();
        let options = ChartOptions::default();
        let empty: Vec<String> = Vec::new();
        let records = project(&rows, &headers(&["name"]), &empty, 50);
        let area = Rect::new(0, 0, 50, 6);
        let mut buf = Buffer::empty(area);
        ChartView::new(&records, &empty, &options).render(area, &mut buf);
        let text: String = (0..area.height)
            .flat_map(|y| (0..area.width).map(move |x| (x, y)))
            .map(|p| buf[p].symbol().to_string())
            .collect();
        assert!(text.contains("No numeric columns"));
    }
}
