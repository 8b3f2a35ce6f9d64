//! Chart presentation options: chart type, color scheme, legend, title.
//!
//! Options are plain values; every change produces a new [`ChartOptions`]
//! through the `with_*` builders and the app swaps it in whole.

use ratatui::style::Color;
use std::fmt;
use std::str::FromStr;

use crate::chart_data::DISPLAY_CAP;
use crate::config::{ChartConfig, ColorParser};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum ChartType {
    #[default]
    Bar,
    Line,
    Scatter,
}

impl ChartType {
    pub const ALL: [Self; 3] = [Self::Bar, Self::Line, Self::Scatter];

    /// Lower-case identifier used in config files and notices.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Bar => "bar",
            Self::Line => "line",
            Self::Scatter => "scatter",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Bar => "Bar",
            Self::Line => "Line",
            Self::Scatter => "Scatter",
        }
    }

    pub fn next(self) -> Self {
        let i = Self::ALL.iter().position(|t| *t == self).unwrap_or(0);
        Self::ALL[(i + 1) % Self::ALL.len()]
    }
}

impl FromStr for ChartType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("Unknown chart type: {s}"))
    }
}

impl fmt::Display for ChartType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum ColorScheme {
    #[default]
    Default,
    Vibrant,
    Pastel,
    Monochrome,
    Gradient,
    Neon,
    Earth,
}

impl ColorScheme {
    pub const ALL: [Self; 7] = [
        Self::Default,
        Self::Vibrant,
        Self::Pastel,
        Self::Monochrome,
        Self::Gradient,
        Self::Neon,
        Self::Earth,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Vibrant => "vibrant",
            Self::Pastel => "pastel",
            Self::Monochrome => "monochrome",
            Self::Gradient => "gradient",
            Self::Neon => "neon",
            Self::Earth => "earth",
        }
    }

    pub fn hex_colors(self) -> &'static [&'static str] {
        match self {
            Self::Default => &["#3b82f6", "#10b981", "#f59e0b", "#8b5cf6", "#ef4444"],
            Self::Vibrant => &[
                "#ff6b6b", "#4ecdc4", "#45b7d1", "#96ceb4", "#feca57", "#ff9ff3", "#54a0ff",
            ],
            Self::Pastel => &[
                "#a8e6cf", "#ffd3a5", "#fd9853", "#ff8a80", "#d1c4e9", "#c7ecee", "#dcedc1",
            ],
            Self::Monochrome => &[
                "#2d3748", "#4a5568", "#718096", "#a0aec0", "#cbd5e0", "#e2e8f0", "#f7fafc",
            ],
            Self::Gradient => &[
                "#667eea", "#764ba2", "#f093fb", "#f5576c", "#4facfe", "#43e97b", "#38f9d7",
            ],
            Self::Neon => &[
                "#ff073a", "#40e0d0", "#da70d6", "#32cd32", "#ff4500", "#9370db", "#00ced1",
            ],
            Self::Earth => &[
                "#8b4513", "#228b22", "#4682b4", "#cd853f", "#d2691e", "#808000", "#bc8f8f",
            ],
        }
    }

    /// Scheme colors converted for the current terminal.
    pub fn colors(self, parser: &ColorParser) -> Vec<Color> {
        self.hex_colors()
            .iter()
            .map(|hex| parser.parse(hex).unwrap_or(Color::Reset))
            .collect()
    }

    pub fn next(self) -> Self {
        let i = Self::ALL.iter().position(|s| *s == self).unwrap_or(0);
        Self::ALL[(i + 1) % Self::ALL.len()]
    }
}

impl FromStr for ColorScheme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("Unknown color scheme: {s}"))
    }
}

impl fmt::Display for ColorScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartOptions {
    pub chart_type: ChartType,
    pub color_scheme: ColorScheme,
    pub show_legend: bool,
    pub y_starts_at_zero: bool,
    pub title: String,
    /// Rows projected into the chart.
    pub max_records: usize,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            chart_type: ChartType::default(),
            color_scheme: ColorScheme::default(),
            show_legend: true,
            y_starts_at_zero: true,
            title: String::new(),
            max_records: DISPLAY_CAP,
        }
    }
}

impl ChartOptions {
    /// Options from a validated `[chart]` section; unknown names fall back
    /// to defaults.
    pub fn from_config(config: &ChartConfig) -> Self {
        Self {
            chart_type: config.chart_type.parse().unwrap_or_default(),
            color_scheme: config.color_scheme.parse().unwrap_or_default(),
            show_legend: config.show_legend,
            y_starts_at_zero: config.y_starts_at_zero,
            title: config.title.clone(),
            max_records: config.max_records.max(1),
        }
    }

    pub fn with_chart_type(&self, chart_type: ChartType) -> Self {
        Self {
            chart_type,
            ..self.clone()
        }
    }

    pub fn with_color_scheme(&self, color_scheme: ColorScheme) -> Self {
        Self {
            color_scheme,
            ..self.clone()
        }
    }

    pub fn with_legend(&self, show_legend: bool) -> Self {
        Self {
            show_legend,
            ..self.clone()
        }
    }

    pub fn with_y_starts_at_zero(&self, y_starts_at_zero: bool) -> Self {
        Self {
            y_starts_at_zero,
            ..self.clone()
        }
    }

    pub fn with_title(&self, title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..self.clone()
        }
    }

    /// Title shown on the chart block.
    pub fn display_title(&self) -> String {
        if self.title.trim().is_empty() {
            format!("{} chart", self.chart_type.label())
        } else {
            self.title.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chart_type_cycles_and_parses() {
        assert_eq!(ChartType::Bar.next(), ChartType::Line);
        assert_eq!(ChartType::Scatter.next(), ChartType::Bar);
        assert_eq!("LINE".parse::<ChartType>(), Ok(ChartType::Line));
        assert!("radar".parse::<ChartType>().is_err());
    }

    #[test]
    fn color_schemes_have_valid_hex() {
        for scheme in ColorScheme::ALL {
            let colors = scheme.hex_colors();
            assert!(colors.len() >= 5, "{scheme}");
            for hex in colors {
                assert_eq!(hex.len(), 7);
                assert!(hex.starts_with('#'));
                assert!(u32::from_str_radix(&hex[1..], 16).is_ok(), "{hex}");
            }
        }
        assert_eq!(ColorScheme::Vibrant.hex_colors()[0], "#ff6b6b");
        assert_eq!("earth".parse::<ColorScheme>(), Ok(ColorScheme::Earth));
    }

    #[test]
    fn builders_leave_original_untouched() {
        let base = ChartOptions::default();
        let changed = base
            .with_chart_type(ChartType::Scatter)
            .with_color_scheme(ColorScheme::Neon)
            .with_legend(false);
        assert_eq!(base, ChartOptions::default());
        assert_eq!(changed.chart_type, ChartType::Scatter);
        assert_eq!(changed.color_scheme, ColorScheme::Neon);
        assert!(!changed.show_legend);
        assert_eq!(changed.max_records, DISPLAY_CAP);
    }

    #[test]
    fn display_title_falls_back_to_type() {
        let opts = ChartOptions::default();
        assert_eq!(opts.display_title(), "Bar chart");
        assert_eq!(opts.with_title("Sales").display_title(), "Sales");
    }

    #[test]
    fn from_config_reads_chart_section() {
        let mut config = ChartConfig::default();
        config.chart_type = "line".to_string();
        config.color_scheme = "pastel".to_string();
        config.max_records = 20;
        let opts = ChartOptions::from_config(&config);
        assert_eq!(opts.chart_type, ChartType::Line);
        assert_eq!(opts.color_scheme, ColorScheme::Pastel);
        assert_eq!(opts.max_records, 20);
    }
}
