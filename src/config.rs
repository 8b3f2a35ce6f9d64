use color_eyre::eyre::eyre;
use color_eyre::Result;
use ratatui::style::Color;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use supports_color::Stream;

use crate::cell_format::Currency;
use crate::chart_options::{ChartType, ColorScheme};

/// Config format version written by `--generate-config`.
pub const CONFIG_VERSION: &str = "0.1";

/// Manages config directory and config file operations
#[derive(Clone)]
pub struct ConfigManager {
    pub(crate) config_dir: PathBuf,
}

impl ConfigManager {
    /// Create a ConfigManager with a custom config directory (primarily for testing)
    pub fn with_dir(config_dir: PathBuf) -> Self {
        Self { config_dir }
    }

    pub fn new(app_name: &str) -> Result<Self> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| eyre!("Could not determine config directory"))?
            .join(app_name);

        Ok(Self { config_dir })
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    pub fn config_path(&self, path: &str) -> PathBuf {
        self.config_dir.join(path)
    }

    pub fn ensure_config_dir(&self) -> Result<()> {
        if !self.config_dir.exists() {
            std::fs::create_dir_all(&self.config_dir)?;
        }
        Ok(())
    }

    /// Default configuration template as a string
    pub fn generate_default_config(&self) -> String {
        DEFAULT_CONFIG_TEMPLATE.to_string()
    }

    /// Write the default template to `config.toml`. Refuses to overwrite an
    /// existing file unless `force` is set.
    pub fn write_default_config(&self, force: bool) -> Result<PathBuf> {
        let config_path = self.config_path("config.toml");

        if config_path.exists() && !force {
            return Err(eyre!(
                "Config file already exists at {}. Use --force to overwrite.",
                config_path.display()
            ));
        }

        self.ensure_config_dir()?;
        std::fs::write(&config_path, DEFAULT_CONFIG_TEMPLATE)?;
        tracing::info!(path = %config_path.display(), "wrote default config");

        Ok(config_path)
    }

    /// Read and parse `config.toml`; defaults when the file does not exist.
    pub fn load_file(&self) -> Result<AppConfig> {
        let config_path = self.config_path("config.toml");

        if !config_path.exists() {
            return Ok(AppConfig::default());
        }

        let content = std::fs::read_to_string(&config_path).map_err(|e| {
            eyre!(
                "Failed to read config file at {}: {}",
                config_path.display(),
                e
            )
        })?;

        toml::from_str(&content).map_err(|e| {
            eyre!(
                "Failed to parse config file at {}: {}",
                config_path.display(),
                e
            )
        })
    }
}

/// Complete application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub version: String,
    pub table: TableConfig,
    pub chart: ChartConfig,
    pub export: ExportConfig,
    pub performance: PerformanceConfig,
    pub theme: ThemeConfig,
    pub debug: DebugConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TableConfig {
    pub page_size: usize,
    pub striped_rows: bool,
    pub currency: String,
    pub row_numbers: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    pub chart_type: String,
    pub color_scheme: String,
    pub show_legend: bool,
    pub y_starts_at_zero: bool,
    pub title: String,
    pub max_records: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ExportConfig {
    /// Directory for `exported-data.csv`; the working directory when unset.
    pub directory: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PerformanceConfig {
    pub event_poll_interval_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ThemeConfig {
    pub colors: ColorConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorConfig {
    pub primary: String,
    pub secondary: String,
    pub success: String,
    pub error: String,
    pub warning: String,
    pub dimmed: String,
    pub controls_bg: String,
    pub text_primary: String,
    pub text_secondary: String,
    pub text_inverse: String,
    pub table_header: String,
    pub table_border: String,
    pub table_selected: String,
    pub table_stripe: String,
    pub status_active: String,
    pub status_inactive: String,
    pub price_highlight: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DebugConfig {
    /// Write a log file to the cache directory
    pub enabled: bool,
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION.to_string(),
            table: TableConfig::default(),
            chart: ChartConfig::default(),
            export: ExportConfig::default(),
            performance: PerformanceConfig::default(),
            theme: ThemeConfig::default(),
            debug: DebugConfig::default(),
        }
    }
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            page_size: 10,
            striped_rows: true,
            currency: "USD".to_string(),
            row_numbers: false,
        }
    }
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            chart_type: "bar".to_string(),
            color_scheme: "default".to_string(),
            show_legend: true,
            y_starts_at_zero: true,
            title: String::new(),
            max_records: crate::chart_data::DISPLAY_CAP,
        }
    }
}

impl Default for PerformanceConfig {
    fn default() -> Self {
        Self {
            event_poll_interval_ms: 25,
        }
    }
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            primary: "cyan".to_string(),
            secondary: "yellow".to_string(),
            success: "green".to_string(),
            error: "red".to_string(),
            warning: "yellow".to_string(),
            dimmed: "dark_gray".to_string(),
            controls_bg: "indexed(236)".to_string(),
            text_primary: "white".to_string(),
            text_secondary: "dark_gray".to_string(),
            text_inverse: "black".to_string(),
            table_header: "white".to_string(),
            table_border: "cyan".to_string(),
            table_selected: "reversed".to_string(),
            table_stripe: "indexed(235)".to_string(),
            status_active: "green".to_string(),
            status_inactive: "red".to_string(),
            price_highlight: "red".to_string(),
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            log_level: "info".to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration from all layers (default → user)
    pub fn load(app_name: &str) -> Result<Self> {
        let manager = ConfigManager::new(app_name)?;
        Self::load_from(&manager)
    }

    /// Load from a specific config directory. A user file that fails to
    /// parse is reported rather than silently ignored.
    pub fn load_from(manager: &ConfigManager) -> Result<Self> {
        let mut config = AppConfig::default();
        config.merge(manager.load_file()?);
        config.validate()?;
        Ok(config)
    }

    /// Merge another config into this one (other takes precedence)
    pub fn merge(&mut self, other: AppConfig) {
        if other.version != AppConfig::default().version {
            self.version = other.version;
        }

        self.table.merge(other.table);
        self.chart.merge(other.chart);
        self.export.merge(other.export);
        self.performance.merge(other.performance);
        self.theme.merge(other.theme);
        self.debug.merge(other.debug);
    }

    pub fn validate(&self) -> Result<()> {
        if !self.version.starts_with("0.1") {
            return Err(eyre!(
                "Unsupported config version: {}. Expected {}.x",
                self.version,
                CONFIG_VERSION
            ));
        }

        if self.table.page_size == 0 {
            return Err(eyre!("table.page_size must be greater than 0"));
        }
        self.table
            .currency
            .parse::<Currency>()
            .map_err(|e| eyre!("Invalid table.currency: {}", e))?;

        self.chart
            .chart_type
            .parse::<ChartType>()
            .map_err(|e| eyre!("Invalid chart.chart_type: {}", e))?;
        self.chart
            .color_scheme
            .parse::<ColorScheme>()
            .map_err(|e| eyre!("Invalid chart.color_scheme: {}", e))?;
        if self.chart.max_records == 0 {
            return Err(eyre!("chart.max_records must be greater than 0"));
        }

        if self.performance.event_poll_interval_ms == 0 {
            return Err(eyre!("event_poll_interval_ms must be greater than 0"));
        }

        match self.debug.log_level.to_lowercase().as_str() {
            "error" | "warn" | "info" | "debug" | "trace" => {}
            other => {
                return Err(eyre!(
                    "Invalid debug.log_level: {}. Must be one of error, warn, info, debug, trace",
                    other
                ))
            }
        }

        let parser = ColorParser::new();
        for (name, value) in self.theme.colors.entries() {
            parser
                .parse(value)
                .map_err(|e| eyre!("Invalid color value for '{}': {}", name, e))?;
        }

        Ok(())
    }
}

impl TableConfig {
    pub fn merge(&mut self, other: Self) {
        let default = TableConfig::default();
        if other.page_size != default.page_size {
            self.page_size = other.page_size;
        }
        if other.striped_rows != default.striped_rows {
            self.striped_rows = other.striped_rows;
        }
        if other.currency != default.currency {
            self.currency = other.currency;
        }
        if other.row_numbers != default.row_numbers {
            self.row_numbers = other.row_numbers;
        }
    }

    /// Parsed currency; USD when the value is not recognized.
    pub fn currency(&self) -> Currency {
        self.currency.parse().unwrap_or_default()
    }
}

impl ChartConfig {
    pub fn merge(&mut self, other: Self) {
        let default = ChartConfig::default();
        if other.chart_type != default.chart_type {
            self.chart_type = other.chart_type;
        }
        if other.color_scheme != default.color_scheme {
            self.color_scheme = other.color_scheme;
        }
        if other.show_legend != default.show_legend {
            self.show_legend = other.show_legend;
        }
        if other.y_starts_at_zero != default.y_starts_at_zero {
            self.y_starts_at_zero = other.y_starts_at_zero;
        }
        if other.title != default.title {
            self.title = other.title;
        }
        if other.max_records != default.max_records {
            self.max_records = other.max_records;
        }
    }
}

impl ExportConfig {
    pub fn merge(&mut self, other: Self) {
        if other.directory.is_some() {
            self.directory = other.directory;
        }
    }
}

impl PerformanceConfig {
    pub fn merge(&mut self, other: Self) {
        let default = PerformanceConfig::default();
        if other.event_poll_interval_ms != default.event_poll_interval_ms {
            self.event_poll_interval_ms = other.event_poll_interval_ms;
        }
    }
}

impl ThemeConfig {
    pub fn merge(&mut self, other: Self) {
        self.colors.merge(other.colors);
    }
}

impl ColorConfig {
    /// `(name, value)` for every color key, in declaration order.
    pub fn entries(&self) -> [(&'static str, &String); 17] {
        [
            ("primary", &self.primary),
            ("secondary", &self.secondary),
            ("success", &self.success),
            ("error", &self.error),
            ("warning", &self.warning),
            ("dimmed", &self.dimmed),
            ("controls_bg", &self.controls_bg),
            ("text_primary", &self.text_primary),
            ("text_secondary", &self.text_secondary),
            ("text_inverse", &self.text_inverse),
            ("table_header", &self.table_header),
            ("table_border", &self.table_border),
            ("table_selected", &self.table_selected),
            ("table_stripe", &self.table_stripe),
            ("status_active", &self.status_active),
            ("status_inactive", &self.status_inactive),
            ("price_highlight", &self.price_highlight),
        ]
    }

    fn entries_mut(&mut self) -> [(&'static str, &mut String); 17] {
        [
            ("primary", &mut self.primary),
            ("secondary", &mut self.secondary),
            ("success", &mut self.success),
            ("error", &mut self.error),
            ("warning", &mut self.warning),
            ("dimmed", &mut self.dimmed),
            ("controls_bg", &mut self.controls_bg),
            ("text_primary", &mut self.text_primary),
            ("text_secondary", &mut self.text_secondary),
            ("text_inverse", &mut self.text_inverse),
            ("table_header", &mut self.table_header),
            ("table_border", &mut self.table_border),
            ("table_selected", &mut self.table_selected),
            ("table_stripe", &mut self.table_stripe),
            ("status_active", &mut self.status_active),
            ("status_inactive", &mut self.status_inactive),
            ("price_highlight", &mut self.price_highlight),
        ]
    }

    pub fn merge(&mut self, other: Self) {
        let default = ColorConfig::default();
        let defaults: HashMap<&str, &String> = default.entries().into_iter().collect();
        let overrides: HashMap<&str, &String> = other.entries().into_iter().collect();
        for (name, slot) in self.entries_mut() {
            if let (Some(value), Some(default_value)) = (overrides.get(name), defaults.get(name)) {
                if value != default_value {
                    *slot = (*value).clone();
                }
            }
        }
    }
}

impl DebugConfig {
    pub fn merge(&mut self, other: Self) {
        let default = DebugConfig::default();
        if other.enabled != default.enabled {
            self.enabled = other.enabled;
        }
        if other.log_level != default.log_level {
            self.log_level = other.log_level;
        }
    }
}

/// Color parser with terminal capability detection
pub struct ColorParser {
    supports_true_color: bool,
    supports_256: bool,
    no_color: bool,
}

impl ColorParser {
    /// Detect terminal capabilities (and `NO_COLOR`) for stdout
    pub fn new() -> Self {
        let no_color = std::env::var("NO_COLOR").is_ok();
        let support = supports_color::on(Stream::Stdout);

        Self {
            supports_true_color: support.as_ref().map(|s| s.has_16m).unwrap_or(false),
            supports_256: support.as_ref().map(|s| s.has_256).unwrap_or(false),
            no_color,
        }
    }

    /// Parser with fixed capabilities, independent of the environment.
    pub fn with_capabilities(true_color: bool, colors_256: bool) -> Self {
        Self {
            supports_true_color: true_color,
            supports_256: colors_256,
            no_color: false,
        }
    }

    /// Parse a color string (hex, `indexed(n)` or named)
    pub fn parse(&self, s: &str) -> Result<Color> {
        if self.no_color {
            return Ok(Color::Reset);
        }

        let trimmed = s.trim();

        if trimmed.starts_with('#') && trimmed.len() == 7 {
            let (r, g, b) = parse_hex(trimmed)?;
            return Ok(self.convert_rgb_to_terminal_color(r, g, b));
        }

        let lower = trimmed.to_lowercase();
        if let Some(num_str) = lower
            .strip_prefix("indexed(")
            .and_then(|rest| rest.strip_suffix(')'))
        {
            let num = num_str.trim().parse::<u8>().map_err(|_| {
                eyre!(
                    "Invalid indexed color: '{}'. Expected format: indexed(0-255)",
                    trimmed
                )
            })?;
            return Ok(Color::Indexed(num));
        }

        match lower.replace(' ', "_").as_str() {
            "black" => Ok(Color::Black),
            "red" => Ok(Color::Red),
            "green" => Ok(Color::Green),
            "yellow" => Ok(Color::Yellow),
            "blue" => Ok(Color::Blue),
            "magenta" => Ok(Color::Magenta),
            "cyan" => Ok(Color::Cyan),
            "white" => Ok(Color::White),

            "bright_black" => Ok(Color::Indexed(8)),
            "bright_red" => Ok(Color::Indexed(9)),
            "bright_green" => Ok(Color::Indexed(10)),
            "bright_yellow" => Ok(Color::Indexed(11)),
            "bright_blue" => Ok(Color::Indexed(12)),
            "bright_magenta" => Ok(Color::Indexed(13)),
            "bright_cyan" => Ok(Color::Indexed(14)),
            "bright_white" => Ok(Color::Indexed(15)),

            "gray" | "grey" | "dark_gray" | "dark_grey" => Ok(Color::Indexed(8)),
            "light_gray" | "light_grey" => Ok(Color::Indexed(7)),

            // Handled by the renderer as a modifier
            "reset" | "reversed" => Ok(Color::Reset),

            _ => Err(eyre!(
                "Unknown color name: '{}'. Supported: basic ANSI colors (red, blue, etc.), \
                 bright variants (bright_red, etc.), indexed(n), or hex colors (#ff0000)",
                trimmed
            )),
        }
    }

    fn convert_rgb_to_terminal_color(&self, r: u8, g: u8, b: u8) -> Color {
        if self.supports_true_color {
            Color::Rgb(r, g, b)
        } else if self.supports_256 {
            Color::Indexed(rgb_to_256_color(r, g, b))
        } else {
            rgb_to_basic_ansi(r, g, b)
        }
    }
}

impl Default for ColorParser {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_hex(s: &str) -> Result<(u8, u8, u8)> {
    let digits = s
        .strip_prefix('#')
        .filter(|d| d.len() == 6 && d.is_ascii())
        .ok_or_else(|| eyre!("Invalid hex color format: '{}'. Expected format: #rrggbb", s))?;

    let component = |range: std::ops::Range<usize>, name: &str| {
        u8::from_str_radix(&digits[range], 16)
            .map_err(|_| eyre!("Invalid {} component in hex color: {}", name, s))
    };

    Ok((
        component(0..2, "red")?,
        component(2..4, "green")?,
        component(4..6, "blue")?,
    ))
}

/// Nearest xterm 256-color palette index
pub fn rgb_to_256_color(r: u8, g: u8, b: u8) -> u8 {
    let max_diff = r.max(g).max(b) as i16 - r.min(g).min(b) as i16;
    if max_diff < 10 {
        // grayscale ramp 232-255
        let gray = (r as u16 + g as u16 + b as u16) / 3;
        if gray < 8 {
            return 16;
        } else if gray > 247 {
            return 231;
        } else {
            return 232 + ((gray - 8) * 24 / 240) as u8;
        }
    }

    // 6x6x6 color cube 16-231
    let r_idx = (r as u16 * 5 / 255) as u8;
    let g_idx = (g as u16 * 5 / 255) as u8;
    let b_idx = (b as u16 * 5 / 255) as u8;

    16 + 36 * r_idx + 6 * g_idx + b_idx
}

/// Nearest of the 8 basic ANSI colors
pub fn rgb_to_basic_ansi(r: u8, g: u8, b: u8) -> Color {
    let max_diff = r.max(g).max(b) as i16 - r.min(g).min(b) as i16;
    if max_diff < 30 {
        let avg = (r as u16 + g as u16 + b as u16) / 3;
        return if avg < 64 { Color::Black } else { Color::White };
    }

    match (r > 128, g > 128, b > 128) {
        (false, false, false) => Color::Black,
        (true, false, false) => Color::Red,
        (false, true, false) => Color::Green,
        (true, true, false) => Color::Yellow,
        (false, false, true) => Color::Blue,
        (true, false, true) => Color::Magenta,
        (false, true, true) => Color::Cyan,
        (true, true, true) => Color::White,
    }
}

/// Parsed theme colors keyed by config name
#[derive(Debug, Clone)]
pub struct Theme {
    pub colors: HashMap<String, Color>,
}

impl Theme {
    pub fn from_config(config: &ThemeConfig) -> Result<Self> {
        Self::from_config_with_parser(config, &ColorParser::new())
    }

    pub fn from_config_with_parser(config: &ThemeConfig, parser: &ColorParser) -> Result<Self> {
        let mut colors = HashMap::new();
        for (name, value) in config.colors.entries() {
            colors.insert(name.to_string(), parser.parse(value)?);
        }
        Ok(Self { colors })
    }

    /// Color by name, `Reset` if unknown
    pub fn get(&self, name: &str) -> Color {
        self.colors.get(name).copied().unwrap_or(Color::Reset)
    }

    pub fn get_optional(&self, name: &str) -> Option<Color> {
        self.colors.get(name).copied()
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::from_config(&ThemeConfig::default()).unwrap_or_else(|_| Self {
            colors: HashMap::new(),
        })
    }
}

const DEFAULT_CONFIG_TEMPLATE: &str = include_str!("../config/default.toml");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hex_by_capability() {
        let truecolor = ColorParser::with_capabilities(true, true);
        assert_eq!(truecolor.parse("#ff6b6b").unwrap(), Color::Rgb(255, 107, 107));
        let basic = ColorParser::with_capabilities(false, false);
        assert_eq!(basic.parse("#ff0000").unwrap(), Color::Red);
        let indexed = ColorParser::with_capabilities(false, true);
        assert_eq!(indexed.parse("#000000").unwrap(), Color::Indexed(16));
    }

    #[test]
    fn parses_named_and_indexed() {
        let parser = ColorParser::with_capabilities(true, true);
        assert_eq!(parser.parse("Bright Red").unwrap(), Color::Indexed(9));
        assert_eq!(parser.parse("indexed(236)").unwrap(), Color::Indexed(236));
        assert!(parser.parse("indexed(300)").is_err());
        assert!(parser.parse("#zzzzzz").is_err());
        assert!(parser.parse("chartreuse").is_err());
    }

    #[test]
    fn color_merge_only_takes_changed_values() {
        let mut base = ColorConfig::default();
        base.primary = "blue".to_string();
        let mut other = ColorConfig::default();
        other.error = "magenta".to_string();
        base.merge(other);
        assert_eq!(base.primary, "blue");
        assert_eq!(base.error, "magenta");
    }

    #[test]
    fn default_template_parses_and_validates() {
        let config: AppConfig = toml::from_str(DEFAULT_CONFIG_TEMPLATE).unwrap();
        assert_eq!(config.version, CONFIG_VERSION);
        config.validate().unwrap();
    }

    #[test]
    fn validate_rejects_bad_values() {
        let mut config = AppConfig::default();
        config.table.page_size = 0;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.chart.color_scheme = "rainbow".to_string();
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.table.currency = "JPY".to_string();
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.version = "9.0".to_string();
        assert!(config.validate().is_err());
    }
}
