//! Shared CLI definitions for chartgrid.
//!
//! Used by the main application and by the build script (manpage) and
//! gen_docs binary (command-line-options markdown).

use clap::{CommandFactory, Parser, ValueEnum};
use std::path::{Path, PathBuf};

/// Chart type selectable from the command line
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum ChartTypeArg {
    /// Vertical bars, one group per record
    Bar,
    /// Connected line per numeric column
    Line,
    /// Unconnected points per numeric column
    Scatter,
}

impl ChartTypeArg {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Bar => "bar",
            Self::Line => "line",
            Self::Scatter => "scatter",
        }
    }
}

/// Currency used by price columns
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum CurrencyArg {
    /// US dollar ($)
    Usd,
    /// Euro (€)
    Eur,
    /// Indian rupee (₹)
    Inr,
    /// Pound sterling (£)
    Gbp,
}

impl CurrencyArg {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Usd => "USD",
            Self::Eur => "EUR",
            Self::Inr => "INR",
            Self::Gbp => "GBP",
        }
    }
}

/// Returns true when the path names a `.csv` file (case-insensitive).
pub fn has_csv_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("csv"))
        .unwrap_or(false)
}

/// Command-line arguments for chartgrid
#[derive(Clone, Parser, Debug)]
#[command(
    name = "chartgrid",
    version,
    about = "CSV tables and charts in the terminal",
    long_about = include_str!("../long_about.txt")
)]
pub struct Args {
    /// Path to the CSV file to open. When omitted, a prompt asks for one.
    #[arg(value_name = "PATH")]
    pub path: Option<PathBuf>,

    /// Rows per table page (default: 10)
    #[arg(long = "page-size", value_name = "N")]
    pub page_size: Option<usize>,

    /// Start in the chart view instead of the table view
    #[arg(long = "chart", action)]
    pub chart: bool,

    /// Chart type (bar, line, scatter)
    #[arg(long = "chart-type", value_enum)]
    pub chart_type: Option<ChartTypeArg>,

    /// Chart color scheme (default, vibrant, pastel, monochrome, gradient, neon, earth)
    #[arg(long = "color-scheme", value_name = "NAME")]
    pub color_scheme: Option<String>,

    /// Currency for price columns
    #[arg(long = "currency", value_enum)]
    pub currency: Option<CurrencyArg>,

    /// Directory where exported-data.csv is written (default: current directory)
    #[arg(long = "export-dir", value_name = "DIR")]
    pub export_dir: Option<PathBuf>,

    /// Display row numbers on the left side of the table
    #[arg(long = "row-numbers", action)]
    pub row_numbers: bool,

    /// Enable debug mode: write a log file to the cache directory
    #[arg(long = "debug", action)]
    pub debug: bool,

    /// Generate default configuration file at ~/.config/chartgrid/config.toml
    #[arg(long = "generate-config", action)]
    pub generate_config: bool,

    /// Force overwrite existing config file when using --generate-config
    #[arg(long = "force", requires = "generate_config", action)]
    pub force: bool,

    /// Clear all cache data (log file) and exit
    #[arg(long = "clear-cache", action)]
    pub clear_cache: bool,
}

/// Escape `|` and newlines for use in markdown table cells.
fn escape_table_cell(s: &str) -> String {
    s.replace('|', "\\|").replace(['\n', '\r'], " ")
}

fn value_placeholder(arg: &clap::Arg) -> String {
    arg.get_value_names()
        .map(|names| {
            names
                .iter()
                .map(|n: &clap::builder::Str| format!("<{}>", n.as_ref() as &str))
                .collect::<Vec<_>>()
                .join(" ")
        })
        .unwrap_or_default()
}

/// Render command-line options as markdown.
pub fn render_options_markdown() -> String {
    let mut cmd = Args::command();
    cmd.build();

    let mut out = String::from("# Command Line Options\n\n");

    out.push_str("## Usage\n\n```\n");
    out.push_str(&cmd.render_usage().to_string());
    out.push_str("\n```\n\n");

    out.push_str("## Options\n\n");
    out.push_str("| Option | Description |\n");
    out.push_str("|--------|-------------|\n");

    for arg in cmd.get_arguments() {
        let id = arg.get_id().as_ref().to_string();
        if id == "help" || id == "version" {
            continue;
        }

        let option_str = if arg.is_positional() {
            let placeholder = value_placeholder(arg);
            if arg.is_required_set() {
                placeholder
            } else {
                format!("[{placeholder}]")
            }
        } else {
            let mut parts = Vec::new();
            if let Some(s) = arg.get_short() {
                parts.push(format!("-{s}"));
            }
            if let Some(l) = arg.get_long() {
                parts.push(format!("--{l}"));
            }
            let op = parts.join(", ");
            let placeholder = if arg.get_action().takes_values() {
                value_placeholder(arg)
            } else {
                String::new()
            };
            if placeholder.is_empty() {
                op
            } else {
                format!("{op} {placeholder}")
            }
        };

        let help = arg
            .get_help()
            .map(|h| escape_table_cell(&h.to_string()))
            .unwrap_or_else(|| "-".to_string());

        out.push_str(&format!("| `{option_str}` | {help} |\n"));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_csv_extension() {
        assert!(has_csv_extension(Path::new("data.csv")));
        assert!(has_csv_extension(Path::new("DATA.CSV")));
        assert!(!has_csv_extension(Path::new("data.tsv")));
        assert!(!has_csv_extension(Path::new("data.csv.gz")));
        assert!(!has_csv_extension(Path::new("noext")));
    }

    #[test]
    fn test_parse_args() {
        let args = Args::parse_from([
            "chartgrid",
            "sales.csv",
            "--page-size",
            "100",
            "--chart-type",
            "line",
            "--currency",
            "eur",
        ]);
        assert_eq!(args.path, Some(PathBuf::from("sales.csv")));
        assert_eq!(args.page_size, Some(100));
        assert_eq!(args.chart_type, Some(ChartTypeArg::Line));
        assert_eq!(args.currency.map(CurrencyArg::as_str), Some("EUR"));
        assert!(!args.chart);
    }

    #[test]
    fn test_path_is_optional() {
        let args = Args::parse_from(["chartgrid"]);
        assert!(args.path.is_none());
    }

    #[test]
    fn test_force_requires_generate_config() {
        assert!(Args::try_parse_from(["chartgrid", "--force"]).is_err());
        assert!(Args::try_parse_from(["chartgrid", "--generate-config", "--force"]).is_ok());
    }

    #[test]
    fn test_options_markdown_lists_flags() {
        let md = render_options_markdown();
        assert!(md.contains("--page-size"));
        assert!(md.contains("--chart-type"));
        assert!(!md.contains("`--help`"));
    }
}
