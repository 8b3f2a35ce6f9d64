//! Per-column cell rendering rules for the table view.
//!
//! A [`CellFormatRegistry`] maps a header name to a [`CellKind`] once per
//! column; [`format_cell`] turns raw cell text into display text plus a
//! [`CellTone`] the table widget maps to theme colors.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use regex::Regex;
use std::fmt;
use std::str::FromStr;

use crate::classify::coerce_number;

/// Prices above this are highlighted.
pub const PRICE_HIGHLIGHT_THRESHOLD: f64 = 50_000.0;

/// Header names (lower-cased) rendered as prices.
const PRICE_HEADERS: [&str; 6] = [
    "price",
    "amount",
    "money",
    "unitcost",
    "selling price",
    "sellingprice",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Currency {
    #[default]
    Usd,
    Eur,
    Inr,
    Gbp,
}

impl Currency {
    pub const ALL: [Self; 4] = [Self::Usd, Self::Eur, Self::Inr, Self::Gbp];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Usd => "USD",
            Self::Eur => "EUR",
            Self::Inr => "INR",
            Self::Gbp => "GBP",
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Self::Usd => "$",
            Self::Eur => "€",
            Self::Inr => "₹",
            Self::Gbp => "£",
        }
    }

    pub fn next(self) -> Self {
        let i = Self::ALL.iter().position(|c| *c == self).unwrap_or(0);
        Self::ALL[(i + 1) % Self::ALL.len()]
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Currency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("Unknown currency: {s}"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellKind {
    Plain,
    Status,
    Salary,
    Date,
    Price,
    Country,
}

/// Display hint for a formatted cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CellTone {
    #[default]
    Normal,
    Positive,
    Negative,
    Highlight,
    Muted,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormattedCell {
    pub text: String,
    pub tone: CellTone,
}

impl FormattedCell {
    fn new(text: impl Into<String>, tone: CellTone) -> Self {
        Self {
            text: text.into(),
            tone,
        }
    }

    fn plain(text: impl Into<String>) -> Self {
        Self::new(text, CellTone::Normal)
    }

    fn missing() -> Self {
        Self::new("-", CellTone::Muted)
    }
}

pub struct FormatRule {
    pub name: &'static str,
    pub matches: fn(&str) -> bool,
    pub kind: CellKind,
}

/// Ordered rules; the first match wins, unmatched headers are plain.
pub struct CellFormatRegistry {
    rules: Vec<FormatRule>,
}

impl Default for CellFormatRegistry {
    fn default() -> Self {
        Self {
            rules: vec![
                FormatRule {
                    name: "status",
                    matches: |h| h == "status",
                    kind: CellKind::Status,
                },
                FormatRule {
                    name: "salary",
                    matches: |h| h.to_lowercase().contains("salary"),
                    kind: CellKind::Salary,
                },
                FormatRule {
                    name: "date",
                    matches: |h| h.to_lowercase().contains("date"),
                    kind: CellKind::Date,
                },
                FormatRule {
                    name: "price",
                    matches: |h| PRICE_HEADERS.contains(&h.to_lowercase().as_str()),
                    kind: CellKind::Price,
                },
                FormatRule {
                    name: "country",
                    matches: |h| h.eq_ignore_ascii_case("country"),
                    kind: CellKind::Country,
                },
            ],
        }
    }
}

impl CellFormatRegistry {
    pub fn empty() -> Self {
        Self { rules: Vec::new() }
    }

    pub fn push(&mut self, rule: FormatRule) {
        self.rules.push(rule);
    }

    pub fn kind_for(&self, header: &str) -> CellKind {
        self.rules
            .iter()
            .find(|rule| (rule.matches)(header))
            .map(|rule| rule.kind)
            .unwrap_or(CellKind::Plain)
    }

    /// Resolve every column once, in header order.
    pub fn column_kinds(&self, headers: &[String]) -> Vec<CellKind> {
        headers.iter().map(|h| self.kind_for(h)).collect()
    }
}

/// Column title: first letter upper-cased, a space before each later
/// capital ("joinDate" becomes "Join Date").
pub fn humanize_header(header: &str) -> String {
    let mut chars = header.chars();
    let Some(first) = chars.next() else {
        return String::new();
    };
    let rest = chars.as_str();
    let spaced = match Regex::new(r"([A-Z])") {
        Ok(re) => re.replace_all(rest, " $1").into_owned(),
        Err(_) => rest.to_string(),
    };
    format!("{}{}", first.to_uppercase(), spaced)
}

pub fn format_cell(kind: CellKind, raw: Option<&str>, currency: Currency) -> FormattedCell {
    match kind {
        CellKind::Plain => FormattedCell::plain(raw.unwrap_or("")),
        CellKind::Status => format_status(raw),
        CellKind::Salary => format_salary(raw),
        CellKind::Date => format_date(raw),
        CellKind::Price => format_price(raw, currency),
        CellKind::Country => format_country(raw),
    }
}

fn format_status(raw: Option<&str>) -> FormattedCell {
    let text = raw.unwrap_or("");
    let tone = if text.eq_ignore_ascii_case("active") {
        CellTone::Positive
    } else {
        CellTone::Negative
    };
    FormattedCell::new(text, tone)
}

fn format_salary(raw: Option<&str>) -> FormattedCell {
    match raw {
        None => FormattedCell::plain("$0"),
        Some(text) => match coerce_number(text) {
            Some(v) => FormattedCell::plain(format!("${}", group_thousands(v, None))),
            None => FormattedCell::plain(text),
        },
    }
}

fn format_price(raw: Option<&str>, currency: Currency) -> FormattedCell {
    let Some(text) = raw else {
        return FormattedCell::missing();
    };
    match coerce_number(text) {
        Some(v) => {
            let tone = if v > PRICE_HIGHLIGHT_THRESHOLD {
                CellTone::Highlight
            } else {
                CellTone::Normal
            };
            let sign = if v < 0.0 { "-" } else { "" };
            FormattedCell::new(
                format!("{sign}{}{}", currency.symbol(), group_indian(v.abs())),
                tone,
            )
        }
        None => FormattedCell::plain(text),
    }
}

/// Western grouping ("1,234,567.5"). `decimals` fixes the fraction width;
/// `None` keeps up to three significant fraction digits.
pub fn group_thousands(v: f64, decimals: Option<usize>) -> String {
    let (int_part, frac_part) = split_number(v, decimals);
    let grouped = group_digits(&int_part, &[3]);
    let sign = if v < 0.0 && (int_part != "0" || !frac_part.is_empty()) {
        "-"
    } else {
        ""
    };
    if frac_part.is_empty() {
        format!("{sign}{grouped}")
    } else {
        format!("{sign}{grouped}.{frac_part}")
    }
}

/// Indian grouping with two decimals ("1,23,456.00").
pub fn group_indian(v: f64) -> String {
    let (int_part, frac_part) = split_number(v.abs(), Some(2));
    format!("{}.{}", group_digits(&int_part, &[3, 2]), frac_part)
}

fn split_number(v: f64, decimals: Option<usize>) -> (String, String) {
    let text = match decimals {
        Some(d) => format!("{:.*}", d, v.abs()),
        None => {
            let fixed = format!("{:.3}", v.abs());
            fixed.trim_end_matches('0').trim_end_matches('.').to_string()
        }
    };
    match text.split_once('.') {
        Some((i, f)) => (i.to_string(), f.to_string()),
        None => (text, String::new()),
    }
}

/// Group from the right: the first group takes `sizes[0]` digits, later
/// groups repeat the last size.
fn group_digits(digits: &str, sizes: &[usize]) -> String {
    let mut groups: Vec<&str> = Vec::new();
    let mut end = digits.len();
    let mut i = 0;
    while end > 0 {
        let size = sizes[i.min(sizes.len() - 1)];
        let start = end.saturating_sub(size);
        groups.push(&digits[start..end]);
        end = start;
        i += 1;
    }
    groups.reverse();
    groups.join(",")
}

fn parse_date(text: &str) -> Option<NaiveDate> {
    let t = text.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(t) {
        return Some(dt.date_naive());
    }
    for fmt in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(t, fmt) {
            return Some(dt.date());
        }
    }
    for fmt in ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%b %d, %Y", "%B %d, %Y"] {
        if let Ok(d) = NaiveDate::parse_from_str(t, fmt) {
            return Some(d);
        }
    }
    None
}

fn format_date(raw: Option<&str>) -> FormattedCell {
    let Some(text) = raw else {
        return FormattedCell::missing();
    };
    match parse_date(text) {
        Some(date) => FormattedCell::plain(date.format("%b %-d, %Y").to_string()),
        None => FormattedCell::plain(text),
    }
}

fn format_country(raw: Option<&str>) -> FormattedCell {
    let Some(text) = raw else {
        return FormattedCell::missing();
    };
    match lookup_country(text) {
        Some((code, name)) => FormattedCell::plain(format!("{name} ({code})")),
        None => FormattedCell::plain(text),
    }
}

/// Find a country by ISO alpha-2 code or English name, case-insensitively.
pub fn lookup_country(value: &str) -> Option<(&'static str, &'static str)> {
    let v = value.trim();
    COUNTRIES
        .iter()
        .copied()
        .find(|(code, name)| code.eq_ignore_ascii_case(v) || name.eq_ignore_ascii_case(v))
}

const COUNTRIES: &[(&str, &str)] = &[
    ("AR", "Argentina"),
    ("AU", "Australia"),
    ("AT", "Austria"),
    ("BD", "Bangladesh"),
    ("BE", "Belgium"),
    ("BR", "Brazil"),
    ("CA", "Canada"),
    ("CL", "Chile"),
    ("CN", "China"),
    ("CO", "Colombia"),
    ("CZ", "Czech Republic"),
    ("DK", "Denmark"),
    ("EG", "Egypt"),
    ("FI", "Finland"),
    ("FR", "France"),
    ("DE", "Germany"),
    ("GR", "Greece"),
    ("HK", "Hong Kong"),
    ("HU", "Hungary"),
    ("IN", "India"),
    ("ID", "Indonesia"),
    ("IE", "Ireland"),
    ("IL", "Israel"),
    ("IT", "Italy"),
    ("JP", "Japan"),
    ("KE", "Kenya"),
    ("MY", "Malaysia"),
    ("MX", "Mexico"),
    ("NL", "Netherlands"),
    ("NZ", "New Zealand"),
    ("NG", "Nigeria"),
    ("NO", "Norway"),
    ("PK", "Pakistan"),
    ("PE", "Peru"),
    ("PH", "Philippines"),
    ("PL", "Poland"),
    ("PT", "Portugal"),
    ("RO", "Romania"),
    ("RU", "Russia"),
    ("SA", "Saudi Arabia"),
    ("SG", "Singapore"),
    ("ZA", "South Africa"),
    ("KR", "South Korea"),
    ("ES", "Spain"),
    ("LK", "Sri Lanka"),
    ("SE", "Sweden"),
    ("CH", "Switzerland"),
    ("TW", "Taiwan"),
    ("TH", "Thailand"),
    ("TR", "Turkey"),
    ("UA", "Ukraine"),
    ("AE", "United Arab Emirates"),
    ("GB", "United Kingdom"),
    ("US", "United States"),
    ("VN", "Vietnam"),
];
