use color_eyre::eyre::eyre;
use color_eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use std::sync::Arc;

use ratatui::layout::{Constraint, Direction, Flex, Layout};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::{buffer::Buffer, layout::Rect, widgets::Widget};

use ratatui::widgets::{Block, Borders, Clear, Gauge, Paragraph};

pub mod cache;
pub mod cell_format;
pub mod chart_data;
pub mod chart_options;
pub mod classify;
pub mod config;
pub mod dataset;
pub mod error_display;
pub mod export;
pub mod ingest;
pub mod logging;
pub mod pagination;
pub mod statistics;
pub mod table_view;
pub mod widgets;

pub use cache::CacheManager;
pub use chartgrid_cli::Args;
pub use config::{AppConfig, ColorParser, ConfigManager, Theme};

use cell_format::{CellFormatRegistry, CellKind, Currency};
use chart_data::project;
use chart_options::{ChartOptions, ColorScheme};
use dataset::Dataset;
use error_display::user_message_from_report;
use statistics::column_stats;
use table_view::TableView;
use widgets::chart::ChartView;
use widgets::controls::{Controls, CHART_CONTROLS, TABLE_CONTROLS, UPLOAD_CONTROLS};
use widgets::datatable::DataTable;
use widgets::stats::StatsPanel;
use widgets::text_input::{TextInput, TextInputEvent};
use widgets::upload::UploadPrompt;

/// Application name used for config and cache directories
pub const APP_NAME: &str = "chartgrid";

/// Settings the app starts with: config file values with command-line
/// overrides applied on top.
#[derive(Debug, Clone)]
pub struct OpenOptions {
    pub page_size: usize,
    pub start_in_chart: bool,
    pub chart: ChartOptions,
    pub currency: Currency,
    pub export_dir: PathBuf,
    pub row_numbers: bool,
    pub striped_rows: bool,
}

impl OpenOptions {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            page_size: config.table.page_size.max(1),
            start_in_chart: false,
            chart: ChartOptions::from_config(&config.chart),
            currency: config.table.currency(),
            export_dir: config
                .export
                .directory
                .clone()
                .unwrap_or_else(|| PathBuf::from(".")),
            row_numbers: config.table.row_numbers,
            striped_rows: config.table.striped_rows,
        }
    }

    /// Apply command-line overrides. Invalid values are errors, not
    /// silently replaced by defaults.
    pub fn with_args(mut self, args: &Args) -> Result<Self> {
        if let Some(page_size) = args.page_size {
            if page_size == 0 {
                return Err(eyre!("--page-size must be greater than 0"));
            }
            self.page_size = page_size;
        }
        if args.chart {
            self.start_in_chart = true;
        }
        if let Some(chart_type) = args.chart_type {
            let chart_type = chart_type.as_str().parse().map_err(|e: String| eyre!(e))?;
            self.chart = self.chart.with_chart_type(chart_type);
        }
        if let Some(scheme) = &args.color_scheme {
            let scheme: ColorScheme = scheme.parse().map_err(|e: String| eyre!(e))?;
            self.chart = self.chart.with_color_scheme(scheme);
        }
        if let Some(currency) = args.currency {
            self.currency = currency.as_str().parse().map_err(|e: String| eyre!(e))?;
        }
        if let Some(dir) = &args.export_dir {
            self.export_dir = dir.clone();
        }
        if args.row_numbers {
            self.row_numbers = true;
        }
        Ok(self)
    }
}

impl Default for OpenOptions {
    fn default() -> Self {
        Self::from_config(&AppConfig::default())
    }
}

#[derive(Clone, Debug)]
pub enum AppEvent {
    Key(KeyEvent),
    Open(PathBuf),
    DoLoad(PathBuf, u64), // Internal: load after the UI has drawn the gauge; u64 is the load sequence
    Export,
    Exit,
    Crash(String),
    Resize(u16, u16), // resized (width, height)
}

/// Snapshot of the loaded data. Replaced as a whole on every load.
#[derive(Debug, Clone)]
pub struct Session {
    pub dataset: Arc<Dataset>,
    pub numeric_headers: Arc<[String]>,
    pub column_kinds: Arc<[CellKind]>,
}

impl Session {
    pub fn new(dataset: Dataset, registry: &CellFormatRegistry) -> Self {
        let numeric_headers = classify::numeric_headers(&dataset.rows, &dataset.headers);
        let column_kinds = registry.column_kinds(&dataset.headers);
        Self {
            dataset: Arc::new(dataset),
            numeric_headers: numeric_headers.into(),
            column_kinds: column_kinds.into(),
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum View {
    #[default]
    Upload,
    Table,
    Chart,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub enum LoadingState {
    #[default]
    Idle,
    Loading {
        file_path: PathBuf,
        file_size: u64,
        current_phase: String,
        progress_percent: u16, // 0-100
    },
}

impl LoadingState {
    pub fn is_loading(&self) -> bool {
        matches!(self, LoadingState::Loading { .. })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Info,
    Error,
}

/// One-line notification shown above the controls bar until the next key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub text: String,
    pub kind: StatusKind,
}

impl StatusMessage {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: StatusKind::Info,
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: StatusKind::Error,
        }
    }
}

pub struct App {
    events: Sender<AppEvent>,
    theme: Theme,
    color_parser: ColorParser,
    registry: CellFormatRegistry,
    options: OpenOptions,
    chart_options: ChartOptions,
    series_colors: Vec<Color>,
    currency: Currency,
    session: Option<Session>,
    table: TableView,
    view: View,
    last_data_view: View,
    upload_input: TextInput,
    upload_error: Option<String>,
    search_input: TextInput,
    searching: bool,
    status: Option<StatusMessage>,
    loading_state: LoadingState,
    load_seq: u64,
}

impl App {
    pub fn new(events: Sender<AppEvent>) -> App {
        Self::new_with_config(events, Theme::default(), OpenOptions::default())
    }

    pub fn new_with_config(events: Sender<AppEvent>, theme: Theme, options: OpenOptions) -> App {
        Self::new_with_parser(events, theme, options, ColorParser::new())
    }

    /// Construct with a fixed color parser (tests use one that ignores the
    /// terminal).
    pub fn new_with_parser(
        events: Sender<AppEvent>,
        theme: Theme,
        options: OpenOptions,
        color_parser: ColorParser,
    ) -> App {
        let chart_options = options.chart.clone();
        let series_colors = chart_options.color_scheme.colors(&color_parser);
        let mut upload_input = TextInput::new().with_theme(&theme);
        upload_input.set_focused(true);
        let search_input = TextInput::new().with_theme(&theme);
        let last_data_view = if options.start_in_chart {
            View::Chart
        } else {
            View::Table
        };

        App {
            events,
            color_parser,
            registry: CellFormatRegistry::default(),
            chart_options,
            series_colors,
            currency: options.currency,
            session: None,
            table: TableView::new(options.page_size),
            view: View::Upload,
            last_data_view,
            upload_input,
            upload_error: None,
            search_input,
            searching: false,
            status: None,
            loading_state: LoadingState::Idle,
            load_seq: 0,
            options,
            theme,
        }
    }

    pub fn send_event(&mut self, event: AppEvent) -> Result<()> {
        self.events.send(event)?;
        Ok(())
    }

    pub fn view(&self) -> View {
        self.view
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn table_view(&self) -> &TableView {
        &self.table
    }

    pub fn chart_options(&self) -> &ChartOptions {
        &self.chart_options
    }

    pub fn currency(&self) -> Currency {
        self.currency
    }

    pub fn status(&self) -> Option<&StatusMessage> {
        self.status.as_ref()
    }

    pub fn upload_error(&self) -> Option<&str> {
        self.upload_error.as_deref()
    }

    pub fn loading_state(&self) -> &LoadingState {
        &self.loading_state
    }

    fn color(&self, name: &str) -> Color {
        self.theme.get(name)
    }

    fn set_chart_options(&mut self, options: ChartOptions) {
        if options.color_scheme != self.chart_options.color_scheme {
            self.series_colors = options.color_scheme.colors(&self.color_parser);
        }
        self.chart_options = options;
    }

    /// Install a freshly parsed dataset: new session, table state reset.
    fn install(&mut self, dataset: Dataset) {
        let session = Session::new(dataset, &self.registry);
        self.table.reset(&session.dataset);
        self.search_input.clear();
        self.searching = false;
        self.session = Some(session);
        self.upload_error = None;
        self.upload_input.clear();
        self.view = self.last_data_view;
    }

    fn load(&mut self, path: &Path) -> Result<()> {
        let dataset = ingest::load_csv(path)?;
        self.install(dataset);
        Ok(())
    }

    fn export(&mut self) {
        let Some(session) = &self.session else {
            return;
        };
        self.status = Some(match export::write_csv(&session.dataset, &self.options.export_dir) {
            Ok(Some(path)) => StatusMessage::info(format!(
                "Exported {} rows to {}",
                session.dataset.row_count(),
                path.display()
            )),
            Ok(None) => StatusMessage::info("Nothing to export"),
            Err(e) => {
                tracing::warn!(error = %e, "export failed");
                StatusMessage::error(user_message_from_report(&e, None))
            }
        });
    }

    fn chart_record_count(&self) -> usize {
        self.session
            .as_ref()
            .map(|s| s.dataset.row_count().min(self.chart_options.max_records))
            .unwrap_or(0)
    }

    pub fn event(&mut self, event: &AppEvent) -> Option<AppEvent> {
        match event {
            AppEvent::Key(key) => self.key(key),
            AppEvent::Open(path) => {
                // Set loading state first, then trigger a render before actually loading
                let file_size = std::fs::metadata(path).map(|m| m.len()).unwrap_or(0);
                self.load_seq += 1;
                self.loading_state = LoadingState::Loading {
                    file_path: path.clone(),
                    file_size,
                    current_phase: "Reading CSV".to_string(),
                    progress_percent: 30,
                };
                Some(AppEvent::DoLoad(path.clone(), self.load_seq))
            }
            AppEvent::DoLoad(path, seq) => {
                if *seq != self.load_seq {
                    tracing::debug!(path = %path.display(), seq, "dropping stale load");
                    return None;
                }
                let result = self.load(path);
                self.loading_state = LoadingState::Idle;
                if let Err(e) = result {
                    tracing::warn!(path = %path.display(), error = %e, "load failed");
                    self.upload_error = Some(user_message_from_report(&e, None));
                    self.upload_input.set_value(&path.display().to_string());
                    self.view = View::Upload;
                }
                None
            }
            AppEvent::Export => {
                self.export();
                None
            }
            AppEvent::Resize(..) => None,
            AppEvent::Exit | AppEvent::Crash(_) => None,
        }
    }

    fn key(&mut self, event: &KeyEvent) -> Option<AppEvent> {
        if event.code == KeyCode::Char('c') && event.modifiers.contains(KeyModifiers::CONTROL) {
            return Some(AppEvent::Exit);
        }
        if self.loading_state.is_loading() {
            return None;
        }
        self.status = None;

        match self.view {
            View::Upload => self.upload_key(event),
            View::Table if self.searching => {
                self.search_key(event);
                None
            }
            View::Table => self.table_key(event),
            View::Chart => self.chart_key(event),
        }
    }

    fn upload_key(&mut self, event: &KeyEvent) -> Option<AppEvent> {
        match self.upload_input.handle_key(event) {
            TextInputEvent::Submit => {
                let value = self.upload_input.value().trim().to_string();
                if value.is_empty() {
                    return None;
                }
                Some(AppEvent::Open(PathBuf::from(value)))
            }
            TextInputEvent::Cancel => {
                if self.session.is_some() {
                    self.upload_error = None;
                    self.view = self.last_data_view;
                }
                None
            }
            TextInputEvent::Changed => {
                self.upload_error = None;
                None
            }
            TextInputEvent::None => None,
        }
    }

    fn search_key(&mut self, event: &KeyEvent) {
        let Some(session) = &self.session else {
            return;
        };
        match self.search_input.handle_key(event) {
            TextInputEvent::Changed => {
                let filter = self.search_input.value().to_string();
                self.table.set_filter(&filter, &session.dataset);
            }
            TextInputEvent::Submit => {
                self.searching = false;
                self.search_input.set_focused(false);
            }
            TextInputEvent::Cancel => {
                self.searching = false;
                self.search_input.clear();
                self.search_input.set_focused(false);
                self.table.set_filter("", &session.dataset);
            }
            TextInputEvent::None => {}
        }
    }

    /// Keys shared by the table and chart views.
    fn common_key(&mut self, event: &KeyEvent) -> Option<AppEvent> {
        match event.code {
            KeyCode::Char('q') => Some(AppEvent::Exit),
            KeyCode::Char('t') => {
                self.view = if self.view == View::Chart {
                    View::Table
                } else {
                    View::Chart
                };
                self.last_data_view = self.view;
                None
            }
            KeyCode::Char('n') => {
                self.last_data_view = self.view;
                self.view = View::Upload;
                self.upload_input.clear();
                self.upload_error = None;
                None
            }
            _ => None,
        }
    }

    fn table_key(&mut self, event: &KeyEvent) -> Option<AppEvent> {
        let session = self.session.clone()?;
        let dataset = &session.dataset;
        match event.code {
            KeyCode::Char('/') => {
                self.searching = true;
                self.search_input.set_focused(true);
            }
            KeyCode::Char('s') => self.table.cycle_sort(dataset),
            KeyCode::Left | KeyCode::Char('h') => self.table.focus_previous_column(),
            KeyCode::Right | KeyCode::Char('l') => {
                self.table.focus_next_column(dataset.headers.len())
            }
            KeyCode::Up | KeyCode::Char('k') => self.table.select_previous(),
            KeyCode::Down | KeyCode::Char('j') => self.table.select_next(),
            KeyCode::Char(']') | KeyCode::PageDown => self.table.next_page(),
            KeyCode::Char('[') | KeyCode::PageUp => self.table.previous_page(),
            KeyCode::Home => self.table.first_page(),
            KeyCode::End => self.table.last_page(),
            KeyCode::Char('p') => {
                let size = pagination::next_page_size(self.table.page_size());
                self.table.set_page_size(size);
            }
            KeyCode::Char('C') => self.currency = self.currency.next(),
            KeyCode::Char('e') => return Some(AppEvent::Export),
            _ => return self.common_key(event),
        }
        None
    }

    fn chart_key(&mut self, event: &KeyEvent) -> Option<AppEvent> {
        match event.code {
            KeyCode::Char('c') => {
                let next = self.chart_options.chart_type.next();
                self.set_chart_options(self.chart_options.with_chart_type(next));
            }
            KeyCode::Char('k') => {
                let next = self.chart_options.color_scheme.next();
                self.set_chart_options(self.chart_options.with_color_scheme(next));
            }
            KeyCode::Char('l') => {
                let show = !self.chart_options.show_legend;
                self.set_chart_options(self.chart_options.with_legend(show));
            }
            KeyCode::Char('z') => {
                let zero = !self.chart_options.y_starts_at_zero;
                self.set_chart_options(self.chart_options.with_y_starts_at_zero(zero));
            }
            KeyCode::Char('x') => {
                let message = export::chart_export_message(
                    self.chart_options.chart_type,
                    self.chart_record_count(),
                );
                tracing::info!("{message}");
                self.status = Some(StatusMessage::info(message));
            }
            _ => return self.common_key(event),
        }
        None
    }

    fn render_loading_gauge(&self, area: Rect, buf: &mut Buffer) {
        if let LoadingState::Loading {
            file_path,
            current_phase,
            progress_percent,
            ..
        } = &self.loading_state
        {
            let [column] = Layout::horizontal([Constraint::Percentage(50)])
                .flex(Flex::Center)
                .areas(area);
            let [gauge_area] = Layout::vertical([Constraint::Length(3)])
                .flex(Flex::Center)
                .areas(column);
            Clear.render(gauge_area, buf);

            let name = file_path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            Gauge::default()
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .title(format!(" Loading {name} ")),
                )
                .gauge_style(Style::default().fg(self.color("primary")))
                .percent(*progress_percent)
                .label(current_phase.clone())
                .render(gauge_area, buf);
        }
    }

    fn render_table(&self, session: &Session, area: Rect, buf: &mut Buffer) {
        let show_search = self.searching || !self.table.filter().is_empty();
        let mut constraints = vec![Constraint::Fill(1)];
        if show_search {
            constraints.insert(0, Constraint::Length(1));
        }
        let layout = Layout::new(Direction::Vertical, constraints).split(area);
        let mut table_area = layout[0];

        if show_search {
            let [label, input] =
                Layout::horizontal([Constraint::Length(8), Constraint::Fill(1)]).areas(layout[0]);
            Paragraph::new("Search: ")
                .style(Style::default().fg(self.color("primary")))
                .render(label, buf);
            self.search_input.render(input, buf);
            table_area = layout[1];
        }

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.color("table_border")))
            .title(format!(" {} ", session.dataset.display_name()));
        let inner = block.inner(table_area);
        block.render(table_area, buf);

        let stripe = if self.options.striped_rows {
            self.theme.get_optional("table_stripe")
        } else {
            None
        };
        DataTable::new(&session.dataset, &self.table, &session.column_kinds)
            .with_theme(&self.theme)
            .with_currency(self.currency)
            .with_row_numbers(self.options.row_numbers)
            .with_alternate_row_bg(stripe)
            .render(inner, buf);
    }

    fn render_chart(&self, session: &Session, area: Rect, buf: &mut Buffer) {
        let records = project(
            &session.dataset.rows,
            &session.dataset.headers,
            &session.numeric_headers,
            self.chart_options.max_records,
        );
        let stats = column_stats(&records, &session.numeric_headers);
        let stats_height = (stats.len().max(1) as u16 + 3).min(area.height / 2);
        let [chart_area, stats_area] =
            Layout::vertical([Constraint::Fill(1), Constraint::Length(stats_height)]).areas(area);

        ChartView::new(&records, &session.numeric_headers, &self.chart_options)
            .with_theme(&self.theme)
            .with_series_colors(self.series_colors.clone())
            .render(chart_area, buf);
        StatsPanel::new(&stats)
            .with_colors(
                self.color("table_border"),
                self.color("table_header"),
                self.color("dimmed"),
            )
            .render(stats_area, buf);
    }
}

impl Widget for &mut App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let mut constraints = vec![Constraint::Fill(1)];
        if self.status.is_some() {
            constraints.push(Constraint::Length(1));
        }
        constraints.push(Constraint::Length(1)); // Controls
        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints(constraints)
            .split(area);
        let main_area = layout[0];

        match (self.view, self.session.clone()) {
            (View::Table, Some(session)) => self.render_table(&session, main_area, buf),
            (View::Chart, Some(session)) => self.render_chart(&session, main_area, buf),
            _ => UploadPrompt::new(&self.upload_input)
                .with_error(self.upload_error.as_deref())
                .with_colors(
                    self.color("table_border"),
                    self.color("error"),
                    self.color("dimmed"),
                )
                .render(main_area, buf),
        }

        if let Some(status) = &self.status {
            let color = match status.kind {
                StatusKind::Info => self.color("success"),
                StatusKind::Error => self.color("error"),
            };
            Paragraph::new(Line::from(Span::styled(
                status.text.clone(),
                Style::default().fg(color),
            )))
            .render(layout[1], buf);
        }

        let controls = match self.view {
            View::Upload => UPLOAD_CONTROLS,
            View::Table => TABLE_CONTROLS,
            View::Chart => CHART_CONTROLS,
        };
        let mut bar = Controls::new(controls)
            .with_dimmed(self.loading_state.is_loading())
            .with_colors(self.color("controls_bg"), self.color("primary"));
        if let Some(session) = &self.session {
            if self.view != View::Upload {
                bar = bar.with_row_count(session.dataset.row_count());
            }
        }
        bar.render(layout[layout.len() - 1], buf);

        self.render_loading_gauge(main_area, buf);
    }
}
