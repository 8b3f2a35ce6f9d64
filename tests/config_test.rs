use chartgrid::cell_format::Currency;
use chartgrid::chart_options::{ChartOptions, ChartType, ColorScheme};
use chartgrid::config::{AppConfig, ConfigManager, CONFIG_VERSION};
use chartgrid::OpenOptions;
use std::fs;
use tempfile::TempDir;

// Helper to create a temporary config directory for testing
fn setup_test_config_dir() -> (TempDir, ConfigManager) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_manager = ConfigManager::with_dir(temp_dir.path().to_path_buf());
    (temp_dir, config_manager)
}

fn write_user_config(manager: &ConfigManager, content: &str) {
    manager.ensure_config_dir().unwrap();
    fs::write(manager.config_path("config.toml"), content).unwrap();
}

#[test]
fn test_default_config() {
    let config = AppConfig::default();

    assert_eq!(config.version, CONFIG_VERSION);

    assert_eq!(config.table.page_size, 10);
    assert!(config.table.striped_rows);
    assert_eq!(config.table.currency, "USD");
    assert!(!config.table.row_numbers);

    assert_eq!(config.chart.chart_type, "bar");
    assert_eq!(config.chart.color_scheme, "default");
    assert!(config.chart.show_legend);
    assert!(config.chart.y_starts_at_zero);
    assert_eq!(config.chart.max_records, 50);

    assert!(config.export.directory.is_none());
    assert_eq!(config.performance.event_poll_interval_ms, 25);
    assert_eq!(config.theme.colors.primary, "cyan");
    assert!(!config.debug.enabled);
    assert_eq!(config.debug.log_level, "info");

    assert!(config.validate().is_ok());
}

#[test]
fn test_generate_default_config() {
    let (_temp_dir, config_manager) = setup_test_config_dir();

    let template = config_manager.generate_default_config();

    assert!(template.contains("[table]"));
    assert!(template.contains("[chart]"));
    assert!(template.contains("[export]"));
    assert!(template.contains("[performance]"));
    assert!(template.contains("[theme.colors]"));

    // The template parses and matches the built-in defaults
    let parsed: AppConfig = toml::from_str(&template).unwrap();
    assert_eq!(parsed.version, CONFIG_VERSION);
    assert_eq!(parsed.table.page_size, 10);
    assert_eq!(parsed.chart.chart_type, "bar");
    assert!(parsed.validate().is_ok());
}

#[test]
fn test_write_default_config_respects_force() {
    let (_temp_dir, config_manager) = setup_test_config_dir();

    let path = config_manager.write_default_config(false).unwrap();
    assert!(path.exists());

    fs::write(&path, "version = \"0.1\"\n").unwrap();
    let err = config_manager.write_default_config(false).unwrap_err();
    assert!(err.to_string().contains("already exists"));
    assert_eq!(fs::read_to_string(&path).unwrap(), "version = \"0.1\"\n");

    config_manager.write_default_config(true).unwrap();
    assert!(fs::read_to_string(&path).unwrap().contains("[chart]"));
}

#[test]
fn test_missing_file_gives_defaults() {
    let (_temp_dir, config_manager) = setup_test_config_dir();
    let config = AppConfig::load_from(&config_manager).unwrap();
    assert_eq!(config.table.page_size, 10);
}

#[test]
fn test_user_config_overrides_defaults() {
    let (_temp_dir, config_manager) = setup_test_config_dir();
    write_user_config(
        &config_manager,
        r#"
[table]
page_size = 100
currency = "EUR"

[chart]
chart_type = "line"
color_scheme = "earth"
show_legend = false

[export]
directory = "/tmp/exports"
"#,
    );

    let config = AppConfig::load_from(&config_manager).unwrap();
    assert_eq!(config.table.page_size, 100);
    assert_eq!(config.table.currency(), Currency::Eur);
    // untouched values keep their defaults
    assert!(config.table.striped_rows);
    assert_eq!(config.chart.max_records, 50);

    let chart = ChartOptions::from_config(&config.chart);
    assert_eq!(chart.chart_type, ChartType::Line);
    assert_eq!(chart.color_scheme, ColorScheme::Earth);
    assert!(!chart.show_legend);

    let opts = OpenOptions::from_config(&config);
    assert_eq!(opts.page_size, 100);
    assert_eq!(opts.export_dir, std::path::PathBuf::from("/tmp/exports"));
}

#[test]
fn test_invalid_values_are_rejected() {
    let cases = [
        "version = \"9.0\"",
        "[table]\npage_size = 0",
        "[table]\ncurrency = \"JPY\"",
        "[chart]\nchart_type = \"pie\"",
        "[chart]\ncolor_scheme = \"plaid\"",
        "[chart]\nmax_records = 0",
        "[debug]\nlog_level = \"loud\"",
    ];
    for case in cases {
        let (_temp_dir, config_manager) = setup_test_config_dir();
        write_user_config(&config_manager, case);
        assert!(
            AppConfig::load_from(&config_manager).is_err(),
            "accepted: {case}"
        );
    }
}

#[test]
fn test_malformed_toml_is_reported() {
    let (_temp_dir, config_manager) = setup_test_config_dir();
    write_user_config(&config_manager, "[table\npage_size = ");
    let err = AppConfig::load_from(&config_manager).unwrap_err();
    assert!(err.to_string().contains("Failed to parse config file"));
}
