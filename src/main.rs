use chartgrid::logging::{self, LogSettings};
use chartgrid::{App, AppConfig, AppEvent, Args, CacheManager, ConfigManager, OpenOptions, Theme};
use clap::Parser;
use color_eyre::Result;
use ratatui::DefaultTerminal;
use std::sync::mpsc::channel;
use std::time::Duration;

fn render(terminal: &mut DefaultTerminal, app: &mut App) -> Result<()> {
    terminal.draw(|frame| frame.render_widget(app, frame.area()))?;
    Ok(())
}

fn run(
    mut terminal: DefaultTerminal,
    args: &Args,
    config: &AppConfig,
    theme: Theme,
    opts: OpenOptions,
) -> Result<()> {
    let (tx, rx) = channel::<AppEvent>();
    let mut app = App::new_with_config(tx.clone(), theme, opts);
    let poll_interval = Duration::from_millis(config.performance.event_poll_interval_ms);

    render(&mut terminal, &mut app)?;
    if let Some(path) = &args.path {
        tx.send(AppEvent::Open(path.clone()))?;
    }

    loop {
        if crossterm::event::poll(poll_interval)? {
            match crossterm::event::read()? {
                crossterm::event::Event::Key(key)
                    if key.kind == crossterm::event::KeyEventKind::Press =>
                {
                    tx.send(AppEvent::Key(key))?
                }
                crossterm::event::Event::Resize(cols, rows) => {
                    tx.send(AppEvent::Resize(cols, rows))?
                }
                _ => {}
            }
        }

        let updated = match rx.recv_timeout(Duration::from_millis(0)) {
            Ok(event) => {
                match event {
                    AppEvent::Exit => break,
                    AppEvent::Crash(msg) => {
                        return Err(color_eyre::eyre::eyre!(msg));
                    }
                    event => {
                        if let Some(event) = app.event(&event) {
                            tx.send(event)?;
                        }
                    }
                }
                true
            }
            Err(std::sync::mpsc::RecvTimeoutError::Timeout) => false,
            Err(std::sync::mpsc::RecvTimeoutError::Disconnected) => break,
        };

        if updated {
            render(&mut terminal, &mut app)?;
        }
    }
    Ok(())
}

fn handle_early_exit_flags(args: &Args) -> Result<Option<()>> {
    if args.clear_cache {
        match CacheManager::new(chartgrid::APP_NAME) {
            Ok(cache) => {
                let removed = cache.clear_all()?;
                println!("Cache cleared successfully ({removed} files removed)");
            }
            Err(_e) => println!("No cache to clear"),
        }
        return Ok(Some(()));
    }

    if args.generate_config {
        let manager = ConfigManager::new(chartgrid::APP_NAME)?;
        let path = manager.write_default_config(args.force)?;
        println!("Configuration file written to {}", path.display());
        return Ok(Some(()));
    }

    Ok(None)
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let args = Args::parse();

    if handle_early_exit_flags(&args)?.is_some() {
        return Ok(());
    }

    let config = AppConfig::load(chartgrid::APP_NAME)?;
    let cache = CacheManager::new(chartgrid::APP_NAME)?;
    let settings = LogSettings::resolve(args.debug, config.debug.enabled, &config.debug.log_level);
    if let Some(path) = logging::init(&settings, &cache)? {
        eprintln!("Logging to {}", path.display());
    }

    let theme = Theme::from_config(&config.theme)?;
    let opts = OpenOptions::from_config(&config).with_args(&args)?;
    tracing::debug!(?opts, "starting");

    let terminal = ratatui::init();
    let result = run(terminal, &args, &config, theme, opts);
    ratatui::restore();
    result
}
