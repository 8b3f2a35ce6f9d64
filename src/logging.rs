//! File logging. The terminal belongs to the UI, so events go to
//! `<cache dir>/chartgrid.log` and only when logging is turned on.

use color_eyre::Result;
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

use crate::cache::CacheManager;

/// Whether logging is on and at what level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogSettings {
    pub enabled: bool,
    pub level: String,
}

impl LogSettings {
    /// `--debug` or `[debug] enabled` turn logging on; so does a `RUST_LOG`
    /// in the environment, whose directives then win over `level`.
    pub fn resolve(debug_flag: bool, config_enabled: bool, level: &str) -> Self {
        let from_env = std::env::var("RUST_LOG").is_ok_and(|v| !v.trim().is_empty());
        Self {
            enabled: debug_flag || config_enabled || from_env,
            level: if debug_flag {
                "debug".to_string()
            } else {
                level.to_string()
            },
        }
    }

    fn filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&self.level))
    }
}

/// Install the global subscriber writing to the cache log file. Returns the
/// log path, or `None` when logging is off or another subscriber is
/// already installed (nothing would reach the file then).
pub fn init(settings: &LogSettings, cache: &CacheManager) -> Result<Option<PathBuf>> {
    if !settings.enabled {
        return Ok(None);
    }
    cache.ensure_cache_dir()?;
    let path = cache.log_file();
    if !init_file(settings, &path)? {
        tracing::warn!(path = %path.display(), "subscriber already set, log file unused");
        return Ok(None);
    }
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "logging started");
    Ok(Some(path))
}

/// Returns false when a global subscriber was set before this call.
fn init_file(settings: &LogSettings, path: &Path) -> Result<bool> {
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let installed = tracing_subscriber::fmt()
        .with_env_filter(settings.filter())
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .try_init()
        .is_ok();
    Ok(installed)
}
