use color_eyre::Result;
use std::fs;
use std::path::{Path, PathBuf};

/// Log file written when debug logging is enabled
pub const LOG_FILE: &str = "chartgrid.log";

/// Registry of known cache files
const CACHE_FILES: &[&str] = &[LOG_FILE];

/// Manages the cache directory; the only cache content is the debug log.
#[derive(Clone)]
pub struct CacheManager {
    pub(crate) cache_dir: PathBuf,
}

impl CacheManager {
    pub fn new(app_name: &str) -> Result<Self> {
        let cache_dir = dirs::cache_dir()
            .ok_or_else(|| color_eyre::eyre::eyre!("Could not determine cache directory"))?
            .join(app_name);

        Ok(Self { cache_dir })
    }

    /// Cache manager rooted at `cache_dir` (used by tests)
    pub fn with_dir(cache_dir: PathBuf) -> Self {
        Self { cache_dir }
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    pub fn cache_file(&self, filename: &str) -> PathBuf {
        self.cache_dir.join(filename)
    }

    pub fn log_file(&self) -> PathBuf {
        self.cache_file(LOG_FILE)
    }

    pub fn ensure_cache_dir(&self) -> Result<()> {
        if !self.cache_dir.exists() {
            fs::create_dir_all(&self.cache_dir)?;
        }
        Ok(())
    }

    /// Remove every registered cache file; returns how many were removed.
    pub fn clear_all(&self) -> Result<usize> {
        let mut removed = 0;
        for filename in CACHE_FILES {
            let file_path = self.cache_file(filename);
            if file_path.exists() {
                match fs::remove_file(&file_path) {
                    Ok(()) => removed += 1,
                    Err(e) => {
                        eprintln!("Warning: Could not remove cache file {}: {}", filename, e)
                    }
                }
            }
        }

        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn clear_all_removes_log() {
        let dir = TempDir::new().unwrap();
        let cache = CacheManager::with_dir(dir.path().join("chartgrid"));
        cache.ensure_cache_dir().unwrap();
        fs::write(cache.log_file(), "line\n").unwrap();
        fs::write(cache.cache_file("keep.txt"), "x").unwrap();

        assert_eq!(cache.clear_all().unwrap(), 1);
        assert!(!cache.log_file().exists());
        assert!(cache.cache_file("keep.txt").exists());
        assert_eq!(cache.clear_all().unwrap(), 0);
    }
}
