//! Per-user directories for the viewer's config and logs.

use std::io;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum PlatformError {
    /// The OS did not provide a configuration directory.
    #[error("could not determine OS configuration directory")]
    NoConfigDir,
    #[error("platform I/O error: {0}")]
    Io(#[from] io::Error),
}

/// OS-specific locations, following XDG on Linux, Known Folders on Windows
/// and Library on macOS.
#[derive(Clone, Debug, PartialEq)]
pub struct PlatformDirs {
    /// Holds `config.ron`.
    pub config_dir: PathBuf,
    pub log_dir: PathBuf,
}

const APP_NAME: &str = "uranus-viewer";

impl PlatformDirs {
    /// Resolve directories without creating them.
    pub fn resolve() -> Result<Self, PlatformError> {
        let base = dirs::config_dir().ok_or(PlatformError::NoConfigDir)?;
        let app_dir = base.join(APP_NAME);
        let log_dir = dirs::state_dir()
            .map(|state| state.join(APP_NAME).join("logs"))
            .unwrap_or_else(|| app_dir.join("logs"));
        Ok(Self {
            config_dir: app_dir,
            log_dir,
        })
    }

    /// Directories rooted under `root`, for tests and `--config`.
    pub fn with_root(root: &Path) -> Self {
        Self {
            config_dir: root.to_path_buf(),
            log_dir: root.join("logs"),
        }
    }

    pub fn create_dirs(&self) -> Result<(), PlatformError> {
        std::fs::create_dir_all(&self.config_dir)?;
        std::fs::create_dir_all(&self.log_dir)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_gives_absolute_paths() {
        if let Ok(dirs) = PlatformDirs::resolve() {
            assert!(dirs.config_dir.is_absolute());
            assert!(dirs.log_dir.is_absolute());
            assert!(dirs.config_dir.ends_with(APP_NAME));
        }
    }

    #[test]
    fn test_with_root_creates_directories() {
        let tmp = tempfile::tempdir().unwrap();
        let dirs = PlatformDirs::with_root(tmp.path());
        dirs.create_dirs().unwrap();
        assert!(dirs.config_dir.exists());
        assert!(dirs.log_dir.exists());
        assert!(dirs.log_dir.starts_with(tmp.path()));
    }
}
