//! Path provider abstraction.
//!
//! Resolves where settings and logs live without tying the core to any
//! particular frontend's conventions.

use std::path::PathBuf;
use std::sync::Arc;

/// Trait for providing application data paths.
pub trait PathProvider: Send + Sync {
    /// Get the root application data directory.
    fn app_data_dir(&self) -> PathBuf;

    /// Get the settings file path.
    fn settings_path(&self) -> PathBuf {
        self.app_data_dir().join("Config").join("settings.json")
    }

    /// Get the logs directory.
    fn logs_dir(&self) -> PathBuf {
        self.app_data_dir().join("Logs")
    }
}

/// Shared reference to a PathProvider implementation.
pub type SharedPathProvider = Arc<dyn PathProvider>;

/// Path provider rooted at the platform data directory.
#[derive(Debug, Clone)]
pub struct DefaultPathProvider {
    app_data_dir: PathBuf,
}

impl DefaultPathProvider {
    /// Uses `<data dir>/Flickrer/`.
    pub fn new() -> Self {
        let app_data_dir = dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("Flickrer");
        Self { app_data_dir }
    }

    /// Create a provider with a custom base directory.
    ///
    /// Useful for testing.
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self {
            app_data_dir: base_dir,
        }
    }
}

impl Default for DefaultPathProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl PathProvider for DefaultPathProvider {
    fn app_data_dir(&self) -> PathBuf {
        self.app_data_dir.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths_under_base_dir() {
        let provider = DefaultPathProvider::with_base_dir(PathBuf::from("/tmp/flickrer"));
        assert_eq!(
            provider.settings_path(),
            PathBuf::from("/tmp/flickrer/Config/settings.json")
        );
        assert_eq!(provider.logs_dir(), PathBuf::from("/tmp/flickrer/Logs"));
    }

    #[test]
    fn test_default_dir_name() {
        let provider = DefaultPathProvider::new();
        assert!(provider.app_data_dir().ends_with("Flickrer"));
    }
}
