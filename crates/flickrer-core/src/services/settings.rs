//! Settings service
//!
//! Reads, saves and resets the JSON settings file.

use crate::models::FeedSettings;
use crate::paths::PathProvider;
use crate::utils::error::AppError;
use std::fs;
use std::path::PathBuf;

/// Settings manager
pub struct SettingsManager {
    settings_path: PathBuf,
}

impl SettingsManager {
    /// Create a settings manager for the provider's settings path.
    pub fn new(provider: &dyn PathProvider) -> Result<Self, AppError> {
        Self::from_path(provider.settings_path())
    }

    /// Create a settings manager for an explicit path.
    pub fn from_path(settings_path: PathBuf) -> Result<Self, AppError> {
        if let Some(parent) = settings_path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| AppError::Config(format!("cannot create config directory: {}", e)))?;
        }

        Ok(Self { settings_path })
    }

    /// Load settings, falling back to defaults when no file exists yet.
    pub fn load(&self) -> Result<FeedSettings, AppError> {
        if !self.settings_path.exists() {
            tracing::info!("Settings file not found, using defaults");
            return Ok(FeedSettings::default());
        }

        let content = fs::read_to_string(&self.settings_path)
            .map_err(|e| AppError::Config(format!("cannot read settings file: {}", e)))?;

        let settings: FeedSettings = serde_json::from_str(&content)
            .map_err(|e| AppError::Config(format!("invalid settings file: {}", e)))?;

        tracing::info!("Loaded settings from {:?}", self.settings_path);
        Ok(settings)
    }

    /// Save settings as pretty-printed JSON.
    pub fn save(&self, settings: &FeedSettings) -> Result<(), AppError> {
        let content = serde_json::to_string_pretty(settings)
            .map_err(|e| AppError::Config(format!("cannot serialize settings: {}", e)))?;

        fs::write(&self.settings_path, content)
            .map_err(|e| AppError::Config(format!("cannot write settings file: {}", e)))?;

        tracing::info!("Saved settings to {:?}", self.settings_path);
        Ok(())
    }

    /// Reset to default settings
    pub fn reset(&self) -> Result<FeedSettings, AppError> {
        let default_settings = FeedSettings::default();
        self.save(&default_settings)?;
        Ok(default_settings)
    }

    pub fn path(&self) -> &PathBuf {
        &self.settings_path
    }
}
