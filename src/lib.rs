//! Flickrer - terminal photo feed browser
//!
//! Line-oriented front end over `flickrer-core`.

pub mod commands;
pub mod render;
pub mod shell;

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use flickrer_core::{
    DefaultPathProvider, FeedCore, FeedSettings, LoggingEventSink, SettingsManager,
    SharedPathProvider,
};
use tracing_appender::non_blocking::WorkerGuard;

/// Environment variable that overrides the configured API key
pub const API_KEY_ENV: &str = "FLICKR_API_KEY";

/// Install the file logger. The returned guard flushes on drop.
fn init_logging(logs_dir: &Path) -> anyhow::Result<WorkerGuard> {
    std::fs::create_dir_all(logs_dir)
        .with_context(|| format!("cannot create log directory: {}", logs_dir.display()))?;

    let appender = tracing_appender::rolling::daily(logs_dir, "flickrer.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(writer)
        .with_ansi(false)
        .init();

    Ok(guard)
}

/// Apply the API key from the environment, if set.
pub fn apply_env_overrides(settings: &mut FeedSettings, api_key: Option<String>) {
    if let Some(key) = api_key.filter(|k| !k.trim().is_empty()) {
        settings.api.api_key = key.trim().to_string();
    }
}

pub fn run() -> anyhow::Result<()> {
    let path_provider: SharedPathProvider = Arc::new(DefaultPathProvider::new());
    let _log_guard = init_logging(&path_provider.logs_dir())?;

    tracing::info!("Flickrer starting");

    let manager = SettingsManager::new(path_provider.as_ref())?;
    tracing::info!("Settings path: {:?}", manager.path());
    let mut settings = manager.load()?;
    apply_env_overrides(&mut settings, std::env::var(API_KEY_ENV).ok());

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("cannot create async runtime")?;

    let core = FeedCore::with_settings(settings, path_provider, Arc::new(LoggingEventSink))
        .with_context(|| format!("set {} or apiKey in the settings file", API_KEY_ENV))?;

    runtime.block_on(shell::run(&core))?;

    tracing::info!("Flickrer stopped");
    Ok(())
}
