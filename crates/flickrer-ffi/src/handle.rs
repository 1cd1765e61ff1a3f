//! FlickrerHandle - opaque handle owning the runtime and the feed core.

use std::ffi::{c_char, c_void, CString};
use std::path::PathBuf;
use std::sync::Arc;

use flickrer_core::events::{EventSink, SharedEventSink, FEED_UPDATED};
use flickrer_core::paths::{DefaultPathProvider, SharedPathProvider};
use flickrer_core::{AppError, AppResult, FeedCore, SettingsManager};
use parking_lot::RwLock;
use tokio::runtime::Runtime;

/// Receives every published snapshot as JSON (null-terminated UTF-8).
///
/// The string is only valid for the duration of the call.
pub type SnapshotCallback = extern "C" fn(snapshot_json: *const c_char, user_data: *mut c_void);

struct Listener {
    callback: SnapshotCallback,
    user_data: *mut c_void,
}

// SAFETY: the host promises user_data may be used from any thread
unsafe impl Send for Listener {}
unsafe impl Sync for Listener {}

impl Listener {
    fn deliver(&self, snapshot_json: &str) {
        if let Ok(json) = CString::new(snapshot_json) {
            (self.callback)(json.as_ptr(), self.user_data);
        }
    }
}

/// Forwards `feed-updated` events to at most one C listener.
#[derive(Default)]
pub struct SnapshotListener {
    listener: RwLock<Option<Listener>>,
}

impl SnapshotListener {
    /// Install a listener and hand it `current` before any later snapshot.
    ///
    /// `current` is read while the slot is locked, so a snapshot published
    /// concurrently is delivered after it, never before.
    pub fn attach(
        &self,
        callback: SnapshotCallback,
        user_data: *mut c_void,
        current: impl FnOnce() -> Option<String>,
    ) {
        let mut slot = self.listener.write();
        let listener = Listener { callback, user_data };
        if let Some(json) = current() {
            listener.deliver(&json);
        }
        *slot = Some(listener);
    }

    /// Remove the listener. Returns false if none was installed.
    pub fn detach(&self) -> bool {
        self.listener.write().take().is_some()
    }
}

impl EventSink for SnapshotListener {
    fn emit(&self, event_name: &str, payload_json: &str) {
        if event_name != FEED_UPDATED {
            return;
        }
        if let Some(listener) = self.listener.read().as_ref() {
            listener.deliver(payload_json);
        }
    }
}

/// Opaque handle exposed to C.
///
/// Fetch tasks run on the handle's runtime, so snapshots usually arrive on
/// runtime worker threads.
pub struct FlickrerHandle {
    pub runtime: Runtime,
    pub core: FeedCore,
    pub listener: Arc<SnapshotListener>,
}

impl FlickrerHandle {
    /// Create a handle rooted at `data_dir` (or the platform data dir),
    /// optionally overriding the configured API key.
    pub fn new(data_dir: Option<PathBuf>, api_key: Option<&str>) -> AppResult<Self> {
        let path_provider: SharedPathProvider = Arc::new(match data_dir {
            Some(dir) => DefaultPathProvider::with_base_dir(dir),
            None => DefaultPathProvider::new(),
        });
        let mut settings = SettingsManager::new(path_provider.as_ref())?.load()?;
        if let Some(key) = api_key.map(str::trim).filter(|k| !k.is_empty()) {
            settings.api.api_key = key.to_string();
        }

        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .thread_name("flickrer-ffi")
            .build()?;

        let listener = Arc::new(SnapshotListener::default());
        let sink: SharedEventSink = listener.clone();
        let core = FeedCore::with_settings(settings, path_provider, sink)?;

        Ok(Self {
            runtime,
            core,
            listener,
        })
    }

    /// Current snapshot as JSON.
    pub fn snapshot_json(&self) -> AppResult<String> {
        serde_json::to_string(self.core.store().snapshot().as_ref()).map_err(AppError::from)
    }
}

impl Drop for FlickrerHandle {
    fn drop(&mut self) {
        self.listener.detach();
        tracing::info!("FlickrerHandle dropped");
    }
}
