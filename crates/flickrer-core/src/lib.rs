//! Flickrer Core Library
//!
//! Feed state and query orchestration for a photo-browsing client. The
//! crate owns the canonical feed snapshot, turns user intent into remote
//! queries and merges responses back without losing concurrent changes.
//! Rendering is left to frontends, which observe snapshots.
//!
//! # Features
//!
//! - `tokio-runtime`: spawn helpers that run fetches as independent tasks
//! - `http-client`: [`services::HttpFetcher`] backed by `reqwest`
//!
//! # Architecture
//!
//! - `models`: Photo, Tag, FeedState, wire envelopes, settings
//! - `services`: query builder, pagination, tag enrichment, reducer,
//!   feed store, remote fetcher boundary
//! - `events`: EventSink trait and snapshot forwarding
//! - `paths`: PathProvider trait
//! - `utils`: error handling
//!
//! # Example
//!
//! ```no_run
//! use flickrer_core::{events::NoOpEventSink, paths::DefaultPathProvider, FeedCore};
//! use std::sync::Arc;
//!
//! # async fn demo() -> flickrer_core::AppResult<()> {
//! let core = FeedCore::new(Arc::new(DefaultPathProvider::new()), Arc::new(NoOpEventSink))?;
//! core.store().set_text("harbour");
//! core.store().fetch_photos(0).await;
//! println!("{} photos", core.store().snapshot().photos.len());
//! # Ok(())
//! # }
//! ```

pub mod events;
pub mod models;
pub mod paths;
pub mod services;
pub mod utils;

// Re-export commonly used types
pub use events::{EventSink, LoggingEventSink, NoOpEventSink, SharedEventSink};
pub use models::{FeedSettings, FeedState, Filters, Photo, Tag};
pub use paths::{DefaultPathProvider, PathProvider, SharedPathProvider};
pub use services::{
    FeedAction, FeedStore, FetchResponse, RemoteFetcher, RequestDescriptor, RequestKind,
    SettingsManager, SharedFetcher, SubscriptionId,
};
pub use utils::{AppError, AppResult, CommandError};

use std::sync::Arc;

/// Flickrer core application context.
///
/// Holds the shared resources a frontend needs: settings, paths, the event
/// sink snapshots are forwarded to, and the feed store.
pub struct FeedCore {
    /// Loaded settings
    pub settings: FeedSettings,
    /// Path provider for resolving application paths
    pub path_provider: SharedPathProvider,
    /// Event sink every published snapshot is forwarded to
    pub event_sink: SharedEventSink,
    /// The feed store
    pub store: Arc<FeedStore>,
    forwarding: SubscriptionId,
}

impl FeedCore {
    /// Load settings through `path_provider` and talk to the configured
    /// HTTP endpoint.
    #[cfg(feature = "http-client")]
    pub fn new(path_provider: SharedPathProvider, event_sink: SharedEventSink) -> AppResult<Self> {
        let settings = SettingsManager::new(path_provider.as_ref())?.load()?;
        Self::with_settings(settings, path_provider, event_sink)
    }

    /// Use already loaded settings with the HTTP fetcher.
    #[cfg(feature = "http-client")]
    pub fn with_settings(
        settings: FeedSettings,
        path_provider: SharedPathProvider,
        event_sink: SharedEventSink,
    ) -> AppResult<Self> {
        let fetcher: SharedFetcher = Arc::new(services::HttpFetcher::new(&settings)?);
        Ok(Self::with_fetcher(settings, path_provider, event_sink, fetcher))
    }

    /// Build a context around any fetcher implementation.
    pub fn with_fetcher(
        settings: FeedSettings,
        path_provider: SharedPathProvider,
        event_sink: SharedEventSink,
        fetcher: SharedFetcher,
    ) -> Self {
        let store = Arc::new(FeedStore::new(fetcher));
        let forwarding = events::forward_snapshots(&store, event_sink.clone());

        Self {
            settings,
            path_provider,
            event_sink,
            store,
            forwarding,
        }
    }

    /// Get the feed store reference.
    pub fn store(&self) -> &Arc<FeedStore> {
        &self.store
    }

    /// Get the path provider reference.
    pub fn paths(&self) -> &SharedPathProvider {
        &self.path_provider
    }

    /// Get the event sink reference.
    pub fn events(&self) -> &SharedEventSink {
        &self.event_sink
    }
}

impl Drop for FeedCore {
    fn drop(&mut self) {
        // Store may outlive the core through spawned tasks
        self.store.unsubscribe(self.forwarding);
    }
}
