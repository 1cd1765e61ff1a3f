//! Feed store
//!
//! Owns the canonical [`FeedState`] snapshot and is the only place it is
//! replaced. Every transition runs the reducer against the *latest* snapshot
//! while holding the publish lock, so a fetch that completes late never
//! overwrites an expand/collapse or filter change made in the meantime.
//! Readers always get a whole `Arc<FeedState>`, never a half-applied one.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use crate::models::{FeedState, Photo};
use crate::services::fetcher::{resolve, SharedFetcher};
use crate::services::query_builder;
use crate::services::reducer::{self, FeedAction};

/// Identifier returned by [`FeedStore::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub u64);

/// Callback invoked with every published snapshot.
pub type SnapshotHandler = Arc<dyn Fn(&Arc<FeedState>) + Send + Sync>;

/// Canonical feed state plus the operations that change it.
pub struct FeedStore {
    fetcher: SharedFetcher,
    state: RwLock<Arc<FeedState>>,
    /// Serializes compute-and-publish so subscribers see snapshots in order
    publish: Mutex<()>,
    subscribers: RwLock<Vec<(SubscriptionId, SnapshotHandler)>>,
    next_id: AtomicU64,
}

impl FeedStore {
    /// Create a store with an empty feed.
    pub fn new(fetcher: SharedFetcher) -> Self {
        Self {
            fetcher,
            state: RwLock::new(Arc::new(FeedState::default())),
            publish: Mutex::new(()),
            subscribers: RwLock::new(Vec::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Current snapshot (Arc clone, no data copy).
    pub fn snapshot(&self) -> Arc<FeedState> {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Register a handler called after every publish, in publish order.
    ///
    /// Handlers run on the publishing thread and must not dispatch actions
    /// back into the store synchronously.
    pub fn subscribe<F>(&self, handler: F) -> SubscriptionId
    where
        F: Fn(&Arc<FeedState>) + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.subscribers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push((id, Arc::new(handler)));
        id
    }

    /// Remove a handler. Returns false if it was not registered.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut subscribers = self
            .subscribers
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let before = subscribers.len();
        subscribers.retain(|(sid, _)| *sid != id);
        subscribers.len() != before
    }

    /// Apply an action to the latest snapshot and publish the result.
    ///
    /// Returns the snapshot current after the call. Actions that change
    /// nothing are not published.
    pub fn dispatch(&self, action: FeedAction) -> Arc<FeedState> {
        let _publish = self.publish.lock().unwrap_or_else(PoisonError::into_inner);

        let current = self.snapshot();
        let Some(next) = reducer::reduce(&current, action) else {
            return current;
        };

        let next = Arc::new(next);
        *self.state.write().unwrap_or_else(PoisonError::into_inner) = next.clone();

        let handlers: Vec<SnapshotHandler> = self
            .subscribers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(_, handler)| handler.clone())
            .collect();
        for handler in handlers {
            handler(&next);
        }

        next
    }

    /// Set the search text. Does not fetch.
    pub fn set_text(&self, query: impl Into<String>) -> Arc<FeedState> {
        self.dispatch(FeedAction::TextChanged(query.into()))
    }

    /// Replace the tag filter. Does not fetch.
    pub fn set_selected_tags<I, S>(&self, tags: I) -> Arc<FeedState>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dispatch(FeedAction::TagsSelected(
            tags.into_iter().map(Into::into).collect(),
        ))
    }

    /// Filter by a single tag, dropping any search text. Does not fetch.
    pub fn select_tag(&self, tag: impl Into<String>) -> Arc<FeedState> {
        self.dispatch(FeedAction::TagPicked(tag.into()))
    }

    /// Toggle the expanded flag of one photo. Never fetches tags itself.
    pub fn expand_image(&self, photo_id: &str) -> Arc<FeedState> {
        let before = self.snapshot();
        let after = self.dispatch(FeedAction::ExpandToggled(photo_id.to_string()));
        if Arc::ptr_eq(&before, &after) {
            tracing::debug!(photo_id, "Expand ignored, photo not in feed");
        }
        after
    }

    /// Fetch a page of photos for the current filters.
    ///
    /// Publishes `is_loading = true` first and exactly one terminal snapshot
    /// with `is_loading = false`, whatever the outcome. Returns that terminal
    /// snapshot; its `error` is set only if this fetch failed.
    pub async fn fetch_photos(&self, page: u32) -> Arc<FeedState> {
        let started = self.dispatch(FeedAction::FetchStarted);
        let request = query_builder::build(&started.filters, page);
        tracing::debug!(kind = %request.kind, query = %request.query_string(), "Fetching photos");

        let outcome = match self.fetcher.fetch_photos(&request).await {
            Ok(response) => resolve(response),
            Err(err) => Err(err),
        };

        let action = match outcome {
            Ok(result) => {
                tracing::info!(
                    page,
                    server_pages = ?result.pages,
                    count = result.photo.len(),
                    "Photos fetched"
                );
                FeedAction::PhotosLoaded {
                    photos: result.photo.into_iter().map(Photo::from).collect(),
                    requested_page: page,
                    server_max_page: result.pages,
                }
            }
            Err(err) => {
                tracing::warn!(page, "Photo fetch failed: {}", err);
                FeedAction::PhotosFailed(err.to_string())
            }
        };

        self.dispatch(action)
    }

    /// Fetch the tag list of one photo and splice it into the feed.
    ///
    /// The splice is applied to whatever the feed looks like when the
    /// response arrives. Failures only set the error message.
    pub async fn fetch_tags(&self, photo_id: &str) {
        let request = query_builder::build_tags(photo_id);
        tracing::debug!(photo_id, "Fetching tags");

        let outcome = match self.fetcher.fetch_tags(&request).await {
            Ok(response) => resolve(response),
            Err(err) => Err(err),
        };

        let action = match outcome {
            Ok(tags) => {
                tracing::info!(photo_id, count = tags.len(), "Tags fetched");
                FeedAction::TagsLoaded {
                    photo_id: photo_id.to_string(),
                    tags,
                }
            }
            Err(err) => {
                tracing::warn!(photo_id, "Tag fetch failed: {}", err);
                FeedAction::TagsFailed(err.to_string())
            }
        };

        let before = self.snapshot();
        let after = self.dispatch(action);
        if Arc::ptr_eq(&before, &after) {
            tracing::debug!(photo_id, "Tags dropped, photo left the feed");
        }
    }

    /// Clear filters and reload the first page, replacing the feed once it arrives.
    pub async fn refresh(&self) -> Arc<FeedState> {
        self.dispatch(FeedAction::Reset);
        self.fetch_photos(0).await
    }
}

#[cfg(feature = "tokio-runtime")]
impl FeedStore {
    /// Run [`FeedStore::fetch_photos`] as an independent task.
    pub fn spawn_fetch_photos(self: &Arc<Self>, page: u32) -> tokio::task::JoinHandle<Arc<FeedState>> {
        let store = Arc::clone(self);
        tokio::spawn(async move { store.fetch_photos(page).await })
    }

    /// Run [`FeedStore::fetch_tags`] as an independent task.
    pub fn spawn_fetch_tags(self: &Arc<Self>, photo_id: impl Into<String>) -> tokio::task::JoinHandle<()> {
        let store = Arc::clone(self);
        let photo_id = photo_id.into();
        tokio::spawn(async move { store.fetch_tags(&photo_id).await })
    }

    /// Run [`FeedStore::refresh`] as an independent task.
    pub fn spawn_refresh(self: &Arc<Self>) -> tokio::task::JoinHandle<Arc<FeedState>> {
        let store = Arc::clone(self);
        tokio::spawn(async move { store.refresh().await })
    }
}
