//! Feed commands
//!
//! Thin wrappers over the feed store. Fetches are spawned, so every command
//! returns immediately and results arrive as published snapshots.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use flickrer_core::{CommandError, FeedState, FeedStore};

/// Requests the next page at most once per page boundary.
///
/// Only the outcome of the trigger's own page fetch re-arms it; errors from
/// tag fetches or earlier requests leave the boundary spent.
#[derive(Debug, Default)]
pub struct PageTrigger {
    requested: Option<u32>,
    /// Set by the fetch task when the requested page failed
    failed: Arc<AtomicBool>,
}

impl PageTrigger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Page to request for `state`, or `None` when the boundary was already
    /// requested or a fetch is in flight.
    pub fn next(&mut self, state: &FeedState) -> Option<u32> {
        if state.is_loading {
            return None;
        }

        let page = state.next_page();
        if self.requested == Some(page) && !self.failed.swap(false, Ordering::AcqRel) {
            return None;
        }

        self.requested = Some(page);
        self.failed.store(false, Ordering::Release);
        Some(page)
    }

    /// Flag the fetch task raises when the page it loaded failed.
    fn failure_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.failed)
    }

    /// Forget the last boundary; used when the filters change.
    pub fn reset(&mut self) {
        self.requested = None;
        self.failed.store(false, Ordering::Release);
    }
}

/// Search by text and load the first page.
pub fn search(store: &Arc<FeedStore>, trigger: &mut PageTrigger, text: &str) {
    store.set_text(text);
    trigger.reset();
    store.spawn_fetch_photos(0);
}

/// Filter by a single tag and load the first page.
pub fn filter_tag(store: &Arc<FeedStore>, trigger: &mut PageTrigger, tag: &str) {
    store.select_tag(tag);
    trigger.reset();
    store.spawn_fetch_photos(0);
}

/// Replace the tag filter and load the first page.
pub fn filter_tags(store: &Arc<FeedStore>, trigger: &mut PageTrigger, tags: &[String]) {
    store.set_selected_tags(tags.iter().cloned());
    trigger.reset();
    store.spawn_fetch_photos(0);
}

/// Load the next page. Returns the requested page, if any.
pub fn load_more(store: &Arc<FeedStore>, trigger: &mut PageTrigger) -> Option<u32> {
    let page = trigger.next(&store.snapshot())?;
    let failed = trigger.failure_flag();
    let store = Arc::clone(store);
    tokio::spawn(async move {
        let settled = store.fetch_photos(page).await;
        if settled.error.is_some() {
            failed.store(true, Ordering::Release);
        }
    });
    Some(page)
}

/// Toggle a photo; opening one without tags also fetches them.
///
/// Returns whether the photo is now expanded.
pub fn expand(store: &Arc<FeedStore>, photo_id: &str) -> Result<bool, CommandError> {
    let state = store.expand_image(photo_id);
    let photo = state.photo(photo_id).ok_or_else(|| CommandError {
        code: "E_NOT_FOUND".to_string(),
        message: format!("no photo with id {} in the feed", photo_id),
    })?;

    if photo.expanded && !photo.has_tags() {
        store.spawn_fetch_tags(photo_id);
    }

    Ok(photo.expanded)
}

/// Clear filters and reload the first page.
pub fn refresh(store: &Arc<FeedStore>, trigger: &mut PageTrigger) {
    trigger.reset();
    store.spawn_refresh();
}

#[cfg(test)]
mod tests {
    use super::*;
    use flickrer_core::models::{PhotosEnvelope, TagsEnvelope};
    use flickrer_core::services::BoxFuture;
    use flickrer_core::{AppError, AppResult, FetchResponse, RemoteFetcher, RequestDescriptor, RequestKind};
    use serde_json::json;
    use std::sync::Mutex;
    use std::time::Duration;

    /// Answers every request with the same small page and tag list, or
    /// with a failure while the matching flag is raised.
    #[derive(Default)]
    struct StubFetcher {
        requests: Mutex<Vec<RequestDescriptor>>,
        fail_photos: AtomicBool,
        fail_tags: AtomicBool,
    }

    impl StubFetcher {
        fn kinds(&self) -> Vec<RequestKind> {
            self.requests.lock().unwrap().iter().map(|r| r.kind).collect()
        }
    }

    impl RemoteFetcher for StubFetcher {
        fn fetch_photos<'a>(
            &'a self,
            request: &'a RequestDescriptor,
        ) -> BoxFuture<'a, AppResult<FetchResponse<PhotosEnvelope>>> {
            self.requests.lock().unwrap().push(request.clone());
            let fail = self.fail_photos.load(Ordering::SeqCst);
            Box::pin(async move {
                if fail {
                    return Ok(FetchResponse::status(500));
                }
                let envelope: PhotosEnvelope = serde_json::from_value(json!({
                    "stat": "ok",
                    "photos": {
                        "page": 1,
                        "pages": 3,
                        "photo": [{ "id": "1", "title": "one" }, { "id": "2", "title": "two" }]
                    }
                }))?;
                Ok(FetchResponse::ok(envelope))
            })
        }

        fn fetch_tags<'a>(
            &'a self,
            request: &'a RequestDescriptor,
        ) -> BoxFuture<'a, AppResult<FetchResponse<TagsEnvelope>>> {
            self.requests.lock().unwrap().push(request.clone());
            let photo_id = request.param("photo_id").unwrap_or_default().to_string();
            let fail = self.fail_tags.load(Ordering::SeqCst);
            Box::pin(async move {
                if fail {
                    return Err(AppError::Transport("connection reset".to_string()));
                }
                let envelope: TagsEnvelope = serde_json::from_value(json!({
                    "stat": "ok",
                    "photo": {
                        "id": photo_id,
                        "tags": { "tag": [{ "id": "t1", "raw": "Cat", "_content": "cat" }] }
                    }
                }))?;
                Ok(FetchResponse::ok(envelope))
            })
        }
    }

    fn setup() -> (Arc<StubFetcher>, Arc<FeedStore>) {
        let fetcher = Arc::new(StubFetcher::default());
        let store = Arc::new(FeedStore::new(fetcher.clone()));
        (fetcher, store)
    }

    async fn settle() {
        tokio::time::sleep(Duration::from_millis(20)).await;
    }

    #[test]
    fn test_trigger_once_per_boundary() {
        let mut trigger = PageTrigger::new();
        let state = FeedState {
            page: 1,
            ..FeedState::default()
        };
        assert_eq!(trigger.next(&state), Some(2));
        assert_eq!(trigger.next(&state), None);

        let state = FeedState {
            page: 2,
            ..FeedState::default()
        };
        assert_eq!(trigger.next(&state), Some(3));
    }

    #[test]
    fn test_trigger_waits_while_loading() {
        let mut trigger = PageTrigger::new();
        let state = FeedState {
            page: 1,
            is_loading: true,
            ..FeedState::default()
        };
        assert_eq!(trigger.next(&state), None);
    }

    #[test]
    fn test_trigger_rearms_only_after_own_failure() {
        let mut trigger = PageTrigger::new();
        let state = FeedState {
            page: 1,
            ..FeedState::default()
        };
        assert_eq!(trigger.next(&state), Some(2));

        // an error left by something else does not re-arm the boundary
        let unrelated = FeedState {
            page: 1,
            error: Some("connection reset".to_string()),
            ..FeedState::default()
        };
        assert_eq!(trigger.next(&unrelated), None);

        trigger.failure_flag().store(true, Ordering::SeqCst);
        assert_eq!(trigger.next(&unrelated), Some(2));
        assert_eq!(trigger.next(&unrelated), None);
    }

    #[test]
    fn test_trigger_reset() {
        let mut trigger = PageTrigger::new();
        let state = FeedState::default();
        assert_eq!(trigger.next(&state), Some(1));
        trigger.reset();
        assert_eq!(trigger.next(&state), Some(1));
    }

    #[tokio::test]
    async fn test_search_fetches_first_page() {
        let (fetcher, store) = setup();
        let mut trigger = PageTrigger::new();

        search(&store, &mut trigger, "harbour");
        settle().await;

        assert_eq!(fetcher.kinds(), vec![RequestKind::Search]);
        let state = store.snapshot();
        assert_eq!(state.search_text(), Some("harbour"));
        assert_eq!(state.photos.len(), 2);
        assert_eq!(state.page, 0);
    }

    #[tokio::test]
    async fn test_expand_fetches_missing_tags() {
        let (fetcher, store) = setup();
        store.fetch_photos(0).await;

        assert!(expand(&store, "1").unwrap());
        settle().await;

        assert_eq!(fetcher.kinds(), vec![RequestKind::Recent, RequestKind::Tags]);
        let photo = store.snapshot().photo("1").cloned().unwrap();
        assert!(photo.expanded);
        assert_eq!(photo.tags.as_ref().map(Vec::len), Some(1));

        // Collapsing and reopening does not fetch again
        assert!(!expand(&store, "1").unwrap());
        assert!(expand(&store, "1").unwrap());
        settle().await;
        assert_eq!(fetcher.kinds().len(), 2);
    }

    #[tokio::test]
    async fn test_expand_unknown_photo() {
        let (fetcher, store) = setup();
        let err = expand(&store, "missing").unwrap_err();
        assert_eq!(err.code, "E_NOT_FOUND");
        assert!(fetcher.kinds().is_empty());
    }

    #[tokio::test]
    async fn test_load_more_requests_next_page_once() {
        let (fetcher, store) = setup();
        store.fetch_photos(0).await;
        let mut trigger = PageTrigger::new();

        assert_eq!(load_more(&store, &mut trigger), Some(1));
        settle().await;
        assert_eq!(store.snapshot().page, 1);
        assert_eq!(store.snapshot().photos.len(), 2);

        assert_eq!(load_more(&store, &mut trigger), Some(2));
        settle().await;
        assert_eq!(store.snapshot().photos.len(), 4);

        // the server reports 3 pages, so the cursor stays clamped at 2
        assert_eq!(load_more(&store, &mut trigger), Some(3));
        settle().await;
        assert_eq!(store.snapshot().page, 2);
        assert_eq!(load_more(&store, &mut trigger), None);
        assert_eq!(fetcher.kinds().len(), 4);
    }

    #[tokio::test]
    async fn test_tag_failure_does_not_repeat_last_page() {
        let (fetcher, store) = setup();
        store.fetch_photos(2).await;
        store.fetch_photos(3).await;
        assert_eq!(store.snapshot().page, 2);
        let mut trigger = PageTrigger::new();

        assert_eq!(load_more(&store, &mut trigger), Some(3));
        settle().await;
        assert_eq!(load_more(&store, &mut trigger), None);
        let count = store.snapshot().photos.len();

        fetcher.fail_tags.store(true, Ordering::SeqCst);
        store.fetch_tags("1").await;
        assert_eq!(store.snapshot().error.as_deref(), Some("connection reset"));

        assert_eq!(load_more(&store, &mut trigger), None);
        settle().await;
        assert_eq!(store.snapshot().photos.len(), count);
        assert_eq!(
            fetcher.kinds(),
            vec![RequestKind::Recent, RequestKind::Recent, RequestKind::Recent, RequestKind::Tags]
        );
    }

    #[tokio::test]
    async fn test_failed_page_can_be_retried() {
        let (fetcher, store) = setup();
        store.fetch_photos(0).await;
        let mut trigger = PageTrigger::new();

        fetcher.fail_photos.store(true, Ordering::SeqCst);
        assert_eq!(load_more(&store, &mut trigger), Some(1));
        settle().await;
        assert_eq!(store.snapshot().error.as_deref(), Some("HTTP 500"));

        fetcher.fail_photos.store(false, Ordering::SeqCst);
        assert_eq!(load_more(&store, &mut trigger), Some(1));
        settle().await;
        assert!(store.snapshot().error.is_none());
        assert_eq!(load_more(&store, &mut trigger), Some(2));
    }

    #[tokio::test]
    async fn test_filter_tag_clears_text() {
        let (fetcher, store) = setup();
        let mut trigger = PageTrigger::new();
        search(&store, &mut trigger, "harbour");
        settle().await;

        filter_tag(&store, &mut trigger, "cat");
        settle().await;

        let state = store.snapshot();
        assert_eq!(state.search_text(), None);
        assert_eq!(state.selected_tags(), ["cat".to_string()]);
        assert_eq!(fetcher.kinds(), vec![RequestKind::Search, RequestKind::Search]);
    }
}
