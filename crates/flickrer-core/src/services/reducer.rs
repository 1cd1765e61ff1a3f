//! Interaction reducer
//!
//! Pure transitions from one feed snapshot to the next. Every change to the
//! feed, whether triggered by the user or by a completed fetch, is expressed
//! as a [`FeedAction`] and applied here against the latest snapshot.

use std::sync::Arc;

use crate::models::{FeedState, Photo, Tag};
use crate::services::{pagination, tag_enrichment};

/// Something that happened to the feed.
#[derive(Debug, Clone, PartialEq)]
pub enum FeedAction {
    /// Search text changed; blank text clears the search
    TextChanged(String),
    /// Tag filter replaced
    TagsSelected(Vec<String>),
    /// A single tag was picked from a photo's tag list
    TagPicked(String),
    /// Expand/collapse toggled on a photo
    ExpandToggled(String),
    /// Filters cleared and cursor reset ahead of a fresh first page
    Reset,
    /// A photo fetch was issued
    FetchStarted,
    /// A photo fetch completed successfully
    PhotosLoaded {
        photos: Vec<Photo>,
        requested_page: u32,
        server_max_page: Option<i64>,
    },
    /// A tag fetch completed successfully
    TagsLoaded { photo_id: String, tags: Vec<Tag> },
    /// A photo fetch failed
    PhotosFailed(String),
    /// A tag fetch failed
    TagsFailed(String),
}

/// Compute the next snapshot.
///
/// Returns `None` when the action does not change anything, e.g. toggling a
/// photo that is no longer in the feed.
pub fn reduce(state: &FeedState, action: FeedAction) -> Option<FeedState> {
    let mut next = state.clone();

    match action {
        FeedAction::TextChanged(text) => {
            let text = text.trim();
            next.filters.search_text = (!text.is_empty()).then(|| text.to_string());
        }
        FeedAction::TagsSelected(tags) => {
            next.filters.selected_tags = dedup_tags(tags);
        }
        FeedAction::TagPicked(tag) => {
            next.filters.search_text = None;
            next.filters.selected_tags = dedup_tags(vec![tag]);
        }
        FeedAction::ExpandToggled(photo_id) => {
            let index = state.photos.iter().position(|p| p.id == photo_id)?;
            next.photos[index] = Arc::new(state.photos[index].toggled());
        }
        FeedAction::Reset => {
            next.filters.search_text = None;
            next.filters.selected_tags.clear();
            next.page = 0;
        }
        FeedAction::FetchStarted => {
            next.is_loading = true;
        }
        FeedAction::PhotosLoaded {
            photos,
            requested_page,
            server_max_page,
        } => {
            let incoming = photos.into_iter().map(Arc::new).collect();
            let (photos, page) =
                pagination::merge(&state.photos, incoming, requested_page, server_max_page);
            next.photos = photos;
            next.page = page;
            next.error = None;
            next.is_loading = false;
        }
        FeedAction::TagsLoaded { photo_id, tags } => {
            next.photos = tag_enrichment::apply(&state.photos, &photo_id, &tags)?;
            next.error = None;
        }
        FeedAction::PhotosFailed(message) => {
            next.error = Some(message);
            next.is_loading = false;
        }
        FeedAction::TagsFailed(message) => {
            next.error = Some(message);
        }
    }

    Some(next)
}

/// Drop blanks and repeats, keeping first-seen order.
fn dedup_tags(tags: Vec<String>) -> Vec<String> {
    let mut unique: Vec<String> = Vec::with_capacity(tags.len());
    for tag in tags {
        let tag = tag.trim();
        if !tag.is_empty() && !unique.iter().any(|t| t == tag) {
            unique.push(tag.to_string());
        }
    }
    unique
}
