//! Feed snapshot model

use std::sync::Arc;

use serde::Serialize;

use super::Photo;

/// The filter half of the feed state, as seen by the query builder.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Filters {
    /// `None` means no active search
    pub search_text: Option<String>,
    /// Ordered and deduplicated
    pub selected_tags: Vec<String>,
}

impl Filters {
    /// Search text, if any non-blank text is set.
    pub fn active_text(&self) -> Option<&str> {
        self.search_text
            .as_deref()
            .filter(|text| !text.trim().is_empty())
    }

    pub fn is_empty(&self) -> bool {
        self.active_text().is_none() && self.selected_tags.is_empty()
    }
}

/// Immutable snapshot of the whole observable feed.
///
/// Photos are held behind `Arc` so that a transition touching one photo
/// shares every other entry with the previous snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedState {
    /// Server order, later pages appended
    pub photos: Vec<Arc<Photo>>,
    /// 0 until a page has been fetched
    pub page: u32,
    #[serde(flatten)]
    pub filters: Filters,
    pub is_loading: bool,
    pub error: Option<String>,
}

impl FeedState {
    pub fn search_text(&self) -> Option<&str> {
        self.filters.search_text.as_deref()
    }

    pub fn selected_tags(&self) -> &[String] {
        &self.filters.selected_tags
    }

    /// Look up a photo by id.
    pub fn photo(&self, photo_id: &str) -> Option<&Arc<Photo>> {
        self.photos.iter().find(|photo| photo.id == photo_id)
    }

    /// Page number the pagination trigger should request next.
    pub fn next_page(&self) -> u32 {
        self.page.saturating_add(1)
    }
}
